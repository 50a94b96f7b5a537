use crate::domain::ProductVariant;

/// Stock availability check for a single variant.
/// NOTE: Intended to facilitate easier testing/mocking
pub trait AvailabilityChecker: Send + Sync {
    fn is_stock_available(&self, variant: &ProductVariant) -> bool;
}

/// Default availability rule: untracked variants are always available,
/// tracked variants must have sellable units left after subtracting the
/// on-hold count
#[derive(Debug, Default)]
pub struct OnHandAvailabilityChecker;

impl AvailabilityChecker for OnHandAvailabilityChecker {
    fn is_stock_available(&self, variant: &ProductVariant) -> bool {
        !variant.tracked || variant.on_hand - variant.on_hold > 0
    }
}
