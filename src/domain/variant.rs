use uuid::Uuid;

/// A concrete purchasable SKU of a product, with its inventory counters
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: Uuid,
    /// Externally supplied code, unique across the catalog
    pub code: String,
    pub name: String,
    /// Inventory bookkeeping. Untracked variants are treated as always
    /// available, tracked variants count reserved-but-unshipped units
    /// separately as `on_hold`.
    pub tracked: bool,
    pub on_hand: i32,
    pub on_hold: i32,
}
