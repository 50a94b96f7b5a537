use uuid::Uuid;

use crate::domain::{Customer, EmailAddress, ProductVariant};
use crate::engine::{CreateRequest, EngineError, Rejection};
use crate::inventory::AvailabilityChecker;
use crate::repo::{SubscriptionStore, VariantCatalog};

/// A creation request that has passed every eligibility gate
#[derive(Debug)]
pub(crate) struct Eligible {
    pub email: EmailAddress,
    pub customer_id: Option<Uuid>,
    pub variant: ProductVariant,
}

/// Decides whether a `(email-or-customer, variant)` pair may create a
/// subscription. Checks run in a fixed order and the first failure wins;
/// a rejection leaves no side effects anywhere.
pub(crate) struct EligibilityEvaluator<'a> {
    pub catalog: &'a dyn VariantCatalog,
    pub checker: &'a dyn AvailabilityChecker,
    pub store: &'a dyn SubscriptionStore,
}

impl EligibilityEvaluator<'_> {
    pub async fn evaluate(
        &self,
        request: &CreateRequest,
        customer: Option<&Customer>,
    ) -> Result<Result<Eligible, Rejection>, EngineError> {
        // 1. Resolve the contact email. An explicit address takes the guest
        //    path and does not attach the customer, mirroring the storefront
        //    form where the email field only exists for guests.
        let (email, customer_id) = match (&request.email, customer) {
            (Some(raw), _) => {
                if raw.trim().is_empty() {
                    return Ok(Err(Rejection::MissingEmail));
                }
                match raw.parse::<EmailAddress>() {
                    Ok(email) => (email, None),
                    Err(violation) => return Ok(Err(Rejection::InvalidEmail(violation))),
                }
            }
            (None, Some(customer)) => match &customer.email {
                Some(email) => (email.clone(), Some(customer.id)),
                None => return Ok(Err(Rejection::MissingEmail)),
            },
            (None, None) => return Ok(Err(Rejection::MissingEmail)),
        };

        // 2. Resolve the target variant by its external code
        let variant = match self
            .catalog
            .find_by_code(&request.product_variant_code)
            .await?
        {
            Some(variant) => variant,
            None => {
                return Ok(Err(Rejection::VariantNotFound(
                    request.product_variant_code.clone(),
                )))
            }
        };

        // 3. A subscription is only meaningful for a variant that cannot be
        //    bought right now
        if self.checker.is_stock_available(&variant) {
            return Ok(Err(Rejection::VariantNotOutOfStock(variant.code)));
        }

        // 4. One subscription per (email, variant)
        if self
            .store
            .find_by_email_and_variant(&email, &variant.code)
            .await?
            .is_some()
        {
            return Ok(Err(Rejection::AlreadySubscribed { email }));
        }

        Ok(Ok(Eligible {
            email,
            customer_id,
            variant,
        }))
    }
}
