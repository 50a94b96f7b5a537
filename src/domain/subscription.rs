use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::crypto::DeletionToken;
use crate::domain::EmailAddress;

/// New back-in-stock subscription request, fully resolved by the engine
/// and ready to persist
#[derive(Debug)]
pub struct NewSubscription {
    pub email: EmailAddress,
    /// `None` for guest subscriptions
    pub customer_id: Option<Uuid>,
    pub product_variant_code: String,
    pub channel_code: String,
    pub locale_code: String,
    pub token: DeletionToken,
}

/// Stored subscription record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscription {
    /// ID of the subscription
    pub id: Uuid,
    /// User supplied data
    /// TODO: Should this be parsed back into domain objects?
    pub email: String,
    pub customer_id: Option<Uuid>,
    pub product_variant_code: String,
    /// Storefront context captured at creation, used to render the
    /// back-in-stock notification later
    pub channel_code: String,
    pub locale_code: String,
    /// Sole deletion credential, never reused or regenerated
    pub token: String,
    /// Creation and update timestamps, stamped once on insert
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
