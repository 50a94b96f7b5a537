use uuid::Uuid;

use crate::domain::EmailAddress;

/// An authenticated storefront account, resolved by the calling layer.
/// The engine only ever borrows it; guest requests carry no customer at all.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: Uuid,
    /// Accounts created through some storefront flows may not have an
    /// address on file yet
    pub email: Option<EmailAddress>,
}
