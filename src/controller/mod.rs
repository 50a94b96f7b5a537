mod identity;
mod subscriptions;

pub use identity::CurrentCustomer;
pub use subscriptions::{account_scope, scope as subscriptions_scope};
