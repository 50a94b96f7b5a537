mod memory;
mod subscriptions;
mod variants;

pub use memory::*;
pub use subscriptions::*;
pub use variants::*;

/// Errors surfaced by the storage backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique-constraint conflict on insert. The engine reports this as an
    /// "already subscribed" rejection rather than a failure.
    #[error("Duplicate subscription")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
