use thiserror::Error;

use crate::domain::{EmailAddress, Subscription};

/// Tagged result of an engine operation. The calling layer translates it
/// into user feedback; the engine never turns an expected rejection into an
/// error.
#[derive(Debug)]
pub enum Outcome {
    /// The operation went through. Carries the created (or just removed)
    /// subscription record.
    Success(Subscription),
    /// The request was refused for one of the expected reasons
    Rejected(Rejection),
    /// Nothing happened and nothing was wrong, e.g. a re-clicked deletion
    /// link whose subscription is already gone
    Informational(String),
}

/// Expected rejection reasons, each with a displayable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("An email address is required to subscribe")]
    MissingEmail,

    #[error("{0}")]
    InvalidEmail(String),

    #[error("No product variant found for code {0}")]
    VariantNotFound(String),

    #[error("Variant {0} is currently in stock")]
    VariantNotOutOfStock(String),

    #[error("A subscription for {email} already exists")]
    AlreadySubscribed { email: EmailAddress },
}

/// Coarse classification of rejections, used by the REST layer to pick a
/// status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    Validation,
    NotFound,
    Conflict,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::MissingEmail | Self::InvalidEmail(_) => RejectionKind::Validation,
            Self::VariantNotFound(_) => RejectionKind::NotFound,
            Self::VariantNotOutOfStock(_) | Self::AlreadySubscribed { .. } => {
                RejectionKind::Conflict
            }
        }
    }
}
