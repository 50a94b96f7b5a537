use actix_web::http::StatusCode;
use actix_web::ResponseError;

use thiserror::Error;

use crate::engine::EngineError;

pub type RestResult<T> = Result<T, RestError>;

// Request-shape failures (missing/malformed form fields) are rejected by the
// extractors before a handler runs; eligibility rejections carry their own
// status mapping in the controller. This enum only covers what is left.
// TODO: I18n for errors
#[derive(Debug, Error)]
pub enum RestError {
    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<EngineError> for RestError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Token(_) => Self::InternalError("Token generation".into()),
            EngineError::Store(_) => Self::InternalError("Storage error".into()),
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
