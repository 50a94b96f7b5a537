use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;

use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine as _,
};
use regex::Regex;

/// Bytes of entropy per token. 16 bytes encode to 22 URL-safe characters.
const TOKEN_BYTES: usize = 16;

lazy_static::lazy_static! {
    // Base64 serialization engine
    static ref BASE64_ENGINE: engine::GeneralPurpose =
        engine::GeneralPurpose::new(&alphabet::URL_SAFE, general_purpose::NO_PAD);
    // Regex for checking token strings
    static ref TOKEN_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]{16,}$").unwrap();
}

/// Various errors that can occur when handling deletion tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is of invalid format")]
    InvalidFormat,
    #[error("Entropy source unavailable")]
    Entropy(#[from] rand::Error),
}

/// Wrapper for token results
pub type TokenResult<T> = Result<T, TokenError>;

/// Opaque, unguessable credential granting deletion rights over exactly one
/// subscription. Delivered to the subscriber inside a link; possession of
/// the token is the entire authorization for deletion.
///
/// The token is never decoded. The only structure it carries is its
/// URL-safe alphabet, so it can be embedded in a GET link as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionToken(String);

impl DeletionToken {
    /// Draw a fresh token from the OS CSPRNG.
    ///
    /// Fails only when the entropy source is unavailable, in which case the
    /// caller must not persist the subscription.
    pub fn generate() -> TokenResult<Self> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;

        Ok(Self(BASE64_ENGINE.encode(bytes)))
    }
}

impl fmt::Display for DeletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DeletionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DeletionToken {
    type Err = TokenError;

    fn from_str(token: &str) -> TokenResult<Self> {
        if !TOKEN_REGEX.is_match(token) {
            Err(TokenError::InvalidFormat)
        } else {
            Ok(Self(token.to_string()))
        }
    }
}
