//! Bearer token sources
//!
//! Interactive sign-in, token caches, and refresh flows are out of scope for
//! this SDK; they live behind the [`TokenSource`] trait. The client asks the
//! source for a token before each request, so refreshing implementations
//! stay current without the client knowing.

use crate::error::DirectoryError;
use async_trait::async_trait;

/// Supplies bearer tokens for directory requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a bearer token valid for the next request.
    async fn bearer_token(&self) -> Result<String, DirectoryError>;
}

/// A fixed, pre-acquired bearer token.
///
/// Suitable for CLI use where the caller already holds a token (e.g. from
/// `az account get-access-token` or a device-code flow run elsewhere).
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap an existing bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Result<String, DirectoryError> {
        if self.token.is_empty() {
            return Err(DirectoryError::Configuration(
                "bearer token is empty".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}
