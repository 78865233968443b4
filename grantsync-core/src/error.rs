//! Top-level error types for grant reconciliation
//!
//! Flattens directory SDK failures into the categories callers act on:
//! fix the request, fix credentials, retry later, or investigate directory
//! state. "Not found" is deliberately absent - a missing grant is a normal
//! outcome (empty view, no-op remove), never an error.

use grantsync_directory_sdk::DirectoryError;
use thiserror::Error;

/// Hint appended to authorization failures so operators know what to fix.
const PERMISSION_HINT: &str =
    "the signed-in identity needs permission to manage delegated permission grants \
     (e.g. DelegatedPermissionGrant.ReadWrite.All or Directory.ReadWrite.All)";

/// Errors from grant reconciliation operations
#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is malformed (empty scope list, Principal consent
    /// without a principal id). Raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// More than one grant matched a selector after full pagination.
    ///
    /// The directory guarantees at most one grant per (client, resource,
    /// consent type, principal); finding several means external state is
    /// inconsistent and needs operator attention, so the ids are included.
    #[error("ambiguous grant state for {selector}: matching grant ids {ids:?}")]
    Ambiguous { selector: String, ids: Vec<String> },

    /// Authentication or authorization failed; fatal for the whole run.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// Network failure, timeout, throttling, or a directory 5xx.
    ///
    /// Safe to retry from the top (a fresh locate), which is the caller's
    /// decision - the engine never retries on its own.
    #[error("transient directory failure: {0}")]
    Transient(String),

    /// Any other directory failure (schema violations, rejected requests).
    #[error("directory request failed: {0}")]
    Api(String),
}

impl Error {
    /// Returns true if retrying the whole operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Wrap a directory SDK failure with the action being attempted.
    pub(crate) fn directory(context: impl std::fmt::Display, err: DirectoryError) -> Self {
        match err {
            DirectoryError::Authentication(_) | DirectoryError::Forbidden(_) => {
                Self::Auth(format!("{}: {} ({})", context, err, PERMISSION_HINT))
            }
            DirectoryError::RateLimited(_)
            | DirectoryError::ServiceUnavailable(_)
            | DirectoryError::Network(_) => Self::Transient(format!("{}: {}", context, err)),
            other => Self::Api(format!("{}: {}", context, other)),
        }
    }
}

/// Result type for grant reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;
