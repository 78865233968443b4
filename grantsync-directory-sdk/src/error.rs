//! Error types for the directory SDK

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// API Error Types
// ============================================================================

/// Directory API error response wrapper
///
/// The directory reports failures as `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Directory API error details
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

// ============================================================================
// SDK Error Types
// ============================================================================

/// Errors that can occur when talking to the directory API
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Authentication failed (invalid or expired bearer token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The caller is authenticated but lacks the required permission
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Throttled by the API
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Service unavailable or internal server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid request (bad parameters, malformed body, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response (failed to parse the API response)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing token, bad base URL, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl DirectoryError {
    /// Returns true if this error is retryable
    ///
    /// Retryable errors are throttling (429), service unavailability (5xx),
    /// and network/timeout failures. The SDK never retries on its own;
    /// this classification is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DirectoryError::RateLimited(_)
                | DirectoryError::ServiceUnavailable(_)
                | DirectoryError::Network(_)
        )
    }

    /// Classify an API error response into an appropriate error variant
    ///
    /// The HTTP status takes precedence; the directory's error code string
    /// is a fallback for proxies that rewrite statuses.
    pub fn from_api_error(error: &ApiError, status_code: u16) -> Self {
        let msg = format!("{}: {}", error.code, error.message);
        let code = error.code.as_str();

        match (status_code, code) {
            (401, _) | (_, "InvalidAuthenticationToken") => DirectoryError::Authentication(msg),
            (403, _) | (_, "Authorization_RequestDenied") => DirectoryError::Forbidden(msg),
            (404, _) | (_, "Request_ResourceNotFound") => DirectoryError::NotFound(msg),
            (429, _) => DirectoryError::RateLimited(msg),
            (500..=599, _) => DirectoryError::ServiceUnavailable(msg),
            (400, _) | (_, "Request_BadRequest") => DirectoryError::InvalidRequest(msg),
            _ => DirectoryError::Other(msg),
        }
    }

    /// Classify a transport-level failure into an appropriate error variant
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            DirectoryError::Network(format!("Connection failed: {}", err))
        } else if err.is_request() {
            DirectoryError::Network(format!("Request failed: {}", err))
        } else {
            DirectoryError::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_rate_limited() {
        let err = DirectoryError::RateLimited("throttled".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_retryable_service_unavailable() {
        let err = DirectoryError::ServiceUnavailable("503".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_retryable_network() {
        let err = DirectoryError::Network("connection refused".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_authentication() {
        let err = DirectoryError::Authentication("token expired".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_forbidden() {
        let err = DirectoryError::Forbidden("missing permission".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_not_found() {
        let err = DirectoryError::NotFound("no such object".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_invalid_response() {
        // A parse failure is a schema problem, not a transient one
        let err = DirectoryError::InvalidResponse("unexpected shape".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_api_error_authentication_by_status() {
        let api_error = ApiError {
            code: "SomeCode".to_string(),
            message: "Unauthorized".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 401);
        assert!(matches!(err, DirectoryError::Authentication(_)));
    }

    #[test]
    fn test_from_api_error_authentication_by_code() {
        let api_error = ApiError {
            code: "InvalidAuthenticationToken".to_string(),
            message: "Access token has expired".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 400);
        assert!(matches!(err, DirectoryError::Authentication(_)));
    }

    #[test]
    fn test_from_api_error_forbidden() {
        let api_error = ApiError {
            code: "Authorization_RequestDenied".to_string(),
            message: "Insufficient privileges".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 403);
        assert!(matches!(err, DirectoryError::Forbidden(_)));
    }

    #[test]
    fn test_from_api_error_not_found() {
        let api_error = ApiError {
            code: "Request_ResourceNotFound".to_string(),
            message: "Resource does not exist".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 404);
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn test_from_api_error_rate_limited() {
        let api_error = ApiError {
            code: "TooManyRequests".to_string(),
            message: "Slow down".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 429);
        assert!(matches!(err, DirectoryError::RateLimited(_)));
    }

    #[test]
    fn test_from_api_error_server_error() {
        let api_error = ApiError {
            code: "InternalServerError".to_string(),
            message: "Boom".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 500);
        assert!(matches!(err, DirectoryError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_api_error_bad_request() {
        let api_error = ApiError {
            code: "Request_BadRequest".to_string(),
            message: "Invalid body".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 400);
        assert!(matches!(err, DirectoryError::InvalidRequest(_)));
    }

    #[test]
    fn test_from_api_error_unknown() {
        let api_error = ApiError {
            code: "Mystery".to_string(),
            message: "Something odd".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 418);
        assert!(matches!(err, DirectoryError::Other(_)));
    }

    #[test]
    fn test_error_message_includes_code() {
        let api_error = ApiError {
            code: "Authorization_RequestDenied".to_string(),
            message: "Insufficient privileges to complete the operation".to_string(),
        };
        let err = DirectoryError::from_api_error(&api_error, 403);
        let display = format!("{}", err);
        assert!(display.contains("Authorization_RequestDenied"));
        assert!(display.contains("Insufficient privileges"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: DirectoryError = json_err.into();
        assert!(matches!(err, DirectoryError::Json(_)));
    }
}
