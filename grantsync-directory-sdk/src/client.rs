//! Directory API client

use crate::error::{ApiErrorResponse, DirectoryError};
use crate::grants::{GrantPage, GrantPatch, NewGrant, PermissionGrant};
use crate::token::{StaticToken, TokenSource};
use crate::users::User;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default API base URL
const DEFAULT_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Client
// ============================================================================

/// Identity directory API client
///
/// Covers the handful of endpoints the grant tooling needs: paging through a
/// service principal's OAuth2 permission grants, mutating individual grants,
/// and best-effort user lookups for display.
///
/// The client performs exactly one HTTP call per method invocation. Failed
/// calls are classified (see [`DirectoryError::is_retryable`]) but never
/// retried internally: a retried grant creation can produce duplicates, so
/// the retry decision belongs to the caller, after re-locating the grant.
#[derive(Clone)]
pub struct Directory {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("base_url", &self.base_url)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

impl Directory {
    /// Create a new client with a fixed bearer token
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, DirectoryError> {
        Self::builder().bearer_token(bearer_token).build()
    }

    /// Create a new client from the environment
    ///
    /// Reads the token from `DIRECTORY_TOKEN` and, when set, the base URL
    /// from `DIRECTORY_BASE_URL`.
    pub fn from_env() -> Result<Self, DirectoryError> {
        let token = std::env::var("DIRECTORY_TOKEN").map_err(|_| {
            DirectoryError::Configuration(
                "DIRECTORY_TOKEN environment variable not set".to_string(),
            )
        })?;

        let mut builder = Self::builder().bearer_token(token);
        if let Ok(base) = std::env::var("DIRECTORY_BASE_URL") {
            builder = builder.base_url(base);
        }
        builder.build()
    }

    /// Create a builder for more advanced configuration
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::new()
    }

    /// Get a handle to the permission grants API
    pub fn grants(&self) -> Grants<'_> {
        Grants { client: self }
    }

    /// Get a handle to the users API
    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }

    /// Resolve a bearer token once, verifying the session is usable
    ///
    /// Callers invoke this before their first real request and treat a
    /// failure as fatal for the whole run.
    pub async fn ensure_signed_in(&self) -> Result<(), DirectoryError> {
        self.tokens.bearer_token().await.map(|_| ())
    }

    /// The configured base URL (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn headers(&self) -> Result<HeaderMap, DirectoryError> {
        let token = self.tokens.bearer_token().await?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| DirectoryError::Configuration(format!("Invalid bearer token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Execute a request and parse the JSON response body
    async fn execute<T, B>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, DirectoryError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let response = self.send(method, url, body).await?;
        response.json::<T>().await.map_err(|e| {
            DirectoryError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    /// Execute a request whose success response carries no body of interest
    async fn execute_no_content<B>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<(), DirectoryError>
    where
        B: serde::Serialize,
    {
        self.send(method, url, body).await.map(|_| ())
    }

    async fn send<B>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, DirectoryError>
    where
        B: serde::Serialize,
    {
        let headers = self.headers().await?;
        let mut request = self.client.request(method, url).headers(headers);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request
            .send()
            .await
            .map_err(DirectoryError::from_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(parse_error_response(&error_body, status.as_u16()))
    }

    /// Check that a server-supplied pagination link points back at this API
    ///
    /// A next link on a foreign host is a schema violation, not something to
    /// follow: requests carry the bearer token.
    fn validate_next_link(&self, link: &str) -> Result<String, DirectoryError> {
        let next = Url::parse(link).map_err(|e| {
            DirectoryError::InvalidResponse(format!("Invalid pagination link {:?}: {}", link, e))
        })?;
        let base = Url::parse(&self.base_url).map_err(|e| {
            DirectoryError::Configuration(format!("Invalid base URL {:?}: {}", self.base_url, e))
        })?;

        if next.host_str() != base.host_str() || next.port_or_known_default() != base.port_or_known_default()
        {
            return Err(DirectoryError::InvalidResponse(format!(
                "Pagination link {:?} does not match API host {:?}",
                link, self.base_url
            )));
        }
        Ok(next.into())
    }
}

/// Builder for directory client configuration
///
/// Create with [`Directory::builder()`]. A token (or custom [`TokenSource`])
/// is required - call [`Self::build()`] to create the client.
pub struct DirectoryBuilder {
    tokens: Option<Arc<dyn TokenSource>>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl DirectoryBuilder {
    fn new() -> Self {
        Self {
            tokens: None,
            base_url: None,
            timeout: None,
        }
    }

    /// Use a fixed bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.tokens = Some(Arc::new(StaticToken::new(token)));
        self
    }

    /// Use a custom token source (refresh flows, test fakes)
    pub fn token_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.tokens = Some(Arc::new(source));
        self
    }

    /// Set a custom API base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Directory, DirectoryError> {
        let tokens = self.tokens.ok_or_else(|| {
            DirectoryError::Configuration("A bearer token or token source is required".to_string())
        })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DirectoryError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Directory {
            client,
            base_url,
            tokens,
        })
    }
}

// ============================================================================
// Grants API
// ============================================================================

/// Permission grants API handle
pub struct Grants<'a> {
    client: &'a Directory,
}

impl<'a> Grants<'a> {
    /// Fetch one page of grants for a client service principal
    ///
    /// Pass `None` to start from the beginning, or the previous page's
    /// [`GrantPage::next_link`] to continue. Callers own the pagination
    /// loop; this method never follows links on its own.
    pub async fn list_page(
        &self,
        client_sp_id: &str,
        next_link: Option<&str>,
    ) -> Result<GrantPage, DirectoryError> {
        let url = match next_link {
            Some(link) => self.client.validate_next_link(link)?,
            None => format!(
                "{}/servicePrincipals/{}/oauth2PermissionGrants",
                self.client.base_url, client_sp_id
            ),
        };

        self.client
            .execute::<GrantPage, ()>(reqwest::Method::GET, &url, None)
            .await
    }

    /// Create a new grant, returning it with its assigned identifier
    ///
    /// Not safe to blindly retry: a timed-out create may have committed
    /// remotely. Re-list before retrying to avoid duplicate grants.
    pub async fn create(&self, grant: &NewGrant) -> Result<PermissionGrant, DirectoryError> {
        let url = format!("{}/oauth2PermissionGrants", self.client.base_url);
        self.client
            .execute(reqwest::Method::POST, &url, Some(grant))
            .await
    }

    /// Replace a grant's scope string
    pub async fn update_scope(&self, grant_id: &str, scope: &str) -> Result<(), DirectoryError> {
        let url = format!("{}/oauth2PermissionGrants/{}", self.client.base_url, grant_id);
        let patch = GrantPatch {
            scope: scope.to_string(),
        };
        self.client
            .execute_no_content(reqwest::Method::PATCH, &url, Some(&patch))
            .await
    }

    /// Delete a grant by identifier
    pub async fn delete(&self, grant_id: &str) -> Result<(), DirectoryError> {
        let url = format!("{}/oauth2PermissionGrants/{}", self.client.base_url, grant_id);
        self.client
            .execute_no_content::<()>(reqwest::Method::DELETE, &url, None)
            .await
    }
}

// ============================================================================
// Users API
// ============================================================================

/// Users API handle
pub struct Users<'a> {
    client: &'a Directory,
}

impl<'a> Users<'a> {
    /// Fetch a user by object id
    ///
    /// Returns [`DirectoryError::NotFound`] when the id does not resolve to
    /// a user (it may be a group or service principal).
    pub async fn get(&self, user_id: &str) -> Result<User, DirectoryError> {
        let url = format!("{}/users/{}", self.client.base_url, user_id);
        self.client
            .execute::<User, ()>(reqwest::Method::GET, &url, None)
            .await
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn parse_error_response(body: &str, status_code: u16) -> DirectoryError {
    // Try to parse as a structured directory error first
    if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
        return DirectoryError::from_api_error(&error_response.error, status_code);
    }

    // Fallback to a generic error based on status code
    let msg = if body.is_empty() {
        format!("HTTP {}", status_code)
    } else {
        body.to_string()
    };

    match status_code {
        401 => DirectoryError::Authentication(msg),
        403 => DirectoryError::Forbidden(msg),
        404 => DirectoryError::NotFound(msg),
        429 => DirectoryError::RateLimited(msg),
        500..=599 => DirectoryError::ServiceUnavailable(msg),
        400 => DirectoryError::InvalidRequest(msg),
        _ => DirectoryError::Other(msg),
    }
}
