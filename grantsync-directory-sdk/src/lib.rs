//! Minimal identity directory API client for grantsync
//!
//! This crate provides a lightweight, focused client for the directory
//! endpoints the grant tooling needs: listing a service principal's OAuth2
//! permission grants page by page, creating/updating/deleting individual
//! grants, and best-effort user lookups for display.
//!
//! # Quick Start
//!
//! ```no_run
//! // Requires DIRECTORY_TOKEN environment variable
//! use grantsync_directory_sdk::Directory;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Directory::from_env()?;
//! client.ensure_signed_in().await?;
//!
//! let page = client.grants().list_page("client-sp-id", None).await?;
//! for grant in &page.value {
//!     println!("{}: {}", grant.id, grant.scope);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Pagination
//!
//! Grant listings arrive in pages with an embedded next-link cursor. The
//! client exposes single-page fetches only; callers drive the loop:
//!
//! ```no_run
//! # use grantsync_directory_sdk::Directory;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Directory::from_env()?;
//! let mut next = None;
//! loop {
//!     let page = client.grants().list_page("client-sp-id", next.as_deref()).await?;
//!     // ... inspect page.value ...
//!     match page.next_link {
//!         Some(link) => next = Some(link),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Retries
//!
//! The client never retries on its own. Errors are classified instead
//! ([`DirectoryError::is_retryable`]); in particular a failed grant
//! creation must be preceded by a fresh listing before any retry, because
//! the original request may have committed remotely.

// Domain modules
mod client;
mod error;
pub mod grants;
mod token;
pub mod users;

// Client types
pub use client::{Directory, DirectoryBuilder, Grants, Users};

// Error types
pub use error::{ApiError, ApiErrorResponse, DirectoryError};

// Token sources
pub use token::{StaticToken, TokenSource};

// Grant types
pub use grants::{ConsentType, GrantPage, GrantPatch, NewGrant, PermissionGrant};

// User types
pub use users::User;
