//! # grantsync-core
//!
//! Reconciliation engine for delegated OAuth2 permission grants in an
//! identity directory.
//!
//! A grant attaches a set of scope strings to the triple (client service
//! principal, resource service principal, consent type [+ principal]).
//! This crate locates the unique grant for that triple by walking the
//! directory's paged listing, normalizes scope strings into canonical
//! sets, computes the merge (Add) or subtraction (Remove) against the
//! existing set, and then creates, updates, or deletes the remote grant -
//! deleting rather than ever leaving an empty-scope grant behind. A
//! dry-run mode computes and reports the identical plan without issuing
//! any mutating call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use grantsync_core::{ConsentType, Engine, Operation, Request};
//! use grantsync_directory_sdk::Directory;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(Directory::from_env()?);
//!
//! let outcome = engine
//!     .run(&Request {
//!         operation: Operation::Add,
//!         client_id: "client-sp-id".into(),
//!         resource_id: "resource-sp-id".into(),
//!         consent_type: Some(ConsentType::AllPrincipals),
//!         principal_id: None,
//!         scopes: vec!["User.Read,Mail.Read".into()],
//!         dry_run: true,
//!     })
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - Scopes outside the requested set are never touched: Add only ever
//!   grows the remote set, Remove only ever shrinks it by the requested
//!   scopes.
//! - At most one grant matches a change selector; several matches abort
//!   with [`Error::Ambiguous`] instead of silently picking one.
//! - Each operation performs at most one mutating call; there is no
//!   partial-mutation state to reason about.
//! - Nothing is cached between runs, and nothing retries automatically -
//!   transient failures are classified ([`Error::is_retryable`]) and left
//!   to the caller. Two uncoordinated callers racing on the same grant
//!   resolve as last-write-wins; this engine does not lock or version.

mod apply;
mod directory;
mod engine;
mod error;
mod locator;
mod reconcile;
mod scopes;
mod selector;

pub use apply::{apply, ChangeReport};
pub use directory::DirectoryApi;
pub use engine::{Engine, GrantView, Operation, Outcome, Request};
pub use error::{Error, Result};
pub use locator::{find_grant, list_grants};
pub use reconcile::{plan_add, plan_remove, Action, Reconciliation};
pub use scopes::ScopeSet;
pub use selector::GrantSelector;

// Directory wire types used throughout the engine API
pub use grantsync_directory_sdk::{ConsentType, PermissionGrant};
