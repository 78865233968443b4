//! The reconciliation engine entry point
//!
//! One call per user-visible operation: locate the current grant state,
//! plan the change, apply or preview it. The directory handle is an
//! explicit dependency of the engine, never ambient process state, so the
//! whole flow runs against fakes in tests.

use crate::apply::{apply, ChangeReport};
use crate::error::{Error, Result};
use crate::locator::{find_grant, list_grants};
use crate::reconcile::{plan_add, plan_remove};
use crate::scopes::ScopeSet;
use crate::selector::GrantSelector;
use crate::DirectoryApi;
use grantsync_directory_sdk::{ConsentType, DirectoryError};
use serde::Serialize;
use tracing::warn;

/// The three user-visible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List matching grants and their scopes
    View,

    /// Merge scopes into the target grant, creating it when absent
    Add,

    /// Subtract scopes from the target grant, deleting it when emptied
    Remove,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::View => write!(f, "view"),
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
        }
    }
}

/// One engine invocation.
///
/// `consent_type` is required for Add/Remove (they target a unique grant)
/// and an optional filter for View (which enumerates). `scopes` holds raw
/// caller-supplied tokens; the engine normalizes them.
#[derive(Debug, Clone)]
pub struct Request {
    pub operation: Operation,

    /// Client service principal whose grants are managed
    pub client_id: String,

    /// Resource service principal whose scopes are granted
    pub resource_id: String,

    pub consent_type: Option<ConsentType>,

    pub principal_id: Option<String>,

    /// Raw scope tokens (space/comma delimited or separate entries)
    pub scopes: Vec<String>,

    pub dry_run: bool,
}

/// What an engine run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Result of an Add or Remove (possibly a NoOp, possibly previewed)
    Changed(ChangeReport),

    /// Result of a View; empty when nothing matched
    Listing(Vec<GrantView>),
}

/// One grant as displayed by View.
#[derive(Debug, Clone, Serialize)]
pub struct GrantView {
    pub grant_id: String,

    pub consent_type: ConsentType,

    /// Human-readable principal label when resolvable, otherwise the raw
    /// principal id; `None` for AllPrincipals grants
    pub principal: Option<String>,

    pub scopes: ScopeSet,
}

/// The reconciliation engine.
///
/// Holds the directory handle for the duration of a run; no state survives
/// between runs and nothing is cached, so every invocation observes fresh
/// remote state.
pub struct Engine<A> {
    api: A,
}

impl<A: DirectoryApi> Engine<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The directory handle this engine runs against.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Execute one operation end to end.
    ///
    /// Signs in once before the first request; a sign-in failure aborts
    /// the whole run. Invalid arguments are rejected before any network
    /// call is attempted.
    pub async fn run(&self, request: &Request) -> Result<Outcome> {
        self.api
            .ensure_signed_in()
            .await
            .map_err(|e| Error::directory("signing in", e))?;

        match request.operation {
            Operation::View => self.view(request).await.map(Outcome::Listing),
            Operation::Add | Operation::Remove => {
                self.change(request).await.map(Outcome::Changed)
            }
        }
    }

    async fn change(&self, request: &Request) -> Result<ChangeReport> {
        let requested = ScopeSet::from_args(&request.scopes);
        if requested.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{} requires at least one scope",
                request.operation
            )));
        }

        let consent_type = request.consent_type.ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{} requires a consent type (AllPrincipals or Principal)",
                request.operation
            ))
        })?;

        let selector = GrantSelector {
            resource_id: request.resource_id.clone(),
            consent_type,
            principal_id: request.principal_id.clone(),
        };
        selector.validate_for_change()?;

        let existing = find_grant(&self.api, &request.client_id, &selector).await?;

        let plan = if request.operation == Operation::Add {
            plan_add(existing.as_ref(), &requested)
        } else {
            plan_remove(existing.as_ref(), &requested)
        };

        apply(
            &self.api,
            &request.client_id,
            &selector,
            plan,
            request.dry_run,
        )
        .await
    }

    async fn view(&self, request: &Request) -> Result<Vec<GrantView>> {
        let grants = list_grants(
            &self.api,
            &request.client_id,
            &request.resource_id,
            request.consent_type,
            request.principal_id.as_deref(),
        )
        .await?;

        let mut views = Vec::with_capacity(grants.len());
        for grant in grants {
            let principal = match &grant.principal_id {
                None => None,
                Some(principal_id) => Some(self.resolve_principal(principal_id).await),
            };
            views.push(GrantView {
                grant_id: grant.id,
                consent_type: grant.consent_type,
                principal,
                scopes: ScopeSet::parse(&grant.scope),
            });
        }
        Ok(views)
    }

    /// Best-effort display label for a principal.
    ///
    /// `NotFound` means the principal is simply not a user (a group or
    /// service principal) and falls back silently; any other failure also
    /// falls back but is logged so transport problems stay visible.
    async fn resolve_principal(&self, principal_id: &str) -> String {
        match self.api.get_user(principal_id).await {
            Ok(user) => user
                .label()
                .map(str::to_owned)
                .unwrap_or_else(|| principal_id.to_owned()),
            Err(DirectoryError::NotFound(_)) => principal_id.to_owned(),
            Err(err) => {
                warn!(principal_id, %err, "principal lookup failed, showing raw id");
                principal_id.to_owned()
            }
        }
    }
}
