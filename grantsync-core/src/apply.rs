//! Applying planned changes
//!
//! Executes a [`Reconciliation`] against the directory, or suppresses the
//! call in dry-run mode while reporting the identical plan. Every variant
//! is a single atomic remote call; there is never a sequence of dependent
//! mutations for one operation.

use crate::error::{Error, Result};
use crate::reconcile::{Action, Reconciliation};
use crate::selector::GrantSelector;
use crate::DirectoryApi;
use grantsync_directory_sdk::NewGrant;
use serde::Serialize;
use tracing::info;

/// The outcome handed back to callers: the plan plus how it was executed.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    #[serde(flatten)]
    pub change: Reconciliation,

    /// True when the change was previewed, not applied
    pub dry_run: bool,
}

/// Apply (or preview) a planned change.
///
/// NoOp plans and dry runs make no remote call at all. For the rest:
/// Create POSTs a new grant and reports its assigned id, Update PATCHes
/// the located grant's scope string, Delete removes the grant. A failed
/// Create must not be blindly retried - re-locate first, since the
/// original request may have committed remotely.
pub async fn apply<A>(
    api: &A,
    client_sp_id: &str,
    selector: &GrantSelector,
    mut plan: Reconciliation,
    dry_run: bool,
) -> Result<ChangeReport>
where
    A: DirectoryApi + ?Sized,
{
    if dry_run || plan.action == Action::NoOp {
        return Ok(ChangeReport {
            change: plan,
            dry_run,
        });
    }

    match plan.action {
        Action::NoOp => {}
        Action::Create => {
            let created = api
                .create_grant(&NewGrant {
                    client_id: client_sp_id.to_string(),
                    consent_type: selector.consent_type,
                    resource_id: selector.resource_id.clone(),
                    scope: plan.resulting.to_scope_string(),
                    principal_id: selector.principal_id.clone(),
                })
                .await
                .map_err(|e| Error::directory(format!("creating grant for {}", selector), e))?;
            plan.grant_id = Some(created.id);
        }
        Action::Update => {
            let grant_id = located_grant_id(&plan, selector)?;
            api.update_grant_scope(grant_id, &plan.resulting.to_scope_string())
                .await
                .map_err(|e| {
                    Error::directory(format!("updating grant {} for {}", grant_id, selector), e)
                })?;
        }
        Action::Delete => {
            let grant_id = located_grant_id(&plan, selector)?;
            api.delete_grant(grant_id).await.map_err(|e| {
                Error::directory(format!("deleting grant {} for {}", grant_id, selector), e)
            })?;
        }
    }

    info!(
        action = %plan.action,
        grant_id = plan.grant_id.as_deref().unwrap_or("-"),
        %selector,
        "grant change applied"
    );

    Ok(ChangeReport {
        change: plan,
        dry_run: false,
    })
}

/// The grant id a planned Update/Delete targets.
///
/// Plans for those actions always come from a located grant; a missing id
/// means the plan was hand-built incorrectly.
fn located_grant_id<'a>(plan: &'a Reconciliation, selector: &GrantSelector) -> Result<&'a str> {
    match plan.grant_id.as_deref() {
        Some(id) => Ok(id),
        None => Err(Error::Api(format!(
            "{} planned without a located grant for {}",
            plan.action, selector
        ))),
    }
}
