//! Grant location
//!
//! Walks the directory's paged grant listing for a client service principal
//! and filters in memory. Two modes: targeting (find the unique grant for a
//! change selector) and enumeration (collect every grant matching loose
//! display filters). Both are read-only and safe to rerun; a failure mid
//! listing aborts the whole locate, and a retry starts from the first page.

use crate::error::{Error, Result};
use crate::selector::GrantSelector;
use crate::DirectoryApi;
use grantsync_directory_sdk::{ConsentType, PermissionGrant};
use tracing::debug;

/// Find the unique grant matching `selector`, or `None` when absent.
///
/// Follows next-page cursors until exhausted; the grant count is unbounded
/// and the match may sit on any page. More than one match after full
/// pagination violates the directory's uniqueness guarantee and fails with
/// [`Error::Ambiguous`] rather than silently picking one.
pub async fn find_grant<A>(
    api: &A,
    client_sp_id: &str,
    selector: &GrantSelector,
) -> Result<Option<PermissionGrant>>
where
    A: DirectoryApi + ?Sized,
{
    let mut matches =
        collect_grants(api, client_sp_id, |grant| selector.matches(grant)).await?;

    debug!(
        client = client_sp_id,
        %selector,
        matched = matches.len(),
        "grant lookup complete"
    );

    if matches.len() > 1 {
        return Err(Error::Ambiguous {
            selector: selector.to_string(),
            ids: matches.iter().map(|g| g.id.clone()).collect(),
        });
    }
    Ok(matches.pop())
}

/// Enumerate grants on `resource_id` for display.
///
/// `consent_type` and `principal_id` are optional filters: unlike change
/// targeting, a Principal filter with no principal id matches every
/// per-user grant on the resource.
pub async fn list_grants<A>(
    api: &A,
    client_sp_id: &str,
    resource_id: &str,
    consent_type: Option<ConsentType>,
    principal_id: Option<&str>,
) -> Result<Vec<PermissionGrant>>
where
    A: DirectoryApi + ?Sized,
{
    collect_grants(api, client_sp_id, |grant| {
        grant.resource_id == resource_id
            && consent_type.map_or(true, |c| grant.consent_type == c)
            && principal_id.map_or(true, |p| grant.principal_id.as_deref() == Some(p))
    })
    .await
}

/// Drain every page of the listing, keeping grants that pass `keep`.
async fn collect_grants<A, F>(
    api: &A,
    client_sp_id: &str,
    keep: F,
) -> Result<Vec<PermissionGrant>>
where
    A: DirectoryApi + ?Sized,
    F: Fn(&PermissionGrant) -> bool,
{
    let mut found = Vec::new();
    let mut next: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = api
            .list_grants_page(client_sp_id, next.as_deref())
            .await
            .map_err(|e| {
                Error::directory(format!("listing grants for client {}", client_sp_id), e)
            })?;
        pages += 1;

        found.extend(page.value.into_iter().filter(|g| keep(g)));

        match page.next_link {
            Some(link) => next = Some(link),
            None => break,
        }
    }

    debug!(client = client_sp_id, pages, kept = found.len(), "grant listing drained");
    Ok(found)
}
