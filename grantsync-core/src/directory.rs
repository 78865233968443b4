//! Directory access seam
//!
//! The engine talks to the directory through this trait instead of holding
//! a concrete client, so tests can substitute in-memory fakes and the
//! session handle stays an explicit dependency rather than ambient state.

use async_trait::async_trait;
use grantsync_directory_sdk::{
    Directory, DirectoryError, GrantPage, NewGrant, PermissionGrant, User,
};

/// The directory operations the reconciliation engine depends on.
///
/// All methods map one-to-one onto single REST calls; none of them retry
/// or follow pagination internally.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Verify the session is usable. Called once per engine run, before
    /// the first real request; failure aborts the run.
    async fn ensure_signed_in(&self) -> Result<(), DirectoryError>;

    /// Fetch one page of a client service principal's grants. `next_link`
    /// continues a prior page's cursor; `None` starts over.
    async fn list_grants_page(
        &self,
        client_sp_id: &str,
        next_link: Option<&str>,
    ) -> Result<GrantPage, DirectoryError>;

    /// Create a grant, returning it with its assigned id.
    async fn create_grant(&self, grant: &NewGrant) -> Result<PermissionGrant, DirectoryError>;

    /// Replace a grant's scope string.
    async fn update_grant_scope(&self, grant_id: &str, scope: &str)
        -> Result<(), DirectoryError>;

    /// Delete a grant by id.
    async fn delete_grant(&self, grant_id: &str) -> Result<(), DirectoryError>;

    /// Look up a user for display purposes.
    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError>;
}

#[async_trait]
impl DirectoryApi for Directory {
    async fn ensure_signed_in(&self) -> Result<(), DirectoryError> {
        Directory::ensure_signed_in(self).await
    }

    async fn list_grants_page(
        &self,
        client_sp_id: &str,
        next_link: Option<&str>,
    ) -> Result<GrantPage, DirectoryError> {
        self.grants().list_page(client_sp_id, next_link).await
    }

    async fn create_grant(&self, grant: &NewGrant) -> Result<PermissionGrant, DirectoryError> {
        self.grants().create(grant).await
    }

    async fn update_grant_scope(
        &self,
        grant_id: &str,
        scope: &str,
    ) -> Result<(), DirectoryError> {
        self.grants().update_scope(grant_id, scope).await
    }

    async fn delete_grant(&self, grant_id: &str) -> Result<(), DirectoryError> {
        self.grants().delete(grant_id).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError> {
        self.users().get(user_id).await
    }
}
