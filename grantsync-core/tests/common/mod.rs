//! In-memory directory fake for engine tests.

use async_trait::async_trait;
use grantsync_core::DirectoryApi;
use grantsync_directory_sdk::{
    ConsentType, DirectoryError, GrantPage, NewGrant, PermissionGrant, User,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// A mutating call the engine issued against the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(NewGrant),
    Update { grant_id: String, scope: String },
    Delete { grant_id: String },
}

/// Fake directory: serves canned grant pages, records every mutation.
///
/// Pages are served in order with a synthetic next link between them, so
/// the locator's pagination loop is exercised for real.
pub struct FakeDirectory {
    pages: Vec<Vec<PermissionGrant>>,
    users: HashMap<String, User>,
    fail_sign_in: bool,
    fail_listing: bool,
    fail_user_lookups: bool,
    mutations: Mutex<Vec<Mutation>>,
    list_calls: Mutex<Vec<Option<String>>>,
}

impl FakeDirectory {
    pub fn empty() -> Self {
        Self::with_pages(vec![vec![]])
    }

    pub fn with_grants(grants: Vec<PermissionGrant>) -> Self {
        Self::with_pages(vec![grants])
    }

    pub fn with_pages(pages: Vec<Vec<PermissionGrant>>) -> Self {
        Self {
            pages,
            users: HashMap::new(),
            fail_sign_in: false,
            fail_listing: false,
            fail_user_lookups: false,
            mutations: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user(mut self, id: &str, principal_name: &str) -> Self {
        self.users.insert(
            id.to_string(),
            User {
                id: Some(id.to_string()),
                user_principal_name: Some(principal_name.to_string()),
                display_name: None,
            },
        );
        self
    }

    pub fn failing_sign_in(mut self) -> Self {
        self.fail_sign_in = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_user_lookups(mut self) -> Self {
        self.fail_user_lookups = true;
        self
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    fn page_index(next_link: Option<&str>) -> usize {
        match next_link {
            None => 0,
            Some(link) => link
                .rsplit_once("page=")
                .and_then(|(_, n)| n.parse().ok())
                .expect("fake next link should carry a page number"),
        }
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectory {
    async fn ensure_signed_in(&self) -> Result<(), DirectoryError> {
        if self.fail_sign_in {
            return Err(DirectoryError::Authentication(
                "interactive sign-in required".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_grants_page(
        &self,
        _client_sp_id: &str,
        next_link: Option<&str>,
    ) -> Result<GrantPage, DirectoryError> {
        self.list_calls
            .lock()
            .unwrap()
            .push(next_link.map(str::to_owned));

        if self.fail_listing {
            return Err(DirectoryError::ServiceUnavailable("503".to_string()));
        }

        let index = Self::page_index(next_link);
        let value = self.pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < self.pages.len() {
            Some(format!("https://fake.directory/grants?page={}", index + 1))
        } else {
            None
        };

        Ok(GrantPage {
            value,
            next_link: next,
        })
    }

    async fn create_grant(&self, grant: &NewGrant) -> Result<PermissionGrant, DirectoryError> {
        self.mutations
            .lock()
            .unwrap()
            .push(Mutation::Create(grant.clone()));

        Ok(PermissionGrant {
            id: "created-grant-1".to_string(),
            client_id: grant.client_id.clone(),
            consent_type: grant.consent_type,
            principal_id: grant.principal_id.clone(),
            resource_id: grant.resource_id.clone(),
            scope: grant.scope.clone(),
        })
    }

    async fn update_grant_scope(
        &self,
        grant_id: &str,
        scope: &str,
    ) -> Result<(), DirectoryError> {
        self.mutations.lock().unwrap().push(Mutation::Update {
            grant_id: grant_id.to_string(),
            scope: scope.to_string(),
        });
        Ok(())
    }

    async fn delete_grant(&self, grant_id: &str) -> Result<(), DirectoryError> {
        self.mutations.lock().unwrap().push(Mutation::Delete {
            grant_id: grant_id.to_string(),
        });
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, DirectoryError> {
        if self.fail_user_lookups {
            return Err(DirectoryError::ServiceUnavailable(
                "user lookup unavailable".to_string(),
            ));
        }
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("no user {}", user_id)))
    }
}

/// Build a grant fixture.
pub fn grant(
    id: &str,
    resource_id: &str,
    consent_type: ConsentType,
    principal_id: Option<&str>,
    scope: &str,
) -> PermissionGrant {
    PermissionGrant {
        id: id.to_string(),
        client_id: "client-sp".to_string(),
        consent_type,
        principal_id: principal_id.map(str::to_owned),
        resource_id: resource_id.to_string(),
        scope: scope.to_string(),
    }
}
