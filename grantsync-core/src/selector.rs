//! Grant targeting
//!
//! A selector names the one grant an Add or Remove operates on. View uses
//! looser, filter-style matching (see `locator::list_grants`) because
//! enumeration and targeting have different semantics.

use crate::error::{Error, Result};
use grantsync_directory_sdk::{ConsentType, PermissionGrant};

/// Identifies the target grant for a change operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSelector {
    /// Resource service principal whose scopes are granted
    pub resource_id: String,

    /// AllPrincipals or Principal
    pub consent_type: ConsentType,

    /// Granting user, required when `consent_type` is Principal
    pub principal_id: Option<String>,
}

impl GrantSelector {
    /// Selector for the tenant-wide admin consent grant on a resource.
    pub fn all_principals(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            consent_type: ConsentType::AllPrincipals,
            principal_id: None,
        }
    }

    /// Selector for a single user's grant on a resource.
    pub fn principal(resource_id: impl Into<String>, principal_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            consent_type: ConsentType::Principal,
            principal_id: Some(principal_id.into()),
        }
    }

    /// Reject selectors that cannot name a unique grant.
    ///
    /// Checked before any network call so bad input fails fast.
    pub fn validate_for_change(&self) -> Result<()> {
        if self.consent_type == ConsentType::Principal && self.principal_id.is_none() {
            return Err(Error::InvalidArgument(
                "consent type Principal requires a principal id".to_string(),
            ));
        }
        Ok(())
    }

    /// True when `grant` is the grant this selector targets.
    ///
    /// The principal id only participates for Principal consent; an
    /// AllPrincipals grant always has a null principal remotely.
    pub fn matches(&self, grant: &PermissionGrant) -> bool {
        grant.resource_id == self.resource_id
            && grant.consent_type == self.consent_type
            && (self.consent_type != ConsentType::Principal
                || grant.principal_id.as_deref() == self.principal_id.as_deref())
    }
}

impl std::fmt::Display for GrantSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource {}, consent {}", self.resource_id, self.consent_type)?;
        if let Some(principal) = &self.principal_id {
            write!(f, ", principal {}", principal)?;
        }
        Ok(())
    }
}
