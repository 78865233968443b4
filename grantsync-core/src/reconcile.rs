//! Reconciliation planning
//!
//! Pure set arithmetic: given the located grant (or its absence) and the
//! requested scopes, decide what has to happen remotely. No I/O here - the
//! planner's output is applied (or just displayed, for dry runs) by
//! [`crate::apply`].

use crate::scopes::ScopeSet;
use grantsync_directory_sdk::PermissionGrant;
use serde::Serialize;

/// What the directory needs done to converge on the requested state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Remote state already matches; no call will be made
    NoOp,

    /// No grant exists; one will be created
    Create,

    /// The grant's scope string will be replaced
    Update,

    /// The grant's scope set would become empty, so the grant goes away
    /// entirely - an empty-scope grant is never left behind
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::NoOp => write!(f, "no-op"),
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// A computed change, produced fresh per invocation and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub action: Action,

    /// Requested scopes not previously present (Add only)
    pub added: ScopeSet,

    /// Scopes that will actually disappear (Remove only)
    pub removed: ScopeSet,

    /// Requested scopes that were inapplicable: already present for Add,
    /// absent for Remove. Reported, never an error.
    pub skipped: ScopeSet,

    /// The scope set the grant will hold after the change
    pub resulting: ScopeSet,

    /// Id of the located grant, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_id: Option<String>,
}

/// Plan merging `requested` into the existing grant's scopes.
pub fn plan_add(existing: Option<&PermissionGrant>, requested: &ScopeSet) -> Reconciliation {
    let grant = match existing {
        Some(grant) => grant,
        None => {
            return Reconciliation {
                action: Action::Create,
                added: requested.clone(),
                removed: ScopeSet::new(),
                skipped: ScopeSet::new(),
                resulting: requested.clone(),
                grant_id: None,
            };
        }
    };

    let existing_set = ScopeSet::parse(&grant.scope);
    let added = requested.difference(&existing_set);
    let skipped = requested.intersection(&existing_set);

    if added.is_empty() {
        // Every requested scope is already granted
        return Reconciliation {
            action: Action::NoOp,
            added,
            removed: ScopeSet::new(),
            skipped,
            resulting: existing_set,
            grant_id: Some(grant.id.clone()),
        };
    }

    Reconciliation {
        action: Action::Update,
        resulting: existing_set.union(requested),
        added,
        removed: ScopeSet::new(),
        skipped,
        grant_id: Some(grant.id.clone()),
    }
}

/// Plan subtracting `requested` from the existing grant's scopes.
///
/// A missing grant is a no-op, not an error: there is nothing to remove.
pub fn plan_remove(existing: Option<&PermissionGrant>, requested: &ScopeSet) -> Reconciliation {
    let grant = match existing {
        Some(grant) => grant,
        None => {
            return Reconciliation {
                action: Action::NoOp,
                added: ScopeSet::new(),
                removed: ScopeSet::new(),
                skipped: requested.clone(),
                resulting: ScopeSet::new(),
                grant_id: None,
            };
        }
    };

    let existing_set = ScopeSet::parse(&grant.scope);
    let skipped = requested.difference(&existing_set);
    let removed = requested.intersection(&existing_set);

    if removed.is_empty() {
        return Reconciliation {
            action: Action::NoOp,
            added: ScopeSet::new(),
            removed,
            skipped,
            resulting: existing_set,
            grant_id: Some(grant.id.clone()),
        };
    }

    let resulting = existing_set.difference(requested);
    let action = if resulting.is_empty() {
        Action::Delete
    } else {
        Action::Update
    };

    Reconciliation {
        action,
        added: ScopeSet::new(),
        removed,
        skipped,
        resulting,
        grant_id: Some(grant.id.clone()),
    }
}
