//! User lookup types
//!
//! Only the fields the grant tooling displays. Lookups are best-effort: a
//! principal id that does not resolve to a user is a normal condition
//! (groups and service principals live at other endpoints).

use serde::Deserialize;

/// A directory user, as returned by `GET /users/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<String>,

    /// Sign-in name, e.g. `alex@contoso.com`
    pub user_principal_name: Option<String>,

    pub display_name: Option<String>,
}

impl User {
    /// The best human-readable label for this user, if any.
    ///
    /// Prefers the principal name over the display name; `None` when the
    /// directory returned neither.
    pub fn label(&self) -> Option<&str> {
        self.user_principal_name
            .as_deref()
            .or(self.display_name.as_deref())
    }
}
