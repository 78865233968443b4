//! OAuth2 permission grant types
//!
//! Wire schemas for the directory's `oauth2PermissionGrants` resource. Field
//! names follow the directory's camelCase convention via serde renames; the
//! `scope` field stays in its raw space-delimited wire form here, and
//! callers that need set semantics normalize it themselves.

use serde::{Deserialize, Serialize};

/// Whether a grant applies to every user or to one specific principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentType {
    /// Admin consent on behalf of all users in the tenant
    AllPrincipals,

    /// Consent for a single user, identified by `principalId`
    Principal,
}

impl std::fmt::Display for ConsentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentType::AllPrincipals => write!(f, "AllPrincipals"),
            ConsentType::Principal => write!(f, "Principal"),
        }
    }
}

/// A delegated permission grant as stored in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    /// Opaque grant identifier assigned by the directory
    pub id: String,

    /// Client service principal the grant belongs to
    pub client_id: String,

    /// AllPrincipals or Principal
    pub consent_type: ConsentType,

    /// Granting user's object id; null for AllPrincipals grants
    pub principal_id: Option<String>,

    /// Resource service principal whose scopes are granted
    pub resource_id: String,

    /// Space-delimited scope string as stored remotely
    #[serde(default)]
    pub scope: String,
}

/// One page of a grant listing
///
/// The `@odata.nextLink` URL points at the next page; its absence means the
/// final page.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantPage {
    pub value: Vec<PermissionGrant>,

    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Body for creating a new grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrant {
    pub client_id: String,

    pub consent_type: ConsentType,

    pub resource_id: String,

    /// Space-delimited scope string for the new grant
    pub scope: String,

    /// Required when `consent_type` is Principal, absent otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
}

/// Body for replacing a grant's scope string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantPatch {
    pub scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&ConsentType::AllPrincipals).unwrap(),
            "\"AllPrincipals\""
        );
        assert_eq!(
            serde_json::to_string(&ConsentType::Principal).unwrap(),
            "\"Principal\""
        );
    }

    #[test]
    fn test_permission_grant_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "grant-1",
            "clientId": "client-sp",
            "consentType": "Principal",
            "principalId": "user-1",
            "resourceId": "resource-sp",
            "scope": "User.Read Mail.Read"
        });

        let grant: PermissionGrant = serde_json::from_value(json).unwrap();
        assert_eq!(grant.id, "grant-1");
        assert_eq!(grant.client_id, "client-sp");
        assert_eq!(grant.consent_type, ConsentType::Principal);
        assert_eq!(grant.principal_id.as_deref(), Some("user-1"));
        assert_eq!(grant.resource_id, "resource-sp");
        assert_eq!(grant.scope, "User.Read Mail.Read");
    }

    #[test]
    fn test_permission_grant_null_principal() {
        let json = serde_json::json!({
            "id": "grant-2",
            "clientId": "client-sp",
            "consentType": "AllPrincipals",
            "principalId": null,
            "resourceId": "resource-sp",
            "scope": "User.Read"
        });

        let grant: PermissionGrant = serde_json::from_value(json).unwrap();
        assert!(grant.principal_id.is_none());
    }

    #[test]
    fn test_permission_grant_missing_scope_defaults_empty() {
        let json = serde_json::json!({
            "id": "grant-3",
            "clientId": "client-sp",
            "consentType": "AllPrincipals",
            "principalId": null,
            "resourceId": "resource-sp"
        });

        let grant: PermissionGrant = serde_json::from_value(json).unwrap();
        assert_eq!(grant.scope, "");
    }

    #[test]
    fn test_grant_page_next_link() {
        let json = serde_json::json!({
            "value": [],
            "@odata.nextLink": "https://example.test/v1.0/next"
        });
        let page: GrantPage = serde_json::from_value(json).unwrap();
        assert_eq!(
            page.next_link.as_deref(),
            Some("https://example.test/v1.0/next")
        );

        let last: GrantPage = serde_json::from_value(serde_json::json!({"value": []})).unwrap();
        assert!(last.next_link.is_none());
    }

    #[test]
    fn test_new_grant_skips_absent_principal() {
        let body = NewGrant {
            client_id: "client-sp".to_string(),
            consent_type: ConsentType::AllPrincipals,
            resource_id: "resource-sp".to_string(),
            scope: "User.Read".to_string(),
            principal_id: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("principalId").is_none());
        assert_eq!(json["clientId"], "client-sp");
        assert_eq!(json["consentType"], "AllPrincipals");
    }

    #[test]
    fn test_new_grant_includes_principal_when_present() {
        let body = NewGrant {
            client_id: "client-sp".to_string(),
            consent_type: ConsentType::Principal,
            resource_id: "resource-sp".to_string(),
            scope: "User.Read".to_string(),
            principal_id: Some("user-1".to_string()),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["principalId"], "user-1");
    }
}
