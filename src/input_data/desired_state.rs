//! Desired state of a realm, as declared in the configuration document:
//!
//! ```json
//! {
//!   "realmSettings": { "general": {...}, "login": {...}, "keys": {...}, "email": {...}, "themes": {...} },
//!   "clients": [ { "settings": {...}, "clientScopes": {...}, "mappers": [...], "scope": {...}, "serviceAccountRoles": {...} } ],
//!   "clientScopes": [ { "settings": {...}, "mappers": [...] } ]
//! }
//! ```
//!
//! Keys that are absent take their zero value, so a partial document still loads. The one
//! exception is `fullScopeAllowed`, which stays unset so the server default applies. The tree is
//! returned as parsed: uniqueness of client ids or scope names is not checked.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{LoadError, load_json};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesiredConfiguration {
    pub realm_settings: RealmSettings,
    pub clients: Vec<Client>,
    pub client_scopes: Vec<ClientScope>,
}

impl DesiredConfiguration {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        load_json(path)
    }

    /// Name of the realm the whole run is keyed on.
    pub fn realm_name(&self) -> &str {
        &self.realm_settings.general.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmSettings {
    pub general: General,
    pub login: Login,
    pub keys: Keys,
    pub email: Email,
    pub themes: Themes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct General {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Login {
    pub forgot_password: bool,
    pub verify_email: bool,
    /// One of `none`, `external` or `all`.
    #[serde(rename = "requireSSL")]
    pub require_ssl: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub providers: KeyProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyProvider {
    /// Provider id, e.g. `rsa-generated`.
    #[serde(rename = "type")]
    pub provider_type: String,
    pub display_name: String,
    pub priority: i64,
    pub algorithm: String,
    pub key_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Email {
    pub host: String,
    pub port: u16,
    pub from_display_name: String,
    pub from: String,
    #[serde(rename = "enableStartTLS")]
    pub enable_start_tls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Themes {
    pub login_theme: String,
    pub account_theme: String,
    pub admin_console_theme: String,
    pub email_theme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "settings")]
    pub client_settings: ClientSettings,
    #[serde(rename = "clientScopes")]
    pub default_client_scopes: DefaultClientScopes,
    pub mappers: Vec<ClientMapper>,
    pub scope: Scope,
    pub service_account_roles: ServiceAccountRoles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSettings {
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub login_theme: String,
    /// One of `confidential`, `public` or `bearer-only`.
    pub access_type: String,
    pub service_accounts_enabled: bool,
    pub authorization_enabled: bool,
    #[serde(rename = "validRedirectURIs")]
    pub valid_redirect_uris: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultClientScopes {
    pub default_client_scopes: Vec<String>,
}

/// Maps a user attribute into a token claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientMapper {
    pub name: String,
    pub mapper_type: String,
    pub user_attribute: String,
    pub token_claim_name: String,
    #[serde(rename = "claimJSONType")]
    pub claim_json_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_scope_allowed: Option<bool>,
    pub client_roles: Vec<ClientRoles>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceAccountRoles {
    pub client_roles: Vec<ClientRoles>,
}

/// Roles of the built-in `realm-management` client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRoles {
    #[serde(rename = "realm-management")]
    pub realm_management: Vec<String>,
}

impl Client {
    /// Whether any scope or service account role assignment is declared.
    pub fn declares_role_assignments(&self) -> bool {
        self.scope
            .client_roles
            .iter()
            .chain(self.service_account_roles.client_roles.iter())
            .any(|roles| !roles.realm_management.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientScope {
    pub settings: ClientScopeSettings,
    pub mappers: Vec<ClientScopeMapper>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientScopeSettings {
    pub name: String,
    pub description: String,
    pub consent_screen_text: String,
}

/// Adds a client to the audience of the tokens carrying the scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientScopeMapper {
    pub name: String,
    pub mapper_type: String,
    pub included_client_audience: String,
}
