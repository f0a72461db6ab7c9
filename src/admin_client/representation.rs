//! JSON bodies sent to the admin API, built from the declared desired state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::input_data::desired_state::{
    Client, ClientMapper, ClientScope, ClientScopeMapper, RealmSettings,
};

pub const OPENID_CONNECT: &str = "openid-connect";
pub const KEY_PROVIDER_COMPONENT_TYPE: &str = "org.keycloak.keys.KeyProvider";

const USER_ATTRIBUTE_MAPPER: &str = "oidc-usermodel-attribute-mapper";
const AUDIENCE_MAPPER: &str = "oidc-audience-mapper";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRepresentation {
    pub realm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub enabled: bool,
    pub reset_password_allowed: bool,
    pub verify_email: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_required: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub smtp_server: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_theme: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, Vec<ComponentRepresentation>>,
}

/// Realm component, only used here for key providers. Config values are lists of strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRepresentation {
    pub name: String,
    pub provider_id: String,
    pub config: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    pub client_id: String,
    pub enabled: bool,
    pub protocol: String,
    pub public_client: bool,
    pub bearer_only: bool,
    pub service_accounts_enabled: bool,
    pub authorization_services_enabled: bool,
    pub redirect_uris: Vec<String>,
    pub default_client_scopes: Vec<String>,
    /// Left to the server default when not declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_scope_allowed: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocol_mappers: Vec<ProtocolMapperRepresentation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientScopeRepresentation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub protocol: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocol_mappers: Vec<ProtocolMapperRepresentation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMapperRepresentation {
    pub name: String,
    pub protocol: String,
    pub protocol_mapper: String,
    pub config: BTreeMap<String, String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Resolves the friendly mapper labels used in configuration documents to protocol mapper ids.
/// Anything else is taken as an id already.
fn protocol_mapper_id(mapper_type: &str, default: &str) -> String {
    match mapper_type.trim() {
        "" => default.to_string(),
        "User Attribute" | "user-attribute" => USER_ATTRIBUTE_MAPPER.to_string(),
        "Audience" | "audience" => AUDIENCE_MAPPER.to_string(),
        other => other.to_string(),
    }
}

impl From<&RealmSettings> for RealmRepresentation {
    fn from(settings: &RealmSettings) -> Self {
        let email = &settings.email;
        let mut smtp_server = BTreeMap::new();
        if !email.host.is_empty() {
            smtp_server.extend([
                ("host".to_string(), email.host.clone()),
                ("from".to_string(), email.from.clone()),
                ("fromDisplayName".to_string(), email.from_display_name.clone()),
                ("starttls".to_string(), email.enable_start_tls.to_string()),
            ]);
            // 0 means not declared, the server then uses the standard SMTP port.
            if email.port > 0 {
                smtp_server.insert("port".to_string(), email.port.to_string());
            }
        }

        let provider = &settings.keys.providers;
        let components = if provider.provider_type.is_empty() {
            BTreeMap::new()
        } else {
            let mut config = BTreeMap::from([(
                "priority".to_string(),
                vec![provider.priority.to_string()],
            )]);
            if !provider.algorithm.is_empty() {
                config.insert("algorithm".to_string(), vec![provider.algorithm.clone()]);
            }
            if provider.key_size > 0 {
                config.insert("keySize".to_string(), vec![provider.key_size.to_string()]);
            }
            let name = non_empty(&provider.display_name)
                .unwrap_or_else(|| provider.provider_type.clone());
            BTreeMap::from([(
                KEY_PROVIDER_COMPONENT_TYPE.to_string(),
                vec![ComponentRepresentation {
                    name,
                    provider_id: provider.provider_type.clone(),
                    config,
                }],
            )])
        };

        let themes = &settings.themes;
        RealmRepresentation {
            realm: settings.general.name.clone(),
            display_name: Some(settings.general.name.clone()),
            enabled: settings.general.enabled,
            reset_password_allowed: settings.login.forgot_password,
            verify_email: settings.login.verify_email,
            ssl_required: non_empty(&settings.login.require_ssl),
            smtp_server,
            login_theme: non_empty(&themes.login_theme),
            account_theme: non_empty(&themes.account_theme),
            admin_theme: non_empty(&themes.admin_console_theme),
            email_theme: non_empty(&themes.email_theme),
            components,
        }
    }
}

impl From<&ClientMapper> for ProtocolMapperRepresentation {
    fn from(mapper: &ClientMapper) -> Self {
        let claim_name =
            non_empty(&mapper.token_claim_name).unwrap_or_else(|| mapper.name.clone());
        let json_type = non_empty(&mapper.claim_json_type).unwrap_or_else(|| "String".into());
        ProtocolMapperRepresentation {
            name: mapper.name.clone(),
            protocol: OPENID_CONNECT.to_string(),
            protocol_mapper: protocol_mapper_id(&mapper.mapper_type, USER_ATTRIBUTE_MAPPER),
            config: BTreeMap::from([
                ("user.attribute".to_string(), mapper.user_attribute.clone()),
                ("claim.name".to_string(), claim_name),
                ("jsonType.label".to_string(), json_type),
                ("id.token.claim".to_string(), "true".to_string()),
                ("access.token.claim".to_string(), "true".to_string()),
                ("userinfo.token.claim".to_string(), "true".to_string()),
            ]),
        }
    }
}

impl From<&ClientScopeMapper> for ProtocolMapperRepresentation {
    fn from(mapper: &ClientScopeMapper) -> Self {
        ProtocolMapperRepresentation {
            name: mapper.name.clone(),
            protocol: OPENID_CONNECT.to_string(),
            protocol_mapper: protocol_mapper_id(&mapper.mapper_type, AUDIENCE_MAPPER),
            config: BTreeMap::from([
                (
                    "included.client.audience".to_string(),
                    mapper.included_client_audience.clone(),
                ),
                ("id.token.claim".to_string(), "false".to_string()),
                ("access.token.claim".to_string(), "true".to_string()),
            ]),
        }
    }
}

impl From<&Client> for ClientRepresentation {
    fn from(client: &Client) -> Self {
        let settings = &client.client_settings;
        let access_type = settings.access_type.trim().to_ascii_lowercase();
        let attributes = non_empty(&settings.login_theme)
            .map(|theme| BTreeMap::from([("login_theme".to_string(), theme)]))
            .unwrap_or_default();

        ClientRepresentation {
            client_id: settings.client_id.clone(),
            enabled: true,
            protocol: OPENID_CONNECT.to_string(),
            public_client: access_type == "public",
            bearer_only: access_type == "bearer-only",
            service_accounts_enabled: settings.service_accounts_enabled,
            authorization_services_enabled: settings.authorization_enabled,
            redirect_uris: settings.valid_redirect_uris.clone(),
            default_client_scopes: client.default_client_scopes.default_client_scopes.clone(),
            full_scope_allowed: client.scope.full_scope_allowed,
            attributes,
            protocol_mappers: client.mappers.iter().map(Into::into).collect(),
        }
    }
}

impl From<&ClientScope> for ClientScopeRepresentation {
    fn from(scope: &ClientScope) -> Self {
        let settings = &scope.settings;
        let attributes = non_empty(&settings.consent_screen_text)
            .map(|text| {
                BTreeMap::from([
                    ("consent.screen.text".to_string(), text),
                    ("display.on.consent.screen".to_string(), "true".to_string()),
                ])
            })
            .unwrap_or_default();

        ClientScopeRepresentation {
            name: settings.name.clone(),
            description: non_empty(&settings.description),
            protocol: OPENID_CONNECT.to_string(),
            attributes,
            protocol_mappers: scope.mappers.iter().map(Into::into).collect(),
        }
    }
}
