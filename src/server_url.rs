use std::fmt;

use thiserror::Error;
use url::Url;

/// Client used for the administrator password grant.
pub const ADMIN_CLI_CLIENT_ID: &str = "admin-cli";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServerUrlError {
    #[error("invalid server url `{0}`: `{1}`")]
    InvalidUrl(String, String),
}

/// Base URL of the identity server, e.g. `https://sso.example.com` or
/// `http://localhost:8080/auth` for deployments served under a context path.
///
/// Every endpoint the provisioner talks to is derived from here. Realm names are appended as
/// path segments so they get percent-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerUrl(Url);

impl TryFrom<&str> for ServerUrl {
    type Error = ServerUrlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let url =
            Url::parse(value).map_err(|e| ServerUrlError::InvalidUrl(value.into(), e.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ServerUrlError::InvalidUrl(
                value.into(),
                "expected an http(s) base url".into(),
            ));
        }
        Ok(Self(url))
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ServerUrl {
    /// Token endpoint of the realm the administrator authenticates against.
    pub fn token_endpoint(&self, auth_realm: &str) -> Url {
        self.join(&["realms", auth_realm, "protocol", "openid-connect", "token"])
    }

    pub fn realms_endpoint(&self) -> Url {
        self.join(&["admin", "realms"])
    }

    pub fn realm_endpoint(&self, realm: &str) -> Url {
        self.join(&["admin", "realms", realm])
    }

    pub fn clients_endpoint(&self, realm: &str) -> Url {
        self.join(&["admin", "realms", realm, "clients"])
    }

    pub fn client_scopes_endpoint(&self, realm: &str) -> Url {
        self.join(&["admin", "realms", realm, "client-scopes"])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Only fails for cannot-be-a-base urls, which are rejected on construction.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
