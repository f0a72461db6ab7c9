use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::{LoadError, load_json};

/// Administrator credentials used to open the admin session.
///
/// ```json
/// {"URL": "http://localhost:8080", "USERNAME": "admin", "PASSWORD": "admin", "BRANCH": "master"}
/// ```
///
/// None of the fields is validated here, a missing or wrong value makes the login fail instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminCredentials {
    /// Base url of the identity server.
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "PASSWORD")]
    pub password: AdminPassword,
    /// Realm the administrator authenticates against, usually `master`.
    #[serde(rename = "BRANCH")]
    pub auth_realm: String,
}

impl AdminCredentials {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        load_json(path)
    }
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct AdminPassword(String);

impl AdminPassword {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl<S: AsRef<str>> From<S> for AdminPassword {
    fn from(password: S) -> Self {
        AdminPassword(password.as_ref().to_string())
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdminPassword: redacted")
    }
}
