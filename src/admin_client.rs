use error::AdminClientError;
use representation::{ClientRepresentation, ClientScopeRepresentation, RealmRepresentation};

use crate::token::Token;

pub mod error;
pub mod http;
pub mod representation;

/// Administrative operations consumed from the identity server. Each call is a single blocking
/// request carrying the admin token, with no retries.
pub trait AdminClient {
    /// Whether the server has a realm with this name. Only the status of the read matters.
    fn realm_exists(&self, token: &Token, realm: &str) -> Result<bool, AdminClientError>;

    fn delete_realm(&self, token: &Token, realm: &str) -> Result<(), AdminClientError>;

    fn create_realm(
        &self,
        token: &Token,
        representation: &RealmRepresentation,
    ) -> Result<(), AdminClientError>;

    fn create_client(
        &self,
        token: &Token,
        realm: &str,
        representation: &ClientRepresentation,
    ) -> Result<(), AdminClientError>;

    fn create_client_scope(
        &self,
        token: &Token,
        realm: &str,
        representation: &ClientScopeRepresentation,
    ) -> Result<(), AdminClientError>;
}
