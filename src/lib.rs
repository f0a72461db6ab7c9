pub mod admin_client;
pub mod authenticator;
pub mod commands;
pub mod http;
pub mod http_client;
pub mod input_data;
pub mod parameters;
pub mod provisioner;
pub mod reconciler;
pub mod server_url;
pub mod token;

use thiserror::Error;

use crate::admin_client::error::AdminClientError;
use crate::authenticator::AuthenticateError;
use crate::input_data::LoadError;
use crate::server_url::ServerUrlError;

/// Fatal errors of a provisioning run. Any of them stops the run where it happened and leaves
/// whatever was already applied on the server in place.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("loading input: {0}")]
    Load(#[from] LoadError),
    #[error("identity server url in credentials: {0}")]
    InvalidServerUrl(#[from] ServerUrlError),
    #[error("authenticating administrator: {0}")]
    Authentication(#[from] AuthenticateError),
    #[error("{operation} `{target}` failed: {source}")]
    RemoteOperation {
        operation: RemoteOperation,
        target: String,
        source: AdminClientError,
    },
    #[error("realm `{realm}` could not be removed before recreation: {reason}")]
    CleanupFailed { realm: String, reason: String },
}

/// Admin operations whose failure aborts the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteOperation {
    CreateRealm,
    CreateClient,
    CreateClientScope,
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteOperation::CreateRealm => write!(f, "creating realm"),
            RemoteOperation::CreateClient => write!(f, "creating client"),
            RemoteOperation::CreateClientScope => write!(f, "creating client scope"),
        }
    }
}
