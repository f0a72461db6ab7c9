use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::admin_client::AdminClient;
use crate::admin_client::representation::{ClientRepresentation, ClientScopeRepresentation};
use crate::authenticator::Authenticator;
use crate::input_data::credentials::AdminCredentials;
use crate::input_data::desired_state::{Client, ClientScope, DesiredConfiguration};
use crate::reconciler::{CleanupPolicy, RealmCleanup, reconcile_realm};
use crate::token::Token;
use crate::{ProvisionError, RemoteOperation};

/// Creates every declared client in order. The first failure stops the loop, clients created
/// before it stay in place.
pub fn provision_clients<M: AdminClient>(
    admin: &M,
    token: &Token,
    realm: &str,
    clients: &[Client],
) -> Result<usize, ProvisionError> {
    for client in clients {
        let client_id = &client.client_settings.client_id;
        if client.declares_role_assignments() {
            warn!(
                client_id,
                "scope and service account role assignments are not applied"
            );
        }
        admin
            .create_client(token, realm, &ClientRepresentation::from(client))
            .map_err(|source| {
                error!(client_id, "failed to create client: {source}");
                ProvisionError::RemoteOperation {
                    operation: RemoteOperation::CreateClient,
                    target: client_id.clone(),
                    source,
                }
            })?;
        debug!(client_id, realm, "client created");
    }
    Ok(clients.len())
}

/// Creates every declared client scope in order, stopping at the first failure.
pub fn provision_client_scopes<M: AdminClient>(
    admin: &M,
    token: &Token,
    realm: &str,
    scopes: &[ClientScope],
) -> Result<usize, ProvisionError> {
    for scope in scopes {
        let name = &scope.settings.name;
        admin
            .create_client_scope(token, realm, &ClientScopeRepresentation::from(scope))
            .map_err(|source| {
                error!(scope = %name, "failed to create client scope: {source}");
                ProvisionError::RemoteOperation {
                    operation: RemoteOperation::CreateClientScope,
                    target: name.clone(),
                    source,
                }
            })?;
        debug!(scope = %name, realm, "client scope created");
    }
    Ok(scopes.len())
}

/// Progress of a run. States are reached in declaration order until `Done`, or `Aborted` from
/// wherever a fatal error happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Init,
    CredentialsLoaded,
    ConfigLoaded,
    Authenticated,
    RealmReconciled,
    ClientsProvisioned,
    ScopesProvisioned,
    Done,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Init => "init",
            RunState::CredentialsLoaded => "credentials-loaded",
            RunState::ConfigLoaded => "config-loaded",
            RunState::Authenticated => "authenticated",
            RunState::RealmReconciled => "realm-reconciled",
            RunState::ClientsProvisioned => "clients-provisioned",
            RunState::ScopesProvisioned => "scopes-provisioned",
            RunState::Done => "done",
            RunState::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

/// Keeps track of the [RunState] of a run and logs the transitions.
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            state: RunState::Init,
        }
    }
}

impl RunTracker {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn advance(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state changed");
        self.state = next;
    }

    /// Moves the run to [RunState::Aborted] and hands the error back.
    pub fn abort(&mut self, err: ProvisionError) -> ProvisionError {
        error!(last_state = %self.state, "provisioning aborted: {err}");
        self.state = RunState::Aborted;
        err
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionReport {
    pub realm: String,
    pub cleanup: RealmCleanup,
    pub clients_created: usize,
    pub client_scopes_created: usize,
}

impl fmt::Display for ProvisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cleanup = match &self.cleanup {
            RealmCleanup::Deleted => "previous realm deleted".to_string(),
            RealmCleanup::NotFound => "no previous realm".to_string(),
            RealmCleanup::DeleteFailed(reason) => {
                format!("previous realm could not be deleted ({reason})")
            }
        };
        write!(
            f,
            "realm `{}` provisioned: {cleanup}, {} client(s), {} client scope(s)",
            self.realm, self.clients_created, self.client_scopes_created
        )
    }
}

/// Applies a desired configuration once inputs are loaded: login, realm reconciliation, clients
/// and client scopes, in that order.
pub struct Provisioner<A, M>
where
    A: Authenticator,
    M: AdminClient,
{
    pub authenticator: A,
    pub admin_client: M,
    pub cleanup_policy: CleanupPolicy,
}

impl<A, M> Provisioner<A, M>
where
    A: Authenticator,
    M: AdminClient,
{
    pub fn new(authenticator: A, admin_client: M) -> Self {
        Self {
            authenticator,
            admin_client,
            cleanup_policy: CleanupPolicy::default(),
        }
    }

    pub fn with_cleanup_policy(self, cleanup_policy: CleanupPolicy) -> Self {
        Self {
            cleanup_policy,
            ..self
        }
    }

    pub fn apply(
        &self,
        credentials: &AdminCredentials,
        desired: &DesiredConfiguration,
        tracker: &mut RunTracker,
    ) -> Result<ProvisionReport, ProvisionError> {
        self.run(credentials, desired, tracker)
            .map_err(|err| tracker.abort(err))
    }

    fn run(
        &self,
        credentials: &AdminCredentials,
        desired: &DesiredConfiguration,
        tracker: &mut RunTracker,
    ) -> Result<ProvisionReport, ProvisionError> {
        let realm = desired.realm_name();

        let token = self.authenticator.authenticate(credentials)?;
        tracker.advance(RunState::Authenticated);

        let cleanup = reconcile_realm(
            &self.admin_client,
            &token,
            &desired.realm_settings,
            self.cleanup_policy,
        )?;
        tracker.advance(RunState::RealmReconciled);

        let clients_created =
            provision_clients(&self.admin_client, &token, realm, &desired.clients)?;
        info!(realm, count = clients_created, "clients provisioned");
        tracker.advance(RunState::ClientsProvisioned);

        let client_scopes_created =
            provision_client_scopes(&self.admin_client, &token, realm, &desired.client_scopes)?;
        info!(realm, count = client_scopes_created, "client scopes provisioned");
        tracker.advance(RunState::ScopesProvisioned);

        tracker.advance(RunState::Done);
        Ok(ProvisionReport {
            realm: realm.to_string(),
            cleanup,
            clients_created,
            client_scopes_created,
        })
    }
}
