//! Full-replace reconciliation of the target realm: whatever realm carries the desired name is
//! removed, then the realm is created from the declared settings.
//!
//! The delete and the create are not atomic. If the run stops in between, the server is left
//! without a realm of that name.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::admin_client::AdminClient;
use crate::admin_client::representation::RealmRepresentation;
use crate::input_data::desired_state::RealmSettings;
use crate::token::Token;
use crate::{ProvisionError, RemoteOperation};

/// What happened to a pre-existing realm before the new one was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum RealmCleanup {
    Deleted,
    /// Also reported when the probe itself failed.
    NotFound,
    DeleteFailed(String),
}

/// How a [RealmCleanup::DeleteFailed] outcome is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CleanupPolicy {
    /// Log the failure and still attempt the creation.
    #[default]
    BestEffort,
    /// Abort the run before creating anything.
    Strict,
}

/// Removes the realm named `realm` if the server reports it exists. Probe and delete failures
/// are logged and folded into the returned outcome, never propagated.
pub fn cleanup_realm<M: AdminClient>(admin: &M, token: &Token, realm: &str) -> RealmCleanup {
    let exists = match admin.realm_exists(token, realm) {
        Ok(exists) => exists,
        Err(err) => {
            warn!(realm, "failed to load realm, assuming it does not exist: {err}");
            false
        }
    };
    if !exists {
        debug!(realm, "realm not found, nothing to delete");
        return RealmCleanup::NotFound;
    }

    match admin.delete_realm(token, realm) {
        Ok(()) => {
            info!(realm, "existing realm deleted");
            RealmCleanup::Deleted
        }
        Err(err) => {
            warn!(realm, "failed to delete realm: {err}");
            RealmCleanup::DeleteFailed(err.to_string())
        }
    }
}

/// Replaces the realm declared in `settings`: cleanup first, then an unconditional create.
/// Only the create failure is fatal, unless `policy` is [CleanupPolicy::Strict].
pub fn reconcile_realm<M: AdminClient>(
    admin: &M,
    token: &Token,
    settings: &RealmSettings,
    policy: CleanupPolicy,
) -> Result<RealmCleanup, ProvisionError> {
    let realm = settings.general.name.as_str();
    let cleanup = cleanup_realm(admin, token, realm);

    if let (CleanupPolicy::Strict, RealmCleanup::DeleteFailed(reason)) = (policy, &cleanup) {
        return Err(ProvisionError::CleanupFailed {
            realm: realm.to_string(),
            reason: reason.clone(),
        });
    }

    admin
        .create_realm(token, &RealmRepresentation::from(settings))
        .map_err(|source| ProvisionError::RemoteOperation {
            operation: RemoteOperation::CreateRealm,
            target: realm.to_string(),
            source,
        })?;
    info!(realm, "realm created");

    Ok(cleanup)
}
