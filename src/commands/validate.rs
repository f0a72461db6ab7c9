use std::path::Path;

use tracing::info;

use crate::input_data::LoadError;
use crate::input_data::desired_state::DesiredConfiguration;

/// Checks that a configuration document parses. Nothing is sent anywhere.
pub struct ValidateCommand;

impl ValidateCommand {
    pub fn run(config_path: &Path) -> Result<DesiredConfiguration, LoadError> {
        let desired = DesiredConfiguration::load(config_path)?;
        info!(
            realm = desired.realm_name(),
            clients = desired.clients.len(),
            client_scopes = desired.client_scopes.len(),
            "configuration is valid"
        );
        Ok(desired)
    }
}
