use std::path::Path;

use tracing::info;

use crate::ProvisionError;
use crate::admin_client::http::HttpAdminClient;
use crate::authenticator::HttpAuthenticator;
use crate::http_client::HttpClient;
use crate::input_data::credentials::AdminCredentials;
use crate::input_data::desired_state::DesiredConfiguration;
use crate::provisioner::{ProvisionReport, Provisioner, RunState, RunTracker};
use crate::reconciler::CleanupPolicy;
use crate::server_url::ServerUrl;

/// Runs a whole provisioning pass: both input documents are loaded before anything is sent
/// to the server.
pub struct ProvisionCommand<C>
where
    C: HttpClient + Clone,
{
    http_client: C,
    cleanup_policy: CleanupPolicy,
}

impl<C> ProvisionCommand<C>
where
    C: HttpClient + Clone,
{
    pub fn new(http_client: C, cleanup_policy: CleanupPolicy) -> Self {
        Self {
            http_client,
            cleanup_policy,
        }
    }

    pub fn run(
        &self,
        credentials_path: &Path,
        config_path: &Path,
    ) -> Result<ProvisionReport, ProvisionError> {
        let mut tracker = RunTracker::default();
        let (credentials, desired, server_url) = self
            .load_inputs(credentials_path, config_path, &mut tracker)
            .map_err(|err| tracker.abort(err))?;
        info!(
            realm = desired.realm_name(),
            server = %server_url,
            "provisioning realm"
        );

        let provisioner = Provisioner::new(
            HttpAuthenticator::new(self.http_client.clone(), server_url.clone()),
            HttpAdminClient::new(self.http_client.clone(), server_url),
        )
        .with_cleanup_policy(self.cleanup_policy);

        provisioner.apply(&credentials, &desired, &mut tracker)
    }

    fn load_inputs(
        &self,
        credentials_path: &Path,
        config_path: &Path,
        tracker: &mut RunTracker,
    ) -> Result<(AdminCredentials, DesiredConfiguration, ServerUrl), ProvisionError> {
        let credentials = AdminCredentials::load(credentials_path)?;
        tracker.advance(RunState::CredentialsLoaded);

        let desired = DesiredConfiguration::load(config_path)?;
        tracker.advance(RunState::ConfigLoaded);

        let server_url = ServerUrl::try_from(credentials.url.as_str())?;
        Ok((credentials, desired, server_url))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use httpmock::{
        Method::{DELETE, GET, POST},
        MockServer,
    };
    use serde_json::json;

    use super::*;
    use crate::http::client::HttpClient as ReqwestClient;
    use crate::http::config::HttpConfig;
    use crate::http_client::tests::MockHttpClient;
    use crate::input_data::LoadError;
    use crate::input_data::desired_state::tests::EXAMPLE_CONFIG;
    use crate::input_data::tests::json_file;
    use crate::reconciler::RealmCleanup;

    fn credentials_json(url: &str) -> String {
        json!({
            "URL": url,
            "USERNAME": "admin",
            "PASSWORD": "secret",
            "BRANCH": "master"
        })
        .to_string()
    }

    #[test]
    fn missing_credentials_file_aborts_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let config = json_file(EXAMPLE_CONFIG);
        // Any call on the mock, including clone, would panic.
        let command = ProvisionCommand::new(MockHttpClient::new(), CleanupPolicy::default());

        let err = command
            .run(&dir.path().join("credentials.json"), config.path())
            .unwrap_err();

        assert_matches!(err, ProvisionError::Load(LoadError::Io { .. }));
    }

    #[test]
    fn malformed_config_aborts_before_any_request() {
        let credentials = json_file(&credentials_json("http://localhost:8080"));
        let config = json_file(r#"{"realmSettings": "#);
        let command = ProvisionCommand::new(MockHttpClient::new(), CleanupPolicy::default());

        let err = command.run(credentials.path(), config.path()).unwrap_err();

        assert_matches!(err, ProvisionError::Load(LoadError::Parse { .. }));
    }

    #[test]
    fn invalid_server_url_aborts_before_any_request() {
        let credentials = json_file(&credentials_json("sso.acme.test"));
        let config = json_file(EXAMPLE_CONFIG);
        let command = ProvisionCommand::new(MockHttpClient::new(), CleanupPolicy::default());

        let err = command.run(credentials.path(), config.path()).unwrap_err();

        assert_matches!(err, ProvisionError::InvalidServerUrl(_));
        assert!(err.to_string().contains("sso.acme.test"));
    }

    #[test]
    fn provisions_against_a_server() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/realms/master/protocol/openid-connect/token")
                .form_urlencoded_tuple("username", "admin")
                .form_urlencoded_tuple("password", "secret");
            then.status(200).json_body(json!({
                "access_token": "abc",
                "expires_in": 60,
                "token_type": "Bearer"
            }));
        });
        let probe = server.mock(|when, then| {
            when.method(GET)
                .path("/admin/realms/acme")
                .header("authorization", "Bearer abc");
            then.status(200).json_body(json!({"realm": "acme", "enabled": true}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/admin/realms/acme");
            then.status(204);
        });
        let create_realm = server.mock(|when, then| {
            when.method(POST)
                .path("/admin/realms")
                .json_body_includes(r#"{"realm": "acme", "enabled": true}"#);
            then.status(201);
        });
        let create_clients = server.mock(|when, then| {
            when.method(POST).path("/admin/realms/acme/clients");
            then.status(201);
        });
        let create_scopes = server.mock(|when, then| {
            when.method(POST)
                .path("/admin/realms/acme/client-scopes")
                .json_body_includes(r#"{"name": "api"}"#);
            then.status(201);
        });
        let credentials = json_file(&credentials_json(&server.base_url()));
        let config = json_file(EXAMPLE_CONFIG);
        let command = ProvisionCommand::new(
            ReqwestClient::new(HttpConfig::default()).unwrap(),
            CleanupPolicy::Strict,
        );

        let report = command.run(credentials.path(), config.path()).unwrap();

        assert_eq!(
            report,
            ProvisionReport {
                realm: "acme".to_string(),
                cleanup: RealmCleanup::Deleted,
                clients_created: 2,
                client_scopes_created: 1,
            }
        );
        login.assert();
        probe.assert();
        delete.assert();
        create_realm.assert();
        create_clients.assert_calls(2);
        create_scopes.assert();
    }

    #[test]
    fn rejected_login_makes_no_admin_calls() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST)
                .path("/realms/master/protocol/openid-connect/token");
            then.status(401)
                .json_body(json!({"error": "invalid_grant"}));
        });
        let admin = server.mock(|when, then| {
            when.path_includes("/admin");
            then.status(200);
        });
        let credentials = json_file(&credentials_json(&server.base_url()));
        let config = json_file(EXAMPLE_CONFIG);
        let command = ProvisionCommand::new(
            ReqwestClient::new(HttpConfig::default()).unwrap(),
            CleanupPolicy::default(),
        );

        let err = command.run(credentials.path(), config.path()).unwrap_err();

        assert_matches!(err, ProvisionError::Authentication(_));
        login.assert();
        admin.assert_calls(0);
    }
}
