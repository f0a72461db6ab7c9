use http::{StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::http_client::HttpClient;
use crate::input_data::credentials::AdminCredentials;
use crate::server_url::{ADMIN_CLI_CLIENT_ID, ServerUrl};
use crate::token::{AccessToken, Token};

#[derive(Error, Debug)]
pub enum AuthenticateError {
    #[error("unable to build request: `{0}`")]
    SerializeError(String),
    #[error("unable to deserialize token: `{0}`")]
    DeserializeError(String),
    #[error("identity server error: Status code: `{0}`, Reason: `{1}`")]
    HttpResponseError(u16, String),
    #[error("http transport error: `{0}`")]
    HttpTransportError(String),
    #[error("invalid token: `{0}`")]
    InvalidToken(String),
}

/// Exchanges administrator credentials for an admin access token.
pub trait Authenticator {
    fn authenticate(&self, credentials: &AdminCredentials) -> Result<Token, AuthenticateError>;
}

/// Password grant against the token endpoint of the administrator's realm, through the
/// `admin-cli` client.
pub struct HttpAuthenticator<C> {
    http_client: C,
    server_url: ServerUrl,
}

impl<C> HttpAuthenticator<C> {
    pub fn new(http_client: C, server_url: ServerUrl) -> Self {
        Self {
            http_client,
            server_url,
        }
    }
}

impl<C> Authenticator for HttpAuthenticator<C>
where
    C: HttpClient,
{
    fn authenticate(&self, credentials: &AdminCredentials) -> Result<Token, AuthenticateError> {
        let endpoint = self.server_url.token_endpoint(&credentials.auth_realm);
        debug!(%endpoint, username = %credentials.username, "logging in as administrator");

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", GrantType::Password.as_str())
            .append_pair("client_id", ADMIN_CLI_CLIENT_ID)
            .append_pair("username", &credentials.username)
            .append_pair("password", credentials.password.expose())
            .finish();

        let request = http::Request::builder()
            .uri(endpoint.as_str())
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form.into_bytes())
            .map_err(|e| AuthenticateError::SerializeError(e.to_string()))?;

        let response = self
            .http_client
            .send(request)
            .map_err(|e| AuthenticateError::HttpTransportError(e.to_string()))?;

        let body = String::from_utf8_lossy(response.body());
        if response.status() != StatusCode::OK {
            return Err(AuthenticateError::HttpResponseError(
                response.status().as_u16(),
                body.to_string(),
            ));
        }

        let decoded: TokenRetrievalResponse = serde_json::from_str(&body)
            .map_err(|e| AuthenticateError::DeserializeError(e.to_string()))?;
        let token = Token::try_from(decoded)?;
        debug!(expires_at = %token.expires_at(), "admin session established");
        Ok(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrantType {
    Password,
}

impl GrantType {
    fn as_str(&self) -> &'static str {
        match self {
            GrantType::Password => "password",
        }
    }
}

/// Relevant part of the token endpoint response. Refresh tokens are ignored, the session
/// is not renewed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenRetrievalResponse {
    pub access_token: AccessToken,
    /// The lifetime in seconds of the access token.
    pub expires_in: u64,
    pub token_type: String,
}
