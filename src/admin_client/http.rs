use http::{
    HeaderValue, Method, Request, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::{http_client::HttpClient, server_url::ServerUrl, token::Token};

use super::{
    AdminClient,
    error::AdminClientError,
    representation::{ClientRepresentation, ClientScopeRepresentation, RealmRepresentation},
};

/// Implementation of the [AdminClient] trait for a generic HTTP client.
pub struct HttpAdminClient<C>
where
    C: HttpClient,
{
    http_client: C,
    server_url: ServerUrl,
}

impl<C> HttpAdminClient<C>
where
    C: HttpClient,
{
    pub fn new(http_client: C, server_url: ServerUrl) -> Self {
        Self {
            http_client,
            server_url,
        }
    }

    fn build_request<T: Serialize>(
        method: Method,
        endpoint: &Url,
        token: &Token,
        payload: Option<&T>,
    ) -> Result<Request<Vec<u8>>, AdminClientError> {
        let mut bearer_token_header = HeaderValue::from_str(&token.authorization()).map_err(|_| {
            AdminClientError::Encoder("invalid HTTP header value set for Authorization".to_string())
        })?;
        bearer_token_header.set_sensitive(true);

        let builder = http::Request::builder()
            .uri(endpoint.as_str())
            .method(method)
            .header(AUTHORIZATION, bearer_token_header);

        let request = match payload {
            Some(payload) => {
                let json_body = serde_json::to_vec(payload)
                    .map_err(|e| AdminClientError::Encoder(format!("Failed to encode JSON: {e}")))?;
                builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(json_body)
            }
            None => builder.body(Vec::new()),
        };
        request.map_err(|e| AdminClientError::Encoder(format!("Failed to build request: {e}")))
    }

    fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, AdminClientError> {
        debug!(method = %request.method(), uri = %request.uri(), "sending admin request");
        let response = self.http_client.send(request).map_err(|e| {
            AdminClientError::Transport(format!("Failed to send HTTP request: {e}"))
        })?;
        debug!(status = %response.status(), "admin response received");
        Ok(response)
    }

    fn send_expecting_success<T: Serialize>(
        &self,
        method: Method,
        endpoint: &Url,
        token: &Token,
        payload: Option<&T>,
    ) -> Result<(), AdminClientError> {
        let request = Self::build_request(method, endpoint, token, payload)?;
        let response = self.execute(request)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(unsuccessful(&response))
        }
    }
}

fn unsuccessful(response: &Response<Vec<u8>>) -> AdminClientError {
    AdminClientError::UnsuccessfulResponse(
        response.status().as_u16(),
        String::from_utf8_lossy(response.body()).to_string(),
    )
}

impl<C> AdminClient for HttpAdminClient<C>
where
    C: HttpClient,
{
    fn realm_exists(&self, token: &Token, realm: &str) -> Result<bool, AdminClientError> {
        let endpoint = self.server_url.realm_endpoint(realm);
        let request = Self::build_request::<()>(Method::GET, &endpoint, token, None)?;
        let response = self.execute(request)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(unsuccessful(&response)),
        }
    }

    fn delete_realm(&self, token: &Token, realm: &str) -> Result<(), AdminClientError> {
        let endpoint = self.server_url.realm_endpoint(realm);
        self.send_expecting_success::<()>(Method::DELETE, &endpoint, token, None)
    }

    fn create_realm(
        &self,
        token: &Token,
        representation: &RealmRepresentation,
    ) -> Result<(), AdminClientError> {
        let endpoint = self.server_url.realms_endpoint();
        self.send_expecting_success(Method::POST, &endpoint, token, Some(representation))
    }

    fn create_client(
        &self,
        token: &Token,
        realm: &str,
        representation: &ClientRepresentation,
    ) -> Result<(), AdminClientError> {
        let endpoint = self.server_url.clients_endpoint(realm);
        self.send_expecting_success(Method::POST, &endpoint, token, Some(representation))
    }

    fn create_client_scope(
        &self,
        token: &Token,
        realm: &str,
        representation: &ClientScopeRepresentation,
    ) -> Result<(), AdminClientError> {
        let endpoint = self.server_url.client_scopes_endpoint(realm);
        self.send_expecting_success(Method::POST, &endpoint, token, Some(representation))
    }
}
