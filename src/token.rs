use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::authenticator::{AuthenticateError, TokenRetrievalResponse};

pub type AccessToken = String;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenType {
    Bearer,
}

/// Short-lived admin access token. It is obtained once per run and never refreshed.
#[derive(Clone, PartialEq)]
pub struct Token {
    expires_at: DateTime<Utc>,
    access_token: AccessToken,
    token_type: TokenType,
}

impl TryFrom<&str> for TokenType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Bearer" | "bearer" => Ok(TokenType::Bearer),
            _ => Err(format!("Invalid token type: {value}")),
        }
    }
}

impl Token {
    pub fn new(
        access_token: AccessToken,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Token {
            access_token,
            token_type,
            expires_at,
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Bearer => write!(f, "Bearer"),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<hidden>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TryFrom<TokenRetrievalResponse> for Token {
    type Error = AuthenticateError;

    fn try_from(response: TokenRetrievalResponse) -> Result<Self, Self::Error> {
        let token_type = TokenType::try_from(response.token_type.as_str())
            .map_err(AuthenticateError::InvalidToken)?;

        // `expires_in` is in seconds
        let time_delta = TimeDelta::from_std(Duration::from_secs(response.expires_in))
            .map_err(|e| AuthenticateError::InvalidToken(e.to_string()))?;

        let expires_at = Utc::now().checked_add_signed(time_delta).ok_or_else(|| {
            AuthenticateError::InvalidToken("Failed to calculate expiration time".to_string())
        })?;

        Ok(Token::new(response.access_token, token_type, expires_at))
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn token_from_response() {
        let before = Utc::now();
        let response = TokenRetrievalResponse {
            access_token: "some-token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 60,
        };

        let token = Token::try_from(response).unwrap();

        assert_eq!(token.access_token(), "some-token");
        assert_eq!(token.authorization(), "Bearer some-token");
        assert!(token.expires_at() >= before + Duration::seconds(60));
        assert!(token.expires_at() <= Utc::now() + Duration::seconds(60));
    }

    #[test]
    fn token_from_response_with_unknown_type() {
        let response = TokenRetrievalResponse {
            access_token: "some-token".to_string(),
            token_type: "DPoP".to_string(),
            expires_in: 60,
        };

        assert_matches!(
            Token::try_from(response),
            Err(AuthenticateError::InvalidToken(msg)) => assert_eq!(msg, "Invalid token type: DPoP")
        );
    }

    #[test]
    fn token_from_response_with_incorrect_time() {
        let response = TokenRetrievalResponse {
            access_token: "some-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: u64::MAX,
        };

        assert_matches!(
            Token::try_from(response),
            Err(AuthenticateError::InvalidToken(msg)) => assert_eq!(msg, "Source duration value is out of range for the target type")
        );
    }

    #[test]
    fn access_token_is_hidden() {
        let token = Token::new(
            AccessToken::from("some-token"),
            TokenType::Bearer,
            Utc::now(),
        );
        assert!(!format!("{token:?}").contains("some-token"));
    }
}
