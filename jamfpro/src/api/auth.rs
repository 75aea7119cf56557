//! Bearer token acquisition for the Jamf Pro API
//!
//! Two flows are supported: OAuth client credentials (API clients) and the
//! legacy basic-auth token endpoint (user accounts). Both produce a bearer
//! token with an expiry that the client refreshes ahead of time.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

use super::error::ApiError;

pub const OAUTH_TOKEN_PATH: &str = "/api/oauth/token";
pub const BASIC_TOKEN_PATH: &str = "/api/v1/auth/token";

/// Tokens are refreshed when they expire within this margin
pub fn refresh_margin() -> Duration {
    Duration::seconds(60)
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    OAuth {
        client_id: String,
        client_secret: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::OAuth { client_id, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_valid_for(&self, margin: Duration) -> bool {
        Utc::now() + margin < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct BasicTokenResponse {
    token: String,
    expires: DateTime<Utc>,
}

/// Requests a new bearer token from the instance
pub async fn request_token(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken, ApiError> {
    let request = match credentials {
        Credentials::OAuth {
            client_id,
            client_secret,
        } => {
            let url = format!("{}{}", base_url, OAUTH_TOKEN_PATH);
            tracing::debug!("Requesting OAuth token from: {}", url);
            http.post(&url).form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
        }
        Credentials::Basic { username, password } => {
            let url = format!("{}{}", base_url, BASIC_TOKEN_PATH);
            tracing::debug!("Requesting basic auth token from: {}", url);
            http.post(&url).basic_auth(username, Some(password))
        }
    };

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_server_error() {
        return Err(ApiError::ServiceUnavailable);
    }
    if !status.is_success() {
        return Err(ApiError::AuthError(format!(
            "token request returned HTTP {}: {}",
            status.as_u16(),
            text
        )));
    }

    let token = match credentials {
        Credentials::OAuth { .. } => {
            let parsed: OAuthTokenResponse = serde_json::from_str(&text)
                .map_err(|e| ApiError::ParseError(format!("Invalid OAuth token response: {}", e)))?;
            AccessToken {
                token: parsed.access_token,
                expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
            }
        }
        Credentials::Basic { .. } => {
            let parsed: BasicTokenResponse = serde_json::from_str(&text)
                .map_err(|e| ApiError::ParseError(format!("Invalid token response: {}", e)))?;
            AccessToken {
                token: parsed.token,
                expires_at: parsed.expires,
            }
        }
    };

    tracing::debug!("Obtained bearer token valid until {}", token.expires_at);
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn oauth_client_credentials_flow() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", OAUTH_TOKEN_PATH)
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "id-1".into()),
                Matcher::UrlEncoded("client_secret".into(), "s3cret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok-1","scope":"api-role:1","token_type":"Bearer","expires_in":1199}"#)
            .create_async()
            .await;

        let credentials = Credentials::OAuth {
            client_id: "id-1".to_string(),
            client_secret: "s3cret".to_string(),
        };
        let token = request_token(&reqwest::Client::new(), &server.url(), &credentials)
            .await
            .unwrap();

        assert_eq!(token.token, "tok-1");
        assert!(token.is_valid_for(Duration::minutes(15)));
    }

    #[tokio::test]
    async fn basic_auth_flow() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", BASIC_TOKEN_PATH)
            .match_header("authorization", "Basic YWRtaW46cGFzcw==")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"tok-2","expires":"2099-01-01T00:00:00.000Z"}"#)
            .create_async()
            .await;

        let credentials = Credentials::Basic {
            username: "admin".to_string(),
            password: "pass".to_string(),
        };
        let token = request_token(&reqwest::Client::new(), &server.url(), &credentials)
            .await
            .unwrap();

        assert_eq!(token.token, "tok-2");
        assert_eq!(token.expires_at.to_rfc3339(), "2099-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", OAUTH_TOKEN_PATH)
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let credentials = Credentials::OAuth {
            client_id: "id".to_string(),
            client_secret: "wrong".to_string(),
        };
        let result = request_token(&reqwest::Client::new(), &server.url(), &credentials).await;

        assert!(matches!(result, Err(ApiError::AuthError(ref msg)) if msg.contains("401")));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let credentials = Credentials::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let output = format!("{:?}", credentials);
        assert!(output.contains("admin"));
        assert!(!output.contains("hunter2"));
    }
}
