//! Test helpers for the Jamf Pro API

use std::path::Path;

use super::auth::Credentials;
use super::client::{Client, ClientConfig, RetryConfig};

/// Client with fast retries and no session cache
pub fn create_test_client(url: &str) -> Client {
    Client::new(test_config(url)).unwrap()
}

/// Client with fast retries that caches its token in `cache`
pub fn create_cached_test_client(url: &str, cache: &Path) -> Client {
    Client::new(test_config(url).with_session_cache(Some(cache.to_path_buf()))).unwrap()
}

fn test_config(url: &str) -> ClientConfig {
    ClientConfig::new(
        url,
        Credentials::OAuth {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
        },
    )
    .with_retry(RetryConfig {
        max_retries: 2,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        timeout_seconds: 5,
    })
}

/// Token endpoint handing out `test-token`
pub async fn mock_oauth_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/api/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"test-token","token_type":"Bearer","expires_in":1200}"#)
        .create_async()
        .await
}
