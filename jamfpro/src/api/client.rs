use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::auth::{self, AccessToken, Credentials};
use super::error::ApiError;
use super::session::{self, SessionCache};

/// Jamf Pro API client
///
/// Covers both the Jamf Pro API (`/api/...`, JSON) and the Classic API
/// (`/JSSResource/...`, JSON reads and XML writes). Cloning is cheap, clones
/// share the bearer token.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    token: RwLock<Option<AccessToken>>,
    retry_config: RetryConfig,
    session_cache: Option<SessionCache>,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

/// Settings used to build a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub instance_url: String,
    pub credentials: Credentials,
    pub user_agent: String,
    pub retry: RetryConfig,
    /// Token cache file, `None` disables caching
    pub session_cache: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(instance_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            instance_url: instance_url.into(),
            credentials,
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
            session_cache: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_session_cache(mut self, path: Option<PathBuf>) -> Self {
        self.session_cache = path;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

pub fn default_user_agent() -> String {
    format!("terraform-provider-jamfpro/{}", env!("CARGO_PKG_VERSION"))
}

/// Adds `https://` to bare host names and validates the result
pub fn normalize_instance_url(instance_url: &str) -> Result<String, ApiError> {
    let trimmed = instance_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidUrl("instance URL is empty".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = url::Url::parse(&with_scheme)
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", instance_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            instance_url,
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ApiError::InvalidUrl(format!("{}: missing host", instance_url)));
    }

    Ok(with_scheme)
}

impl Client {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = normalize_instance_url(&config.instance_url)?;

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.retry.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let session_cache = config
            .session_cache
            .map(|path| SessionCache::new(path, session::scope(&base_url, &config.credentials)));

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                credentials: config.credentials,
                token: RwLock::new(None),
                retry_config: config.retry,
                session_cache,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Buildings API operations
    pub fn buildings(&self) -> crate::api::buildings::BuildingsApi<'_> {
        crate::api::buildings::BuildingsApi::new(self)
    }

    /// Categories API operations
    pub fn categories(&self) -> crate::api::categories::CategoriesApi<'_> {
        crate::api::categories::CategoriesApi::new(self)
    }

    /// Departments API operations
    pub fn departments(&self) -> crate::api::departments::DepartmentsApi<'_> {
        crate::api::departments::DepartmentsApi::new(self)
    }

    /// API roles operations
    pub fn api_roles(&self) -> crate::api::api_roles::ApiRolesApi<'_> {
        crate::api::api_roles::ApiRolesApi::new(self)
    }

    /// Classic API computer operations
    pub fn computers(&self) -> crate::api::computers::ComputersApi<'_> {
        crate::api::computers::ComputersApi::new(self)
    }

    /// Classic API computer group operations, static and smart
    pub fn computer_groups(&self) -> crate::api::computer_groups::ComputerGroupsApi<'_> {
        crate::api::computer_groups::ComputerGroupsApi::new(self)
    }

    /// Execute a GET request and parse the JSON response
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let text = self
            .execute_with_retry("GET", path, |url| self.inner.http_client.get(url))
            .await?;
        parse_json(&text)
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_query<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let text = self
            .execute_with_retry("GET", path, |url| {
                self.inner.http_client.get(url).query(query)
            })
            .await?;
        parse_json(&text)
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self
            .execute_with_retry("POST", path, |url| {
                self.inner.http_client.post(url).json(body)
            })
            .await?;
        parse_json(&text)
    }

    /// Execute a PUT request with a JSON body
    pub async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self
            .execute_with_retry("PUT", path, |url| {
                self.inner.http_client.put(url).json(body)
            })
            .await?;
        parse_json(&text)
    }

    /// Execute a PUT request with a JSON body, ignoring the response body
    pub async fn put_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.execute_with_retry("PUT", path, |url| {
            self.inner.http_client.put(url).json(body)
        })
        .await
        .map(|_| ())
    }

    /// Execute a POST request with an XML body, returns the raw response
    pub async fn post_xml(&self, path: &str, body: &str) -> Result<String, ApiError> {
        self.execute_with_retry("POST", path, |url| {
            self.inner
                .http_client
                .post(url)
                .header(CONTENT_TYPE, "application/xml")
                .body(body.to_string())
        })
        .await
    }

    /// Execute a PUT request with an XML body, returns the raw response
    pub async fn put_xml(&self, path: &str, body: &str) -> Result<String, ApiError> {
        self.execute_with_retry("PUT", path, |url| {
            self.inner
                .http_client
                .put(url)
                .header(CONTENT_TYPE, "application/xml")
                .body(body.to_string())
        })
        .await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute_with_retry("DELETE", path, |url| {
            self.inner.http_client.delete(url)
        })
        .await
        .map(|_| ())
    }

    /// Valid bearer token, refreshed when it expires within a minute
    async fn bearer_token(&self) -> Result<String, ApiError> {
        let margin = auth::refresh_margin();

        if let Some(token) = self.inner.token.read().await.as_ref() {
            if token.is_valid_for(margin) {
                return Ok(token.token.clone());
            }
        }

        let mut guard = self.inner.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.is_valid_for(margin) {
                return Ok(token.token.clone());
            }
        }

        if guard.is_none() {
            if let Some(cache) = &self.inner.session_cache {
                if let Some(cached) = cache.load(margin).await {
                    let value = cached.token.clone();
                    *guard = Some(cached);
                    return Ok(value);
                }
            }
        }

        let token = auth::request_token(
            &self.inner.http_client,
            &self.inner.base_url,
            &self.inner.credentials,
        )
        .await?;

        if let Some(cache) = &self.inner.session_cache {
            cache.store(&token).await;
        }

        let value = token.token.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.inner.token.write().await = None;
        if let Some(cache) = &self.inner.session_cache {
            cache.clear().await;
        }
    }

    /// Execute request with retry logic, returns the body of a successful
    /// response
    async fn execute_with_retry<F>(
        &self,
        method: &str,
        path: &str,
        build_request: F,
    ) -> Result<String, ApiError>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut attempt = 0;
        let mut last_error = None;
        let mut reauthenticated = false;

        while attempt <= self.inner.retry_config.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    self.inner.retry_config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    self.inner.retry_config.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let token = self.bearer_token().await?;
            tracing::debug!("{} request to: {}", method, url);

            match build_request(&url)
                .bearer_auth(&token)
                .header(ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let text = response.text().await?;
                        tracing::debug!("API response body: {}", text);
                        return Ok(text);
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        self.invalidate_token().await;
                        // A cached or revoked token gets one retry with a fresh one
                        if !reauthenticated {
                            reauthenticated = true;
                            tracing::debug!("{} {} was rejected, requesting a new token", method, path);
                            continue;
                        }
                        return Err(ApiError::AuthError(format!(
                            "{} {} was rejected with HTTP 401",
                            method, path
                        )));
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(self.handle_error_response(response).await);
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error =
                            Some(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    /// Handle error response
    async fn handle_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::debug!("API error response (HTTP {}): {}", status, text);

        ApiError::ApiError {
            status,
            message: text,
        }
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str::<T>(text).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
        ApiError::ParseError(format!("Failed to parse response: {}", e))
    })
}
