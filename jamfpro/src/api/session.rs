//! Bearer token cache on the local filesystem
//!
//! Terraform starts a fresh provider process for every command, so the token
//! is persisted to a file and reused until it expires. Each entry records the
//! instance and credential identity it was issued for and is only handed back
//! to a client with the same scope. The cache is best effort: read and write
//! failures are logged and otherwise ignored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::auth::{AccessToken, Credentials};

/// Default cache location, `jamf-tf-session` in the system temp directory
pub fn default_path() -> PathBuf {
    std::env::temp_dir().join("jamf-tf-session")
}

/// Instance and credential identity a token belongs to
pub fn scope(base_url: &str, credentials: &Credentials) -> String {
    match credentials {
        Credentials::OAuth { client_id, .. } => format!("{} oauth:{}", base_url, client_id),
        Credentials::Basic { username, .. } => format!("{} basic:{}", base_url, username),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedSession {
    scope: String,
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
    scope: String,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>, scope: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scope: scope.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entry(&self) -> Option<CachedSession> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!("Ignoring malformed session cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Cached token if it belongs to this scope and is valid for at least
    /// `margin`
    pub async fn load(&self, margin: Duration) -> Option<AccessToken> {
        let cached = self.read_entry().await?;
        if cached.scope != self.scope {
            tracing::debug!(
                "Session cache {} holds a token for another instance",
                self.path.display()
            );
            return None;
        }

        let token = AccessToken {
            token: cached.token,
            expires_at: cached.expires_at,
        };
        if !token.is_valid_for(margin) {
            tracing::debug!("Cached session token expired at {}", token.expires_at);
            return None;
        }

        tracing::debug!("Using cached session token from {}", self.path.display());
        Some(token)
    }

    pub async fn store(&self, token: &AccessToken) {
        let cached = CachedSession {
            scope: self.scope.clone(),
            token: token.token.clone(),
            expires_at: token.expires_at,
        };

        let body = match serde_json::to_vec(&cached) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to encode session cache: {}", e);
                return;
            }
        };

        if let Err(e) = self.write_private(&body).await {
            tracing::warn!("Failed to write session cache {}: {}", self.path.display(), e);
        }
    }

    /// Writes the cache file readable by the owner only
    async fn write_private(&self, body: &[u8]) -> std::io::Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(body).await?;
        file.flush().await
    }

    /// Removes the cached token unless it belongs to another scope
    pub async fn clear(&self) {
        if let Some(cached) = self.read_entry().await {
            if cached.scope != self.scope {
                return;
            }
        }

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove session cache {}: {}", self.path.display(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = "https://a.jamfcloud.com oauth:terraform";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "jamfpro-session-test-{}-{}",
            name,
            std::process::id()
        ))
    }

    fn temp_cache(name: &str) -> SessionCache {
        SessionCache::new(temp_path(name), SCOPE)
    }

    fn token(value: &str) -> AccessToken {
        AccessToken {
            token: value.to_string(),
            expires_at: Utc::now() + Duration::minutes(20),
        }
    }

    #[tokio::test]
    async fn stores_and_loads_valid_token() {
        let cache = temp_cache("valid");

        cache.store(&token("abc")).await;
        let loaded = cache.load(Duration::seconds(60)).await;

        assert_eq!(loaded.map(|t| t.token), Some("abc".to_string()));
        cache.clear().await;
    }

    #[tokio::test]
    async fn expired_token_is_ignored() {
        let cache = temp_cache("expired");
        let token = AccessToken {
            token: "old".to_string(),
            expires_at: Utc::now() + Duration::seconds(30),
        };

        cache.store(&token).await;

        assert!(cache.load(Duration::seconds(60)).await.is_none());
        cache.clear().await;
    }

    #[tokio::test]
    async fn malformed_or_missing_cache_is_ignored() {
        let cache = temp_cache("malformed");
        assert!(cache.load(Duration::zero()).await.is_none());

        tokio::fs::write(cache.path(), b"not json").await.unwrap();
        assert!(cache.load(Duration::zero()).await.is_none());

        cache.clear().await;
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn token_of_another_scope_is_not_loaded_or_cleared() {
        let ours = temp_cache("scoped");
        let theirs = SessionCache::new(temp_path("scoped"), "https://b.jamfcloud.com oauth:terraform");

        ours.store(&token("token-a")).await;
        assert!(theirs.load(Duration::zero()).await.is_none());

        theirs.clear().await;
        assert_eq!(
            ours.load(Duration::zero()).await.map(|t| t.token),
            Some("token-a".to_string())
        );
        ours.clear().await;
    }

    #[test]
    fn scope_covers_instance_and_identity() {
        let oauth = Credentials::OAuth {
            client_id: "terraform".to_string(),
            client_secret: "secret".to_string(),
        };
        let basic = Credentials::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };

        assert_eq!(scope("https://a.jamfcloud.com", &oauth), SCOPE);
        assert_ne!(
            scope("https://a.jamfcloud.com", &oauth),
            scope("https://b.jamfcloud.com", &oauth)
        );
        assert_eq!(
            scope("https://a.jamfcloud.com", &basic),
            "https://a.jamfcloud.com basic:admin"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cache_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let cache = temp_cache("private");
        tokio::fs::write(cache.path(), b"{}").await.unwrap();
        tokio::fs::set_permissions(cache.path(), std::fs::Permissions::from_mode(0o644))
            .await
            .unwrap();

        cache.store(&token("secret")).await;

        let mode = tokio::fs::metadata(cache.path()).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        cache.clear().await;
    }
}
