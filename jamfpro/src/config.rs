//! Provider block configuration
//!
//! Every attribute is optional in the provider block and falls back to a
//! `JAMF_*` environment variable. [`ProviderConfig::resolve`] merges both
//! sources and checks that exactly one complete credential pair is present.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tfplug::reconcile::CollectionOrder;

use crate::api::session;
use crate::api::Credentials;

pub const ENV_INSTANCE_URL: &str = "JAMF_INSTANCE_URL";
pub const ENV_CLIENT_ID: &str = "JAMF_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "JAMF_CLIENT_SECRET";
pub const ENV_USERNAME: &str = "JAMF_USERNAME";
pub const ENV_PASSWORD: &str = "JAMF_PASSWORD";
pub const ENV_PROPAGATION_TIMEOUT: &str = "JAMF_PROPAGATION_TIMEOUT";
pub const ENV_ORDERED_COLLECTIONS: &str = "JAMF_ORDERED_COLLECTIONS";
pub const ENV_SESSION_CACHE: &str = "JAMF_SESSION_CACHE";

pub const DEFAULT_PROPAGATION_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("instance_url is required (set in provider config or JAMF_INSTANCE_URL env var)")]
    MissingInstanceUrl,

    #[error("credentials are required: set client_id and client_secret, or username and password")]
    MissingCredentials,

    #[error("{missing} must be set together with {given}")]
    IncompleteCredentials {
        given: &'static str,
        missing: &'static str,
    },

    #[error("only one of client_id/client_secret and username/password may be set")]
    ConflictingCredentials,

    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Provider block as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub instance_url: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub propagation_timeout: Option<i64>,
    #[serde(default)]
    pub ordered_collections: Option<bool>,
    #[serde(default)]
    pub session_cache: Option<String>,
}

/// Configuration after environment fallbacks
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub instance_url: String,
    pub credentials: Credentials,
    pub propagation_timeout: Duration,
    pub collection_order: CollectionOrder,
    pub session_cache: Option<PathBuf>,
}

impl ProviderConfig {
    /// Resolves against the process environment
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolves with a custom environment lookup
    pub fn resolve_with<F>(self, env: F) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |value: Option<String>, name: &str| {
            value
                .or_else(|| env(name))
                .filter(|v| !v.trim().is_empty())
        };

        let instance_url =
            lookup(self.instance_url, ENV_INSTANCE_URL).ok_or(ConfigError::MissingInstanceUrl)?;

        let oauth = pair(
            lookup(self.client_id, ENV_CLIENT_ID),
            lookup(self.client_secret, ENV_CLIENT_SECRET),
            "client_id",
            "client_secret",
        )?;
        let basic = pair(
            lookup(self.username, ENV_USERNAME),
            lookup(self.password, ENV_PASSWORD),
            "username",
            "password",
        )?;
        let credentials = match (oauth, basic) {
            (Some((client_id, client_secret)), None) => Credentials::OAuth {
                client_id,
                client_secret,
            },
            (None, Some((username, password))) => Credentials::Basic { username, password },
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingCredentials),
            (None, None) => return Err(ConfigError::MissingCredentials),
        };

        let propagation_timeout = match self.propagation_timeout {
            Some(secs) => positive_secs(secs.to_string())?,
            None => match env(ENV_PROPAGATION_TIMEOUT) {
                Some(raw) => positive_secs(raw)?,
                None => Duration::from_secs(DEFAULT_PROPAGATION_TIMEOUT_SECS),
            },
        };

        let ordered = match self.ordered_collections {
            Some(ordered) => ordered,
            None => match env(ENV_ORDERED_COLLECTIONS) {
                Some(raw) => parse_bool(ENV_ORDERED_COLLECTIONS, &raw)?,
                None => false,
            },
        };
        let collection_order = if ordered {
            CollectionOrder::Ordered
        } else {
            CollectionOrder::Unordered
        };

        let session_cache = match self.session_cache.or_else(|| env(ENV_SESSION_CACHE)) {
            Some(path) if path.is_empty() || path.eq_ignore_ascii_case("false") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(session::default_path()),
        };

        Ok(ResolvedConfig {
            instance_url,
            credentials,
            propagation_timeout,
            collection_order,
            session_cache,
        })
    }
}

fn pair(
    first: Option<String>,
    second: Option<String>,
    first_name: &'static str,
    second_name: &'static str,
) -> Result<Option<(String, String)>, ConfigError> {
    match (first, second) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (Some(_), None) => Err(ConfigError::IncompleteCredentials {
            given: first_name,
            missing: second_name,
        }),
        (None, Some(_)) => Err(ConfigError::IncompleteCredentials {
            given: second_name,
            missing: first_name,
        }),
        (None, None) => Ok(None),
    }
}

fn positive_secs(raw: String) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: "propagation_timeout",
        value: raw.clone(),
        reason,
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn oauth_config() -> ProviderConfig {
        ProviderConfig {
            instance_url: Some("example.jamfcloud.com".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn resolves_oauth_with_defaults() {
        let resolved = oauth_config().resolve_with(env(&[])).unwrap();

        assert_eq!(resolved.instance_url, "example.jamfcloud.com");
        assert!(matches!(resolved.credentials, Credentials::OAuth { .. }));
        assert_eq!(resolved.propagation_timeout, Duration::from_secs(120));
        assert_eq!(resolved.collection_order, CollectionOrder::Unordered);
        assert_eq!(resolved.session_cache, Some(session::default_path()));
    }

    #[test]
    fn falls_back_to_environment() {
        let resolved = ProviderConfig::default()
            .resolve_with(env(&[
                (ENV_INSTANCE_URL, "https://env.jamfcloud.com"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "hunter2"),
                (ENV_PROPAGATION_TIMEOUT, "30"),
                (ENV_ORDERED_COLLECTIONS, "true"),
                (ENV_SESSION_CACHE, "false"),
            ]))
            .unwrap();

        assert_eq!(resolved.instance_url, "https://env.jamfcloud.com");
        assert!(matches!(
            resolved.credentials,
            Credentials::Basic { ref username, .. } if username == "admin"
        ));
        assert_eq!(resolved.propagation_timeout, Duration::from_secs(30));
        assert_eq!(resolved.collection_order, CollectionOrder::Ordered);
        assert_eq!(resolved.session_cache, None);
    }

    #[test]
    fn config_wins_over_environment() {
        let resolved = oauth_config()
            .resolve_with(env(&[(ENV_INSTANCE_URL, "https://env.jamfcloud.com")]))
            .unwrap();

        assert_eq!(resolved.instance_url, "example.jamfcloud.com");
    }

    #[test]
    fn rejects_half_supplied_pair() {
        let config = ProviderConfig {
            client_secret: None,
            ..oauth_config()
        };

        assert_eq!(
            config.resolve_with(env(&[])).unwrap_err(),
            ConfigError::IncompleteCredentials {
                given: "client_id",
                missing: "client_secret",
            }
        );
    }

    #[test]
    fn rejects_missing_and_conflicting_credentials() {
        let bare = ProviderConfig {
            instance_url: Some("example.jamfcloud.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            bare.resolve_with(env(&[])).unwrap_err(),
            ConfigError::MissingCredentials
        );

        assert_eq!(
            oauth_config()
                .resolve_with(env(&[(ENV_USERNAME, "admin"), (ENV_PASSWORD, "pw")]))
                .unwrap_err(),
            ConfigError::ConflictingCredentials
        );
    }

    #[test]
    fn rejects_missing_instance_url() {
        let config = ProviderConfig {
            instance_url: None,
            ..oauth_config()
        };
        assert_eq!(
            config.resolve_with(env(&[])).unwrap_err(),
            ConfigError::MissingInstanceUrl
        );
    }

    #[test]
    fn rejects_invalid_timeout() {
        let config = ProviderConfig {
            propagation_timeout: Some(0),
            ..oauth_config()
        };
        assert!(matches!(
            config.resolve_with(env(&[])),
            Err(ConfigError::InvalidValue {
                name: "propagation_timeout",
                ..
            })
        ));

        assert!(matches!(
            oauth_config().resolve_with(env(&[(ENV_PROPAGATION_TIMEOUT, "soon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
