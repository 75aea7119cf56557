//! Crate level error type

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::models::MappingError;
use tfplug::{ReconcileError, TfplugError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid poll policy: {0}")]
    Policy(#[from] TfplugError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classifies a failed read for the reconcile poller
    ///
    /// A 404 is not an error here, callers turn it into `Ok(None)` first.
    pub fn into_fetch_error(self) -> ReconcileError {
        match self {
            Error::Api(err) if err.is_transient() => ReconcileError::transient(err),
            Error::Api(err) => ReconcileError::permanent(err),
            Error::Mapping(err) => ReconcileError::mapping(err),
            Error::Config(err) => ReconcileError::permanent(err),
            Error::Policy(err) => ReconcileError::permanent(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(err) if err.is_not_found())
    }
}
