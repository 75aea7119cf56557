//! Framework errors
//!
//! Provider-facing failures are reported as diagnostics. These errors cover
//! the framework's own helpers: state conversion, poll policies and the
//! hand-off of provider data.

#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("state conversion failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("no provider data was supplied, is the provider configured?")]
    MissingProviderData,

    #[error("provider data is not a {expected}")]
    ProviderDataType { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, TfplugError>;
