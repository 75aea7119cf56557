//! Outcome and error taxonomy of reconcile operations

use std::error::Error as StdError;

/// Boxed error carried by fetch failures
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors a fetch callback can report, plus the terminal states of a
/// reconcile converted into errors
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Temporary failure, the poller retries it within policy limits
    #[error("transient fetch error: {0}")]
    TransientFetch(#[source] BoxError),

    /// The poller gives up immediately
    #[error("fetch failed: {0}")]
    PermanentFetch(#[source] BoxError),

    /// The remote object could not be mapped to a state model
    #[error("malformed remote data: {0}")]
    Mapping(#[source] BoxError),

    #[error("object did not converge to the desired state within the propagation budget")]
    ConvergenceTimeout,

    #[error("object not found")]
    NotFound,

    #[error("operation cancelled")]
    Cancelled,
}

impl ReconcileError {
    pub fn transient(err: impl Into<BoxError>) -> Self {
        ReconcileError::TransientFetch(err.into())
    }

    pub fn permanent(err: impl Into<BoxError>) -> Self {
        ReconcileError::PermanentFetch(err.into())
    }

    pub fn mapping(err: impl Into<BoxError>) -> Self {
        ReconcileError::Mapping(err.into())
    }

    /// Only transient fetch errors are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReconcileError::TransientFetch(_))
    }
}

/// Result of polling an object towards a desired state
#[derive(Debug)]
pub enum ReconcileOutcome<T> {
    /// Observed state matched the desired state
    Converged(T),
    /// The last attempt found no object
    NotFound,
    /// Budget exhausted, carries the last observation if the last attempt
    /// returned one
    TimedOut(Option<T>),
    Failed(ReconcileError),
}

impl<T> ReconcileOutcome<T> {
    pub fn is_converged(&self) -> bool {
        matches!(self, ReconcileOutcome::Converged(_))
    }

    /// Converged value, or the error describing why there is none
    pub fn into_result(self) -> Result<T, ReconcileError> {
        match self {
            ReconcileOutcome::Converged(observed) => Ok(observed),
            ReconcileOutcome::NotFound => Err(ReconcileError::NotFound),
            ReconcileOutcome::TimedOut(_) => Err(ReconcileError::ConvergenceTimeout),
            ReconcileOutcome::Failed(err) => Err(err),
        }
    }

    /// Best known observation, converged or not
    pub fn observed(&self) -> Option<&T> {
        match self {
            ReconcileOutcome::Converged(observed) => Some(observed),
            ReconcileOutcome::TimedOut(last) => last.as_ref(),
            _ => None,
        }
    }
}
