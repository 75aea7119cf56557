//! Bounded polling loop that waits for a remote object to converge

use std::future::Future;

use tokio::time::{sleep, Instant};

use super::equivalence::Equivalence;
use super::outcome::{ReconcileError, ReconcileOutcome};
use super::policy::PollPolicy;
use crate::context::Context;

/// What the most recent fetch produced, decides the outcome once the budget
/// runs out
enum LastAttempt<T> {
    Observed(T),
    NotFound,
    Transient,
}

impl<T> LastAttempt<T> {
    fn into_outcome(self) -> ReconcileOutcome<T> {
        match self {
            LastAttempt::Observed(observed) => ReconcileOutcome::TimedOut(Some(observed)),
            LastAttempt::NotFound => ReconcileOutcome::NotFound,
            LastAttempt::Transient => ReconcileOutcome::TimedOut(None),
        }
    }
}

/// Polls `fetch` until the observed object is equivalent to `desired`
///
/// `fetch` returns `Ok(None)` when the object does not exist (yet). Not found,
/// not yet equivalent and transient errors are retried with the policy's
/// backoff; any other error ends the poll with `Failed`. Cancelling `ctx`
/// interrupts both an in-flight fetch and a backoff sleep.
pub async fn reconcile<T, F, Fut, E>(
    ctx: &Context,
    desired: &T,
    mut fetch: F,
    equivalence: &E,
    policy: &PollPolicy,
) -> ReconcileOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ReconcileError>>,
    E: Equivalence<T> + ?Sized,
{
    let started = Instant::now();
    let mut delays = policy.delays();
    let mut attempt: u32 = 0;

    loop {
        if ctx.is_cancelled() {
            return ReconcileOutcome::Failed(ReconcileError::Cancelled);
        }

        attempt += 1;
        let result = tokio::select! {
            biased;
            _ = ctx.cancelled() => return ReconcileOutcome::Failed(ReconcileError::Cancelled),
            result = fetch() => result,
        };

        let last = match result {
            Ok(Some(observed)) => {
                if equivalence.equivalent(desired, Some(&observed)) {
                    tracing::debug!("Converged after {} attempt(s)", attempt);
                    return ReconcileOutcome::Converged(observed);
                }
                tracing::debug!("Attempt {}: observed state not yet equivalent", attempt);
                LastAttempt::Observed(observed)
            }
            Ok(None) => {
                tracing::debug!("Attempt {}: object not found yet", attempt);
                LastAttempt::NotFound
            }
            Err(err) if err.is_retryable() => {
                tracing::debug!("Attempt {}: retryable fetch error: {}", attempt, err);
                LastAttempt::Transient
            }
            Err(err) => {
                tracing::debug!("Attempt {}: giving up: {}", attempt, err);
                return ReconcileOutcome::Failed(err);
            }
        };

        let remaining = policy.max_elapsed.saturating_sub(started.elapsed());
        let out_of_attempts = policy.max_attempts != 0 && attempt >= policy.max_attempts;
        if out_of_attempts || remaining.is_zero() {
            tracing::debug!(
                "Budget exhausted after {} attempt(s) in {:?}",
                attempt,
                started.elapsed()
            );
            return last.into_outcome();
        }

        let delay = delays.next().unwrap_or(policy.max_delay).min(remaining);
        tokio::select! {
            biased;
            _ = ctx.cancelled() => return ReconcileOutcome::Failed(ReconcileError::Cancelled),
            _ = sleep(delay) => {}
        }
    }
}
