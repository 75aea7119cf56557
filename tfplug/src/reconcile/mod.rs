//! Eventual-consistency reconciliation
//!
//! After a write, a remote object may be missing or stale for a short window.
//! [`reconcile`] polls it with bounded backoff until it is equivalent to the
//! desired state, the budget runs out, a permanent error occurs, or the
//! caller's [`Context`](crate::Context) is cancelled.

mod equivalence;
mod outcome;
mod poll;
mod policy;

pub use equivalence::{
    collections_equivalent, optional_matches, AnyObserved, CollectionMember, CollectionOrder,
    Equivalence, FnEquivalence, ModelEquivalence, Reconcilable,
};
pub use outcome::{BoxError, ReconcileError, ReconcileOutcome};
pub use poll::reconcile;
pub use policy::{Backoff, PollPolicy};
