//! Desired vs observed comparison
//!
//! Nested collections are compared by each element's identity key, either
//! positionally or as a multiset depending on [`CollectionOrder`].

use std::collections::HashMap;
use std::hash::Hash;

/// How nested collections are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionOrder {
    /// Element `i` of desired must match element `i` of observed. Relies on
    /// the remote API returning collections in a stable order.
    Ordered,
    /// Same elements with the same multiplicity, in any order
    #[default]
    Unordered,
}

/// Element of a nested collection with a natural identity
pub trait CollectionMember {
    type Key: Eq + Hash;

    fn identity_key(&self) -> Self::Key;
}

impl CollectionMember for String {
    type Key = String;

    fn identity_key(&self) -> String {
        self.clone()
    }
}

/// Compares two collections by identity key under the given order policy
pub fn collections_equivalent<M: CollectionMember>(
    desired: &[M],
    observed: &[M],
    order: CollectionOrder,
) -> bool {
    if desired.len() != observed.len() {
        return false;
    }

    match order {
        CollectionOrder::Ordered => desired
            .iter()
            .zip(observed)
            .all(|(d, o)| d.identity_key() == o.identity_key()),
        CollectionOrder::Unordered => {
            let mut counts: HashMap<M::Key, isize> = HashMap::with_capacity(desired.len());
            for member in desired {
                *counts.entry(member.identity_key()).or_default() += 1;
            }
            for member in observed {
                match counts.get_mut(&member.identity_key()) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => return false,
                }
            }
            true
        }
    }
}

/// Equivalence predicate used by the poller
pub trait Equivalence<T>: Send + Sync {
    /// False when nothing was observed
    fn equivalent(&self, desired: &T, observed: Option<&T>) -> bool;
}

/// State models that know which of their fields are significant
pub trait Reconcilable {
    fn is_equivalent(&self, observed: &Self, order: CollectionOrder) -> bool;
}

/// Compares full models through [`Reconcilable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelEquivalence {
    pub order: CollectionOrder,
}

impl ModelEquivalence {
    pub fn new(order: CollectionOrder) -> Self {
        Self { order }
    }
}

impl<T: Reconcilable> Equivalence<T> for ModelEquivalence {
    fn equivalent(&self, desired: &T, observed: Option<&T>) -> bool {
        observed.is_some_and(|observed| desired.is_equivalent(observed, self.order))
    }
}

/// Accepts any observation, used when waiting for an object to exist
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyObserved;

impl<T> Equivalence<T> for AnyObserved {
    fn equivalent(&self, _desired: &T, observed: Option<&T>) -> bool {
        observed.is_some()
    }
}

/// Adapts a closure into an [`Equivalence`]
pub struct FnEquivalence<F>(pub F);

impl<T, F> Equivalence<T> for FnEquivalence<F>
where
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    fn equivalent(&self, desired: &T, observed: Option<&T>) -> bool {
        observed.is_some_and(|observed| (self.0)(desired, observed))
    }
}

/// Optional desired fields that are unset are not compared
pub fn optional_matches<V: PartialEq>(desired: &Option<V>, observed: &Option<V>) -> bool {
    desired.is_none() || desired == observed
}
