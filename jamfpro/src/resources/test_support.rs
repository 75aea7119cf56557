//! Helpers for resource tests

use std::time::Duration;
use tfplug::reconcile::PollPolicy;

use super::entity::{EntityResource, JamfEntity};
use crate::api::Client;
use crate::JamfProProviderData;

/// Millisecond backoff so that polls finish quickly against mockito
pub fn fast_policy() -> PollPolicy {
    PollPolicy::new()
        .with_initial_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_max_attempts(5)
        .with_max_elapsed(Duration::from_millis(500))
}

pub fn provider_data(client: Client) -> JamfProProviderData {
    JamfProProviderData::new(client)
        .with_write_policy(fast_policy())
        .with_read_policy(fast_policy())
}

pub fn configured<E: JamfEntity>(client: Client) -> EntityResource<E> {
    EntityResource::with_provider_data(provider_data(client))
}
