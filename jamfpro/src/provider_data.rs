//! Provider data structure passed to resources and data sources

use crate::api::Client;
use crate::error::Result;
use std::time::Duration;
use tfplug::reconcile::{CollectionOrder, PollPolicy};

#[derive(Clone)]
pub struct JamfProProviderData {
    pub client: Client,
    /// Used after create and update, bounded by `propagation_timeout`
    pub write_policy: PollPolicy,
    /// Short poll that absorbs 404s while a new object propagates
    pub read_policy: PollPolicy,
    pub collection_order: CollectionOrder,
}

impl JamfProProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            write_policy: PollPolicy::default(),
            read_policy: default_read_policy(),
            collection_order: CollectionOrder::default(),
        }
    }

    pub fn with_write_policy(mut self, policy: PollPolicy) -> Self {
        self.write_policy = policy;
        self
    }

    pub fn with_read_policy(mut self, policy: PollPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    pub fn with_collection_order(mut self, order: CollectionOrder) -> Self {
        self.collection_order = order;
        self
    }
}

pub fn default_read_policy() -> PollPolicy {
    PollPolicy::new()
        .with_initial_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(4))
        .with_max_attempts(4)
        .with_max_elapsed(Duration::from_secs(15))
}

/// Poll used after writes, bounded only by `propagation_timeout`
pub fn write_policy(propagation_timeout: Duration) -> Result<PollPolicy> {
    let policy = PollPolicy::new()
        .with_max_attempts(0)
        .with_max_elapsed(propagation_timeout);
    policy.validate()?;
    Ok(policy)
}
