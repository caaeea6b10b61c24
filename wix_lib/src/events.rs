//! Ordering and de-duplication of domain events.
//!
//! Events may be delivered more than once and out of order. Each entity's
//! events carry a strictly increasing `entityEventSequence`; an event is
//! processed only if its sequence is greater than the last one processed for
//! the same entity.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use wix_api::types::{DomainEvent, EventSequence, MessageEnvelope};

use crate::error::WixError;

/// Last processed sequence per `(entity_fqdn, entity_id)`.
pub trait SequenceStore {
    fn last_seen(&self, entity_fqdn: &str, entity_id: &str)
        -> Result<Option<EventSequence>, WixError>;

    fn record(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<(), WixError>;

    /// Records `sequence` if it is greater than the stored one. Returns
    /// whether it was recorded.
    fn advance(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<bool, WixError> {
        match self.last_seen(entity_fqdn, entity_id)? {
            Some(last) if *sequence <= last => Ok(false),
            _ => {
                self.record(entity_fqdn, entity_id, sequence)?;
                Ok(true)
            }
        }
    }
}

/// Thread-safe in-memory store backed by `DashMap`.
#[derive(Default)]
pub struct MemorySequenceStore {
    store: DashMap<(String, String), EventSequence>,
}

impl MemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl SequenceStore for MemorySequenceStore {
    fn last_seen(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
    ) -> Result<Option<EventSequence>, WixError> {
        Ok(self
            .store
            .get(&(entity_fqdn.to_string(), entity_id.to_string()))
            .map(|seq| seq.value().clone()))
    }

    fn record(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<(), WixError> {
        self.store.insert(
            (entity_fqdn.to_string(), entity_id.to_string()),
            sequence.clone(),
        );
        Ok(())
    }

    // Check and update under the shard lock so concurrent deliveries of the
    // same event cannot both pass.
    fn advance(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<bool, WixError> {
        match self
            .store
            .entry((entity_fqdn.to_string(), entity_id.to_string()))
        {
            Entry::Occupied(mut entry) => {
                if sequence > entry.get() {
                    entry.insert(sequence.clone());
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(sequence.clone());
                Ok(true)
            }
        }
    }
}

/// Filters a stream of domain events down to those not yet processed.
pub struct EventDeduplicator<S> {
    store: S,
}

impl<S: SequenceStore> EventDeduplicator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether `event` should be processed. Accepting an event records its
    /// sequence, so a redelivery of the same event is rejected.
    ///
    /// Events without a sequence cannot be ordered and are always accepted.
    pub fn accept(&self, event: &DomainEvent) -> Result<bool, WixError> {
        let Some(sequence) = &event.entity_event_sequence else {
            return Ok(true);
        };
        let accepted = self
            .store
            .advance(&event.entity_fqdn, &event.entity_id, sequence)?;
        if !accepted {
            tracing::debug!(
                "dropping event {} for {}/{}: sequence {} already processed",
                event.id,
                event.entity_fqdn,
                event.entity_id,
                sequence
            );
        }
        Ok(accepted)
    }

    /// Parses a webhook delivery and returns its event if it should be processed.
    pub fn accept_envelope(
        &self,
        envelope: &MessageEnvelope,
    ) -> Result<Option<DomainEvent>, WixError> {
        let event = envelope.domain_event()?;
        Ok(self.accept(&event)?.then_some(event))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
