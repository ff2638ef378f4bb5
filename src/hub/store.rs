//! Hub implementation
//!
//! The registry of subscriber channels and the unicast/broadcast delivery
//! paths.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use tokio::sync::mpsc::error::TrySendError;

use super::config::HubConfig;
use super::error::{HubError, Result};
use super::{Inbox, Outbox, SubscriberId};
use crate::stats::{HubMetrics, HubStats};

/// Best-effort message hub
///
/// Thread-safe via `RwLock`. Delivery only needs the read lock, so concurrent
/// `send`/`flood` callers never serialize on each other. No method awaits or
/// blocks on a subscriber: every delivery is a single `try_send`.
///
/// Share it between tasks with `Arc<Hub>`.
pub struct Hub {
    /// Map of subscriber identity to its channel
    subscribers: RwLock<HashMap<SubscriberId, Outbox>>,

    /// Lifetime delivery counters
    metrics: HubMetrics,

    /// Configuration
    config: HubConfig,
}

impl Hub {
    /// Create a new hub with default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a new hub with custom configuration
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            metrics: HubMetrics::new(),
            config,
        }
    }

    /// Get the hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Create a subscriber channel sized by `HubConfig::buffer_size`
    pub fn channel(&self) -> (Outbox, Inbox) {
        super::channel(self.config.buffer_size)
    }

    // The map is only ever mutated by single insert/remove/replace calls, so a
    // panic in another holder cannot leave it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SubscriberId, Outbox>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SubscriberId, Outbox>> {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscriber channel under `id`
    ///
    /// Messages are dropped whenever the channel is full, so buffer it for
    /// the burst size you expect. Returns an error, leaving the existing
    /// registration in place, if `id` is already taken.
    pub fn subscribe(&self, id: SubscriberId, outbox: Outbox) -> Result<()> {
        let mut subscribers = self.write();

        match subscribers.entry(id) {
            Entry::Occupied(_) => {
                tracing::debug!(subscriber = id, "Subscribe rejected: duplicate id");
                Err(HubError::DuplicateSubscriber(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(outbox);

                tracing::debug!(
                    subscriber = id,
                    subscribers = subscribers.len(),
                    "Subscriber added"
                );

                Ok(())
            }
        }
    }

    /// Remove the subscription for `id` if it exists
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.write();

        if subscribers.remove(&id).is_some() {
            tracing::debug!(
                subscriber = id,
                subscribers = subscribers.len(),
                "Subscriber removed"
            );
        }
    }

    /// Unicast a message to one subscriber
    ///
    /// Fails if `to` is not registered, or if its channel cannot take the
    /// message right now. A rejected message is gone; nothing is retried.
    pub fn send(&self, to: SubscriberId, msg: impl Into<Bytes>) -> Result<()> {
        let msg = msg.into();
        let subscribers = self.read();

        let Some(outbox) = subscribers.get(&to) else {
            self.metrics.record_unknown_target();
            tracing::trace!(subscriber = to, "Send to unknown subscriber");
            return Err(HubError::UnknownSubscriber(to));
        };

        match outbox.try_send(msg) {
            Ok(()) => {
                self.metrics.record_delivered(1);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_dropped(1);
                tracing::trace!(
                    subscriber = to,
                    reason = rejection(&e),
                    "Send dropped: subscriber not listening"
                );
                Err(HubError::SubscriberNotListening(to))
            }
        }
    }

    /// Broadcast a message to every subscriber except `from`
    ///
    /// `from` is normally the sender's own id so it does not receive its own
    /// message; an id nobody holds addresses everyone. Returns how many
    /// recipients could not take the message.
    pub fn flood(&self, from: SubscriberId, msg: impl Into<Bytes>) -> usize {
        let msg = msg.into();
        let mut delivered = 0u64;
        let mut skipped = 0usize;

        {
            let subscribers = self.read();

            for (&id, outbox) in subscribers.iter() {
                if id == from {
                    continue;
                }

                match outbox.try_send(msg.clone()) {
                    Ok(()) => delivered += 1,
                    Err(_) => skipped += 1,
                }
            }
        }

        self.metrics.record_flood();
        self.metrics.record_delivered(delivered);
        self.metrics.record_dropped(skipped as u64);

        if skipped > 0 {
            tracing::trace!(
                from = from,
                delivered = delivered,
                skipped = skipped,
                "Flood skipped subscribers"
            );
        }

        skipped
    }

    /// Get the number of registered subscribers
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Check whether `id` is currently registered
    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.read().contains_key(&id)
    }

    /// Get lifetime delivery statistics
    pub fn stats(&self) -> HubStats {
        self.metrics.snapshot()
    }

    /// Remove every subscription, leaving the hub empty and reusable
    ///
    /// Channels are not signalled. The hub only drops its sender handles, so a
    /// receiver whose other senders are all gone will see the channel close.
    pub fn reset(&self) {
        let previous = {
            let mut subscribers = self.write();
            std::mem::replace(
                &mut *subscribers,
                HashMap::with_capacity(self.config.initial_capacity),
            )
        };

        tracing::info!(removed = previous.len(), "Hub reset");
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("subscribers", &self.count())
            .field("config", &self.config)
            .finish()
    }
}

fn rejection(err: &TrySendError<Bytes>) -> &'static str {
    match err {
        TrySendError::Full(_) => "full",
        TrySendError::Closed(_) => "closed",
    }
}
