//! Subscriber registry and delivery
//!
//! The hub maps caller-chosen identities to the sending half of a bounded
//! channel owned by the subscriber. Every delivery is a single `try_send`.
//!
//! # Architecture
//!
//! ```text
//!                             Arc<Hub>
//!                  ┌──────────────────────────────┐
//!                  │ subscribers: RwLock<HashMap< │
//!                  │   SubscriberId, Outbox       │
//!                  │ >>                           │
//!                  └──────────────┬───────────────┘
//!                                 │ try_send (never blocks)
//!         ┌───────────────────────┼───────────────────────┐
//!         ▼                       ▼                       ▼
//!   [Subscriber 1]          [Subscriber 2]          [Subscriber 3]
//!   inbox.recv()            inbox.recv()            inbox.recv()
//! ```
//!
//! Registry mutations take the write lock; `send`, `flood` and `count` only
//! take the read lock, so any number of senders run in parallel.
//!
//! # Zero-Copy Design
//!
//! Messages are `bytes::Bytes`. Flooding N subscribers clones the handle N
//! times; the payload allocation itself is shared.

pub mod config;
pub mod error;
pub mod store;

use bytes::Bytes;
use tokio::sync::mpsc;

pub use config::HubConfig;
pub use error::{HubError, Result};
pub use store::Hub;

/// Caller-assigned subscriber identity
pub type SubscriberId = i64;

/// Sending half of a subscriber channel, held by the hub
pub type Outbox = mpsc::Sender<Bytes>;

/// Receiving half of a subscriber channel, drained by the subscriber
pub type Inbox = mpsc::Receiver<Bytes>;

/// Create a bounded subscriber channel
///
/// A capacity of zero is raised to one.
pub fn channel(capacity: usize) -> (Outbox, Inbox) {
    mpsc::channel(capacity.max(1))
}
