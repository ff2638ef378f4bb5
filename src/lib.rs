//! Best-effort in-process message hub
//!
//! `bytehub` keeps a registry of subscriber channels addressed by integer
//! identity and offers two delivery primitives:
//!
//! - [`Hub::send`] — unicast to one subscriber
//! - [`Hub::flood`] — broadcast to every subscriber except the sender
//!
//! Delivery never waits on a slow consumer. A subscriber whose channel is full
//! (or closed) simply misses the message; unicast reports it as an error and
//! broadcast counts it as a skip. Size receive buffers accordingly.
//!
//! ```
//! use bytehub::Hub;
//!
//! let hub = Hub::new();
//!
//! let (tx1, mut rx1) = bytehub::channel(8);
//! let (tx2, mut rx2) = bytehub::channel(8);
//! hub.subscribe(1, tx1).unwrap();
//! hub.subscribe(2, tx2).unwrap();
//!
//! // Subscriber 1 broadcasts; it does not hear itself
//! assert_eq!(hub.flood(1, "hello"), 0);
//! assert!(rx1.try_recv().is_err());
//! assert_eq!(&rx2.try_recv().unwrap()[..], b"hello");
//! ```

pub mod hub;
pub mod stats;

pub use hub::{channel, Hub, HubConfig, HubError, Inbox, Outbox, SubscriberId};
pub use stats::HubStats;
