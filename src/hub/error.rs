//! Hub error types
//!
//! Every variant carries the identity the failed call was made with.

use super::SubscriberId;

/// Result alias for hub operations
pub type Result<T> = std::result::Result<T, HubError>;

/// Error type for hub operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    /// Identity is already registered
    DuplicateSubscriber(SubscriberId),
    /// No subscriber registered under this identity
    UnknownSubscriber(SubscriberId),
    /// Subscriber channel is full or closed; the message was dropped
    SubscriberNotListening(SubscriberId),
}

impl HubError {
    /// Identity the failing call targeted
    pub fn subscriber(&self) -> SubscriberId {
        match *self {
            HubError::DuplicateSubscriber(id)
            | HubError::UnknownSubscriber(id)
            | HubError::SubscriberNotListening(id) => id,
        }
    }

    /// Short stable label for logs and metrics
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::DuplicateSubscriber(_) => "duplicate_subscriber",
            HubError::UnknownSubscriber(_) => "unknown_subscriber",
            HubError::SubscriberNotListening(_) => "subscriber_not_listening",
        }
    }
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubError::DuplicateSubscriber(id) => write!(f, "Subscriber already exists: {}", id),
            HubError::UnknownSubscriber(id) => write!(f, "Subscriber does not exist: {}", id),
            HubError::SubscriberNotListening(id) => {
                write!(f, "Subscriber not listening: {}", id)
            }
        }
    }
}

impl std::error::Error for HubError {}
