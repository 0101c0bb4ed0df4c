//! Side channel for transient notifications raised while a request runs.
//!
//! The client emits events via [`EventBus::emit`]; a front end subscribes via
//! [`EventBus::subscribe`] and shows them however it likes. Built on
//! [`tokio::sync::broadcast`] so multiple listeners can react independently.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::operation::Operation;

/// Events that flow from the client to its listeners.
#[derive(Debug, Clone)]
pub enum Event {
    /// An attempt failed and the request will be sent again after `delay`.
    Retrying {
        operation: Operation,
        attempt: u32,
        remaining: u32,
        delay: Duration,
        reason: String,
    },
}

impl Event {
    /// One-line text suitable for a transient warning.
    pub fn notice(&self) -> String {
        match self {
            Event::Retrying { remaining, .. } => {
                format!("Retrying request... ({remaining} retries left)")
            }
        }
    }
}

/// A broadcast channel that any component can emit to or subscribe from.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events. Past events are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
