//! Subscriber registry for store change notifications.
//!
//! # Responsibility
//! - Hand out unsubscribe tokens and keep subscribers in registration order.
//! - Fan out notifications synchronously on the calling thread.
//!
//! # Invariants
//! - `SubscriberId`s are never reused within one registry.
//! - Fan-out order equals subscription order.
//! - Notification is reentrant-unsafe: a subscriber must re-render, not
//!   mutate the store that notified it.

/// Token returned by `subscribe`, consumed by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

type Listener = Box<dyn Fn()>;

/// Ordered list of zero-argument change listeners.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: u64,
    listeners: Vec<(SubscriberId, Listener)>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its unsubscribe token.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() < before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener synchronously, in subscription order.
    pub fn notify_all(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }
}
