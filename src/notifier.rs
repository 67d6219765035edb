//! Event notification for external observers
//!
//! Four event kinds are published: `connect`, `update`, `close` and `error`.
//! Delivery is synchronous, on the task that produced the event, in the
//! order observers subscribed. Late subscribers get no replay.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::StudioError;

/// Something observers may want to react to
#[derive(Debug, Clone)]
pub enum StudioEvent {
    /// The TCP connection to the switcher is up
    Connect,
    /// A recognized packet changed the mirror; carries its type tag
    Update(String),
    /// The connection went away; `had_error` is set when a socket error caused it
    Close { had_error: bool },
    /// Socket-level failure (connect, read or write), always
    /// [`StudioError::Transport`]
    Error(Arc<StudioError>),
}

impl StudioEvent {
    /// Event kind name ("connect", "update", "close", "error")
    pub fn kind(&self) -> &'static str {
        match self {
            StudioEvent::Connect => "connect",
            StudioEvent::Update(_) => "update",
            StudioEvent::Close { .. } => "close",
            StudioEvent::Error(_) => "error",
        }
    }
}

/// Callback type for event observers
pub type EventCallback = Arc<dyn Fn(&StudioEvent) + Send + Sync>;

/// Ordered list of observers
#[derive(Default)]
pub struct Notifier {
    listeners: RwLock<Vec<EventCallback>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked for every event
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&StudioEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(callback));
    }

    /// Register a channel that receives a copy of every event
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<StudioEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(move |event| {
            // receiver dropped: nobody is listening any more
            let _ = tx.send(event.clone());
        });
        rx
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event` to every observer, in subscription order
    pub(crate) fn emit(&self, event: &StudioEvent) {
        // snapshot so callbacks may subscribe without deadlocking
        let listeners = self.listeners.read().clone();
        for listener in listeners.iter() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_delivery_in_subscription_order() {
        let notifier = Notifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let seen = Arc::clone(&seen);
            notifier.subscribe(move |event| seen.lock().push((id, event.kind())));
        }

        notifier.emit(&StudioEvent::Connect);
        notifier.emit(&StudioEvent::Update("PmIS".to_string()));

        assert_eq!(
            *seen.lock(),
            vec![
                (0, "connect"),
                (1, "connect"),
                (2, "connect"),
                (0, "update"),
                (1, "update"),
                (2, "update"),
            ]
        );
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let notifier = Notifier::new();
        notifier.emit(&StudioEvent::Connect);

        let mut rx = notifier.subscribe_channel();
        assert!(rx.try_recv().is_err());

        notifier.emit(&StudioEvent::Close { had_error: false });
        assert!(matches!(
            rx.try_recv(),
            Ok(StudioEvent::Close { had_error: false })
        ));
    }

    #[test]
    fn test_callback_may_subscribe_during_emit() {
        let notifier = Arc::new(Notifier::new());
        let inner = Arc::clone(&notifier);
        notifier.subscribe(move |_| inner.subscribe(|_| {}));

        notifier.emit(&StudioEvent::Connect);
        assert_eq!(notifier.listener_count(), 2);
    }

    #[test]
    fn test_dropped_channel_receiver_is_harmless() {
        let notifier = Notifier::new();
        drop(notifier.subscribe_channel());
        notifier.emit(&StudioEvent::Connect);
    }
}
