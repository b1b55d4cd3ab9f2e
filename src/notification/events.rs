//! Process-wide notifier event hub
//!
//! The native notifier reports user interaction here. Listeners are keyed by
//! notification id and event kind, and are removed when their
//! [`ListenerGuard`] drops, so nothing registered for one call outlives it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

/// Identifies one dispatched notification
pub type NotificationId = u64;

/// Interaction reported by the native notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Click,
    Timeout,
    /// Reply text, when the notifier captured one
    Replied(Option<String>),
    /// Activated action (or close) label
    Activate(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Timeout,
    Replied,
    Activate,
}

impl NotifierEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NotifierEvent::Click => EventKind::Click,
            NotifierEvent::Timeout => EventKind::Timeout,
            NotifierEvent::Replied(_) => EventKind::Replied,
            NotifierEvent::Activate(_) => EventKind::Activate,
        }
    }
}

type Callback = Arc<dyn Fn(&NotifierEvent) + Send + Sync>;

struct Listener {
    listener_id: u64,
    notification: NotificationId,
    kind: EventKind,
    callback: Callback,
}

/// Shared event emitter
pub struct EventHub {
    next_notification: AtomicU64,
    next_listener: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl EventHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_notification: AtomicU64::new(1),
            next_listener: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Allocate a fresh notification id
    pub fn next_id(&self) -> NotificationId {
        self.next_notification.fetch_add(1, Ordering::Relaxed)
    }

    /// Register `callback` for `kind` events of one notification.
    /// The listener stays attached until the returned guard is dropped.
    pub fn on<F>(
        self: &Arc<Self>,
        notification: NotificationId,
        kind: EventKind,
        callback: F,
    ) -> ListenerGuard
    where
        F: Fn(&NotifierEvent) + Send + Sync + 'static,
    {
        let listener_id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Listener {
            listener_id,
            notification,
            kind,
            callback: Arc::new(callback),
        });
        ListenerGuard {
            hub: Arc::clone(self),
            listener_id,
        }
    }

    /// Deliver `event` to every listener registered for it. Returns how many listeners ran.
    pub fn emit(&self, notification: NotificationId, event: NotifierEvent) -> usize {
        // Callbacks run outside the lock so they may touch the hub themselves.
        let callbacks: Vec<Callback> = self
            .lock()
            .iter()
            .filter(|l| l.notification == notification && l.kind == event.kind())
            .map(|l| Arc::clone(&l.callback))
            .collect();

        debug!(notification, ?event, listeners = callbacks.len(), "Emitting notifier event");
        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len()
    }

    /// Number of live listeners across all notifications
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, listener_id: u64) {
        self.lock().retain(|l| l.listener_id != listener_id);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Detaches its listener on drop
#[must_use = "the listener is removed as soon as the guard is dropped"]
pub struct ListenerGuard {
    hub: Arc<EventHub>,
    listener_id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.hub.remove(self.listener_id);
    }
}
