//! Notification driver
//!
//! Dispatches one notification and settles exactly one outcome. With
//! `wait`, click/timeout/reply/action listeners race to fill a one-shot
//! slot; the first write wins and later writes are dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::events::{EventHub, EventKind, ListenerGuard, NotificationId, NotifierEvent};
use super::native::NativeNotifier;
use super::options::NormalizedOptions;
use super::outcome::NotificationOutcome;

/// Response the notifier gives when macOS silently dropped the notification
pub const NOT_SENT_SENTINEL: &str = "Notification not sent";

const SUPPRESSED_REASON: &str = "Notification was not delivered. Notifications are probably disabled for this application, or Focus / Do Not Disturb mode is blocking them.";

const NOTIFICATION_CENTER_REASON: &str = "macOS Notification Center refused the notification. Allow notifications for this application in System Settings and make sure Focus mode is not blocking them.";

/// Single-assignment outcome slot
pub struct OutcomeSlot {
    sender: Mutex<Option<oneshot::Sender<NotificationOutcome>>>,
}

impl OutcomeSlot {
    pub fn new() -> (Arc<Self>, oneshot::Receiver<NotificationOutcome>) {
        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Self {
            sender: Mutex::new(Some(tx)),
        });
        (slot, rx)
    }

    /// Fill the slot. Returns false (and drops `outcome`) if it was already filled.
    pub fn settle(&self, outcome: NotificationOutcome) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match sender {
            Some(tx) => {
                // The receiver may already be gone if the caller stopped waiting.
                let _ = tx.send(outcome);
                true
            }
            None => {
                debug!(outcome = outcome.kind(), "Outcome already settled, ignoring");
                false
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

/// Drives notifications through a [`NativeNotifier`]
pub struct NotificationDriver {
    notifier: Arc<dyn NativeNotifier>,
    events: Arc<EventHub>,
}

impl NotificationDriver {
    pub fn new(notifier: Arc<dyn NativeNotifier>) -> Self {
        Self::with_events(notifier, EventHub::new())
    }

    pub fn with_events(notifier: Arc<dyn NativeNotifier>, events: Arc<EventHub>) -> Self {
        Self { notifier, events }
    }

    pub fn events(&self) -> &Arc<EventHub> {
        &self.events
    }

    /// Send one notification and resolve to its outcome.
    ///
    /// With `wait` this suspends until the notifier reports an interaction;
    /// there is no timeout at this layer beyond what the notifier enforces.
    pub async fn deliver(&self, options: &NormalizedOptions) -> NotificationOutcome {
        let id = self.events.next_id();
        let (slot, receiver) = OutcomeSlot::new();

        // Held until this call returns; dropping them detaches every listener.
        let _listeners = if options.wait() {
            self.subscribe(id, options, &slot)
        } else {
            Vec::new()
        };

        let wait = options.wait();
        let callback_slot = Arc::clone(&slot);
        let callback = Box::new(move |result: anyhow::Result<Option<String>>| match result {
            Err(e) => {
                callback_slot.settle(failure_from_error(&e));
            }
            Ok(Some(response)) if response == NOT_SENT_SENTINEL => {
                callback_slot.settle(NotificationOutcome::Failed(SUPPRESSED_REASON.to_string()));
            }
            Ok(response) if !wait => {
                callback_slot.settle(NotificationOutcome::Sent(response));
            }
            Ok(_) => {}
        });

        info!(
            id,
            notifier = self.notifier.name(),
            title = options.title(),
            wait,
            "Dispatching notification"
        );
        debug!(id, ?options, "Normalized options");

        if let Err(e) = self.notifier.notify(id, options, Arc::clone(&self.events), callback) {
            warn!(id, error = %e, "Notification dispatch failed");
            return failure_from_error(&e);
        }

        let outcome = match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => NotificationOutcome::Failed(
                "notifier finished without reporting a result".to_string(),
            ),
        };
        info!(id, outcome = outcome.kind(), "Notification settled");
        outcome
    }

    fn subscribe(
        &self,
        id: NotificationId,
        options: &NormalizedOptions,
        slot: &Arc<OutcomeSlot>,
    ) -> Vec<ListenerGuard> {
        let mut kinds = vec![EventKind::Click, EventKind::Timeout];
        if options.reply() {
            kinds.push(EventKind::Replied);
        }
        // Reply alerts carry a Close button, reported as an activation.
        if !options.actions().is_empty() || options.close_label().is_some() || options.reply() {
            kinds.push(EventKind::Activate);
        }

        kinds
            .into_iter()
            .map(|kind| {
                let slot = Arc::clone(slot);
                self.events.on(id, kind, move |event| {
                    slot.settle(outcome_for_event(event));
                })
            })
            .collect()
    }
}

/// Outcome for an interaction event
pub fn outcome_for_event(event: &NotifierEvent) -> NotificationOutcome {
    match event {
        NotifierEvent::Click => NotificationOutcome::Clicked,
        NotifierEvent::Timeout => NotificationOutcome::TimedOut,
        NotifierEvent::Replied(text) => NotificationOutcome::Replied(text.clone().unwrap_or_default()),
        NotifierEvent::Activate(label) => {
            NotificationOutcome::ActionTriggered(label.clone().unwrap_or_default())
        }
    }
}

/// Map a dispatch error to a Failed outcome, rewording known Notification Center errors.
pub fn failure_from_error(error: &anyhow::Error) -> NotificationOutcome {
    let message = format!("{:#}", error);
    if message.contains("Notification Center") {
        NotificationOutcome::Failed(NOTIFICATION_CENTER_REASON.to_string())
    } else {
        NotificationOutcome::Failed(message)
    }
}
