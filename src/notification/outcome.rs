//! Terminal result of one notification lifecycle

/// Exactly one of these is produced per notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Dispatched without waiting; carries the native response, if any
    Sent(Option<String>),
    Clicked,
    TimedOut,
    /// Reply text typed by the user
    Replied(String),
    /// Label of the action button that was pressed
    ActionTriggered(String),
    /// Delivery failed; carries a human-readable reason
    Failed(String),
}

impl NotificationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, NotificationOutcome::Failed(_))
    }

    /// Short tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationOutcome::Sent(_) => "sent",
            NotificationOutcome::Clicked => "clicked",
            NotificationOutcome::TimedOut => "timeout",
            NotificationOutcome::Replied(_) => "replied",
            NotificationOutcome::ActionTriggered(_) => "action",
            NotificationOutcome::Failed(_) => "failed",
        }
    }
}
