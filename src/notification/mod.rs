//! Notification pipeline
//!
//! request → normalize → drive → format:
//! - `request`: typed tool arguments, validated on deserialize
//! - `options`: normalized option set for the native notifier
//! - `native`: the notifier backend (`terminal-notifier`)
//! - `events`: per-notification listener registry
//! - `driver`: dispatch and first-event-wins arbitration
//! - `formatter`: outcome text returned to the caller

pub mod driver;
pub mod events;
pub mod formatter;
pub mod native;
pub mod options;
pub mod outcome;
pub mod request;

pub use driver::{NotificationDriver, OutcomeSlot, NOT_SENT_SENTINEL};
pub use events::{EventHub, EventKind, ListenerGuard, NotificationId, NotifierEvent};
pub use formatter::{failure_advisory, format_outcome};
pub use native::{DispatchCallback, NativeNotifier, TerminalNotifier};
pub use options::{normalize, normalize_simple, NormalizedOptions, OptionsBuilder, SoundSetting};
pub use outcome::NotificationOutcome;
pub use request::{NotificationRequest, SimpleNotificationRequest, Sound};
