//! Caller-facing tool arguments
//!
//! Arguments are deserialized straight from the `tools/call` argument bag.
//! A missing title, an unknown sound name or too many actions fails here,
//! before the normalizer sees it; other malformed optional fields are dropped.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Largest number of action buttons macOS renders on one notification.
pub const MAX_ACTIONS: usize = 2;

/// Sound selector accepted by `send_notification`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    Basso,
    Blow,
    Bottle,
    Frog,
    Funk,
    Glass,
    Hero,
    Morse,
    Ping,
    Pop,
    Purr,
    Sosumi,
    Submarine,
    Tink,
    /// System default sound
    #[serde(rename = "default")]
    SystemDefault,
    /// Explicit silence
    #[serde(rename = "none")]
    Silent,
}

impl Sound {
    /// The fourteen named platform sounds, in schema order.
    pub const NAMED: [Sound; 14] = [
        Sound::Basso,
        Sound::Blow,
        Sound::Bottle,
        Sound::Frog,
        Sound::Funk,
        Sound::Glass,
        Sound::Hero,
        Sound::Morse,
        Sound::Ping,
        Sound::Pop,
        Sound::Purr,
        Sound::Sosumi,
        Sound::Submarine,
        Sound::Tink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Basso => "Basso",
            Sound::Blow => "Blow",
            Sound::Bottle => "Bottle",
            Sound::Frog => "Frog",
            Sound::Funk => "Funk",
            Sound::Glass => "Glass",
            Sound::Hero => "Hero",
            Sound::Morse => "Morse",
            Sound::Ping => "Ping",
            Sound::Pop => "Pop",
            Sound::Purr => "Purr",
            Sound::Sosumi => "Sosumi",
            Sound::Submarine => "Submarine",
            Sound::Tink => "Tink",
            Sound::SystemDefault => "default",
            Sound::Silent => "none",
        }
    }

    /// Parse a caller-supplied sound name (case-sensitive, as in the schema).
    pub fn parse(name: &str) -> Option<Sound> {
        match name {
            "default" => Some(Sound::SystemDefault),
            "none" => Some(Sound::Silent),
            _ => Sound::NAMED.iter().copied().find(|s| s.as_str() == name),
        }
    }
}

/// Arguments of `send_notification`
///
/// Optional fields of the wrong JSON type are dropped instead of failing the call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subtitle: Option<String>,
    pub sound: Option<Sound>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub wait: Option<bool>,
    /// Seconds; the schema types this as a JSON number
    #[serde(default, deserialize_with = "lenient")]
    pub timeout: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub close_label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub actions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub reply: Option<bool>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Deserialize and validate a `tools/call` argument bag.
    pub fn from_arguments(arguments: &Value) -> Result<Self> {
        let request = Self::deserialize(arguments).context("invalid send_notification arguments")?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<()> {
        ensure_title(&self.title)?;
        if let Some(actions) = &self.actions {
            anyhow::ensure!(
                actions.len() <= MAX_ACTIONS,
                "at most {} actions are allowed, got {}",
                MAX_ACTIONS,
                actions.len()
            );
        }
        Ok(())
    }
}

/// Arguments of `send_simple_notification`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimpleNotificationRequest {
    pub title: String,
    /// Listed as required in the schema, but an absent message is sent as empty
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    /// `false` silences the notification; absent means the default sound
    #[serde(default, deserialize_with = "lenient")]
    pub sound: Option<bool>,
}

impl SimpleNotificationRequest {
    pub fn from_arguments(arguments: &Value) -> Result<Self> {
        let request =
            Self::deserialize(arguments).context("invalid send_simple_notification arguments")?;
        ensure_title(&request.title)?;
        Ok(request)
    }
}

/// `None` when the value is missing, null or of the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn ensure_title(title: &str) -> Result<()> {
    anyhow::ensure!(!title.is_empty(), "title must not be empty");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sound_names_round_trip_through_parse() {
        for sound in Sound::NAMED {
            assert_eq!(Sound::parse(sound.as_str()), Some(sound));
        }
        assert_eq!(Sound::parse("default"), Some(Sound::SystemDefault));
        assert_eq!(Sound::parse("none"), Some(Sound::Silent));
        assert_eq!(Sound::parse("ping"), None);
    }

    #[test]
    fn test_full_request_deserializes_camel_case() {
        let request = NotificationRequest::from_arguments(&json!({
            "title": "Build",
            "message": "Done",
            "sound": "Glass",
            "contentImage": "./shot.png",
            "closeLabel": "Dismiss",
            "actions": ["Open", "Later"],
            "reply": true,
            "timeout": 30
        }))
        .unwrap();

        assert_eq!(request.title, "Build");
        assert_eq!(request.sound, Some(Sound::Glass));
        assert_eq!(request.content_image.as_deref(), Some("./shot.png"));
        assert_eq!(request.close_label.as_deref(), Some("Dismiss"));
        assert_eq!(request.actions.as_ref().map(Vec::len), Some(2));
        assert_eq!(request.timeout, Some(30.0));
    }

    #[test]
    fn test_full_request_message_is_optional() {
        let request = NotificationRequest::from_arguments(&json!({"title": "Ping"})).unwrap();
        assert_eq!(request.message, None);
        assert_eq!(request.sound, None);
    }

    #[test]
    fn test_unknown_sound_is_rejected() {
        let err = NotificationRequest::from_arguments(&json!({"title": "x", "sound": "Beep"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_or_empty_title_is_rejected() {
        assert!(NotificationRequest::from_arguments(&json!({"message": "hi"})).is_err());
        assert!(NotificationRequest::from_arguments(&json!({"title": ""})).is_err());
    }

    #[test]
    fn test_more_than_two_actions_is_rejected() {
        let err = NotificationRequest::from_arguments(&json!({
            "title": "x",
            "actions": ["a", "b", "c"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("at most 2 actions"));
    }

    #[test]
    fn test_simple_request_message_defaults_to_empty() {
        let request = SimpleNotificationRequest::from_arguments(&json!({"title": "Ping"})).unwrap();
        assert_eq!(request.message, None);
        assert_eq!(request.sound, None);

        assert!(SimpleNotificationRequest::from_arguments(&json!({"message": "hi"})).is_err());
    }

    #[test]
    fn test_mistyped_optional_fields_are_dropped() {
        let request = NotificationRequest::from_arguments(&json!({
            "title": "x",
            "subtitle": 5,
            "timeout": "30",
            "reply": "true",
            "actions": "Open",
            "wait": null
        }))
        .unwrap();

        assert_eq!(request.subtitle, None);
        assert_eq!(request.timeout, None);
        assert_eq!(request.reply, None);
        assert_eq!(request.actions, None);
        assert_eq!(request.wait, None);

        let request =
            SimpleNotificationRequest::from_arguments(&json!({"title": "x", "sound": "no"})).unwrap();
        assert_eq!(request.sound, None);
    }
}
