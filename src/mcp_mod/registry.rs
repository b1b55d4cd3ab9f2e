//! Tool registry
//!
//! Static descriptors for the tools this server exposes.

use serde_json::json;

use super::types::McpTool;
use crate::notification::request::{Sound, MAX_ACTIONS};
use crate::notification::options::DEFAULT_TIMEOUT_SECS;

pub const SEND_NOTIFICATION: &str = "send_notification";
pub const SEND_SIMPLE_NOTIFICATION: &str = "send_simple_notification";

/// Named macOS sounds plus "default"
pub const MACOS_SOUNDS: [&str; 15] = [
    "Basso",
    "Blow",
    "Bottle",
    "Frog",
    "Funk",
    "Glass",
    "Hero",
    "Morse",
    "Ping",
    "Pop",
    "Purr",
    "Sosumi",
    "Submarine",
    "Tink",
    "default",
];

/// All tool descriptors, in a fixed order
pub fn tool_descriptors() -> Vec<McpTool> {
    vec![send_notification_tool(), send_simple_notification_tool()]
}

fn send_notification_tool() -> McpTool {
    let mut sound_choices: Vec<&str> = MACOS_SOUNDS.to_vec();
    sound_choices.push(Sound::Silent.as_str());

    McpTool {
        name: SEND_NOTIFICATION.to_string(),
        description: "Send a macOS notification with customizable options".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The notification title",
                    "minLength": 1
                },
                "message": {
                    "type": "string",
                    "description": "The notification message body"
                },
                "subtitle": {
                    "type": "string",
                    "description": "Optional subtitle for the notification"
                },
                "sound": {
                    "type": "string",
                    "description": format!(
                        "Notification sound. Can be: {}, or 'none' for silent",
                        MACOS_SOUNDS.join(", ")
                    ),
                    "enum": sound_choices
                },
                "icon": {
                    "type": "string",
                    "description": "Path to an icon image file (relative paths resolve against the server's working directory)"
                },
                "contentImage": {
                    "type": "string",
                    "description": "Path to an image to display in the notification body (macOS 10.9+)"
                },
                "wait": {
                    "type": "boolean",
                    "description": "Wait for user interaction with the notification",
                    "default": false
                },
                "timeout": {
                    "type": "number",
                    "description": format!("Timeout in seconds (default: {})", DEFAULT_TIMEOUT_SECS),
                    "default": DEFAULT_TIMEOUT_SECS
                },
                "closeLabel": {
                    "type": "string",
                    "description": "Label for the close button"
                },
                "actions": {
                    "type": "array",
                    "description": "Action buttons for the notification (macOS 10.9+)",
                    "items": { "type": "string" },
                    "maxItems": MAX_ACTIONS
                },
                "reply": {
                    "type": "boolean",
                    "description": "Enable reply functionality (macOS 10.9+)",
                    "default": false
                }
            },
            "required": ["title"]
        }),
    }
}

fn send_simple_notification_tool() -> McpTool {
    McpTool {
        name: SEND_SIMPLE_NOTIFICATION.to_string(),
        description: "Send a simple notification with just title and message".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The notification title",
                    "minLength": 1
                },
                "message": {
                    "type": "string",
                    "description": "The notification message"
                },
                "sound": {
                    "type": "boolean",
                    "description": "Play the default notification sound",
                    "default": true
                }
            },
            "required": ["title", "message"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_both_tools() {
        let names: Vec<String> = tool_descriptors().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec![SEND_NOTIFICATION, SEND_SIMPLE_NOTIFICATION]);
    }

    #[test]
    fn test_registry_is_stable() {
        let first = serde_json::to_string(&tool_descriptors()).unwrap();
        let second = serde_json::to_string(&tool_descriptors()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sound_enum_matches_sound_type() {
        let tool = send_notification_tool();
        let choices: Vec<&str> = tool.input_schema["properties"]["sound"]["enum"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        assert_eq!(choices.len(), 16);
        assert_eq!(choices.last(), Some(&"none"));
        for name in choices {
            assert!(Sound::parse(name).is_some(), "{} is not a known sound", name);
        }
        for sound in Sound::NAMED {
            assert!(MACOS_SOUNDS.contains(&sound.as_str()));
        }
    }

    #[test]
    fn test_required_fields() {
        let tools = tool_descriptors();
        assert_eq!(tools[0].input_schema["required"], json!(["title"]));
        assert_eq!(tools[1].input_schema["required"], json!(["title", "message"]));
        assert_eq!(tools[0].input_schema["properties"]["actions"]["maxItems"], 2);
    }
}
