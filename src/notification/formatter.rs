//! Outcome → response text

use super::outcome::NotificationOutcome;

/// Text returned to the caller for `outcome` of the notification titled `title`.
pub fn format_outcome(title: &str, outcome: &NotificationOutcome) -> String {
    match outcome {
        NotificationOutcome::Sent(_) => sent(title),
        NotificationOutcome::Clicked => format!("Notification clicked: \"{}\"", title),
        NotificationOutcome::TimedOut => format!("Notification timed out: \"{}\"", title),
        NotificationOutcome::Replied(text) if !text.is_empty() => {
            format!("Notification reply received: \"{}\"", text)
        }
        NotificationOutcome::ActionTriggered(label) if !label.is_empty() => {
            format!("Notification action clicked: \"{}\"", label)
        }
        NotificationOutcome::Replied(_) | NotificationOutcome::ActionTriggered(_) => sent(title),
        NotificationOutcome::Failed(reason) => failure_advisory(reason),
    }
}

/// Multi-line advisory for a failed delivery
pub fn failure_advisory(reason: &str) -> String {
    format!(
        "Failed to send notification: {}\n\n\
         To fix this:\n\
         1. Open System Settings → Notifications\n\
         2. Find the application running this server (for example Claude or your terminal) and allow notifications\n\
         3. Check that Focus mode / Do Not Disturb is not blocking notifications",
        reason
    )
}

fn sent(title: &str) -> String {
    format!("Notification sent successfully: \"{}\"", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_messages() {
        assert_eq!(
            format_outcome("Build", &NotificationOutcome::Sent(None)),
            r#"Notification sent successfully: "Build""#
        );
        assert_eq!(
            format_outcome("Build", &NotificationOutcome::Clicked),
            r#"Notification clicked: "Build""#
        );
        assert_eq!(
            format_outcome("Alert", &NotificationOutcome::TimedOut),
            r#"Notification timed out: "Alert""#
        );
        assert_eq!(
            format_outcome("x", &NotificationOutcome::Replied("sure".to_string())),
            r#"Notification reply received: "sure""#
        );
        assert_eq!(
            format_outcome("x", &NotificationOutcome::ActionTriggered("Open".to_string())),
            r#"Notification action clicked: "Open""#
        );
    }

    #[test]
    fn test_empty_reply_or_action_falls_back_to_sent() {
        assert_eq!(
            format_outcome("Ping", &NotificationOutcome::Replied(String::new())),
            r#"Notification sent successfully: "Ping""#
        );
        assert_eq!(
            format_outcome("Ping", &NotificationOutcome::ActionTriggered(String::new())),
            r#"Notification sent successfully: "Ping""#
        );
    }

    #[test]
    fn test_failure_advisory() {
        let text = format_outcome("x", &NotificationOutcome::Failed("denied".to_string()));
        assert!(text.starts_with("Failed to send notification: denied"));
        assert!(text.contains("System Settings"));
        assert!(text.contains("Focus mode"));
        assert!(text.lines().count() > 3);
    }
}
