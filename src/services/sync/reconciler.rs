use std::collections::HashSet;

use crate::modules::chat::ChatMessage;
use crate::modules::notifications::{
    DisplayNotification, Notification, NotificationKind, CHAT_ALERT_PREFIX,
};

/// Maximum body length for a notification synthesized from a chat message
pub const SYNTHESIZED_BODY_MAX_CHARS: usize = 100;

/// Title given to notifications synthesized from admin chat arrivals
pub const CHAT_ALERT_TITLE: &str = "💬 Nouveau message admin";

/// Classification derived from a notification's message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub icon: Option<&'static str>,
}

/// Classify a raw notification message into the display taxonomy.
///
/// Case-insensitive substring match, evaluated in fixed priority order:
/// identity verification, then recharge approval, then recharge rejection,
/// then bonus/xp, then generic message, then the catch-all.
pub fn classify(message: &str) -> Classification {
    let text = message.to_lowercase();

    if text.contains("vérifié") {
        Classification {
            kind: NotificationKind::Reward,
            title: "Identité Vérifiée",
            icon: Some("🎉"),
        }
    } else if text.contains("approuvée") {
        Classification {
            kind: NotificationKind::Transaction,
            title: "Recharge Approuvée",
            icon: Some("✅"),
        }
    } else if text.contains("rejetée") {
        Classification {
            kind: NotificationKind::Alert,
            title: "Recharge Rejetée",
            icon: Some("❌"),
        }
    } else if text.contains("bonus") || text.contains("xp") {
        Classification {
            kind: NotificationKind::Reward,
            title: "Bonus Reçu",
            icon: Some("🎁"),
        }
    } else if text.contains("message") {
        Classification {
            kind: NotificationKind::System,
            title: "Nouveau Message",
            icon: Some("💬"),
        }
    } else {
        Classification {
            kind: NotificationKind::System,
            title: "Notification",
            icon: None,
        }
    }
}

/// Build a display notification from a server notification.
/// A server-supplied emoji takes precedence over the classified default icon.
pub fn from_server(notification: &Notification) -> DisplayNotification {
    let class = classify(&notification.message);
    let icon = notification
        .emoji
        .clone()
        .or_else(|| class.icon.map(str::to_string));

    DisplayNotification {
        id: notification.id.clone(),
        title: class.title.to_string(),
        message: notification.message.clone(),
        kind: class.kind,
        is_read: notification.is_read,
        timestamp: notification.created_at,
        icon,
        link: None,
    }
}

/// Synthesize one display notification from the latest new admin chat
/// message. The id is prefixed so it can never collide with a server id.
pub fn synthesize_chat_alert(latest: &ChatMessage) -> DisplayNotification {
    DisplayNotification {
        id: format!("{}{}", CHAT_ALERT_PREFIX, latest.id),
        title: CHAT_ALERT_TITLE.to_string(),
        message: truncate_chars(&latest.content, SYNTHESIZED_BODY_MAX_CHARS),
        kind: NotificationKind::System,
        is_read: false,
        timestamp: latest.timestamp,
        icon: Some("💬".to_string()),
        link: Some("/chat".to_string()),
    }
}

/// Merge synthesized alerts (most recent first) ahead of the server-origin
/// list, dropping any duplicate id. First occurrence wins.
pub fn merge(
    synthesized: Vec<DisplayNotification>,
    server: Vec<DisplayNotification>,
) -> Vec<DisplayNotification> {
    let mut seen = HashSet::new();
    synthesized
        .into_iter()
        .chain(server)
        .filter(|n| seen.insert(n.id.clone()))
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
