use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix for ids of notifications synthesized from chat arrivals.
/// Guarantees they never collide with a server-issued id.
pub const CHAT_ALERT_PREFIX: &str = "chat:";

/// Server notification as returned by `GET /notifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Closed display taxonomy for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Transaction,
    Reward,
    Promo,
    System,
    Alert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transaction => "transaction",
            Self::Reward => "reward",
            Self::Promo => "promo",
            Self::System => "system",
            Self::Alert => "alert",
        }
    }
}

/// Display-ready notification, derived either from a server notification or
/// synthesized from a new admin chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
    pub icon: Option<String>,
    pub link: Option<String>,
}

impl DisplayNotification {
    pub fn is_synthesized(&self) -> bool {
        self.id.starts_with(CHAT_ALERT_PREFIX)
    }
}
