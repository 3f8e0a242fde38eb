use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat message as returned by `GET /users/me/chat`.
/// `sender_id` carries a sentinel value for admin/support-originated messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl ChatMessage {
    /// True when the message originates from the given counterparty sentinel
    pub fn is_from(&self, sentinel: &str) -> bool {
        self.sender_id == sentinel
    }
}
