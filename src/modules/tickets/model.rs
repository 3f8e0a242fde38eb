use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Support ticket thread as returned by `GET /tickets/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub status: String,
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl TicketMessage {
    pub fn is_from(&self, sentinel: &str) -> bool {
        self.sender_id == sentinel
    }
}
