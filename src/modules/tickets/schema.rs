use serde::{Deserialize, Serialize};

/// Request body for `POST /tickets/{id}/reply`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub content: String,
}
