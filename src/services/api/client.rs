use async_trait::async_trait;
use reqwest::Client;

use crate::modules::chat::ChatMessage;
use crate::modules::notifications::Notification;
use crate::modules::tickets::{ReplyRequest, Ticket};
use crate::services::sync::interface::{EventSource, TicketSource};

use super::types::ApiError;

/// Dinary API client
/// Handles all communication with the Dinary backend
pub struct DinaryClient {
    client: Client,
    base_url: String,
    token: String,
}

impl DinaryClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.token.is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Fetch the notification list for the authenticated principal
    pub async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get_json("/notifications").await
    }

    /// Mark every notification read. The endpoint accepts an empty JSON body.
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url("/notifications/read-all"))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(())
    }

    pub async fn delete_all_notifications(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url("/notifications/delete-all"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(())
    }

    /// Fetch the support chat thread for the authenticated user
    pub async fn get_chat(&self) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_json("/users/me/chat").await
    }

    pub async fn get_ticket(&self, ticket_id: &str) -> Result<Ticket, ApiError> {
        self.get_json(&format!("/tickets/{}", ticket_id)).await
    }

    pub async fn reply_ticket(&self, ticket_id: &str, content: &str) -> Result<(), ApiError> {
        let body = ReplyRequest {
            content: content.to_string(),
        };

        let response = self
            .client
            .post(self.url(&format!("/tickets/{}/reply", ticket_id)))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(())
    }
}

#[async_trait]
impl EventSource for DinaryClient {
    fn has_credential(&self) -> bool {
        DinaryClient::has_credential(self)
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get_notifications().await
    }

    async fn fetch_chat(&self) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_chat().await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        DinaryClient::mark_all_read(self).await
    }

    async fn delete_all_notifications(&self) -> Result<(), ApiError> {
        DinaryClient::delete_all_notifications(self).await
    }
}

#[async_trait]
impl TicketSource for DinaryClient {
    fn has_credential(&self) -> bool {
        DinaryClient::has_credential(self)
    }

    async fn fetch_ticket(&self, ticket_id: &str) -> Result<Ticket, ApiError> {
        self.get_ticket(ticket_id).await
    }

    async fn reply(&self, ticket_id: &str, content: &str) -> Result<(), ApiError> {
        self.reply_ticket(ticket_id, content).await
    }
}
