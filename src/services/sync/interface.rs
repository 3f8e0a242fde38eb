use async_trait::async_trait;

use crate::modules::chat::ChatMessage;
use crate::modules::notifications::Notification;
use crate::modules::tickets::Ticket;
use crate::services::api::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Transport behind the notification/chat poll loop.
///
/// The default implementation polls the Dinary backend over HTTP at a fixed
/// interval; a push-based transport can be substituted without touching the
/// differ, reconciler or session contracts.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// False once the auth token is gone; mutations become no-ops.
    fn has_credential(&self) -> bool;

    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;

    async fn fetch_chat(&self) -> Result<Vec<ChatMessage>>;

    async fn mark_all_read(&self) -> Result<()>;

    async fn delete_all_notifications(&self) -> Result<()>;
}

/// Transport behind a single support-ticket thread
#[async_trait]
pub trait TicketSource: Send + Sync {
    fn has_credential(&self) -> bool;

    async fn fetch_ticket(&self, ticket_id: &str) -> Result<Ticket>;

    async fn reply(&self, ticket_id: &str, content: &str) -> Result<()>;
}
