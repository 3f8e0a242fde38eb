use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::RwLock;

use dinary_sync::modules::chat::ChatMessage;
use dinary_sync::modules::notifications::Notification;
use dinary_sync::modules::tickets::{ReplyRequest, Ticket, TicketMessage};
use dinary_sync::services::api::ApiError;
use dinary_sync::services::sync::EventSource;

/// In-memory stand-in for the Dinary backend
#[allow(dead_code)]
#[derive(Default)]
pub struct StubState {
    pub notifications: Vec<Notification>,
    pub chat: Vec<ChatMessage>,
    pub tickets: HashMap<String, Ticket>,
    pub fail_mark_read: bool,
    pub fail_delete_all: bool,
    pub mark_read_calls: usize,
    pub delete_all_calls: usize,
    pub notification_fetches: usize,
}

#[allow(dead_code)]
#[derive(Clone)]
pub struct StubApi {
    pub state: Arc<RwLock<StubState>>,
    pub base_url: String,
}

type Shared = Arc<RwLock<StubState>>;

/// Bind the stub backend on an ephemeral port and serve it in the background
#[allow(dead_code)]
pub async fn spawn_stub_api() -> StubApi {
    let state: Shared = Arc::new(RwLock::new(StubState::default()));

    let app = Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", patch(mark_all_read))
        .route("/notifications/delete-all", delete(delete_all))
        .route("/users/me/chat", get(list_chat))
        .route("/tickets/{id}", get(get_ticket))
        .route("/tickets/{id}/reply", post(reply_ticket))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    StubApi {
        state,
        base_url: format!("http://{}", addr),
    }
}

async fn list_notifications(State(state): State<Shared>) -> Json<Vec<Notification>> {
    let mut s = state.write().await;
    s.notification_fetches += 1;
    Json(s.notifications.clone())
}

async fn mark_all_read(State(state): State<Shared>) -> StatusCode {
    let mut s = state.write().await;
    s.mark_read_calls += 1;
    if s.fail_mark_read {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    for n in s.notifications.iter_mut() {
        n.is_read = true;
    }
    StatusCode::NO_CONTENT
}

async fn delete_all(State(state): State<Shared>) -> StatusCode {
    let mut s = state.write().await;
    s.delete_all_calls += 1;
    if s.fail_delete_all {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    s.notifications.clear();
    StatusCode::NO_CONTENT
}

async fn list_chat(State(state): State<Shared>) -> Json<Vec<ChatMessage>> {
    Json(state.read().await.chat.clone())
}

async fn get_ticket(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, StatusCode> {
    state
        .read()
        .await
        .tickets
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn reply_ticket(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<ReplyRequest>,
) -> StatusCode {
    let mut s = state.write().await;
    match s.tickets.get_mut(&id) {
        Some(ticket) => {
            ticket.messages.push(TicketMessage {
                id: uuid::Uuid::new_v4().to_string(),
                sender_id: "user-1".to_string(),
                content: body.content,
                timestamp: Utc::now(),
                file_url: None,
            });
            StatusCode::CREATED
        }
        None => StatusCode::NOT_FOUND,
    }
}

// Builders for test data

#[allow(dead_code)]
pub fn notification(id: &str, message: &str, is_read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        message: message.to_string(),
        emoji: None,
        is_read,
        created_at: Utc::now(),
    }
}

#[allow(dead_code)]
pub fn chat_message(sender: &str, content: &str) -> ChatMessage {
    ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: sender.to_string(),
        content: content.to_string(),
        timestamp: Utc::now(),
        read: false,
        file_url: None,
        file_name: None,
        file_type: None,
    }
}

#[allow(dead_code)]
pub fn admin_message(content: &str) -> ChatMessage {
    chat_message("admin", content)
}

#[allow(dead_code)]
pub fn support_reply(content: &str) -> TicketMessage {
    TicketMessage {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: "admin".to_string(),
        content: content.to_string(),
        timestamp: Utc::now(),
        file_url: None,
    }
}

#[allow(dead_code)]
pub fn ticket(id: &str, subject: &str, messages: Vec<TicketMessage>) -> Ticket {
    Ticket {
        id: id.to_string(),
        subject: subject.to_string(),
        status: "open".to_string(),
        messages,
    }
}

/// In-process event source with a configurable response delay, for teardown
/// and overlap tests where the stub HTTP server would be too coarse.
#[allow(dead_code)]
pub struct FakeSource {
    pub delay: Duration,
    pub credential: bool,
    pub fail_fetch: AtomicBool,
    pub fail_mutations: AtomicBool,
    pub notifications: RwLock<Vec<Notification>>,
    pub chat: RwLock<Vec<ChatMessage>>,
    pub notification_fetches: AtomicUsize,
    pub mark_read_calls: AtomicUsize,
    pub delete_all_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            credential: true,
            fail_fetch: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            notifications: RwLock::new(Vec::new()),
            chat: RwLock::new(Vec::new()),
            notification_fetches: AtomicUsize::new(0),
            mark_read_calls: AtomicUsize::new(0),
            delete_all_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn without_credential() -> Self {
        Self {
            credential: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl EventSource for FakeSource {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.notification_fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.notifications.read().await.clone())
    }

    async fn fetch_chat(&self) -> Result<Vec<ChatMessage>, ApiError> {
        tokio::time::sleep(self.delay).await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.chat.read().await.clone())
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        }
        for n in self.notifications.write().await.iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    async fn delete_all_notifications(&self) -> Result<(), ApiError> {
        self.delete_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        }
        self.notifications.write().await.clear();
        Ok(())
    }
}
