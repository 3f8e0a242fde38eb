use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::modules::chat::ChatMessage;
use crate::modules::notifications::DisplayNotification;
use crate::services::api::ApiError;
use crate::services::sync::differ::Watermark;
use crate::services::sync::interface::EventSource;
use crate::services::sync::poller::{Poller, PollerHandle};
use crate::services::sync::reconciler;

struct SessionState {
    display: Vec<DisplayNotification>,
    chat_watermark: Watermark,
}

impl SessionState {
    fn new() -> Self {
        Self {
            display: Vec::new(),
            chat_watermark: Watermark::new(),
        }
    }
}

/// State shared between the session facade and its poll task
struct SessionCore {
    source: Arc<dyn EventSource>,
    admin_sender_id: String,
    state: RwLock<SessionState>,
    cycle_guard: Mutex<()>,
}

impl SessionCore {
    async fn run_cycle(&self, cancel: &CancellationToken) {
        // A cycle still in flight means this tick is skipped, not queued
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            tracing::debug!("poll cycle still in flight, skipping tick");
            return;
        };

        // Independent sub-streams, no required ordering between the fetches
        let (notifications, chat) = tokio::join!(
            self.source.fetch_notifications(),
            self.source.fetch_chat()
        );

        // A response that resolves after teardown must not resurrect state
        if cancel.is_cancelled() {
            tracing::debug!("session stopped mid-cycle, discarding results");
            return;
        }

        let mut state = self.state.write().await;

        match chat {
            Ok(messages) => Self::reconcile_chat(&mut state, &self.admin_sender_id, &messages),
            Err(e) => tracing::warn!("chat fetch failed: {}", e),
        }

        match notifications {
            Ok(list) => {
                let server: Vec<DisplayNotification> =
                    list.iter().map(reconciler::from_server).collect();
                let synthesized: Vec<DisplayNotification> = state
                    .display
                    .iter()
                    .filter(|n| n.is_synthesized())
                    .cloned()
                    .collect();
                state.display = reconciler::merge(synthesized, server);
                tracing::debug!(count = state.display.len(), "notification snapshot refreshed");
            }
            Err(e) => tracing::warn!("notification fetch failed: {}", e),
        }
    }

    fn reconcile_chat(state: &mut SessionState, sentinel: &str, messages: &[ChatMessage]) {
        let from_admin: Vec<&ChatMessage> =
            messages.iter().filter(|m| m.is_from(sentinel)).collect();

        // One synthesized alert per batch, built from the latest new message
        let fresh = state.chat_watermark.advance(&from_admin);
        if let Some(latest) = fresh.last() {
            let alert = reconciler::synthesize_chat_alert(latest);
            tracing::info!(id = %alert.id, "new admin message, synthesizing notification");
            if !state.display.iter().any(|n| n.id == alert.id) {
                state.display.insert(0, alert);
            }
        }
    }

    /// Re-synchronize the server-origin subset from the authoritative list,
    /// leaving synthesized alerts as they are.
    async fn refetch_server(&self) {
        match self.source.fetch_notifications().await {
            Ok(list) => {
                let server: Vec<DisplayNotification> =
                    list.iter().map(reconciler::from_server).collect();
                let mut state = self.state.write().await;
                let synthesized: Vec<DisplayNotification> = state
                    .display
                    .iter()
                    .filter(|n| n.is_synthesized())
                    .cloned()
                    .collect();
                state.display = reconciler::merge(synthesized, server);
            }
            Err(e) => tracing::warn!("rollback refetch failed: {}", e),
        }
    }
}

/// Polling synchronization session for the notification and admin-chat
/// streams.
///
/// Owns the display list and the chat watermark exclusively; at most one poll
/// loop is active per session. Fetch failures inside a cycle are logged and
/// swallowed, the next tick retries.
pub struct SyncSession {
    core: Arc<SessionCore>,
    poll_interval: Duration,
    handle: Mutex<Option<PollerHandle>>,
}

impl SyncSession {
    pub fn new(
        source: Arc<dyn EventSource>,
        admin_sender_id: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            core: Arc::new(SessionCore {
                source,
                admin_sender_id,
                state: RwLock::new(SessionState::new()),
                cycle_guard: Mutex::new(()),
            }),
            poll_interval,
            handle: Mutex::new(None),
        }
    }

    /// Start the poll loop. A loop already running for this session is
    /// stopped first, and the state is cleared so the new loop starts clean.
    pub async fn start(&self) {
        if !self.core.source.has_credential() {
            tracing::warn!("sync session started without credential, not polling");
            return;
        }

        let mut handle = self.handle.lock().await;
        if let Some(old) = handle.take() {
            old.stop();
        }

        {
            let mut state = self.core.state.write().await;
            state.display.clear();
            state.chat_watermark.reset();
        }

        let core = Arc::clone(&self.core);
        *handle = Some(Poller::start(self.poll_interval, move |token| {
            let core = Arc::clone(&core);
            async move { core.run_cycle(&token).await }
        }));

        tracing::info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "sync session started"
        );
    }

    /// Stop the poll loop and reset the chat watermark so a later session
    /// starts clean. Idempotent.
    pub async fn stop(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(old) = handle.take() {
            old.stop();
        }
        self.core.state.write().await.chat_watermark.reset();
        tracing::info!("sync session stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .map(|h| !h.is_stopped())
            .unwrap_or(false)
    }

    /// Run one fetch-and-reconcile cycle outside the poll loop
    pub async fn poll_once(&self) {
        self.core.run_cycle(&CancellationToken::new()).await;
    }

    /// Snapshot of the current display list
    pub async fn notifications(&self) -> Vec<DisplayNotification> {
        self.core.state.read().await.display.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.core
            .state
            .read()
            .await
            .display
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    /// Mark every notification read: optimistic local flip first, then the
    /// server mutation. A failed request rolls back by refetching the
    /// authoritative list.
    ///
    /// No-op without a credential or when nothing is unread.
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        if !self.core.source.has_credential() {
            return Ok(());
        }

        {
            let mut state = self.core.state.write().await;
            if state.display.iter().all(|n| n.is_read) {
                return Ok(());
            }
            for item in state.display.iter_mut() {
                item.is_read = true;
            }
        }

        match self.core.source.mark_all_read().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("mark-all-read failed, refetching: {}", e);
                self.core.refetch_server().await;
                Err(e)
            }
        }
    }

    /// Delete every notification: optimistic local clear first, then the
    /// server mutation, with refetch-as-rollback on failure.
    pub async fn delete_all(&self) -> Result<(), ApiError> {
        if !self.core.source.has_credential() {
            return Ok(());
        }

        self.core.state.write().await.display.clear();

        match self.core.source.delete_all_notifications().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("delete-all failed, refetching: {}", e);
                self.core.refetch_server().await;
                Err(e)
            }
        }
    }
}
