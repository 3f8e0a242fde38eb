use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::modules::tickets::{Ticket, TicketMessage};
use crate::services::api::ApiError;
use crate::services::sync::differ::Watermark;
use crate::services::sync::interface::TicketSource;
use crate::services::sync::poller::{Poller, PollerHandle};

struct ThreadState {
    ticket: Option<Ticket>,
    support_watermark: Watermark,
    unseen_replies: usize,
}

impl ThreadState {
    fn new() -> Self {
        Self {
            ticket: None,
            support_watermark: Watermark::new(),
            unseen_replies: 0,
        }
    }
}

/// State shared between the session facade and its poll task
struct ThreadCore {
    source: Arc<dyn TicketSource>,
    ticket_id: String,
    support_sender_id: String,
    state: RwLock<ThreadState>,
    cycle_guard: Mutex<()>,
}

impl ThreadCore {
    async fn run_cycle(&self, cancel: &CancellationToken) {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            tracing::debug!("ticket poll cycle still in flight, skipping tick");
            return;
        };

        let fetched = self.source.fetch_ticket(&self.ticket_id).await;

        if cancel.is_cancelled() {
            tracing::debug!("ticket session stopped mid-cycle, discarding results");
            return;
        }

        match fetched {
            Ok(ticket) => {
                let mut state = self.state.write().await;
                let fresh = {
                    let from_support: Vec<&TicketMessage> = ticket
                        .messages
                        .iter()
                        .filter(|m| m.is_from(&self.support_sender_id))
                        .collect();
                    state.support_watermark.advance(&from_support).len()
                };
                if fresh > 0 {
                    state.unseen_replies += fresh;
                    tracing::info!(
                        ticket_id = %self.ticket_id,
                        new = fresh,
                        "new support replies on ticket"
                    );
                }

                state.ticket = Some(ticket);
            }
            Err(e) => tracing::warn!(ticket_id = %self.ticket_id, "ticket fetch failed: {}", e),
        }
    }
}

/// Polling session for a single support-ticket thread.
///
/// Same cadence and teardown rules as [`crate::services::sync::SyncSession`],
/// without chat-derived notification synthesis: new support replies only
/// bump an unseen counter.
pub struct TicketThreadSession {
    core: Arc<ThreadCore>,
    poll_interval: Duration,
    handle: Mutex<Option<PollerHandle>>,
}

impl TicketThreadSession {
    pub fn new(
        source: Arc<dyn TicketSource>,
        ticket_id: String,
        support_sender_id: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            core: Arc::new(ThreadCore {
                source,
                ticket_id,
                support_sender_id,
                state: RwLock::new(ThreadState::new()),
                cycle_guard: Mutex::new(()),
            }),
            poll_interval,
            handle: Mutex::new(None),
        }
    }

    pub fn ticket_id(&self) -> &str {
        &self.core.ticket_id
    }

    /// Start polling the thread. An already-running loop is stopped first.
    pub async fn start(&self) {
        if !self.core.source.has_credential() {
            tracing::warn!("ticket session started without credential, not polling");
            return;
        }

        let mut handle = self.handle.lock().await;
        if let Some(old) = handle.take() {
            old.stop();
        }

        {
            let mut state = self.core.state.write().await;
            *state = ThreadState::new();
        }

        let core = Arc::clone(&self.core);
        *handle = Some(Poller::start(self.poll_interval, move |token| {
            let core = Arc::clone(&core);
            async move { core.run_cycle(&token).await }
        }));

        tracing::info!(ticket_id = %self.core.ticket_id, "ticket thread session started");
    }

    /// Stop polling and reset the watermark. Idempotent.
    pub async fn stop(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(old) = handle.take() {
            old.stop();
        }
        self.core.state.write().await.support_watermark.reset();
        tracing::info!(ticket_id = %self.core.ticket_id, "ticket thread session stopped");
    }

    /// Run one fetch-and-reconcile cycle outside the poll loop
    pub async fn poll_once(&self) {
        self.core.run_cycle(&CancellationToken::new()).await;
    }

    /// Snapshot of the ticket thread, if it has been fetched at least once
    pub async fn ticket(&self) -> Option<Ticket> {
        self.core.state.read().await.ticket.clone()
    }

    /// Support replies that arrived since the last [`Self::mark_seen`]
    pub async fn unseen_replies(&self) -> usize {
        self.core.state.read().await.unseen_replies
    }

    pub async fn mark_seen(&self) {
        self.core.state.write().await.unseen_replies = 0;
    }

    /// Post a reply to the thread, then refetch it right away on success so
    /// the local snapshot includes the new message.
    pub async fn reply(&self, content: &str) -> Result<(), ApiError> {
        if !self.core.source.has_credential() {
            return Ok(());
        }

        self.core.source.reply(&self.core.ticket_id, content).await?;
        self.poll_once().await;
        Ok(())
    }
}
