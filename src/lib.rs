pub mod config;
pub mod modules;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::api::DinaryClient;
use services::sync::SyncSession;
use services::tickets::TicketThreadSession;

/// Build a sync session wired to the Dinary backend described by `config`.
/// The session is not started; call [`SyncSession::start`].
pub fn create_session(config: &Config) -> Arc<SyncSession> {
    let client = Arc::new(DinaryClient::new(
        config.api_base_url.clone(),
        config.api_token.clone(),
    ));

    Arc::new(SyncSession::new(
        client,
        config.admin_sender_id.clone(),
        config.poll_interval(),
    ))
}

/// Build a polling session for one support-ticket thread
pub fn create_ticket_session(config: &Config, ticket_id: &str) -> Arc<TicketThreadSession> {
    let client = Arc::new(DinaryClient::new(
        config.api_base_url.clone(),
        config.api_token.clone(),
    ));

    Arc::new(TicketThreadSession::new(
        client,
        ticket_id.to_string(),
        config.admin_sender_id.clone(),
        config.poll_interval(),
    ))
}
