pub mod chat;
pub mod notifications;
pub mod tickets;
