pub mod differ;
pub mod interface;
pub mod poller;
pub mod reconciler;
pub mod session;

pub use differ::Watermark;
pub use interface::{EventSource, TicketSource};
pub use poller::{Poller, PollerHandle};
pub use session::SyncSession;
