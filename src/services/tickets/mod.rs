pub mod thread;

pub use thread::TicketThreadSession;
