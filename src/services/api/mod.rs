pub mod client;
pub mod types;

pub use client::DinaryClient;
pub use types::ApiError;
