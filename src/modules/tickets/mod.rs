pub mod model;
pub mod schema;

pub use model::*;
pub use schema::*;
