pub mod error;
pub mod model;
pub mod query;
pub mod schema;
pub mod traits;
