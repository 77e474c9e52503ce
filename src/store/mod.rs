//! Persistence layer
//!
//! SQLite-backed record store for threat telemetry, footer links and the
//! rest of the dashboard tables.

mod connection;
pub(crate) mod datetime;
pub mod footer;
pub mod models;
pub mod records;
pub mod schema;
pub mod seed;
pub mod threats;

pub use connection::Database;
pub use models::*;
