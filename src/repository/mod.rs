//! Repository layer for database persistence.
//!
//! All database access uses Diesel with compile-time query checking on
//! SQLite. Schema changes are cetane migrations in `crate::migrations`.

pub mod context;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod seen;
pub mod tracking;
pub mod util;

pub use context::DbContext;
pub use pool::{AsyncSqlitePool, DieselError};
pub use seen::DieselSeenStore;
pub use tracking::{DieselTrackingRepository, SyncSummary};
