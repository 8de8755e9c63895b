//! Database initialization and the storage access handle

pub mod init;
pub mod store;

pub use init::*;
pub use store::{LazySqliteStore, PlanStore, SqliteStore};
