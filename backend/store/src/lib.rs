//! User-scoped persistent storage for Pondo.
//!
//! The async trait pair in [`store`] is the seam the aggregator, the
//! notification trigger, and the gateway depend on; [`sqlite`] is the
//! rusqlite-backed implementation used in production and (in-memory) in
//! tests.

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteStore;
pub use store::{NotificationStore, UserDataStore};
