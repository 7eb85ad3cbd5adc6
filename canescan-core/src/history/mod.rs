//! Local history of recent classification results.

pub mod store;
pub mod types;

pub use store::{HistoryStore, APP_NAMESPACE, HISTORY_CAPACITY};
pub use types::{HistoryEntry, NewHistoryEntry};
