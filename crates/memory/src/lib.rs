//! Conversation log backends for Parley.

pub mod file_backend;
pub mod in_memory;

pub use file_backend::{BACKUP_SUFFIX, JsonHistoryLog};
pub use in_memory::InMemoryHistory;
