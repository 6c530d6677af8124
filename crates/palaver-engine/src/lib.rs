//! palaver-engine: Headless conversation engine for the palaver chat client
//!
//! This crate holds everything that does not touch the terminal:
//! - The message model and scroll-target helpers
//! - Key-value storage and conversation persistence
//! - Chat backends and readiness polling
//! - The conversation controller that ties them together

pub mod backend;
pub mod clock;
pub mod config;
pub mod controller;
pub mod history;
pub mod message;
pub mod readiness;
pub mod storage;

// Re-export commonly used types
pub use backend::{extract_reply_text, BackendError, ChatBackend, CommandBackend, Reply};
pub use clock::{format_timestamp, Clock, IdGenerator, SystemClock, TimeOrderedIds};
pub use config::{BackendConfig, Config, ConfigError, DEFAULT_DATA_DIR};
pub use controller::{ConversationController, ReadinessStatus, NOT_READY_NOTICE};
pub use history::{clear_history, load_history, save_history, HISTORY_KEY};
pub use message::{find_last_ai_message, scroll_target, Conversation, Message, ScrollTarget};
pub use readiness::{ReadinessWatch, DEFAULT_POLL_INTERVAL};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
