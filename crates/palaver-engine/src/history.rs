//! Conversation persistence on top of a [`KeyValueStore`].
//!
//! The whole conversation lives under one key as a JSON array.

use tracing::{debug, warn};

use crate::message::Conversation;
use crate::storage::{KeyValueStore, StorageError};

/// Default storage key for the conversation.
pub const HISTORY_KEY: &str = "ai-chat-messages";

/// Load the stored conversation.
///
/// Never fails: a missing key, an unreadable store, or a malformed payload
/// all yield an empty conversation.
pub fn load_history(store: &dyn KeyValueStore, key: &str) -> Conversation {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No stored conversation");
            return Conversation::new();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored conversation");
            return Conversation::new();
        }
    };

    match serde_json::from_str::<Conversation>(&raw) {
        Ok(conversation) => {
            debug!(key, count = conversation.len(), "Loaded conversation");
            conversation
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored conversation");
            Conversation::new()
        }
    }
}

/// Serialize and store the full conversation.
pub fn save_history(
    store: &mut dyn KeyValueStore,
    key: &str,
    conversation: &Conversation,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(conversation)?;
    store.set(key, &json)
}

/// Remove the stored conversation.
pub fn clear_history(store: &mut dyn KeyValueStore, key: &str) -> Result<(), StorageError> {
    store.remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample() -> Conversation {
        Conversation::from(vec![
            Message::new("hi", true, Uuid::from_u128(1), "09:00"),
            Message::new("Hello!\nHow can I help?", false, Uuid::from_u128(2), "09:01"),
        ])
    }

    #[test]
    fn test_roundtrip_preserves_every_field() {
        let mut store = MemoryStore::new();
        let conversation = sample();

        save_history(&mut store, HISTORY_KEY, &conversation).unwrap();
        let loaded = load_history(&store, HISTORY_KEY);

        assert_eq!(loaded, conversation);
    }

    #[test]
    fn test_roundtrip_through_files() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path()).unwrap();
        save_history(&mut store, HISTORY_KEY, &sample()).unwrap();

        let reopened = FileStore::new(temp.path()).unwrap();
        assert_eq!(load_history(&reopened, HISTORY_KEY), sample());
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let store = MemoryStore::new();
        assert!(load_history(&store, HISTORY_KEY).is_empty());
    }

    #[test]
    fn test_malformed_payload_loads_empty() {
        let mut store = MemoryStore::new();
        for payload in ["not json", "{\"content\":\"x\"}", "[{\"content\":1}]", ""] {
            store.set(HISTORY_KEY, payload).unwrap();
            assert!(
                load_history(&store, HISTORY_KEY).is_empty(),
                "payload {payload:?} should be treated as no history"
            );
        }
    }

    #[test]
    fn test_invalid_key_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();
        assert!(load_history(&store, "../outside").is_empty());
    }

    #[test]
    fn test_clear_removes_stored_copy() {
        let mut store = MemoryStore::new();
        save_history(&mut store, HISTORY_KEY, &sample()).unwrap();

        clear_history(&mut store, HISTORY_KEY).unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);

        clear_history(&mut store, HISTORY_KEY).unwrap();
    }
}
