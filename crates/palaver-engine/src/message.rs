//! Message and conversation types.
//!
//! A [`Message`] is immutable once created. A [`Conversation`] is only ever
//! appended to or cleared in full, so insertion order is display order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    content: String,
    is_user: bool,
    id: Uuid,
    timestamp: String,
}

impl Message {
    /// Create a message from already-generated id and timestamp.
    pub fn new(
        content: impl Into<String>,
        is_user: bool,
        id: Uuid,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            is_user,
            id,
            timestamp: timestamp.into(),
        }
    }

    /// Message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if the human typed this message.
    pub fn is_user(&self) -> bool {
        self.is_user
    }

    /// Unique, creation-ordered identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Local time the message was created, already formatted.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Display label for the author.
    pub fn author_label(&self) -> &'static str {
        if self.is_user {
            "You"
        } else {
            "AI"
        }
    }
}

/// Ordered list of messages for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Iterate messages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Where the view should scroll after the conversation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Bring this message into view.
    Message(Uuid),
    /// Scroll to the bottom of the list.
    End,
}

/// Find the last AI-authored message anywhere in the history.
pub fn find_last_ai_message(messages: &[Message]) -> Option<&Message> {
    messages.iter().rev().find(|m| !m.is_user())
}

/// Compute the scroll target for a history.
///
/// The latest AI message wins even when user messages follow it; only a
/// history with no AI message at all scrolls to the end.
pub fn scroll_target(messages: &[Message]) -> ScrollTarget {
    find_last_ai_message(messages).map_or(ScrollTarget::End, |m| ScrollTarget::Message(m.id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(n: u128, content: &str, is_user: bool) -> Message {
        Message::new(content, is_user, Uuid::from_u128(n), "12:00")
    }

    #[test]
    fn test_message_accessors() {
        let m = msg(1, "hello", true);
        assert_eq!(m.content(), "hello");
        assert!(m.is_user());
        assert_eq!(m.id(), Uuid::from_u128(1));
        assert_eq!(m.timestamp(), "12:00");
        assert_eq!(m.author_label(), "You");
        assert_eq!(msg(2, "hi", false).author_label(), "AI");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(msg(7, "x", false)).unwrap();
        assert_eq!(json["content"], "x");
        assert_eq!(json["isUser"], false);
        assert_eq!(json["timestamp"], "12:00");
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_conversation_serializes_as_array() {
        let conversation = Conversation::from(vec![msg(1, "a", true), msg(2, "b", false)]);
        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_find_last_ai_message_skips_trailing_user_messages() {
        let messages = vec![msg(1, "q", true), msg(2, "a", false), msg(3, "q2", true)];
        let found = find_last_ai_message(&messages).unwrap();
        assert_eq!(found.id(), Uuid::from_u128(2));
        assert_eq!(scroll_target(&messages), ScrollTarget::Message(Uuid::from_u128(2)));
    }

    #[test]
    fn test_scroll_target_without_ai_messages_is_end() {
        assert_eq!(scroll_target(&[]), ScrollTarget::End);
        let messages = vec![msg(1, "q", true), msg(2, "q2", true)];
        assert!(find_last_ai_message(&messages).is_none());
        assert_eq!(scroll_target(&messages), ScrollTarget::End);
    }

    #[test]
    fn test_scroll_target_picks_latest_of_several_ai_messages() {
        let messages = vec![
            msg(1, "a1", false),
            msg(2, "q", true),
            msg(3, "a2", false),
        ];
        assert_eq!(scroll_target(&messages), ScrollTarget::Message(Uuid::from_u128(3)));
    }
}
