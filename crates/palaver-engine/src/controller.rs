//! The conversation controller.
//!
//! [`ConversationController`] owns the conversation, the draft, and the
//! readiness and sending flags. Every mutation goes through it so that
//! persistence and scroll requests stay in step with the message list.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::backend::{extract_reply_text, BackendError, ChatBackend, Reply};
use crate::clock::{
    format_timestamp, Clock, IdGenerator, SystemClock, TimeOrderedIds, DEFAULT_TIMESTAMP_FORMAT,
};
use crate::config::Config;
use crate::history::{clear_history, load_history, save_history, HISTORY_KEY};
use crate::message::{scroll_target, Conversation, Message, ScrollTarget};
use crate::readiness::{ReadinessWatch, DEFAULT_POLL_INTERVAL};
use crate::storage::KeyValueStore;

/// Notice appended when the user sends before the backend is ready.
pub const NOT_READY_NOTICE: &str = "AI is not ready yet. Please wait...";

/// Prefix for messages describing a failed backend call.
pub const ERROR_PREFIX: &str = "Error: ";

/// Used when a failed call has no description.
pub const GENERIC_FAILURE: &str = "something went wrong";

/// Readiness indicator shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStatus {
    /// Backend ready and no send in flight.
    Ready,
    /// Backend not ready yet, or a send is in flight.
    Waiting,
}

impl ReadinessStatus {
    /// Status for the given flags.
    pub fn from_flags(ai_ready: bool, is_sending: bool) -> Self {
        if ai_ready && !is_sending {
            Self::Ready
        } else {
            Self::Waiting
        }
    }

    /// Indicator label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ready => "AI Ready",
            Self::Waiting => "Waiting for AI",
        }
    }
}

/// Owns all chat state and behavior.
pub struct ConversationController {
    messages: Conversation,
    draft_input: String,
    ai_ready: bool,
    is_sending: bool,
    store: Box<dyn KeyValueStore>,
    backend: Arc<dyn ChatBackend>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    storage_key: String,
    timestamp_format: String,
    poll_interval: Duration,
    readiness: Option<ReadinessWatch>,
    scroll_request: Option<ScrollTarget>,
}

impl ConversationController {
    /// Create a controller with the system clock and default settings.
    ///
    /// Call [`initialize`](Self::initialize) before use.
    pub fn new(store: Box<dyn KeyValueStore>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            messages: Conversation::new(),
            draft_input: String::new(),
            ai_ready: false,
            is_sending: false,
            store,
            backend,
            clock: Box::new(SystemClock),
            ids: Box::new(TimeOrderedIds),
            storage_key: HISTORY_KEY.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            readiness: None,
            scroll_request: None,
        }
    }

    /// Create a controller configured from `config`.
    pub fn from_config(
        config: &Config,
        store: Box<dyn KeyValueStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self::new(store, backend)
            .with_storage_key(config.storage_key.clone())
            .with_timestamp_format(config.timestamp_format.clone())
            .with_poll_interval(config.poll_interval())
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different timestamp format (chrono `strftime` syntax).
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Use a different readiness poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Load stored history and start polling for readiness.
    ///
    /// Must be called inside a tokio runtime. Never fails.
    pub fn initialize(&mut self) {
        self.messages = load_history(self.store.as_ref(), &self.storage_key);
        info!(
            count = self.messages.len(),
            backend = self.backend.name(),
            "Conversation initialized"
        );
        if !self.ai_ready {
            self.readiness = Some(ReadinessWatch::spawn(
                Arc::clone(&self.backend),
                self.poll_interval,
            ));
        }
    }

    /// Fold the poll result into `ai_ready`.
    ///
    /// Returns true if readiness changed. The poll is released once ready.
    pub fn refresh_readiness(&mut self) -> bool {
        let ready = self.readiness.as_ref().is_some_and(ReadinessWatch::is_ready);
        if ready && !self.ai_ready {
            self.ai_ready = true;
            self.readiness = None;
            return true;
        }
        false
    }

    /// Wait up to `limit` for the backend to become ready.
    pub async fn wait_until_ready(&mut self, limit: Duration) -> bool {
        if let Some(watch) = self.readiness.as_mut() {
            let _ = tokio::time::timeout(limit, watch.wait_ready()).await;
        }
        self.refresh_readiness();
        self.ai_ready
    }

    /// Cancel the readiness poll. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(watch) = self.readiness.take() {
            watch.cancel();
            debug!("Readiness poll cancelled");
        }
    }

    /// Whether a readiness poll is still running.
    pub fn is_polling(&self) -> bool {
        self.readiness
            .as_ref()
            .is_some_and(|watch| !watch.is_finished())
    }

    /// Append a message, persist the conversation, and request a scroll.
    pub fn append_message(&mut self, content: impl Into<String>, is_user: bool) -> &Message {
        let timestamp = format_timestamp(&self.clock.now(), &self.timestamp_format);
        let message = Message::new(content, is_user, self.ids.next_id(), timestamp);
        self.messages.push(message);

        if let Err(e) = save_history(self.store.as_mut(), &self.storage_key, &self.messages) {
            error!(key = %self.storage_key, error = %e, "Failed to save messages");
        }

        self.scroll_request = Some(scroll_target(self.messages.messages()));

        // Just pushed, so never empty
        let index = self.messages.len() - 1;
        &self.messages.messages()[index]
    }

    /// Drop every message and the stored copy.
    pub fn clear_conversation(&mut self) {
        self.messages.clear();
        if let Err(e) = clear_history(self.store.as_mut(), &self.storage_key) {
            warn!(key = %self.storage_key, error = %e, "Failed to remove messages");
        }
        self.scroll_request = Some(ScrollTarget::End);
    }

    /// Send the draft and append the outcome.
    pub async fn send_message(&mut self) {
        if let Some(text) = self.begin_send() {
            let backend = Arc::clone(&self.backend);
            let outcome = backend.chat(&text).await;
            self.finish_send(outcome);
        }
    }

    /// First half of [`send_message`](Self::send_message).
    ///
    /// Returns the text to hand to the backend, or `None` when there is
    /// nothing to dispatch (empty draft, backend not ready, or a send
    /// already in flight).
    pub fn begin_send(&mut self) -> Option<String> {
        if self.is_sending {
            return None;
        }

        let text = self.draft_input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        if !self.ai_ready {
            self.append_message(NOT_READY_NOTICE, false);
            return None;
        }

        self.append_message(text.clone(), true);
        self.draft_input.clear();
        self.is_sending = true;
        Some(text)
    }

    /// Second half of [`send_message`](Self::send_message).
    pub fn finish_send(&mut self, outcome: Result<Reply, BackendError>) {
        match outcome {
            Ok(reply) => {
                let text = extract_reply_text(&reply);
                self.append_message(text, false);
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Chat call failed");
                self.append_message(failure_message(&e), false);
            }
        }
        self.is_sending = false;
    }

    /// Pending scroll request, cleared on read.
    pub fn take_scroll_request(&mut self) -> Option<ScrollTarget> {
        self.scroll_request.take()
    }

    /// Where the view should be scrolled for the current history.
    pub fn scroll_target(&self) -> ScrollTarget {
        scroll_target(self.messages.messages())
    }

    /// The conversation.
    pub fn messages(&self) -> &[Message] {
        self.messages.messages()
    }

    /// The conversation as a whole.
    pub fn conversation(&self) -> &Conversation {
        &self.messages
    }

    /// Current draft.
    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// Replace the draft.
    pub fn set_draft_input(&mut self, draft: impl Into<String>) {
        self.draft_input = draft.into();
    }

    /// Whether the backend has been seen ready.
    pub fn ai_ready(&self) -> bool {
        self.ai_ready
    }

    /// Force the readiness flag, bypassing the poll.
    pub fn set_ai_ready(&mut self, ready: bool) {
        self.ai_ready = ready;
        if ready {
            self.shutdown();
        }
    }

    /// Whether a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Whether the text input accepts edits.
    pub fn input_enabled(&self) -> bool {
        self.ai_ready && !self.is_sending
    }

    /// Whether submitting now would reach the backend.
    pub fn can_send(&self) -> bool {
        self.input_enabled() && !self.draft_input.trim().is_empty()
    }

    /// Readiness indicator.
    pub fn status(&self) -> ReadinessStatus {
        ReadinessStatus::from_flags(self.ai_ready, self.is_sending)
    }

    /// Shared handle to the backend, for dispatching calls off the UI loop.
    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Transcript text for a failed call.
fn failure_message(error: &BackendError) -> String {
    let description = error.to_string();
    let description = description.trim();
    if description.is_empty() {
        format!("{ERROR_PREFIX}{GENERIC_FAILURE}")
    } else {
        format!("{ERROR_PREFIX}{description}")
    }
}
