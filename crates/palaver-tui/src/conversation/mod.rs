//! Conversation transcript.
//!
//! - `lines` turns messages into styled, wrapped lines
//! - [`TranscriptState`] tracks the scroll position and pending scroll requests
//! - [`TranscriptWidget`] renders the bordered, scrollable list

mod lines;
mod state;
mod widget;

pub use lines::EMPTY_HINT;
pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::TranscriptWidget;
