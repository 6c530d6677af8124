//! Lay out messages as styled terminal lines.
//!
//! Each message is an author line (`You · 14:03`) followed by its wrapped
//! body, with a blank line between messages. User messages are
//! right-aligned and wrap narrower than AI messages.

use palaver_engine::Message;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use uuid::Uuid;

use crate::text::wrap_text;
use crate::theme::Theme;

/// Shown in place of the transcript when there are no messages.
pub const EMPTY_HINT: &str = "Start chatting with the AI by typing your message below.";

/// Shown below the transcript while a reply is pending.
pub const THINKING_TEXT: &str = "AI is thinking...";

/// Narrowest wrap width for a user message.
const MIN_USER_WIDTH: usize = 20;

/// Laid-out transcript.
#[derive(Debug, Default)]
pub struct TranscriptLines {
    pub lines: Vec<Line<'static>>,
    /// First line of each message, in message order.
    starts: Vec<(Uuid, usize)>,
}

impl TranscriptLines {
    /// Line index where the message with `id` begins.
    pub fn start_of(&self, id: Uuid) -> Option<usize> {
        self.starts
            .iter()
            .find(|(message_id, _)| *message_id == id)
            .map(|(_, line)| *line)
    }

    /// Total number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wrap width for user messages.
fn user_width(width: usize) -> usize {
    (width * 4 / 5).max(MIN_USER_WIDTH).min(width)
}

fn align(line: Line<'static>, is_user: bool) -> Line<'static> {
    if is_user {
        line.right_aligned()
    } else {
        line
    }
}

/// Lay out `messages` for a viewport `width` cells wide.
pub fn layout_messages(
    messages: &[Message],
    width: usize,
    thinking: bool,
    theme: &Theme,
) -> TranscriptLines {
    let mut out = TranscriptLines::default();

    for message in messages {
        if !out.lines.is_empty() {
            out.lines.push(Line::default());
        }
        out.starts.push((message.id(), out.lines.len()));

        let is_user = message.is_user();
        let header = Line::from(vec![
            Span::styled(message.author_label(), theme.author_style(is_user)),
            Span::styled(" · ", theme.muted_style()),
            Span::styled(message.timestamp().to_string(), theme.muted_style()),
        ]);
        out.lines.push(align(header, is_user));

        let body_style = theme.text_style();
        let wrap_width = if is_user { user_width(width) } else { width };
        for text in wrap_text(message.content(), wrap_width) {
            out.lines
                .push(align(Line::from(Span::styled(text, body_style)), is_user));
        }
    }

    if thinking {
        if !out.lines.is_empty() {
            out.lines.push(Line::default());
        }
        out.lines.push(Line::from(Span::styled(
            THINKING_TEXT,
            Style::default()
                .fg(theme.assistant)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    out
}
