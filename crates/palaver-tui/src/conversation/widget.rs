//! Transcript widget.
//!
//! ```text
//! ┌─ Conversation ─────────────────────────────┐
//! │                                 You · 14:02 │
//! │                                          hi │
//! │                                             │
//! │ AI · 14:03                                  │
//! │ Hello! How can I help?                      │
//! └─────────────────────────────────────────────┘
//! ```

use palaver_engine::Message;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use super::lines::{layout_messages, EMPTY_HINT};
use super::state::TranscriptState;
use crate::theme::Theme;

/// Scrollable message list.
pub struct TranscriptWidget<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    thinking: bool,
}

impl<'a> TranscriptWidget<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            thinking: false,
        }
    }

    /// Show the pending-reply indicator.
    #[must_use]
    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let hint_area = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        let line = Line::from(Span::styled(
            EMPTY_HINT,
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))
        .centered();
        Paragraph::new(line).render(hint_area, buf);
    }
}

#[allow(clippy::cast_possible_truncation)]
impl StatefulWidget for TranscriptWidget<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.messages.is_empty() && !self.thinking {
            // Keep bounds current so a later request resolves cleanly
            state.sync(&Default::default(), inner.height as usize);
            self.render_empty(inner, buf);
            return;
        }

        // One column of padding on each side
        let text_area = Rect::new(
            inner.x.saturating_add(1),
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        let laid_out = layout_messages(
            self.messages,
            text_area.width as usize,
            self.thinking,
            self.theme,
        );
        state.sync(&laid_out, text_area.height as usize);

        let offset = u16::try_from(state.scroll_offset()).unwrap_or(u16::MAX);
        Paragraph::new(laid_out.lines)
            .scroll((offset, 0))
            .render(text_area, buf);
    }
}
