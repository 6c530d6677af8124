//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen. Multi-line drafts grow the
//! bar up to [`MAX_INPUT_LINES`] rows, then scroll to keep the cursor visible.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Placeholder while the backend is ready.
pub const READY_PLACEHOLDER: &str = "Type your message...";

/// Placeholder while waiting for the backend.
pub const WAITING_PLACEHOLDER: &str = "Waiting for AI...";

/// Most draft lines shown before the bar scrolls.
pub const MAX_INPUT_LINES: u16 = 5;

const PROMPT: &str = "> ";
const CONTINUATION: &str = "  ";
const CURSOR: &str = "█";

/// Placeholder text for the input bar.
pub fn input_placeholder(ai_ready: bool) -> &'static str {
    if ai_ready {
        READY_PLACEHOLDER
    } else {
        WAITING_PLACEHOLDER
    }
}

/// Height of the bar, including borders, for the current draft.
#[allow(clippy::cast_possible_truncation)]
pub fn input_height(input: &TextInputState) -> u16 {
    let lines = input.line_count().min(MAX_INPUT_LINES as usize) as u16;
    lines.max(1) + 2
}

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    enabled: bool,
    ai_ready: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            enabled: true,
            ai_ready: true,
        }
    }

    /// Whether edits are accepted; a disabled bar is dimmed and hides the cursor.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Backend readiness, which picks the placeholder.
    #[must_use]
    pub fn ai_ready(mut self, ai_ready: bool) -> Self {
        self.ai_ready = ai_ready;
        self
    }

    fn placeholder_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(PROMPT, Style::default().fg(self.theme.primary))];
        if self.enabled {
            spans.push(Span::styled(CURSOR, Style::default().fg(self.theme.text)));
        }
        spans.push(Span::styled(
            input_placeholder(self.ai_ready),
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::ITALIC),
        ));
        Line::from(spans)
    }

    /// Build display lines and the index of the line holding the cursor.
    fn build_input_lines(&self) -> (Vec<Line<'static>>, usize) {
        let (cursor_line, cursor_col) = self.input.cursor_line_col();
        let text_style = if self.enabled {
            Style::default().fg(self.theme.text)
        } else {
            Style::default().fg(self.theme.muted)
        };

        let lines = self
            .input
            .content()
            .split('\n')
            .enumerate()
            .map(|(idx, text)| {
                let prefix = if idx == 0 { PROMPT } else { CONTINUATION };
                let mut spans = vec![Span::styled(prefix, Style::default().fg(self.theme.primary))];

                if self.enabled && idx == cursor_line {
                    let before: String = text.chars().take(cursor_col).collect();
                    let after: String = text.chars().skip(cursor_col).collect();
                    spans.push(Span::styled(before, text_style));
                    spans.push(Span::styled(CURSOR, Style::default().fg(self.theme.text)));
                    spans.push(Span::styled(after, text_style));
                } else {
                    spans.push(Span::styled(text.to_string(), text_style));
                }
                Line::from(spans)
            })
            .collect();

        (lines, cursor_line)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.enabled))
            .style(Style::default().bg(self.theme.base));

        let inner_height = area.height.saturating_sub(2) as usize;

        let paragraph = if self.input.is_empty() {
            Paragraph::new(self.placeholder_line()).block(block)
        } else {
            let (lines, cursor_line) = self.build_input_lines();

            // Keep the cursor line on screen
            let scroll_offset = if lines.len() <= inner_height {
                0
            } else {
                cursor_line.saturating_sub(inner_height.saturating_sub(1))
            };

            Paragraph::new(lines)
                .block(block)
                .scroll((scroll_offset as u16, 0))
        };

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, render_widget};

    #[test]
    fn test_placeholder_follows_readiness() {
        assert_eq!(input_placeholder(true), "Type your message...");
        assert_eq!(input_placeholder(false), "Waiting for AI...");
    }

    #[test]
    fn test_input_height_grows_then_caps() {
        let mut input = TextInputState::new();
        assert_eq!(input_height(&input), 3);

        input.insert_str("a\nb\nc");
        assert_eq!(input_height(&input), 5);

        input.insert_str("\nd\ne\nf\ng");
        assert_eq!(input_height(&input), MAX_INPUT_LINES + 2);
    }

    #[test]
    fn test_renders_waiting_placeholder() {
        let input = TextInputState::new();
        let theme = Theme::default();
        let buffer = render_widget(
            InputBar::new(&input, &theme).enabled(false).ai_ready(false),
            30,
            3,
        );
        insta::assert_snapshot!(buffer_to_string(&buffer), @r"
        ┌────────────────────────────┐
        │> Waiting for AI...         │
        └────────────────────────────┘
        ");
    }

    #[test]
    fn test_renders_cursor_inside_draft() {
        let mut input = TextInputState::new();
        input.insert_str("hello");
        input.move_left();
        input.move_left();
        let theme = Theme::default();
        let buffer = render_widget(InputBar::new(&input, &theme), 20, 3);
        let rendered = buffer_to_string(&buffer);
        assert!(rendered.contains("> hel█lo"), "got:\n{rendered}");
    }

    #[test]
    fn test_scrolls_to_cursor_line() {
        let mut input = TextInputState::new();
        input.insert_str("one\ntwo\nthree\nfour");
        let theme = Theme::default();
        let buffer = render_widget(InputBar::new(&input, &theme), 20, 4);
        let rendered = buffer_to_string(&buffer);
        assert!(rendered.contains("four█"), "got:\n{rendered}");
        assert!(!rendered.contains("one"), "got:\n{rendered}");
    }
}
