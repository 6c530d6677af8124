//! Footer keybinding hints.
//!
//! Format: `Sending...            [Enter] send │ [Ctrl+L] clear │ [F1] help`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::visual_width;
use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+L").
    pub key: String,
    /// The action description (e.g., "send", "clear").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Hints for the current input state.
///
/// `keyboard_enhanced` indicates whether the terminal reports modified
/// Enter keys; without it Shift+Enter arrives as plain Enter, so Ctrl+J
/// is advertised for newlines instead.
pub fn hints_for_state(input_enabled: bool, keyboard_enhanced: bool) -> Vec<KeyHint> {
    let mut hints = Vec::new();
    if input_enabled {
        hints.push(KeyHint::new("Enter", "send"));
        let newline_key = if keyboard_enhanced {
            "Shift+Enter"
        } else {
            "Ctrl+J"
        };
        hints.push(KeyHint::new(newline_key, "newline"));
    }
    hints.push(KeyHint::new("Ctrl+L", "clear"));
    hints.push(KeyHint::new("F1", "help"));
    hints.push(KeyHint::new("Esc", "quit"));
    hints
}

/// Footer hints widget.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    status: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer hints widget.
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            hints,
            theme,
            status: None,
        }
    }

    /// Short status text shown on the left.
    #[must_use]
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut left_spans = Vec::new();
        if let Some(status) = self.status {
            left_spans.push(Span::styled(
                format!(" {status}"),
                Style::default().fg(self.theme.subtext),
            ));
        }

        let mut right_spans = Vec::new();
        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                right_spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            }
            right_spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(
                hint.key.as_str(),
                Style::default().fg(self.theme.primary),
            ));
            right_spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(
                hint.action.as_str(),
                Style::default().fg(self.theme.subtext),
            ));
        }
        right_spans.push(Span::raw(" "));

        let left_width: usize = left_spans.iter().map(|s| visual_width(&s.content)).sum();
        let right_width: usize = right_spans.iter().map(|s| visual_width(&s.content)).sum();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);
        if padding > 0 {
            left_spans.push(Span::raw(" ".repeat(padding)));
        }
        left_spans.extend(right_spans);

        Paragraph::new(Line::from(left_spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}
