//! Status bar widget for the top of the TUI.
//!
//! Format: `● AI Ready                      claude │ 4 messages`

use palaver_engine::ReadinessStatus;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::{truncate_to_width, visual_width};
use crate::theme::Theme;

/// Longest backend name shown before truncation.
const MAX_BACKEND_WIDTH: usize = 24;

/// Status bar widget.
pub struct StatusBar<'a> {
    status: ReadinessStatus,
    theme: &'a Theme,
    backend: Option<&'a str>,
    message_count: usize,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(status: ReadinessStatus, theme: &'a Theme) -> Self {
        Self {
            status,
            theme,
            backend: None,
            message_count: 0,
        }
    }

    /// Backend name shown on the right.
    #[must_use]
    pub fn backend(mut self, name: &'a str) -> Self {
        self.backend = Some(name);
        self
    }

    /// Number of messages in the conversation.
    #[must_use]
    pub fn message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{count} messages")
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dot_color = match self.status {
            ReadinessStatus::Ready => self.theme.success,
            ReadinessStatus::Waiting => self.theme.warning,
        };

        let mut left_spans = vec![
            Span::styled(" ● ", Style::default().fg(dot_color)),
            Span::styled(self.status.label(), Style::default().fg(self.theme.text)),
        ];

        let mut right_spans = Vec::new();
        if let Some(backend) = self.backend {
            right_spans.push(Span::styled(
                truncate_to_width(backend, MAX_BACKEND_WIDTH),
                Style::default().fg(self.theme.subtext),
            ));
            right_spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
        }
        right_spans.push(Span::styled(
            format!("{} ", count_label(self.message_count)),
            Style::default().fg(self.theme.subtext),
        ));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, render_widget};

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 messages");
        assert_eq!(count_label(1), "1 message");
        assert_eq!(count_label(12), "12 messages");
    }

    #[test]
    fn test_ready_status_bar() {
        let theme = Theme::default();
        let bar = StatusBar::new(ReadinessStatus::Ready, &theme)
            .backend("claude")
            .message_count(4);
        let buffer = render_widget(bar, 40, 1);
        assert_eq!(
            buffer_to_string(&buffer),
            " ● AI Ready         claude │ 4 messages"
        );
    }

    #[test]
    fn test_waiting_status_bar() {
        let theme = Theme::default();
        let bar = StatusBar::new(ReadinessStatus::Waiting, &theme);
        let buffer = render_widget(bar, 40, 1);
        let rendered = buffer_to_string(&buffer);
        assert!(rendered.starts_with(" ● Waiting for AI"), "got: {rendered}");
        assert!(rendered.ends_with("0 messages"), "got: {rendered}");
    }
}
