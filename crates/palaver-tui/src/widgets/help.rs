//! Help overlay listing the keybindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::layout::centered_fixed;
use crate::theme::Theme;

const HELP_TEXT: &str = "
  Enter              Send message
  Shift+Enter        New line (also Ctrl+J)
  Up / Down          Previous / next sent message
  PageUp / PageDown  Scroll conversation
  Ctrl+L             Clear conversation
  F1                 Toggle this help
  Esc / Ctrl+C       Quit

  [Press any key to close]
";

/// Centered help overlay.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 52.min(area.width.saturating_sub(4));
        let height = 13.min(area.height.saturating_sub(2));
        let overlay_area = centered_fixed(width, height, area);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true))
            .style(Style::default().bg(self.theme.overlay).fg(self.theme.text));

        Paragraph::new(HELP_TEXT).block(block).render(overlay_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, render_widget};

    #[test]
    fn test_help_lists_keys() {
        let theme = Theme::default();
        let buffer = render_widget(HelpOverlay::new(&theme), 80, 24);
        let rendered = buffer_to_string(&buffer);
        assert!(rendered.contains("Help"));
        assert!(rendered.contains("Ctrl+L"));
        assert!(rendered.contains("Clear conversation"));
    }

    #[test]
    fn test_help_tiny_area_does_not_panic() {
        let theme = Theme::default();
        let _ = render_widget(HelpOverlay::new(&theme), 4, 2);
    }
}
