//! Catppuccin Mocha color palette for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub secondary: Color,

    // Semantic
    pub success: Color,
    pub warning: Color,

    // Authors
    pub user: Color,
    pub assistant: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),       // #1e1e2e
            surface: Color::Rgb(49, 50, 68),    // #313244
            overlay: Color::Rgb(69, 71, 90),    // #45475a

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            primary: Color::Rgb(180, 190, 254),   // #b4befe (lavender)
            secondary: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            success: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
            warning: Color::Rgb(249, 226, 175), // #f9e2af (yellow)

            user: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
            assistant: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Style for plain text on the base background.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for secondary information.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for an author label.
    pub fn author_style(&self, is_user: bool) -> Style {
        let color = if is_user { self.user } else { self.assistant };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Border style, highlighted when focused.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_styles_differ() {
        let theme = Theme::default();
        assert_ne!(theme.author_style(true), theme.author_style(false));
        assert_eq!(theme.author_style(true).fg, Some(theme.user));
    }

    #[test]
    fn test_border_style_tracks_focus() {
        let theme = Theme::mocha();
        assert_eq!(theme.border_style(true).fg, Some(theme.border_focused));
        assert_eq!(theme.border_style(false).fg, Some(theme.border));
    }
}
