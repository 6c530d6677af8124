//! Screen layout for the chat view.
//!
//! ```text
//!  ● AI Ready                       claude │ 4 messages   <- status bar
//! ┌─ Conversation ─────────────────────────────────────┐
//! │ AI · 14:03                                         │  <- transcript
//! │ Hello!                                             │
//! └────────────────────────────────────────────────────┘
//! ┌────────────────────────────────────────────────────┐
//! │> Type your message...                              │  <- input bar
//! └────────────────────────────────────────────────────┘
//!  [Enter] send │ [Ctrl+L] clear │ [F1] help            <- footer
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Minimum terminal width for the full layout.
pub const MIN_WIDTH: u16 = 30;

/// Minimum terminal height for the full layout.
pub const MIN_HEIGHT: u16 = 10;

/// Areas of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub status: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub footer: Rect,
}

impl ChatLayout {
    /// Split `area` given the input bar height.
    pub fn new(area: Rect, input_height: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(input_height),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            status: chunks[0],
            transcript: chunks[1],
            input: chunks[2],
            footer: chunks[3],
        }
    }
}

/// Whether `area` is too small for the full layout.
pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
