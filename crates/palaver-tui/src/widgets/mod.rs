//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`StatusBar`] - Top bar with the readiness indicator
//! - [`InputBar`] - Draft editor with placeholder and cursor
//! - [`FooterHints`] - Bottom keybinding hints
//! - [`HelpOverlay`] - Keybinding reference

mod footer_hints;
mod help;
mod input_bar;
mod status_bar;
mod text_input;

pub use footer_hints::{hints_for_state, FooterHints};
pub use help::HelpOverlay;
pub use input_bar::{input_height, InputBar};
pub use status_bar::StatusBar;
pub use text_input::TextInputState;
