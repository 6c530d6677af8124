//! palaver-tui: Terminal UI for the palaver chat client
//!
//! This crate provides the interactive layer on top of `palaver-engine`:
//! - A scrollable conversation transcript
//! - A multi-line input bar gated on backend readiness
//! - Status bar, footer hints and a help overlay

mod app;
mod conversation;
mod event;
mod layout;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod view;
mod widgets;

pub use app::App;
pub use event::{key_to_action, mouse_to_action, Action, Event, EventHandler};
pub use palaver_engine;
pub use theme::Theme;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use palaver_engine::{BackendError, ConversationController, Reply};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Tick rate for redraws and readiness checks.
const TICK_MS: u64 = 100;

type ChatHandle = JoinHandle<Result<Reply, BackendError>>;

/// RAII guard for terminal state restoration.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the chat TUI until the user quits.
///
/// Loads history and starts the readiness poll, then restores the terminal
/// on exit.
pub async fn run_tui(mut controller: ConversationController) -> Result<(), Box<dyn std::error::Error>> {
    controller.initialize();

    enable_raw_mode()?;
    let mut guard = TerminalGuard {
        keyboard_enhanced: false,
    };

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Shift+Enter is only distinguishable with the kitty keyboard protocol
    if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        guard.keyboard_enhanced = true;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    app.keyboard_enhanced = guard.keyboard_enhanced;
    info!(keyboard_enhanced = app.keyboard_enhanced, "TUI started");

    let mut events = EventHandler::new(TICK_MS);
    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    app.controller.shutdown();
    terminal.show_cursor()?;
    drop(guard);

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chat_handle: Option<ChatHandle> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            view::render_chat(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_action(key_to_action(key)),
                Event::Mouse(mouse) => app.handle_action(mouse_to_action(mouse)),
                Event::Tick => app.tick(),
                // Layout is recomputed on every draw
                Event::Resize(_, _) => {}
            }
        }

        if let Some(text) = app.take_outgoing() {
            let backend = app.controller.backend();
            debug!(backend = backend.name(), "Dispatching message");
            chat_handle = Some(tokio::spawn(async move { backend.chat(&text).await }));
        }

        if chat_handle.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = chat_handle.take() {
                let outcome = handle.await.unwrap_or_else(|e| {
                    warn!(error = %e, "Chat task failed");
                    Err(BackendError::Rejected(e.to_string()))
                });
                app.finish_send(outcome);
            }
        }

        if app.should_quit {
            if let Some(handle) = chat_handle.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
