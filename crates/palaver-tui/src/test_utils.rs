//! Test utilities for palaver-tui rendering and app tests.

use std::sync::Arc;

use async_trait::async_trait;
use palaver_engine::{BackendError, ChatBackend, ConversationController, MemoryStore, Reply};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::app::App;

/// Backend that never has to leave the process.
pub struct StubBackend;

#[async_trait]
impl ChatBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn chat(&self, message: &str) -> Result<Reply, BackendError> {
        Ok(Reply::String(format!("echo: {message}")))
    }
}

/// Controller with in-memory storage and a stub backend, not yet ready.
pub fn create_test_controller() -> ConversationController {
    ConversationController::new(Box::new(MemoryStore::new()), Arc::new(StubBackend))
}

/// App that is ready to send.
pub fn create_test_app() -> App {
    let mut controller = create_test_controller();
    controller.set_ai_ready(true);
    App::new(controller)
}

/// App still waiting for the backend.
pub fn create_waiting_app() -> App {
    App::new(create_test_controller())
}

/// Render a widget into a fresh buffer of the given size.
pub fn render_widget(widget: impl Widget, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    buffer
}

/// Convert a buffer to a string, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            result.push_str(buffer[(x, y)].symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }
    result
}
