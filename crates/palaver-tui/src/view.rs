//! Chat screen rendering.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::app::App;
use crate::conversation::TranscriptWidget;
use crate::layout::{is_too_small, ChatLayout, MIN_HEIGHT, MIN_WIDTH};
use crate::widgets::{
    hints_for_state, input_height, FooterHints, HelpOverlay, InputBar, StatusBar,
};

const SENDING_STATUS: &str = "Sending...";

/// Render the whole chat screen.
pub fn render_chat(app: &mut App, area: Rect, buf: &mut Buffer) {
    if is_too_small(area) {
        render_too_small(app, area, buf);
        return;
    }

    let layout = ChatLayout::new(area, input_height(&app.input));
    let controller = &app.controller;
    let backend = controller.backend();

    StatusBar::new(controller.status(), &app.theme)
        .backend(backend.name())
        .message_count(controller.messages().len())
        .render(layout.status, buf);

    TranscriptWidget::new(controller.messages(), &app.theme)
        .thinking(controller.is_sending())
        .render(layout.transcript, buf, &mut app.transcript);

    InputBar::new(&app.input, &app.theme)
        .enabled(controller.input_enabled())
        .ai_ready(controller.ai_ready())
        .render(layout.input, buf);

    let hints = hints_for_state(controller.input_enabled(), app.keyboard_enhanced);
    let status = controller.is_sending().then_some(SENDING_STATUS);
    FooterHints::new(&hints, &app.theme)
        .status(status)
        .render(layout.footer, buf);

    if app.show_help {
        HelpOverlay::new(&app.theme).render(area, buf);
    }
}

fn render_too_small(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from("Terminal too small"),
        Line::from(format!("need {MIN_WIDTH}x{MIN_HEIGHT}")),
    ];
    let y = area.y + area.height.saturating_sub(2) / 2;
    let message_area = Rect::new(area.x, y, area.width, area.height.min(2));
    Paragraph::new(lines)
        .centered()
        .style(Style::default().fg(app.theme.warning))
        .render(message_area, buf);
}
