//! Transcript scroll state.

use palaver_engine::ScrollTarget;

use super::lines::TranscriptLines;

/// Lines scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Scroll position of the transcript viewport.
///
/// Offsets are in lines. The bounds are refreshed on every render, so
/// scroll requests made between renders resolve against the current layout.
#[derive(Debug, Default)]
pub struct TranscriptState {
    scroll_offset: usize,
    max_offset: usize,
    viewport_height: usize,
    pending: Option<ScrollTarget>,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first visible line.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Bring `target` into view on the next render.
    pub fn request(&mut self, target: ScrollTarget) {
        self.pending = Some(target);
    }

    /// Whether a scroll request is waiting for the next render.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_offset);
    }

    /// Scroll up by one viewport, keeping a line of overlap.
    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.saturating_sub(1).max(1));
    }

    /// Scroll down by one viewport, keeping a line of overlap.
    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.saturating_sub(1).max(1));
    }

    /// Fit the state to a fresh layout and resolve any pending request.
    ///
    /// A message target puts the message's first line at the top of the
    /// viewport, as far as the content allows.
    pub fn sync(&mut self, lines: &TranscriptLines, viewport_height: usize) {
        self.viewport_height = viewport_height;
        self.max_offset = lines.len().saturating_sub(viewport_height);

        if let Some(target) = self.pending.take() {
            self.scroll_offset = match target {
                ScrollTarget::Message(id) => lines.start_of(id).unwrap_or(self.max_offset),
                ScrollTarget::End => self.max_offset,
            };
        }
        self.scroll_offset = self.scroll_offset.min(self.max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::lines::layout_messages;
    use crate::theme::Theme;
    use palaver_engine::Message;
    use uuid::Uuid;

    /// Ten one-line messages: 29 lines, message n starts at line 3 * (n - 1).
    fn ten_messages() -> TranscriptLines {
        let messages: Vec<Message> = (1..=10)
            .map(|n| Message::new("x", n % 2 == 1, Uuid::from_u128(n), "12:00"))
            .collect();
        layout_messages(&messages, 40, false, &Theme::default())
    }

    #[test]
    fn test_end_request_scrolls_to_bottom() {
        let lines = ten_messages();
        assert_eq!(lines.len(), 29);

        let mut state = TranscriptState::new();
        state.request(ScrollTarget::End);
        state.sync(&lines, 10);
        assert_eq!(state.scroll_offset(), 19);
        assert!(!state.has_pending());
    }

    #[test]
    fn test_message_request_puts_message_at_top() {
        let lines = ten_messages();
        let mut state = TranscriptState::new();

        state.request(ScrollTarget::Message(Uuid::from_u128(4)));
        state.sync(&lines, 10);
        assert_eq!(state.scroll_offset(), lines.start_of(Uuid::from_u128(4)).unwrap());
    }

    #[test]
    fn test_message_request_near_end_is_clamped() {
        let lines = ten_messages();
        let mut state = TranscriptState::new();

        state.request(ScrollTarget::Message(Uuid::from_u128(10)));
        state.sync(&lines, 10);
        assert_eq!(state.scroll_offset(), 19);
    }

    #[test]
    fn test_unknown_message_falls_back_to_end() {
        let lines = ten_messages();
        let mut state = TranscriptState::new();
        state.request(ScrollTarget::Message(Uuid::from_u128(99)));
        state.sync(&lines, 10);
        assert_eq!(state.scroll_offset(), 19);
    }

    #[test]
    fn test_manual_scrolling_is_bounded() {
        let lines = ten_messages();
        let mut state = TranscriptState::new();
        state.sync(&lines, 10);

        state.scroll_up(5);
        assert_eq!(state.scroll_offset(), 0);

        state.page_down();
        assert_eq!(state.scroll_offset(), 9);
        state.page_down();
        state.page_down();
        assert_eq!(state.scroll_offset(), 19);

        state.page_up();
        assert_eq!(state.scroll_offset(), 10);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let lines = ten_messages();
        let mut state = TranscriptState::new();
        state.request(ScrollTarget::End);
        state.sync(&lines, 100);
        assert_eq!(state.scroll_offset(), 0);
        state.scroll_down(3);
        assert_eq!(state.scroll_offset(), 0);
    }
}
