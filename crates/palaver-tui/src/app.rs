//! Application state and update logic for the palaver TUI.

use palaver_engine::{BackendError, ConversationController, Reply};
use tracing::debug;

use crate::conversation::{TranscriptState, SCROLL_SPEED};
use crate::event::Action;
use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Whether the terminal reports modified Enter keys.
    pub keyboard_enhanced: bool,

    /// Conversation state and behavior.
    pub controller: ConversationController,

    /// Draft being edited.
    pub input: TextInputState,

    /// Transcript scroll position.
    pub transcript: TranscriptState,

    /// Theme colors.
    pub theme: Theme,

    /// Text accepted for sending, waiting to be dispatched.
    outgoing: Option<String>,
}

impl App {
    /// Create an app around an initialized controller.
    pub fn new(controller: ConversationController) -> Self {
        let mut transcript = TranscriptState::new();
        transcript.request(controller.scroll_target());

        Self {
            should_quit: false,
            show_help: false,
            keyboard_enhanced: false,
            controller,
            input: TextInputState::new(),
            transcript,
            theme: Theme::default(),
            outgoing: None,
        }
    }

    /// Apply a user action.
    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            // Any key closes help
            if action != Action::None {
                self.show_help = false;
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Clear => {
                self.controller.clear_conversation();
                self.sync_scroll();
            }
            Action::Send => self.submit(),
            Action::Newline => self.edit(|input| input.insert('\n')),
            Action::Insert(c) => self.edit(|input| input.insert(c)),
            Action::Backspace => self.edit(TextInputState::backspace),
            Action::Delete => self.edit(TextInputState::delete),
            Action::Left => self.edit(TextInputState::move_left),
            Action::Right => self.edit(TextInputState::move_right),
            Action::Home => self.edit(TextInputState::move_home),
            Action::End => self.edit(TextInputState::move_end),
            Action::Up => {
                if self.browsing_allowed() {
                    self.edit(TextInputState::history_prev);
                } else {
                    self.transcript.scroll_up(1);
                }
            }
            Action::Down => {
                if self.browsing_allowed() {
                    self.edit(TextInputState::history_next);
                } else {
                    self.transcript.scroll_down(1);
                }
            }
            Action::PageUp => self.transcript.page_up(),
            Action::PageDown => self.transcript.page_down(),
            Action::ScrollUp => self.transcript.scroll_up(SCROLL_SPEED),
            Action::ScrollDown => self.transcript.scroll_down(SCROLL_SPEED),
            Action::None => {}
        }
    }

    /// Periodic update: pick up backend readiness.
    pub fn tick(&mut self) {
        if self.controller.refresh_readiness() {
            debug!("Input enabled");
        }
    }

    /// Text accepted by the last submit, if it has not been dispatched yet.
    pub fn take_outgoing(&mut self) -> Option<String> {
        self.outgoing.take()
    }

    /// Record the outcome of a dispatched chat call.
    pub fn finish_send(&mut self, outcome: Result<Reply, BackendError>) {
        self.controller.finish_send(outcome);
        self.sync_scroll();
    }

    fn browsing_allowed(&self) -> bool {
        self.input.is_empty() || self.input.is_browsing_history()
    }

    /// Run an edit on the draft if input is enabled, then mirror it.
    fn edit(&mut self, f: impl FnOnce(&mut TextInputState)) {
        if !self.controller.input_enabled() {
            return;
        }
        f(&mut self.input);
        self.controller.set_draft_input(self.input.content());
    }

    fn submit(&mut self) {
        self.controller.set_draft_input(self.input.content());
        if let Some(text) = self.controller.begin_send() {
            self.input.submit();
            self.outgoing = Some(text);
        }
        self.sync_scroll();
    }

    fn sync_scroll(&mut self) {
        if let Some(target) = self.controller.take_scroll_request() {
            self.transcript.request(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_waiting_app};
    use palaver_engine::{ScrollTarget, NOT_READY_NOTICE};

    fn text_reply(text: &str) -> Reply {
        Reply::String(text.to_string())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    #[test]
    fn test_typing_mirrors_draft() {
        let mut app = create_test_app();
        type_text(&mut app, "hey");
        app.handle_action(Action::Backspace);
        assert_eq!(app.input.content(), "he");
        assert_eq!(app.controller.draft_input(), "he");
    }

    #[test]
    fn test_send_round_trip() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        app.handle_action(Action::Send);

        assert_eq!(app.take_outgoing().as_deref(), Some("hi"));
        assert!(app.input.is_empty());
        assert!(app.controller.is_sending());

        // Input is locked while sending
        type_text(&mut app, "more");
        assert!(app.input.is_empty());

        app.finish_send(Ok(text_reply("Hello!")));
        assert!(!app.controller.is_sending());
        let last = app.controller.messages().last().unwrap();
        assert_eq!(last.content(), "Hello!");
        assert!(app.transcript.has_pending());
    }

    #[test]
    fn test_enter_on_blank_draft_is_inert() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        app.handle_action(Action::Send);
        assert_eq!(app.take_outgoing(), None);
        assert!(app.controller.messages().is_empty());
        assert_eq!(app.input.content(), "   ");
    }

    #[test]
    fn test_newline_keeps_draft_multiline() {
        let mut app = create_test_app();
        type_text(&mut app, "a");
        app.handle_action(Action::Newline);
        type_text(&mut app, "b");
        assert_eq!(app.controller.draft_input(), "a\nb");
    }

    #[test]
    fn test_waiting_app_ignores_input() {
        let mut app = create_waiting_app();
        type_text(&mut app, "hi");
        app.handle_action(Action::Send);
        assert!(app.input.is_empty());
        assert_eq!(app.take_outgoing(), None);
        assert!(app
            .controller
            .messages()
            .iter()
            .all(|m| m.content() != NOT_READY_NOTICE));
    }

    #[test]
    fn test_clear_empties_and_scrolls_to_end() {
        let mut app = create_test_app();
        app.controller.append_message("old", false);
        app.handle_action(Action::Clear);
        assert!(app.controller.messages().is_empty());
        assert!(app.transcript.has_pending());
        assert_eq!(app.controller.scroll_target(), ScrollTarget::End);
    }

    #[test]
    fn test_history_browsing_with_up_down() {
        let mut app = create_test_app();
        type_text(&mut app, "first");
        app.handle_action(Action::Send);
        let _ = app.take_outgoing();
        app.finish_send(Ok(text_reply("ok")));

        app.handle_action(Action::Up);
        assert_eq!(app.input.content(), "first");
        app.handle_action(Action::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_help_closes_before_quit() {
        let mut app = create_test_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_ignores_idle_actions() {
        let mut app = create_test_app();
        app.handle_action(Action::Help);
        app.handle_action(Action::None);
        assert!(app.show_help);
    }
}
