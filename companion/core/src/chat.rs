//! Chat view state
//!
//! One mount of the chat screen: its lifecycle phase, transcript, typing
//! indicator, input buffer and the session opened for it. Everything here is
//! discarded when the view is unmounted.

use std::sync::Arc;

use tracing::warn;

use crate::backend::{ChatReply, ChatSession};
use crate::error::BackendResult;
use crate::events::ViewId;
use crate::messages::{Message, Transcript};

/// First entry when the session could not be opened or greeted
pub const INIT_FAILURE_MESSAGE: &str = "I'm having trouble connecting right now. (API Error)";

/// Entry appended when a turn fails
pub const TURN_FAILURE_MESSAGE: &str = "I didn't quite catch that. Could you say it again?";

/// Greeting used when the model replied with nothing
pub const EMPTY_GREETING: &str = "Hello!";

/// Reply used when the model answered a turn with nothing
pub const EMPTY_REPLY: &str = "...";

/// Lifecycle of a chat view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatPhase {
    /// Mounted, initialization not started
    Uninitialized,
    /// Opening the session and waiting for the greeting
    Initializing,
    /// Greeting received
    Ready,
    /// Opening or greeting failed
    Degraded,
}

/// A turn ready to be sent
pub(crate) struct OutgoingTurn {
    pub text: String,
    pub session: Option<Arc<dyn ChatSession>>,
}

/// State of one mount of the chat screen
pub struct ChatView {
    id: ViewId,
    phase: ChatPhase,
    transcript: Transcript,
    typing: bool,
    input: String,
    session: Option<Arc<dyn ChatSession>>,
}

impl ChatView {
    /// A freshly mounted chat view
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ViewId::new(),
            phase: ChatPhase::Uninitialized,
            transcript: Transcript::new(),
            typing: false,
            input: String::new(),
            session: None,
        }
    }

    /// Identity of this mount
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Messages so far
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a reply is pending
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Whether a session is open
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Current input buffer
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Append a character to the input buffer
    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last character of the input buffer
    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Whether a send would be accepted right now
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty()
            && !self.typing
            && matches!(self.phase, ChatPhase::Ready | ChatPhase::Degraded)
    }

    /// Enter `Initializing`; only valid once per mount
    pub(crate) fn begin_init(&mut self) -> bool {
        if self.phase != ChatPhase::Uninitialized {
            return false;
        }
        self.phase = ChatPhase::Initializing;
        self.typing = true;
        true
    }

    /// Record the outcome of opening the session and requesting the greeting
    pub(crate) fn settle_init(
        &mut self,
        session: Option<Arc<dyn ChatSession>>,
        greeting: BackendResult<ChatReply>,
    ) {
        self.typing = false;
        self.session = session;
        match greeting {
            Ok(reply) => {
                self.transcript
                    .push(Message::model(reply.text_or(EMPTY_GREETING)));
                self.phase = ChatPhase::Ready;
            }
            Err(e) => {
                warn!(view = %self.id, error = %e, "Chat initialization failed");
                self.transcript.push(Message::model(INIT_FAILURE_MESSAGE));
                self.phase = ChatPhase::Degraded;
            }
        }
    }

    /// Take the input as a user turn
    ///
    /// Appends the user entry, clears the input and raises the typing
    /// indicator. Returns `None` without side effects when sending is not
    /// allowed.
    pub(crate) fn begin_turn(&mut self) -> Option<OutgoingTurn> {
        if !self.can_send() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(text.clone()));
        self.typing = true;
        Some(OutgoingTurn {
            text,
            session: self.session.clone(),
        })
    }

    /// Record the reply to the pending turn
    pub(crate) fn settle_turn(&mut self, result: BackendResult<ChatReply>) {
        self.typing = false;
        match result {
            Ok(reply) => self.transcript.push(Message::model(reply.text_or(EMPTY_REPLY))),
            Err(e) => {
                warn!(view = %self.id, error = %e, "Chat turn failed");
                self.transcript.push(Message::model(TURN_FAILURE_MESSAGE));
            }
        }
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::messages::Role;
    use pretty_assertions::assert_eq;

    fn ready_view() -> ChatView {
        let mut view = ChatView::new();
        view.begin_init();
        view.settle_init(None, Ok(ChatReply::new("Hi!")));
        view
    }

    #[test]
    fn test_init_success() {
        let mut view = ChatView::new();
        assert!(view.begin_init());
        assert!(view.is_typing());
        assert_eq!(view.phase(), ChatPhase::Initializing);
        assert!(!view.begin_init());

        view.settle_init(None, Ok(ChatReply::empty()));
        assert!(!view.is_typing());
        assert_eq!(view.phase(), ChatPhase::Ready);
        assert_eq!(view.transcript().messages(), &[Message::model(EMPTY_GREETING)]);
    }

    #[test]
    fn test_init_failure_degrades() {
        let mut view = ChatView::new();
        view.begin_init();
        view.settle_init(None, Err(BackendError::Scripted("offline".to_string())));

        assert_eq!(view.phase(), ChatPhase::Degraded);
        assert!(!view.is_typing());
        assert!(!view.has_session());
        assert_eq!(view.transcript().messages(), &[Message::model(INIT_FAILURE_MESSAGE)]);
    }

    #[test]
    fn test_cannot_send_while_initializing() {
        let mut view = ChatView::new();
        view.set_input("hello");
        assert!(!view.can_send());
        view.begin_init();
        assert!(view.begin_turn().is_none());
        assert_eq!(view.input(), "hello");
    }

    #[test]
    fn test_turn_appends_user_then_reply() {
        let mut view = ready_view();
        view.set_input("How was your day?");

        let turn = view.begin_turn().unwrap();
        assert_eq!(turn.text, "How was your day?");
        assert_eq!(view.input(), "");
        assert!(view.is_typing());
        assert_eq!(view.transcript().len(), 2);
        assert_eq!(view.transcript().last().unwrap().role, Role::User);

        view.settle_turn(Ok(ChatReply::new("Wonderful!")));
        assert!(!view.is_typing());
        assert_eq!(view.transcript().last(), Some(&Message::model("Wonderful!")));
    }

    #[test]
    fn test_send_noop_for_blank_or_pending() {
        let mut view = ready_view();
        view.set_input("   ");
        assert!(view.begin_turn().is_none());
        assert_eq!(view.transcript().len(), 1);

        view.set_input("one");
        assert!(view.begin_turn().is_some());
        view.set_input("two");
        assert!(view.begin_turn().is_none());
        assert_eq!(view.input(), "two");
        assert_eq!(view.transcript().len(), 2);
    }

    #[test]
    fn test_turn_failure_and_empty_reply() {
        let mut view = ready_view();
        view.set_input("a");
        view.begin_turn();
        view.settle_turn(Err(BackendError::NoSession));
        assert_eq!(view.transcript().last(), Some(&Message::model(TURN_FAILURE_MESSAGE)));
        assert!(!view.is_typing());

        view.set_input("b");
        view.begin_turn();
        view.settle_turn(Ok(ChatReply::empty()));
        assert_eq!(view.transcript().last(), Some(&Message::model(EMPTY_REPLY)));
    }

    #[test]
    fn test_input_editing() {
        let mut view = ChatView::new();
        view.push_input('h');
        view.push_input('i');
        view.pop_input();
        assert_eq!(view.input(), "h");
    }
}
