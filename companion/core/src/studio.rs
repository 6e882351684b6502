//! Studio - the root state holder
//!
//! Owns the screen selector and the character profile, mounts exactly one
//! view at a time, and runs every backend call as a spawned task.
//!
//! # Completion flow
//!
//! ```text
//! request_avatar / finish / submit_turn
//!        │ tokio::spawn
//!        ▼
//!   backend call ──► Completion { view, .. } ──► mpsc ──► poll()
//!                                                            │
//!                               view still mounted? ── no ──► dropped
//!                                        │ yes
//!                                        ▼
//!                                 view / profile updated
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::backend::{AspectRatio, CompanionBackend, ImageRequest};
use crate::chat::ChatView;
use crate::creation::CreationView;
use crate::error::BackendError;
use crate::events::{Completion, ViewId};
use crate::profile::{CharacterProfile, ProfileEdit};
use crate::prompts::{avatar_prompt, greeting_request, persona_instruction};

/// Completion channel capacity
const COMPLETION_BUFFER: usize = 32;

/// Which screen is active
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Marketing landing page
    Landing,
    /// Character creation form
    Create,
    /// Conversation
    Chat,
}

/// The mounted view and its state
enum ActiveView {
    Landing,
    Create(CreationView),
    Chat(ChatView),
}

/// Root state holder
pub struct Studio {
    backend: Arc<dyn CompanionBackend>,
    avatar_aspect_ratio: AspectRatio,
    profile: CharacterProfile,
    view: ActiveView,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    in_flight: usize,
}

impl Studio {
    /// Create a studio on the landing screen with a default profile
    pub fn new(backend: Arc<dyn CompanionBackend>) -> Self {
        let (tx, rx) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            backend,
            avatar_aspect_ratio: AspectRatio::default(),
            profile: CharacterProfile::new(),
            view: ActiveView::Landing,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Use a different aspect ratio for avatar generation
    #[must_use]
    pub fn with_avatar_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.avatar_aspect_ratio = aspect_ratio;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        match self.view {
            ActiveView::Landing => Screen::Landing,
            ActiveView::Create(_) => Screen::Create,
            ActiveView::Chat(_) => Screen::Chat,
        }
    }

    /// The character profile
    #[must_use]
    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    /// Creation view state, when on the creation screen
    #[must_use]
    pub fn creation(&self) -> Option<&CreationView> {
        match &self.view {
            ActiveView::Create(view) => Some(view),
            _ => None,
        }
    }

    /// Chat view state, when on the chat screen
    #[must_use]
    pub fn chat(&self) -> Option<&ChatView> {
        match &self.view {
            ActiveView::Chat(view) => Some(view),
            _ => None,
        }
    }

    /// Mutable chat view state, for editing the input buffer
    pub fn chat_mut(&mut self) -> Option<&mut ChatView> {
        match &mut self.view {
            ActiveView::Chat(view) => Some(view),
            _ => None,
        }
    }

    /// Number of spawned calls whose completion has not been received yet
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Backend name for status lines
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Landing → Create
    pub fn start(&mut self) -> bool {
        if !matches!(self.view, ActiveView::Landing) {
            return false;
        }
        info!("Entering character creation");
        self.view = ActiveView::Create(CreationView::new());
        true
    }

    /// Create → Chat, when the profile is complete
    ///
    /// Mounts a fresh chat view and starts opening its session.
    pub fn finish(&mut self) -> bool {
        if !matches!(self.view, ActiveView::Create(_)) || !self.profile.can_finish() {
            return false;
        }
        info!(name = %self.profile.name, relationship = %self.profile.relationship, "Starting chat");
        let mut chat = ChatView::new();
        chat.begin_init();
        let view = chat.id();
        self.view = ActiveView::Chat(chat);
        self.spawn_chat_init(view);
        true
    }

    /// Chat → Create; the transcript and session are discarded
    pub fn back(&mut self) -> bool {
        if !matches!(self.view, ActiveView::Chat(_)) {
            return false;
        }
        info!("Back to character creation");
        self.view = ActiveView::Create(CreationView::new());
        true
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Apply a profile edit; only the creation screen edits the profile
    pub fn edit(&mut self, edit: ProfileEdit) -> bool {
        if !matches!(self.view, ActiveView::Create(_)) {
            return false;
        }
        self.profile = self.profile.with_edit(edit);
        true
    }

    /// Start avatar generation unless one is already pending
    pub fn request_avatar(&mut self) -> bool {
        let ActiveView::Create(creation) = &mut self.view else {
            return false;
        };
        if !creation.begin_generation() {
            debug!(view = %creation.id(), "Avatar generation already pending");
            return false;
        }
        let view = creation.id();
        let request =
            ImageRequest::new(avatar_prompt(&self.profile)).with_aspect_ratio(self.avatar_aspect_ratio);
        info!(view = %view, backend = self.backend.name(), "Requesting avatar");

        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = backend.generate_image(&request).await;
            Completion::Avatar { view, result }
        });
        true
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Send the chat input as a user turn
    ///
    /// No-op for blank input or while a reply is pending.
    pub fn submit_turn(&mut self) -> bool {
        let ActiveView::Chat(chat) = &mut self.view else {
            return false;
        };
        let view = chat.id();
        let Some(turn) = chat.begin_turn() else {
            return false;
        };
        debug!(view = %view, chars = turn.text.chars().count(), "Sending turn");

        self.spawn(async move {
            let result = match turn.session {
                Some(session) => {
                    let result = session.send(&turn.text).await;
                    debug!(view = %view, exchanges = session.exchanges(), ok = result.is_ok(), "Turn settled");
                    result
                }
                None => Err(BackendError::NoSession),
            };
            Completion::Turn { view, result }
        });
        true
    }

    fn spawn_chat_init(&mut self, view: ViewId) {
        let backend = Arc::clone(&self.backend);
        let persona = persona_instruction(&self.profile);
        let greeting = greeting_request(&self.profile);

        self.spawn(async move {
            match backend.open_chat(&persona).await {
                Ok(session) => {
                    let greeting = session.send(&greeting).await;
                    Completion::ChatReady {
                        view,
                        session: Some(session),
                        greeting,
                    }
                }
                Err(e) => Completion::ChatReady {
                    view,
                    session: None,
                    greeting: Err(e),
                },
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = task.await;
            // The receiver lives as long as the studio
            let _ = tx.send(completion).await;
        });
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Apply every completion that has already arrived
    ///
    /// Call this regularly from the UI loop. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let mut activity = false;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            activity = true;
        }
        activity
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn wait_for_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Wait until every spawned call has completed
    pub async fn settle(&mut self) {
        while self.wait_for_completion().await {}
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let issued_by = completion.view();
        let kind = completion.kind();
        match (completion, &mut self.view) {
            (Completion::Avatar { view, result }, ActiveView::Create(creation))
                if creation.id() == view =>
            {
                if let Some(image) = creation.settle_generation(result) {
                    info!(view = %view, bytes = image.approx_size(), "Avatar updated");
                    self.profile = self.profile.with_avatar(image);
                }
            }
            (
                Completion::ChatReady {
                    view,
                    session,
                    greeting,
                },
                ActiveView::Chat(chat),
            ) if chat.id() == view => chat.settle_init(session, greeting),
            (Completion::Turn { view, result }, ActiveView::Chat(chat)) if chat.id() == view => {
                chat.settle_turn(result);
            }
            _ => debug!(view = %issued_by, kind, "Dropping completion for unmounted view"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScriptedBackend;
    use crate::profile::Age;
    use pretty_assertions::assert_eq;

    fn studio() -> (Studio, ScriptedBackend) {
        let backend = ScriptedBackend::new();
        (Studio::new(Arc::new(backend.clone())), backend)
    }

    #[test]
    fn test_navigation_is_noop_from_wrong_screen() {
        let (mut studio, _) = studio();
        assert_eq!(studio.screen(), Screen::Landing);
        assert!(!studio.back());
        assert!(!studio.finish());
        assert!(!studio.edit(ProfileEdit::Name("Luna".to_string())));

        assert!(studio.start());
        assert_eq!(studio.screen(), Screen::Create);
        assert!(!studio.start());
        assert!(!studio.back());
    }

    #[test]
    fn test_finish_requires_complete_profile() {
        let (mut studio, _) = studio();
        studio.start();
        assert!(!studio.finish());
        studio.edit(ProfileEdit::Name("Luna".to_string()));
        assert!(!studio.finish());
        assert_eq!(studio.screen(), Screen::Create);
        assert_eq!(studio.in_flight(), 0);
    }

    #[test]
    fn test_edits_change_only_their_field() {
        let (mut studio, _) = studio();
        studio.start();
        let before = studio.profile().clone();
        studio.edit(ProfileEdit::Age(Age::new(40)));

        let expected = CharacterProfile {
            age: Age::new(40),
            ..before
        };
        assert_eq!(studio.profile(), &expected);
    }

    #[tokio::test]
    async fn test_avatar_guard_and_success() {
        let (mut studio, backend) = studio();
        studio.start();
        studio.edit(ProfileEdit::Name("Luna".to_string()));

        assert!(studio.request_avatar());
        assert!(!studio.request_avatar());
        assert!(studio.creation().unwrap().is_generating());

        studio.settle().await;
        let creation = studio.creation().unwrap();
        assert!(!creation.is_generating());
        assert_eq!(creation.error(), None);
        assert_eq!(
            studio.profile().avatar,
            Some(ScriptedBackend::sample_image())
        );
        assert_eq!(backend.image_requests().len(), 1);
        assert_eq!(backend.image_requests()[0].aspect_ratio, AspectRatio::Square);
    }

    #[tokio::test]
    async fn test_stale_avatar_dropped_after_remount() {
        let (mut studio, _) = studio();
        studio.start();
        studio.edit(ProfileEdit::Name("Luna".to_string()));
        studio.edit(ProfileEdit::Personality("Shy & Sweet".to_string()));
        studio.request_avatar();

        // Leave and come back before the result lands
        assert!(studio.finish());
        assert!(studio.back());
        studio.settle().await;

        assert_eq!(studio.profile().avatar, None);
        assert!(!studio.creation().unwrap().is_generating());
        assert_eq!(studio.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_wait_without_work_returns_immediately() {
        let (mut studio, _) = studio();
        assert!(!studio.wait_for_completion().await);
        assert!(!studio.poll());
    }

    #[tokio::test]
    async fn test_poll_applies_arrived_completions() {
        let (mut studio, _) = studio();
        studio.start();
        assert!(studio.request_avatar());

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while !studio.poll() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(studio.in_flight(), 0);
        assert!(studio.profile().avatar.is_some());
        assert!(!studio.creation().unwrap().is_generating());
    }
}
