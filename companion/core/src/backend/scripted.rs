//! Scripted Backend
//!
//! In-memory backend that replays queued outcomes and records every call.
//! Used by the headless integration tests and the terminal rendering tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::{ChatReply, ChatSession, CompanionBackend, ImageRequest};
use crate::error::{BackendError, BackendResult};
use crate::profile::AvatarImage;

/// Reply used when no chat outcome is queued
const DEFAULT_REPLY: &str = "Hi there!";

#[derive(Default)]
struct Script {
    images: VecDeque<BackendResult<AvatarImage>>,
    replies: VecDeque<BackendResult<ChatReply>>,
    fail_next_open: Option<String>,
    image_requests: Vec<ImageRequest>,
    system_instructions: Vec<String>,
    sent: Vec<String>,
}

/// Backend that answers from a script
///
/// Outcomes are consumed in FIFO order. An empty image queue yields a tiny
/// PNG; an empty reply queue yields a fixed greeting.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    /// Create a backend with nothing queued
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful image
    pub fn push_image(&self, image: AvatarImage) {
        self.script.lock().images.push_back(Ok(image));
    }

    /// Queue a failed image generation
    pub fn push_image_error(&self, error: BackendError) {
        self.script.lock().images.push_back(Err(error));
    }

    /// Queue a chat reply; an empty string is a reply without content
    pub fn push_reply(&self, text: &str) {
        self.script.lock().replies.push_back(Ok(ChatReply::new(text)));
    }

    /// Queue a failed chat turn
    pub fn push_reply_error(&self, error: BackendError) {
        self.script.lock().replies.push_back(Err(error));
    }

    /// Make the next `open_chat` fail with `message`
    pub fn fail_next_open(&self, message: &str) {
        self.script.lock().fail_next_open = Some(message.to_string());
    }

    /// Image requests received so far
    #[must_use]
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.script.lock().image_requests.clone()
    }

    /// System instructions of every opened session
    #[must_use]
    pub fn system_instructions(&self) -> Vec<String> {
        self.script.lock().system_instructions.clone()
    }

    /// Every message sent on any session, in order
    #[must_use]
    pub fn sent_messages(&self) -> Vec<String> {
        self.script.lock().sent.clone()
    }

    /// A 1x1 PNG, the image returned when nothing else is queued
    #[must_use]
    pub fn sample_image() -> AvatarImage {
        AvatarImage::new(
            "image/png",
            "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==",
        )
    }
}

#[async_trait]
impl CompanionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn generate_image(&self, request: &ImageRequest) -> BackendResult<AvatarImage> {
        let mut script = self.script.lock();
        script.image_requests.push(request.clone());
        script
            .images
            .pop_front()
            .unwrap_or_else(|| Ok(Self::sample_image()))
    }

    async fn open_chat(&self, system_instruction: &str) -> BackendResult<Arc<dyn ChatSession>> {
        let mut script = self.script.lock();
        script.system_instructions.push(system_instruction.to_string());
        if let Some(message) = script.fail_next_open.take() {
            return Err(BackendError::Scripted(message));
        }
        Ok(Arc::new(ScriptedChat {
            script: Arc::clone(&self.script),
            exchanges: Mutex::new(0),
        }))
    }
}

/// Session handed out by [`ScriptedBackend`]
struct ScriptedChat {
    script: Arc<Mutex<Script>>,
    exchanges: Mutex<usize>,
}

#[async_trait]
impl ChatSession for ScriptedChat {
    async fn send(&self, text: &str) -> BackendResult<ChatReply> {
        let outcome = {
            let mut script = self.script.lock();
            script.sent.push(text.to_string());
            script
                .replies
                .pop_front()
                .unwrap_or_else(|| Ok(ChatReply::new(DEFAULT_REPLY)))
        };
        if outcome.is_ok() {
            *self.exchanges.lock() += 1;
        }
        outcome
    }

    fn exchanges(&self) -> usize {
        *self.exchanges.lock()
    }
}
