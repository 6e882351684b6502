//! Creation view state
//!
//! Holds what the character-creation screen owns besides the profile itself:
//! the avatar generation in-flight flag and the last generation error.

use tracing::warn;

use crate::error::{BackendError, BackendResult};
use crate::events::ViewId;
use crate::profile::AvatarImage;

/// Shown when the call succeeded but carried no image
pub const NO_IMAGE_MESSAGE: &str = "Could not generate image. Try again.";

/// Shown when a failed call has no message of its own
pub const GENERIC_IMAGE_FAILURE: &str = "Failed to generate image.";

/// State of one mount of the creation screen
#[derive(Clone, Debug)]
pub struct CreationView {
    id: ViewId,
    generating: bool,
    error: Option<String>,
}

impl CreationView {
    /// A freshly mounted creation view
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ViewId::new(),
            generating: false,
            error: None,
        }
    }

    /// Identity of this mount
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Whether an avatar generation is pending
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Error from the last generation, if it failed
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Claim the in-flight slot
    ///
    /// Returns `false` (and changes nothing) while a generation is pending.
    /// Starting a generation clears the previous error.
    pub(crate) fn begin_generation(&mut self) -> bool {
        if self.generating {
            return false;
        }
        self.generating = true;
        self.error = None;
        true
    }

    /// Release the in-flight slot and record the outcome
    ///
    /// Returns the image on success; on failure the error string is set.
    pub(crate) fn settle_generation(
        &mut self,
        result: BackendResult<AvatarImage>,
    ) -> Option<AvatarImage> {
        self.generating = false;
        match result {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(view = %self.id, error = %e, "Avatar generation failed");
                self.error = Some(avatar_error_message(&e));
                None
            }
        }
    }
}

impl Default for CreationView {
    fn default() -> Self {
        Self::new()
    }
}

/// User-facing text for a failed avatar generation
#[must_use]
pub fn avatar_error_message(error: &BackendError) -> String {
    if error.is_empty_response() {
        return NO_IMAGE_MESSAGE.to_string();
    }
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_IMAGE_FAILURE.to_string()
    } else {
        message
    }
}
