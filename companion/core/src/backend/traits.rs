//! Backend Traits
//!
//! Trait definitions for generative-AI backends. The studio only ever talks
//! to a [`CompanionBackend`], so the Gemini client and the scripted test
//! backend are interchangeable.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendResult;
use crate::profile::AvatarImage;

/// Aspect ratio hint for image generation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1, the avatar default
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 3:4
    #[serde(rename = "3:4")]
    Portrait,
    /// 4:3
    #[serde(rename = "4:3")]
    Landscape,
    /// 9:16
    #[serde(rename = "9:16")]
    Tall,
    /// 16:9
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    /// Wire representation, e.g. `1:1`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
            Self::Tall => "9:16",
            Self::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "3:4" => Ok(Self::Portrait),
            "4:3" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Tall),
            "16:9" => Ok(Self::Wide),
            other => Err(format!("unsupported aspect ratio '{other}'")),
        }
    }
}

/// An image generation request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    /// Natural-language description of the image
    pub prompt: String,
    /// Aspect ratio hint
    pub aspect_ratio: AspectRatio,
}

impl ImageRequest {
    /// Create a square image request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
        }
    }

    /// Set the aspect ratio
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
}

/// A reply on a chat session
///
/// An empty reply is "no content", not a failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// Reply text, if the model produced any
    pub text: Option<String>,
}

impl ChatReply {
    /// Wrap reply text; an empty string counts as no content
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text: if text.is_empty() { None } else { Some(text) },
        }
    }

    /// A reply without content
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reply text, or `placeholder` when there is none
    #[must_use]
    pub fn text_or(self, placeholder: &str) -> String {
        self.text.unwrap_or_else(|| placeholder.to_string())
    }
}

/// An open conversation whose persona was fixed when it was opened
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send one user turn and wait for the reply
    async fn send(&self, text: &str) -> BackendResult<ChatReply>;

    /// Number of completed exchanges recorded in the session history
    fn exchanges(&self) -> usize;
}

/// Generative-AI backend
///
/// Implement this trait to plug in a different provider.
#[async_trait]
pub trait CompanionBackend: Send + Sync {
    /// Backend name for logs (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Generate one image
    ///
    /// A response without an inline image is [`BackendError::NoImage`](crate::BackendError::NoImage).
    async fn generate_image(&self, request: &ImageRequest) -> BackendResult<AvatarImage>;

    /// Open a conversation with a fixed system instruction
    async fn open_chat(&self, system_instruction: &str) -> BackendResult<Arc<dyn ChatSession>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_builder() {
        let request = ImageRequest::new("a portrait").with_aspect_ratio(AspectRatio::Wide);
        assert_eq!(request.prompt, "a portrait");
        assert_eq!(request.aspect_ratio, AspectRatio::Wide);
        assert_eq!(ImageRequest::new("x").aspect_ratio, AspectRatio::Square);
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("1:1".parse::<AspectRatio>(), Ok(AspectRatio::Square));
        assert_eq!(" 16:9 ".parse::<AspectRatio>(), Ok(AspectRatio::Wide));
        assert!("2:1".parse::<AspectRatio>().is_err());
        assert_eq!(AspectRatio::Portrait.to_string(), "3:4");
    }

    #[test]
    fn test_chat_reply_placeholder() {
        assert_eq!(ChatReply::new("Hey you").text_or("..."), "Hey you");
        assert_eq!(ChatReply::new("").text_or("..."), "...");
        assert_eq!(ChatReply::empty().text_or("Hello!"), "Hello!");
    }
}
