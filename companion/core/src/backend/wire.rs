//! Gemini wire types
//!
//! Request and response bodies for the `generateContent` endpoint. Parts are
//! modelled as a struct of optional fields so unknown part kinds (function
//! calls, thought signatures, ...) deserialize without error and are skipped.

use serde::{Deserialize, Serialize};

use crate::messages::Role;
use crate::profile::AvatarImage;

/// Request body for `models/{model}:generateContent`
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation so far, oldest first
    pub contents: Vec<Content>,
    /// Fixed system-level directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Generation options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One turn of content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`; absent on system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content segments
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A text turn from the given side
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.as_str().to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Whether this turn can go back into a request's history
    ///
    /// Blocked candidates carry no parts at all.
    #[must_use]
    pub fn is_replayable(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(Part::is_replayable)
    }

    /// A role-less text block, used for system instructions
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// A content segment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    /// Whether this text is a reasoning summary rather than the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// Opaque reasoning signature; must be replayed with the turn it came on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    /// A plain text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the API would accept this part when it is sent back
    ///
    /// Parts of unknown kinds deserialize with every field empty, and answer
    /// text may come back empty; both are rejected on replay.
    fn is_replayable(&self) -> bool {
        let empty_answer = !self.thought.unwrap_or(false)
            && self.text.as_deref().is_some_and(str::is_empty);
        let has_payload = self.text.is_some()
            || self.inline_data.is_some()
            || self.thought_signature.is_some();
        has_payload && !empty_answer
    }
}

/// Inline binary payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

impl From<&InlineData> for AvatarImage {
    fn from(inline: &InlineData) -> Self {
        AvatarImage::new(inline.mime_type.clone(), inline.data.clone())
    }
}

/// Generation options
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Image output options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Image output options
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio, e.g. `1:1`
    pub aspect_ratio: String,
}

/// Response body of `generateContent`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[], |content| content.parts.as_slice())
    }

    /// First inline image of the first candidate
    #[must_use]
    pub fn first_inline_image(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|p| p.inline_data.as_ref())
    }

    /// Answer text of the first candidate, thought parts excluded
    ///
    /// Returns an empty string when there is no text.
    #[must_use]
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// Content of the first candidate, for recording in chat history
    #[must_use]
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }
}

/// Error envelope returned with non-success statuses
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Error details
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    /// HTTP-like status code
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Canonical status name, e.g. `INVALID_ARGUMENT`
    #[serde(default)]
    pub status: Option<String>,
}

/// Extract a readable message from an error body, falling back to the raw text
#[must_use]
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    }
}
