//! Gemini Backend Implementation
//!
//! Backend for Google's Gemini REST API. Both image generation and chat go
//! through `models/{model}:generateContent`; chat sessions are client-side
//! history replayed on every turn.
//!
//! # Gemini API
//!
//! - `POST {base}/models/{image_model}:generateContent` - one text part in,
//!   inline image data out
//! - `POST {base}/models/{chat_model}:generateContent` - system instruction
//!   plus the full conversation, reply text out

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::traits::{ChatReply, ChatSession, CompanionBackend, ImageRequest};
use super::wire::{
    error_message, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig,
};
use crate::config::CompanionConfig;
use crate::error::{BackendError, BackendResult};
use crate::messages::Role;
use crate::profile::AvatarImage;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shared HTTP plumbing for the backend and its chat sessions
struct Endpoint {
    /// API root
    base_url: String,
    /// API key, checked on every call
    api_key: Option<String>,
    /// HTTP client
    http_client: reqwest::Client,
}

impl Endpoint {
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> BackendResult<GenerateContentResponse> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::MissingApiKey)?;

        let response = self
            .http_client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(model, status = status.as_u16(), bytes = body.len(), "generateContent returned");

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// HTTP plumbing shared with open sessions
    endpoint: Arc<Endpoint>,
    /// Conversational model
    chat_model: String,
    /// Image generation model
    image_model: String,
}

impl GeminiBackend {
    /// Create from the resolved configuration
    ///
    /// A missing API key is not an error here; it surfaces as
    /// [`BackendError::MissingApiKey`] on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &CompanionConfig) -> BackendResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: Arc::new(Endpoint {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                http_client: builder.build()?,
            }),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.endpoint.api_key.is_some()
    }

    /// Body of an image generation call
    fn image_body(request: &ImageRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(Role::User, request.prompt.clone())],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                }),
            }),
        }
    }
}

#[async_trait]
impl CompanionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate_image(&self, request: &ImageRequest) -> BackendResult<AvatarImage> {
        info!(model = %self.image_model, aspect_ratio = %request.aspect_ratio, "Generating image");

        let response = self
            .endpoint
            .generate(&self.image_model, &Self::image_body(request))
            .await?;

        match response.first_inline_image() {
            Some(inline) => {
                let image = AvatarImage::from(inline);
                debug!(mime = %image.mime_type, bytes = image.approx_size(), "Image received");
                Ok(image)
            }
            None => {
                warn!(
                    finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.clone()),
                    "Image response carried no inline data"
                );
                Err(BackendError::NoImage)
            }
        }
    }

    async fn open_chat(&self, system_instruction: &str) -> BackendResult<Arc<dyn ChatSession>> {
        if !self.has_api_key() {
            return Err(BackendError::MissingApiKey);
        }
        info!(model = %self.chat_model, "Opening chat session");
        Ok(Arc::new(GeminiChat::new(
            Arc::clone(&self.endpoint),
            self.chat_model.clone(),
            system_instruction,
        )))
    }
}

/// A chat session against the Gemini API
///
/// The API is stateless, so the session keeps the conversation and replays
/// it with the system instruction on every turn.
pub struct GeminiChat {
    endpoint: Arc<Endpoint>,
    model: String,
    system_instruction: Content,
    history: Mutex<Vec<Content>>,
}

impl GeminiChat {
    fn new(endpoint: Arc<Endpoint>, model: String, system_instruction: &str) -> Self {
        Self {
            endpoint,
            model,
            system_instruction: Content::instruction(system_instruction),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Body for the next turn: history so far plus the new user turn
    fn turn_body(&self, user_turn: &Content) -> GenerateContentRequest {
        let mut contents = self.history.lock().clone();
        contents.push(user_turn.clone());
        GenerateContentRequest {
            contents,
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: None,
        }
    }
}

#[async_trait]
impl ChatSession for GeminiChat {
    async fn send(&self, text: &str) -> BackendResult<ChatReply> {
        let user_turn = Content::text(Role::User, text);
        let body = self.turn_body(&user_turn);

        let response = self.endpoint.generate(&self.model, &body).await?;
        let reply = response.text();

        // Only exchanges the API would accept back enter the history; an
        // empty or blocked reply drops its user turn too
        match response.first_content().filter(|c| c.is_replayable()) {
            Some(content) => {
                let mut model_turn = content.clone();
                model_turn.role = Some(Role::Model.as_str().to_string());
                let mut history = self.history.lock();
                history.push(user_turn);
                history.push(model_turn);
            }
            None => {
                debug!(
                    finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.clone()),
                    "Reply not kept in chat history"
                );
            }
        }

        Ok(ChatReply::new(reply))
    }

    fn exchanges(&self) -> usize {
        self.history.lock().len() / 2
    }
}
