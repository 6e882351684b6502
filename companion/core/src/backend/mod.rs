//! Generative-AI Backend
//!
//! Abstracted access to the two external operations the studio needs:
//! one-shot image generation and a persona-seeded conversational session.
//!
//! # Available Backends
//!
//! - **Gemini**: Google's `generateContent` REST API (default)
//! - **Scripted**: in-memory canned outcomes for headless drivers and tests
//!
//! # Usage
//!
//! ```ignore
//! use companion_core::backend::{CompanionBackend, GeminiBackend, ImageRequest};
//!
//! let backend = GeminiBackend::from_config(&config)?;
//! let image = backend.generate_image(&ImageRequest::new(prompt)).await?;
//! let chat = backend.open_chat(&persona).await?;
//! let reply = chat.send("Hi!").await?;
//! ```

mod gemini;
mod scripted;
mod traits;
pub mod wire;

pub use gemini::{GeminiBackend, GeminiChat};
pub use scripted::ScriptedBackend;
pub use traits::{AspectRatio, ChatReply, ChatSession, CompanionBackend, ImageRequest};
