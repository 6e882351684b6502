//! Companion Core - Headless character studio for Dream Companion
//!
//! This crate holds every rule of the application: the character profile and
//! its edits, avatar generation, the persona chat lifecycle, and the Gemini
//! client behind them. It renders nothing; a surface (the terminal UI, or a
//! test) reads the [`Studio`]'s state and calls its operations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Surface (ratatui TUI)                    │
//! │   key press ─► Studio operation     render ◄─ Studio state │
//! └───────────────────────────┬──────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────┐
//! │                      COMPANION CORE                       │
//! │  ┌────────────────────────┴───────────────────────────┐  │
//! │  │                      Studio                         │  │
//! │  │  ┌─────────┐  ┌──────────────┐  ┌───────────────┐  │  │
//! │  │  │ Profile │  │ CreationView │  │   ChatView    │  │  │
//! │  │  └─────────┘  └──────────────┘  └───────────────┘  │  │
//! │  └────────────────────────┬───────────────────────────┘  │
//! │                           │ tokio::spawn / Completion     │
//! │                  ┌────────┴─────────┐                     │
//! │                  │ CompanionBackend │  Gemini | Scripted  │
//! │                  └──────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use companion_core::{load_config, GeminiBackend, ProfileEdit, Studio};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = GeminiBackend::from_config(&config)?;
//!     let mut studio = Studio::new(Arc::new(backend));
//!
//!     studio.start();
//!     studio.edit(ProfileEdit::Name("Luna".into()));
//!     studio.edit(ProfileEdit::Personality("Playful & Witty".into()));
//!     studio.finish();
//!     studio.settle().await;
//!
//!     println!("{}", studio.chat().unwrap().transcript().messages()[0].content);
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`profile`]: Character profile, its enumerated attributes and edits
//! - [`prompts`]: Avatar prompt, persona instruction, greeting request
//! - [`backend`]: Backend traits, the Gemini client and a scripted backend
//! - [`creation`]: Creation view state (avatar in-flight guard, errors)
//! - [`chat`]: Chat view state (phases, transcript, typing, input)
//! - [`events`]: Completions of spawned backend calls
//! - [`studio`]: Root state holder and navigation
//! - [`config`]: TOML / environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod chat;
pub mod config;
pub mod creation;
pub mod error;
pub mod events;
pub mod messages;
pub mod profile;
pub mod prompts;
pub mod studio;

// Re-exports for convenience
pub use backend::{
    AspectRatio, ChatReply, ChatSession, CompanionBackend, GeminiBackend, ImageRequest,
    ScriptedBackend,
};
pub use chat::{ChatPhase, ChatView};
pub use config::{
    default_config_path, load_config, load_config_from_path, CompanionConfig, CompanionToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
pub use creation::CreationView;
pub use error::{BackendError, BackendResult};
pub use events::{Completion, ViewId};
pub use messages::{Message, Role, Transcript};
pub use profile::{
    Age, AvatarImage, BodyType, CharacterProfile, HairColor, HairStyle, ProfileEdit,
    Relationship, SkinTone, PERSONALITY_PRESETS,
};
pub use studio::{Screen, Studio};
