//! Dream Companion TUI - Terminal studio for designing a companion
//!
//! This crate is a thin terminal surface over [`companion_core::Studio`]:
//! it maps keys to studio operations and draws the studio's state.
//!
//! # Architecture
//!
//! - **App**: event loop over terminal input, frame ticks and backend completions
//! - **Screens**: landing page, creation form, chat
//! - **Widgets**: half-block avatar portrait, bottom-anchored text bubbles
//! - **Theme**: palette and shared styles

pub mod app;
pub mod screens;
pub mod theme;
pub mod widgets;

pub use app::App;
