//! Screens
//!
//! One module per studio screen. Each exposes a `render` function that draws
//! from the studio's read accessors; input handling lives with the screen
//! that owns focus state (only the creation form has any).

pub mod chat;
pub mod create;
pub mod landing;

pub use create::{CreateForm, Field};
