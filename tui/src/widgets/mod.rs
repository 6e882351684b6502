//! Custom widgets

pub mod portrait;
pub mod text_block;

pub use portrait::{Portrait, PortraitError, PortraitState};
pub use text_block::{Align, Entry, TextBlock, TextBlockState};
