//! Markup encoding.
//!
//! This module handles:
//! - The six Discord text styles and their delimiters
//! - The fixed foreground and background ANSI palettes
//! - Wrapping, unwrapping and coloring a selected span of a buffer

mod encoder;
pub mod palette;
mod style;

pub use encoder::{
    Edit, EditAction, Encoder, EngineOptions, FENCE, FENCE_OPEN, FenceScan, ToggleMode,
};
pub use palette::{ColorToken, Layer};
pub use style::{QUOTE_PREFIX, Style, StyleFlags};
