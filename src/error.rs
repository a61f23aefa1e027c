//! Errors raised by the editing engine.

use thiserror::Error;

/// Everything that can go wrong when editing a buffer.
///
/// Only [`EditError::EmptySelection`] comes out of the encoder itself; the
/// other variants guard the boundary where offsets and names arrive from
/// user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A style or color was requested without any selected text.
    #[error("no text selected")]
    EmptySelection,

    /// Selection start lies after its end.
    #[error("selection start {start} is after end {end}")]
    InvertedSelection { start: usize, end: usize },

    /// Selection reaches past the end of the buffer.
    #[error("selection end {end} is past buffer length {len}")]
    SelectionOutOfBounds { end: usize, len: usize },

    /// Style name outside the fixed set.
    #[error("unknown style `{0}`")]
    UnknownStyle(String),

    /// Color name outside the requested palette.
    #[error("unknown color `{0}`")]
    UnknownColor(String),
}
