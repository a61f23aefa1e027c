//! Buffer and selection model.
//!
//! Provides a rope-backed text buffer with value semantics: every edit
//! produces a new buffer, and selections are plain char ranges captured
//! against one particular buffer value.

mod buffer;

pub use buffer::{EditorBuffer, Selection};
