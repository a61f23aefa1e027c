// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # Textsmith
//!
//! A Discord message formatter.
//!
//! Textsmith takes plain text and a selected span and:
//! - Wraps the span in Discord markdown (bold, italic, underline,
//!   strikethrough, inline code) or quotes its lines
//! - Colors the span with ANSI escapes inside an `ansi` code block
//! - Renders the raw text into a preview
//!
//! ## Architecture
//!
//! The buffer is an immutable value; the encoder and renderer are pure
//! functions over it. A [`session::Session`] ties them together using
//! The Elm Architecture: messages in, a new session out.
//!
//! ## Modules
//!
//! - [`editor`]: Buffer and selection model
//! - [`markup`]: Styles, palettes and the encoder
//! - [`preview`]: Preview rendering and terminal painting
//! - [`session`]: Editing session state and updates
//! - [`config`]: Persistent CLI defaults
//! - [`watcher`]: File watching for live preview

pub mod config;
pub mod editor;
pub mod error;
pub mod markup;
pub mod perf;
pub mod preview;
pub mod session;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorBuffer, Selection};
    pub use crate::error::EditError;
    pub use crate::markup::{Encoder, EngineOptions, Style};
    pub use crate::preview::render;
    pub use crate::session::{Message, Session, update};
}
