//! Editing session state.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Session`]: The complete editing state
//! - [`Message`]: All possible user actions
//! - [`update`]: Pure function for state transitions

mod model;
mod update;

pub use model::{Notice, NoticeLevel, Session, WELCOME_TEXT};
pub use update::{Message, update};
