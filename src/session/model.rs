use serde::Serialize;

use crate::editor::{EditorBuffer, Selection};
use crate::markup::{ColorToken, Encoder, EngineOptions, StyleFlags};
use crate::preview;

/// Text a fresh or reset session starts with.
pub const WELCOME_TEXT: &str = "Welcome to TextSmith's Discord Formatter!\n\nStart typing here and use the formatting tools above to style your text.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// Advisory message for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

/// The complete state of one editing session.
///
/// All state lives here; [`super::update`] is the only way it changes.
#[derive(Debug, Clone)]
pub struct Session {
    /// Authoritative raw text
    pub buffer: EditorBuffer,
    /// Last captured selection; collapsed after every edit
    pub selection: Selection,
    /// Toolbar toggle state (display only)
    pub flags: StyleFlags,
    /// Last applied text color (display only)
    pub active_foreground: Option<&'static ColorToken>,
    /// Last applied background color (display only)
    pub active_background: Option<&'static ColorToken>,
    preview: String,
    notice: Option<Notice>,
    encoder: Encoder,
}

impl Session {
    pub fn new(text: &str, options: EngineOptions) -> Self {
        let buffer = EditorBuffer::from_text(text);
        let preview = preview::render(text);
        Self {
            buffer,
            selection: Selection::default(),
            flags: StyleFlags::default(),
            active_foreground: None,
            active_background: None,
            preview,
            notice: None,
            encoder: Encoder::new(options),
        }
    }

    /// A session holding the welcome text.
    pub fn welcome(options: EngineOptions) -> Self {
        Self::new(WELCOME_TEXT, options)
    }

    /// Rendered preview of the current buffer.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub const fn options(&self) -> EngineOptions {
        self.encoder.options()
    }

    /// Text under the current selection.
    pub fn selected_text(&self) -> String {
        self.buffer
            .selected_text(self.selection)
            .unwrap_or_default()
    }

    pub(super) const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Adopt a new buffer: collapse the selection and re-render.
    pub(super) fn commit(&mut self, buffer: EditorBuffer) {
        let caret = self.selection.start().min(buffer.len_chars());
        self.buffer = buffer;
        self.selection = Selection::collapsed(caret);
        self.preview = preview::render(&self.buffer.text());
    }

    pub(super) fn show_notice(
        &mut self,
        level: NoticeLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.notice = Some(Notice {
            level,
            title: title.into(),
            description: description.into(),
        });
    }

    pub(super) fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
