use crate::editor::Selection;
use crate::error::EditError;
use crate::markup::{ColorToken, EditAction, Style};
use crate::session::{NoticeLevel, Session, WELCOME_TEXT};

/// Every user action the toolbar, swatches and text area can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Text area content changed
    SetText(String),
    /// Text area selection changed
    Select { start: usize, end: usize },
    /// Toolbar style button pressed
    ApplyStyle(Style),
    /// Color swatch pressed
    ApplyColor {
        token: &'static ColorToken,
        background: bool,
    },
    /// Restore the welcome text and clear all indicators
    ResetAll,
    /// Hide the current notice
    DismissNotice,
}

/// Pure function that updates the session based on a message.
///
/// Every buffer change goes through [`Session::commit`], which collapses the
/// selection and re-renders the preview.
pub fn update(mut session: Session, msg: Message) -> Session {
    tracing::debug!(?msg, "session update");
    match msg {
        Message::SetText(text) => {
            let buffer = session.buffer.set_text(&text);
            session.commit(buffer);
        }
        Message::Select { start, end } => match session.buffer.capture_selection(start, end) {
            Ok(selection) => session.selection = selection,
            Err(err) => {
                let caret = session.selection.start().min(session.buffer.len_chars());
                session.selection = Selection::collapsed(caret);
                session.show_notice(NoticeLevel::Warning, "Invalid selection", err.to_string());
            }
        },
        Message::ApplyStyle(style) => {
            match session
                .encoder()
                .apply_style(&session.buffer, session.selection, style)
            {
                Ok(edit) => {
                    session.flags.toggle(style);
                    session.commit(edit.buffer);
                    if matches!(edit.action, EditAction::Unwrapped(_)) {
                        session.show_notice(
                            NoticeLevel::Success,
                            "Format removed",
                            format!("Removed {style} formatting"),
                        );
                    } else {
                        session.show_notice(
                            NoticeLevel::Success,
                            "Format applied",
                            format!("Applied {style} formatting"),
                        );
                    }
                }
                Err(err) => reject(&mut session, &err, "formatting"),
            }
        }
        Message::ApplyColor { token, background } => {
            match session
                .encoder()
                .apply_color(&session.buffer, session.selection, token, background)
            {
                Ok(edit) => {
                    if background {
                        session.active_background = Some(token);
                    } else {
                        session.active_foreground = Some(token);
                    }
                    session.commit(edit.buffer);
                    let layer = if background { "background" } else { "text" };
                    session.show_notice(
                        NoticeLevel::Success,
                        "Color applied",
                        format!("Applied {layer} color"),
                    );
                }
                Err(err) => reject(&mut session, &err, "color"),
            }
        }
        Message::ResetAll => {
            let buffer = session.buffer.set_text(WELCOME_TEXT);
            session.selection = Selection::default();
            session.commit(buffer);
            session.flags.clear();
            session.active_foreground = None;
            session.active_background = None;
            session.show_notice(
                NoticeLevel::Info,
                "Reset complete",
                "All formatting has been cleared",
            );
        }
        Message::DismissNotice => session.dismiss_notice(),
    }
    session
}

fn reject(session: &mut Session, err: &EditError, what: &str) {
    if *err == EditError::EmptySelection {
        session.show_notice(
            NoticeLevel::Info,
            "Select text first",
            format!("Highlight some text before applying {what}"),
        );
    } else {
        session.show_notice(NoticeLevel::Warning, "Edit rejected", err.to_string());
    }
}
