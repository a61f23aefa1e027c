use tracing::{debug, warn};

use crate::editor::{EditorBuffer, Selection};
use crate::error::EditError;
use crate::markup::palette::{ColorToken, RESET};
use crate::markup::style::{QUOTE_PREFIX, Style};
use crate::perf;

/// Opening fence of a block Discord renders with ANSI colors.
pub const FENCE_OPEN: &str = "```ansi";
/// Bare fence closing a code block.
pub const FENCE: &str = "```";

/// What applying a style twice does.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    /// Always wrap; a second application nests the delimiters.
    #[default]
    Wrap,
    /// Remove a matching delimiter pair at or around the selection, else wrap.
    Unwrap,
}

/// How the encoder decides whether a selection already sits in an `ansi` block.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FenceScan {
    /// An opener anywhere before and a fence anywhere after the selection.
    #[default]
    Contains,
    /// The closest fence before must be an opener, the closest after a
    /// closer, and the selection must not cross a fence.
    Nearest,
}

impl FenceScan {
    /// Whether a selection with the given surroundings is inside an `ansi` block.
    pub fn is_inside(self, before: &str, selected: &str, after: &str) -> bool {
        match self {
            Self::Contains => before.contains(FENCE_OPEN) && after.contains(FENCE),
            Self::Nearest => {
                let opened = before
                    .rfind(FENCE)
                    .is_some_and(|at| before[at..].starts_with(FENCE_OPEN));
                let closed = after
                    .find(FENCE)
                    .is_some_and(|at| !after[at..].starts_with(FENCE_OPEN));
                opened && closed && !selected.contains(FENCE)
            }
        }
    }
}

/// Engine-wide encoding policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub toggle_mode: ToggleMode,
    pub fence_scan: FenceScan,
}

/// What an edit did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Wrapped(Style),
    Unwrapped(Style),
    Colored {
        token: &'static ColorToken,
        /// A new `ansi` block was opened around the region.
        fenced: bool,
    },
}

/// The result of a successful encoder operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub buffer: EditorBuffer,
    pub action: EditAction,
}

/// Inserts and removes markup around selections.
#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder {
    options: EngineOptions,
}

impl Encoder {
    pub const fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> EngineOptions {
        self.options
    }

    /// Apply `style` to the selected span.
    ///
    /// Span styles wrap the selection in their delimiter pair; quote prefixes
    /// every selected line with `"> "`.
    ///
    /// # Errors
    /// [`EditError::EmptySelection`] when nothing is selected. The buffer is
    /// never touched in that case.
    pub fn apply_style(
        &self,
        buffer: &EditorBuffer,
        selection: Selection,
        style: Style,
    ) -> Result<Edit, EditError> {
        let _scope = perf::scope("encoder.apply_style");
        let selected = selected_text(buffer, selection)?;

        if self.options.toggle_mode == ToggleMode::Unwrap {
            if let Some(edit) = unwrap_style(buffer, selection, &selected, style)? {
                perf::log_event(
                    "encoder.apply_style",
                    format!("style={style} unwrapped chars={}", selection.len()),
                );
                return Ok(edit);
            }
        }

        let replacement = match style.delimiter() {
            Some(delimiter) => format!("{delimiter}{selected}{delimiter}"),
            None => quote_lines(&selected),
        };
        let buffer = buffer.splice(selection, &replacement)?;
        debug!(
            %style,
            start = selection.start(),
            end = selection.end(),
            "wrapped selection"
        );
        perf::log_event(
            "encoder.apply_style",
            format!("style={style} wrapped chars={}", selection.len()),
        );
        Ok(Edit {
            buffer,
            action: EditAction::Wrapped(style),
        })
    }

    /// Color the selected span with an ANSI escape pair.
    ///
    /// Inside an existing `ansi` block only the escape pair is inserted;
    /// elsewhere the colored span gets a block of its own.
    ///
    /// # Errors
    /// [`EditError::EmptySelection`] when nothing is selected.
    pub fn apply_color(
        &self,
        buffer: &EditorBuffer,
        selection: Selection,
        token: &'static ColorToken,
        is_background: bool,
    ) -> Result<Edit, EditError> {
        let _scope = perf::scope("encoder.apply_color");
        let selected = selected_text(buffer, selection)?;
        if token.is_background() != is_background {
            warn!(
                code = token.code,
                is_background, "color layer mismatch, emitting the token's own code"
            );
        }

        let before = buffer.text_before(selection.start());
        let after = buffer.text_after(selection.end());
        let inside = self
            .options
            .fence_scan
            .is_inside(&before, &selected, &after);

        let colored = format!("{}{selected}{RESET}", token.escape());
        let replacement = if inside {
            colored
        } else {
            format!("{FENCE_OPEN}\n{colored}\n{FENCE}")
        };
        let buffer = buffer.splice(selection, &replacement)?;
        debug!(
            code = token.code,
            inside,
            start = selection.start(),
            end = selection.end(),
            "colored selection"
        );
        perf::log_event(
            "encoder.apply_color",
            format!(
                "code={} fenced={} scan={:?}",
                token.code, !inside, self.options.fence_scan
            ),
        );
        Ok(Edit {
            buffer,
            action: EditAction::Colored {
                token,
                fenced: !inside,
            },
        })
    }
}

fn selected_text(buffer: &EditorBuffer, selection: Selection) -> Result<String, EditError> {
    if selection.is_empty() {
        return Err(EditError::EmptySelection);
    }
    buffer
        .selected_text(selection)
        .ok_or(EditError::SelectionOutOfBounds {
            end: selection.end(),
            len: buffer.len_chars(),
        })
}

fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("{QUOTE_PREFIX}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn unquote_lines(text: &str) -> Option<String> {
    let lines = text
        .split('\n')
        .map(|line| line.strip_prefix(QUOTE_PREFIX))
        .collect::<Option<Vec<_>>>()?;
    Some(lines.join("\n"))
}

/// Try to undo `style` at the selection. `Ok(None)` means nothing matched.
fn unwrap_style(
    buffer: &EditorBuffer,
    selection: Selection,
    selected: &str,
    style: Style,
) -> Result<Option<Edit>, EditError> {
    let unwrapped = |buffer: EditorBuffer| {
        debug!(%style, start = selection.start(), "unwrapped selection");
        Some(Edit {
            buffer,
            action: EditAction::Unwrapped(style),
        })
    };

    let Some(delimiter) = style.delimiter() else {
        return match unquote_lines(selected) {
            Some(text) => Ok(unwrapped(buffer.splice(selection, &text)?)),
            None => Ok(None),
        };
    };
    let width = delimiter.len();

    // Delimiters selected along with the text.
    if selected.len() >= width * 2
        && run_matches(leading_run(selected, delimiter), delimiter)
        && run_matches(trailing_run(selected, delimiter), delimiter)
    {
        let inner = &selected[width..selected.len() - width];
        return Ok(unwrapped(buffer.splice(selection, inner)?));
    }

    // Delimiters just outside the selection.
    let before = buffer.text_before(selection.start());
    let after = buffer.text_after(selection.end());
    if selection.start() >= width
        && run_matches(trailing_run(&before, delimiter), delimiter)
        && run_matches(leading_run(&after, delimiter), delimiter)
    {
        let widened = Selection::new(selection.start() - width, selection.end() + width)?;
        return Ok(unwrapped(buffer.splice(widened, selected)?));
    }

    Ok(None)
}

fn leading_run(text: &str, delimiter: &str) -> usize {
    let marker = delimiter.chars().next().unwrap_or_default();
    text.chars().take_while(|c| *c == marker).count()
}

fn trailing_run(text: &str, delimiter: &str) -> usize {
    let marker = delimiter.chars().next().unwrap_or_default();
    text.chars().rev().take_while(|c| *c == marker).count()
}

/// Whether a run of delimiter chars closes `delimiter` without splitting a
/// neighbour: `*` and `**` share a char, so a run of two is bold and never
/// italic, while a run of three is both.
fn run_matches(run: usize, delimiter: &str) -> bool {
    if delimiter.starts_with('*') {
        run == delimiter.len() || run == 3
    } else {
        run >= delimiter.len()
    }
}
