//! The ordered list of rewrite stages behind [`super::render`].
//!
//! Order is load-bearing: colors are decoded before markdown so a colored
//! span can carry markdown inside it, bold runs before italic so `**`
//! is never read as two italics, and cleanup only sees what every decoder
//! left unmatched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::markup::palette::{BACKGROUND, ColorToken, FOREGROUND};

/// One `(pattern, replacement)` rewrite.
pub(super) struct Stage {
    pub name: Cow<'static, str>,
    pattern: Regex,
    replacement: String,
}

impl Stage {
    fn new(name: impl Into<Cow<'static, str>>, pattern: &str, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: Regex::new(pattern).expect("valid stage pattern"),
            replacement: replacement.into(),
        }
    }

    /// Rewrite `text`, returning `None` when the pattern did not match.
    pub fn apply(&self, text: &str) -> Option<String> {
        match self.pattern.replace_all(text, self.replacement.as_str()) {
            Cow::Borrowed(_) => None,
            Cow::Owned(rewritten) => Some(rewritten),
        }
    }
}

/// Markdown decoders, applied in this order.
const MARKDOWN: [(&str, &str, &str); 6] = [
    ("bold", r"\*\*(.*?)\*\*", "<b>${1}</b>"),
    ("italic", r"\*(.*?)\*", "<i>${1}</i>"),
    ("underline", r"__(.*?)__", "<u>${1}</u>"),
    ("strikethrough", r"~~(.*?)~~", "<s>${1}</s>"),
    ("code", r"`([^`\n]+)`", "<code>${1}</code>"),
    ("quote", r"(?m)^> (.*)$", "<blockquote>${1}</blockquote>"),
];

/// Leftover syntax stripped after decoding. Fences go first so the lone
/// backtick rule cannot eat them piecemeal and leave the `ansi` tag behind.
const CLEANUP: [(&str, &str); 9] = [
    ("strip.fence_open", "```ansi"),
    ("strip.fence", "```"),
    ("strip.bold", r"\*\*"),
    ("strip.italic", r"\*"),
    ("strip.underline", "__"),
    ("strip.strikethrough", "~~"),
    ("strip.code", "`"),
    ("strip.quote", r"(?m)^> "),
    ("strip.escape", r"\x1b\[[\d;]*m"),
];

static STAGES: LazyLock<Vec<Stage>> = LazyLock::new(build);

pub(super) fn stages() -> &'static [Stage] {
    &STAGES
}

fn build() -> Vec<Stage> {
    let mut stages = Vec::with_capacity(FOREGROUND.len() + BACKGROUND.len() + 16);
    stages.extend(FOREGROUND.iter().map(|token| color_stage(token, "color")));
    stages.extend(
        BACKGROUND
            .iter()
            .map(|token| color_stage(token, "background-color")),
    );
    stages.extend(
        MARKDOWN
            .iter()
            .map(|&(name, pattern, replacement)| Stage::new(name, pattern, replacement)),
    );
    stages.extend(
        CLEANUP
            .iter()
            .map(|&(name, pattern)| Stage::new(name, pattern, "")),
    );
    stages.push(Stage::new("line_breaks", r"\n", "<br>"));
    stages
}

fn color_stage(token: &ColorToken, property: &str) -> Stage {
    Stage::new(
        format!("ansi.{}", token.code),
        &format!(r"\x1b\[{}m(.*?)\x1b\[0m", token.code),
        format!(r#"<span style="{property}:{}">${{1}}</span>"#, token.display),
    )
}
