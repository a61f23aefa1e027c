//! Paints preview markup onto a terminal.
//!
//! Understands exactly the tags [`super::render`] emits. Anything else
//! that looks like a tag is printed as text.

use std::io::{self, Write};
use std::sync::LazyLock;

use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use regex::Regex;

use crate::markup::palette::parse_hex;

/// Left gutter drawn in front of quoted lines.
const QUOTE_GUTTER: &str = "│ ";

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-z]+)(?: style="(color|background-color):(#[0-9a-fA-F]{6})")?>"#)
        .expect("valid tag pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Quote,
    Foreground(Color),
    Background(Color),
}

impl Mark {
    const fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Strike => "s",
            Self::Code => "code",
            Self::Quote => "blockquote",
            Self::Foreground(_) | Self::Background(_) => "span",
        }
    }

    fn open(tag: &str, property: Option<&str>, hex: Option<&str>) -> Option<Self> {
        let mark = match tag {
            "b" => Self::Bold,
            "i" => Self::Italic,
            "u" => Self::Underline,
            "s" => Self::Strike,
            "code" => Self::Code,
            "blockquote" => Self::Quote,
            "span" => {
                let (r, g, b) = parse_hex(hex?)?;
                let color = Color::Rgb { r, g, b };
                match property? {
                    "color" => Self::Foreground(color),
                    _ => Self::Background(color),
                }
            }
            _ => return None,
        };
        Some(mark)
    }
}

/// Write `markup` to `out` with terminal styling.
///
/// # Errors
/// Propagates write errors from `out`.
pub fn paint(markup: &str, out: &mut impl Write) -> io::Result<()> {
    let mut stack: Vec<Mark> = Vec::new();
    let mut cursor = 0;

    for caps in TAG.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        write_text(out, &stack, &markup[cursor..whole.start()])?;
        cursor = whole.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let tag = caps.get(2).map_or("", |m| m.as_str());

        if tag == "br" && !closing {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print('\n'))?;
            continue;
        }
        if closing {
            match stack.iter().rposition(|mark| mark.tag() == tag) {
                Some(at) => {
                    stack.remove(at);
                }
                None => write_text(out, &stack, whole.as_str())?,
            }
            continue;
        }
        match Mark::open(
            tag,
            caps.get(3).map(|m| m.as_str()),
            caps.get(4).map(|m| m.as_str()),
        ) {
            Some(mark) => {
                if mark == Mark::Quote {
                    write_text(out, &stack, QUOTE_GUTTER)?;
                }
                stack.push(mark);
            }
            None => write_text(out, &stack, whole.as_str())?,
        }
    }

    write_text(out, &stack, &markup[cursor..])?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}

/// Print `text` with every mark on the stack applied.
fn write_text(out: &mut impl Write, stack: &[Mark], text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    for mark in stack {
        match *mark {
            Mark::Bold => queue!(out, SetAttribute(Attribute::Bold))?,
            Mark::Italic => queue!(out, SetAttribute(Attribute::Italic))?,
            Mark::Underline => queue!(out, SetAttribute(Attribute::Underlined))?,
            Mark::Strike => queue!(out, SetAttribute(Attribute::CrossedOut))?,
            Mark::Code => queue!(out, SetAttribute(Attribute::Reverse))?,
            Mark::Quote => {}
            Mark::Foreground(color) => queue!(out, SetForegroundColor(color))?,
            Mark::Background(color) => queue!(out, SetBackgroundColor(color))?,
        }
    }
    queue!(out, Print(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::render;

    fn painted(source: &str) -> String {
        let mut out = Vec::new();
        paint(&render(source), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_text_is_printed() {
        let out = painted("hello");
        assert!(out.contains("hello"));
        assert!(!out.contains('<'));
    }

    #[test]
    fn test_bold_sets_attribute() {
        let out = painted("**loud**");
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("loud"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn test_color_span_uses_rgb_foreground() {
        let out = painted("```ansi\n\x1b[31mWarn\x1b[0m\n```");
        assert!(out.contains("38;2;231;76;60"));
        assert!(out.contains("Warn"));
        assert!(!out.contains("<span"));
    }

    #[test]
    fn test_background_span_uses_rgb_background() {
        let out = painted("\x1b[41mhot\x1b[0m");
        assert!(out.contains("48;2;231;76;60"));
    }

    #[test]
    fn test_breaks_become_newlines_and_quotes_get_gutter() {
        let out = painted("> a\nb");
        assert!(out.contains(QUOTE_GUTTER));
        assert!(out.contains('\n'));
        assert!(!out.contains("blockquote"));
    }

    #[test]
    fn test_ampersand_and_lone_angle_bracket_print_as_is() {
        let out = painted("a < b & c");
        assert!(out.contains("a < b & c"));
    }

    #[test]
    fn test_unknown_tags_print_literally() {
        let mut out = Vec::new();
        paint("<blink>x</blink>", &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("<blink>"));
        assert!(out.contains("</blink>"));
    }
}
