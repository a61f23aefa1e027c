//! The six text decorations and their on-the-wire delimiters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EditError;

/// A markdown-like text decoration understood by Discord.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Quote,
}

/// Prefix put in front of every quoted line.
pub const QUOTE_PREFIX: &str = "> ";

impl Style {
    /// All styles, in toolbar order.
    pub const ALL: [Self; 6] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::Code,
        Self::Quote,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::Code => "code",
            Self::Quote => "quote",
        }
    }

    /// The symmetric delimiter wrapped around a span.
    ///
    /// Quote is a per-line prefix and has none.
    pub const fn delimiter(self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("**"),
            Self::Italic => Some("*"),
            Self::Underline => Some("__"),
            Self::Strikethrough => Some("~~"),
            Self::Code => Some("`"),
            Self::Quote => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EditError::UnknownStyle(s.to_string()))
    }
}

/// Last-requested toggle state per style.
///
/// Display state only: a set flag says the user pressed the button an odd
/// number of times, not that the buffer holds matching delimiters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleFlags {
    flags: [bool; Style::ALL.len()],
}

impl StyleFlags {
    pub const fn get(&self, style: Style) -> bool {
        self.flags[style.index()]
    }

    /// Flip the flag for `style`, returning the new value.
    pub const fn toggle(&mut self, style: Style) -> bool {
        let flag = &mut self.flags[style.index()];
        *flag = !*flag;
        *flag
    }

    pub const fn clear(&mut self) {
        self.flags = [false; Style::ALL.len()];
    }

    /// Styles whose flag is currently set.
    pub fn active(&self) -> impl Iterator<Item = Style> + '_ {
        Style::ALL.into_iter().filter(|style| self.get(*style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters_match_discord_syntax() {
        assert_eq!(Style::Bold.delimiter(), Some("**"));
        assert_eq!(Style::Italic.delimiter(), Some("*"));
        assert_eq!(Style::Underline.delimiter(), Some("__"));
        assert_eq!(Style::Strikethrough.delimiter(), Some("~~"));
        assert_eq!(Style::Code.delimiter(), Some("`"));
        assert_eq!(Style::Quote.delimiter(), None);
    }

    #[test]
    fn test_parse_style_names_case_insensitively() {
        assert_eq!("bold".parse::<Style>(), Ok(Style::Bold));
        assert_eq!(" Quote ".parse::<Style>(), Ok(Style::Quote));
        assert_eq!(
            "blink".parse::<Style>(),
            Err(EditError::UnknownStyle("blink".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for style in Style::ALL {
            assert_eq!(style.to_string().parse::<Style>(), Ok(style));
        }
    }

    #[test]
    fn test_flags_toggle_independently() {
        let mut flags = StyleFlags::default();
        assert!(flags.toggle(Style::Bold));
        assert!(flags.get(Style::Bold));
        assert!(!flags.get(Style::Italic));
        assert!(!flags.toggle(Style::Bold));
        assert!(!flags.get(Style::Bold));
    }

    #[test]
    fn test_flags_clear_and_active() {
        let mut flags = StyleFlags::default();
        flags.toggle(Style::Code);
        flags.toggle(Style::Quote);
        assert_eq!(flags.active().collect::<Vec<_>>(), vec![Style::Code, Style::Quote]);
        flags.clear();
        assert_eq!(flags.active().count(), 0);
    }
}
