//! The fixed ANSI color palettes Discord understands inside `ansi` blocks.

use serde::Serialize;

use crate::error::EditError;

/// Sequence that ends every colored region.
pub const RESET: &str = "\x1b[0m";

/// Which half of the palette a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Foreground,
    Background,
}

/// One swatch: how it looks in the preview and which SGR code it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorToken {
    /// Preview color as `#rrggbb`.
    pub display: &'static str,
    pub name: &'static str,
    /// SGR parameter, 30-37 or 40-47.
    pub code: u8,
    pub layer: Layer,
}

impl ColorToken {
    const fn fg(display: &'static str, name: &'static str, code: u8) -> Self {
        Self {
            display,
            name,
            code,
            layer: Layer::Foreground,
        }
    }

    const fn bg(display: &'static str, name: &'static str, code: u8) -> Self {
        Self {
            display,
            name,
            code,
            layer: Layer::Background,
        }
    }

    /// The escape that opens a region in this color, e.g. `ESC[31m`.
    pub fn escape(&self) -> String {
        format!("\x1b[{}m", self.code)
    }

    pub const fn is_background(&self) -> bool {
        matches!(self.layer, Layer::Background)
    }

    /// Preview color as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex(self.display).unwrap_or((0xff, 0xff, 0xff))
    }
}

pub static FOREGROUND: [ColorToken; 8] = [
    ColorToken::fg("#9e9e9e", "Gray", 30),
    ColorToken::fg("#e74c3c", "Red", 31),
    ColorToken::fg("#9acd32", "Green", 32),
    ColorToken::fg("#e67e22", "Yellow", 33),
    ColorToken::fg("#3498db", "Blue", 34),
    ColorToken::fg("#e91e63", "Magenta", 35),
    ColorToken::fg("#1abc9c", "Cyan", 36),
    ColorToken::fg("#ffffff", "White", 37),
];

pub static BACKGROUND: [ColorToken; 8] = [
    ColorToken::bg("#1e272e", "Black", 40),
    ColorToken::bg("#e74c3c", "Red", 41),
    ColorToken::bg("#4b7b2e", "Green", 42),
    ColorToken::bg("#7c592e", "Yellow", 43),
    ColorToken::bg("#2e587c", "Blue", 44),
    ColorToken::bg("#635394", "Magenta", 45),
    ColorToken::bg("#16a085", "Cyan", 46),
    ColorToken::bg("#f5f5f5", "White", 47),
];

/// Look up a foreground token by name.
///
/// # Errors
/// Returns [`EditError::UnknownColor`] for names outside the palette.
pub fn foreground(name: &str) -> Result<&'static ColorToken, EditError> {
    find(&FOREGROUND, name)
}

/// Look up a background token by name.
///
/// # Errors
/// Returns [`EditError::UnknownColor`] for names outside the palette.
pub fn background(name: &str) -> Result<&'static ColorToken, EditError> {
    find(&BACKGROUND, name)
}

/// Look up a token by layer and name.
///
/// # Errors
/// Returns [`EditError::UnknownColor`] for names outside the palette.
pub fn lookup(name: &str, is_background: bool) -> Result<&'static ColorToken, EditError> {
    if is_background {
        background(name)
    } else {
        foreground(name)
    }
}

/// Look up any token by its SGR code.
pub fn by_code(code: u8) -> Option<&'static ColorToken> {
    FOREGROUND
        .iter()
        .chain(BACKGROUND.iter())
        .find(|token| token.code == code)
}

fn find(tokens: &'static [ColorToken], name: &str) -> Result<&'static ColorToken, EditError> {
    let wanted = name.trim();
    tokens
        .iter()
        .find(|token| {
            token.name.eq_ignore_ascii_case(wanted) || token.code.to_string() == wanted
        })
        .ok_or_else(|| EditError::UnknownColor(name.to_string()))
}

/// Parse `#rrggbb` into an RGB triple.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
