use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GraphError, GraphResult};

/// RGBA color in 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(input: &str) -> GraphResult<Self> {
        let invalid = || {
            GraphError::config(
                ErrorKind::InvalidInput,
                format!("color `{input}` must be a #rgb, #rrggbb or #rrggbbaa hex string"),
            )
        };
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let expand = |index: usize| channel(index..index + 1).map(|v| v * 17);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        if self.alpha == 255 {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

/// Series colors handed out in load order when a content omits `color`.
pub const DEFAULT_PALETTE: [Color; 6] = [
    Color::rgb(0x1c, 0x1f, 0x21),
    Color::rgb(0x00, 0x7c, 0xc3),
    Color::rgb(0x5a, 0x8a, 0x00),
    Color::rgb(0xc0, 0x4f, 0x00),
    Color::rgb(0x8b, 0x3e, 0xa8),
    Color::rgb(0xd2, 0x00, 0x52),
];

pub const REGION_COLOR: Color = Color::rgb(0xf3, 0xf4, 0xf4);
pub const DATELINE_COLOR: Color = Color::rgb(0x0c, 0x8f, 0xd6);
pub const GRID_COLOR: Color = Color::rgb(0xe2, 0xe4, 0xe6);
pub const GRID_MINOR_COLOR: Color = Color::rgb(0xf0, 0xf1, 0xf2);
pub const AXIS_COLOR: Color = Color::rgb(0x1c, 0x1f, 0x21);

/// Resolves an optional configured color, falling back to the palette slot.
pub fn resolve_color(configured: Option<&str>, palette_index: usize) -> GraphResult<Color> {
    match configured {
        Some(value) => Color::parse_hex(value),
        None => Ok(DEFAULT_PALETTE[palette_index % DEFAULT_PALETTE.len()]),
    }
}
