//! Theme palette table
//!
//! Each theme is an accent color for the volume and a dimmer secondary
//! color for labels. Mute and standby use the fixed [`ALERT`] color in
//! every theme.

use embedded_graphics::pixelcolor::Rgb565;
use htp1_core::config::{Theme, THEME_COUNT};

/// Build an [`Rgb565`] from its packed 16-bit value
pub const fn rgb565(raw: u16) -> Rgb565 {
    Rgb565::new(
        ((raw >> 11) & 0x1F) as u8,
        ((raw >> 5) & 0x3F) as u8,
        (raw & 0x1F) as u8,
    )
}

/// Screen background
pub const BACKGROUND: Rgb565 = rgb565(0x0000);

/// Mute and standby indicator color
pub const ALERT: Rgb565 = rgb565(0xF800);

/// Accent and secondary color of one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Volume text
    pub accent: Rgb565,
    /// Label text
    pub secondary: Rgb565,
}

/// Indexed by [`Theme::index`]
const PALETTES: [Palette; THEME_COUNT] = [
    // White
    Palette {
        accent: rgb565(0xFFFF),
        secondary: rgb565(0x7BEF),
    },
    // Green
    Palette {
        accent: rgb565(0x07E0),
        secondary: rgb565(0x0400),
    },
    // Amber
    Palette {
        accent: rgb565(0xFBE0),
        secondary: rgb565(0x7980),
    },
    // Blue
    Palette {
        accent: rgb565(0x051F),
        secondary: rgb565(0x0010),
    },
    // Red
    Palette {
        accent: rgb565(0xF800),
        secondary: rgb565(0x7800),
    },
    // Cyan
    Palette {
        accent: rgb565(0x07FF),
        secondary: rgb565(0x0410),
    },
];

/// Look up the palette of a theme
pub fn palette(theme: Theme) -> Palette {
    PALETTES[theme.index()]
}
