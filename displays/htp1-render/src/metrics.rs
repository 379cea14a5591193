//! Display geometry and glyph metrics
//!
//! Both fonts are fixed-width bitmap fonts scaled by an integer factor, so
//! a text's width is simply its character count times the cell width.

use embedded_graphics::geometry::Size;
use embedded_graphics::mono_font::ascii::{FONT_6X12, FONT_6X13};
use embedded_graphics::mono_font::MonoFont;

/// Panel width (pixels)
pub const DISPLAY_WIDTH: u32 = 536;

/// Panel height (pixels)
pub const DISPLAY_HEIGHT: u32 = 240;

/// Edge margin (pixels)
pub const MARGIN: u32 = 10;

/// Width allotted to a label sharing its row with another
pub const HALF_ROW: u32 = DISPLAY_WIDTH / 2;

/// Width allotted to a label alone on its row
pub const FULL_ROW: u32 = DISPLAY_WIDTH - 2 * MARGIN;

/// Text font family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontKind {
    /// Large numerals; 48 px tall per size step
    Volume,
    /// Status labels; 26 px tall per size step
    Label,
}

impl FontKind {
    /// Unscaled bitmap font
    pub fn base(self) -> &'static MonoFont<'static> {
        match self {
            FontKind::Volume => &FONT_6X12,
            FontKind::Label => &FONT_6X13,
        }
    }

    /// Pixel scale of one size step
    pub const fn step(self) -> u32 {
        match self {
            FontKind::Volume => 4,
            FontKind::Label => 2,
        }
    }

    /// Pixel scale at `size`
    pub fn scale(self, size: u8) -> u32 {
        self.step() * u32::from(size.max(1))
    }

    /// Size of one character cell at `size`
    pub fn cell(self, size: u8) -> Size {
        let font = self.base();
        let scale = self.scale(size);
        Size::new(
            (font.character_size.width + font.character_spacing) * scale,
            font.character_size.height * scale,
        )
    }

    /// Glyph height at `size`
    pub fn height(self, size: u8) -> u32 {
        self.cell(size).height
    }

    /// Rendered width of `text` at `size`
    pub fn text_width(self, text: &str, size: u8) -> u32 {
        text.chars().count() as u32 * self.cell(size).width
    }
}

/// Pick the size to draw `text` at
///
/// If the text overflows `allotted` at the configured size it is redrawn
/// one step smaller. There is only one retry, and the size never goes
/// below 1; what still overflows is clipped.
pub fn fit_size(font: FontKind, text: &str, size: u8, allotted: u32) -> u8 {
    let size = size.max(1);
    if size > 1 && font.text_width(text, size) > allotted {
        size - 1
    } else {
        size
    }
}
