//! Frame display list
//!
//! A frame is the complete, resolved description of one screen: every
//! text region with its final text, size, position and color. Building a
//! frame is pure; rasterizing it is a separate step.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::metrics::FontKind;
use crate::text::Line;

/// Maximum text regions in one frame
pub const MAX_REGIONS: usize = 5;

/// What a text region shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Volume,
    Input,
    Codec,
    Surround,
    ListeningFormat,
    /// First line of a status message
    Title,
    /// Second line of a status message
    Detail,
}

/// One positioned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRegion {
    pub slot: Slot,
    pub text: Line,
    pub font: FontKind,
    /// Size step after auto-shrink
    pub size: u8,
    /// Top-left corner of the first character cell
    pub origin: Point,
    pub color: Rgb565,
}

impl TextRegion {
    /// Area covered by the text's character cells
    pub fn bounds(&self) -> Rectangle {
        let cell = self.font.cell(self.size);
        let chars = self.text.chars().count() as u32;
        Rectangle::new(
            self.origin,
            Size::new(cell.width * chars, cell.height),
        )
    }
}

/// Strip painted over the bottom of the screen, after all regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Area cleared to the background first
    pub area: Rectangle,
    pub text: TextRegion,
}

/// Complete screen description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub background: Rgb565,
    pub regions: Vec<TextRegion, MAX_REGIONS>,
    pub banner: Option<Banner>,
}

impl Frame {
    /// Create an empty frame
    pub fn new(background: Rgb565) -> Self {
        Self {
            background,
            regions: Vec::new(),
            banner: None,
        }
    }

    /// Find the region showing `slot`
    pub fn region(&self, slot: Slot) -> Option<&TextRegion> {
        self.regions.iter().find(|r| r.slot == slot)
    }

    /// Text shown in `slot`, if present
    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.region(slot).map(|r| r.text.as_str())
    }
}
