//! Mode layout recipes
//!
//! Each display mode is a fixed list of placements: which slot, in which
//! font, how it is aligned and how much width it may use. [`compose`]
//! resolves a recipe against a status snapshot into a [`Frame`].
//!
//! ```text
//! VolumeOnly      VolumeSource     VolumeCodec      FullStatus
//! +----------+    +----------+     +----------+     +----------+
//! |          |    |input     |     |  VOLUME  |     |input  cod|
//! |  VOLUME  |    |  VOLUME  |     |          |     |  VOLUME  |
//! |          |    |          |     |  codec   |     |surr  list|
//! +----------+    +----------+     +----------+     +----------+
//! ```

use core::fmt::Write;

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use htp1_core::config::{DisplayMode, LayoutSettings, MODE_COUNT};
use htp1_core::status::{bounded, RemoteStatus};

use crate::frame::{Banner, Frame, Slot, TextRegion};
use crate::metrics::{fit_size, FontKind, DISPLAY_HEIGHT, DISPLAY_WIDTH, FULL_ROW, HALF_ROW, MARGIN};
use crate::text::{codec_line, input_name, Line};
use crate::theme::{palette, ALERT, BACKGROUND};

/// Text shown instead of the volume while muted
pub const MUTE_TEXT: &str = "MUTE";

/// Text of the power-off banner
pub const STANDBY_TEXT: &str = "STANDBY";

/// Height of the power-off banner strip
pub const BANNER_HEIGHT: u32 = 36;

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Vertical placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Top margin
    Top,
    /// Bottom margin
    Bottom,
    /// Centered on the screen
    Middle,
    /// Centered in the space below the top label row
    BelowLabels,
    /// Centered between the top and bottom label rows
    BetweenLabels,
}

/// One entry of a layout recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: Slot,
    pub align: Align,
    pub row: Row,
    /// Width the text may use before it is shrunk
    pub allotted: u32,
}

const fn place(slot: Slot, align: Align, row: Row, allotted: u32) -> Placement {
    Placement {
        slot,
        align,
        row,
        allotted,
    }
}

/// Indexed by [`DisplayMode::index`]
const RECIPES: [&[Placement]; MODE_COUNT] = [
    // Volume only
    &[place(Slot::Volume, Align::Center, Row::Middle, FULL_ROW)],
    // Volume + source
    &[
        place(Slot::Input, Align::Left, Row::Top, FULL_ROW),
        place(Slot::Volume, Align::Center, Row::BelowLabels, FULL_ROW),
    ],
    // Volume + codec
    &[
        place(Slot::Volume, Align::Center, Row::Top, FULL_ROW),
        place(Slot::Codec, Align::Center, Row::Bottom, FULL_ROW),
    ],
    // Full status
    &[
        place(Slot::Input, Align::Left, Row::Top, HALF_ROW),
        place(Slot::Codec, Align::Right, Row::Top, HALF_ROW),
        place(Slot::Volume, Align::Center, Row::BetweenLabels, FULL_ROW),
        place(Slot::Surround, Align::Left, Row::Bottom, HALF_ROW),
        place(Slot::ListeningFormat, Align::Right, Row::Bottom, HALF_ROW),
    ],
];

/// Layout recipe of a display mode
pub fn recipe(mode: DisplayMode) -> &'static [Placement] {
    RECIPES[mode.index()]
}

/// Resolve the current mode's recipe into a frame
pub fn compose(status: &RemoteStatus, layout: &LayoutSettings) -> Frame {
    let colors = palette(layout.theme);
    let label_size = layout.label_size();
    let label_height = FontKind::Label.height(label_size);

    let mut frame = Frame::new(BACKGROUND);
    for placement in recipe(layout.mode) {
        let (font, size, color) = match placement.slot {
            Slot::Volume if status.muted => (FontKind::Volume, layout.volume_size(), ALERT),
            Slot::Volume => (FontKind::Volume, layout.volume_size(), colors.accent),
            _ => (FontKind::Label, label_size, colors.secondary),
        };

        let text = slot_text(placement.slot, status, layout);
        if text.is_empty() {
            continue;
        }

        let size = fit_size(font, &text, size, placement.allotted);
        let size = fit_band(font, size, placement.row, label_height);
        let width = font.text_width(&text, size);
        let height = font.height(size);
        let origin = Point::new(
            x_for(placement.align, width),
            y_for(placement.row, height, label_height),
        );

        let _ = frame.regions.push(TextRegion {
            slot: placement.slot,
            text,
            font,
            size,
            origin,
            color,
        });
    }

    if !status.power_is_on {
        frame.banner = Some(standby_banner());
    }
    frame
}

fn slot_text(slot: Slot, status: &RemoteStatus, layout: &LayoutSettings) -> Line {
    match slot {
        Slot::Volume if status.muted => bounded(MUTE_TEXT),
        Slot::Volume => {
            let mut text = Line::new();
            let _ = write!(text, "{}", status.display_volume());
            text
        }
        Slot::Input => bounded(input_name(&status.input_label, &layout.input_names)),
        Slot::Codec => codec_line(&status.codec_name, &status.program_format),
        Slot::Surround => bounded(&status.surround_mode),
        Slot::ListeningFormat => bounded(&status.listening_format),
        Slot::Title | Slot::Detail => Line::new(),
    }
}

/// Shrink text placed between the label rows until it clears both of them
fn fit_band(font: FontKind, mut size: u8, row: Row, label_height: u32) -> u8 {
    if row != Row::BetweenLabels {
        return size;
    }
    let band = DISPLAY_HEIGHT.saturating_sub(2 * (MARGIN + label_height));
    while size > 1 && font.height(size) > band {
        size -= 1;
    }
    size
}

fn x_for(align: Align, width: u32) -> i32 {
    let free = DISPLAY_WIDTH as i32 - width as i32;
    match align {
        Align::Left => MARGIN as i32,
        Align::Center => (free / 2).max(0),
        Align::Right => (free - MARGIN as i32).max(0),
    }
}

fn y_for(row: Row, height: u32, label_height: u32) -> i32 {
    let screen = DISPLAY_HEIGHT as i32;
    let height = height as i32;
    let margin = MARGIN as i32;
    let label_height = label_height as i32;

    let centered_in = |top: i32, bottom: i32| {
        let y = top + (bottom - top - height) / 2;
        y.clamp(0, (screen - height).max(0))
    };

    match row {
        Row::Top => margin,
        Row::Bottom => (screen - margin - height).max(0),
        Row::Middle => centered_in(0, screen),
        Row::BelowLabels => centered_in(margin + label_height, screen),
        Row::BetweenLabels => centered_in(margin + label_height, screen - margin - label_height),
    }
}

fn standby_banner() -> Banner {
    let font = FontKind::Label;
    let size = 1;
    let top = (DISPLAY_HEIGHT - BANNER_HEIGHT) as i32;
    let width = font.text_width(STANDBY_TEXT, size);
    let height = font.height(size);

    Banner {
        area: Rectangle::new(
            Point::new(0, top),
            Size::new(DISPLAY_WIDTH, BANNER_HEIGHT),
        ),
        text: TextRegion {
            slot: Slot::Title,
            text: bounded(STANDBY_TEXT),
            font,
            size,
            origin: Point::new(
                x_for(Align::Center, width),
                top + (BANNER_HEIGHT as i32 - height as i32) / 2,
            ),
            color: ALERT,
        },
    }
}

/// Lay out a centered one- or two-line message
///
/// The first line is drawn at label size 2, the second at size 1.
pub fn compose_message(line1: &str, line2: Option<&str>, color: Rgb565) -> Frame {
    let mut frame = Frame::new(BACKGROUND);
    let middle = DISPLAY_HEIGHT as i32 / 2;

    let lines: [(Slot, &str, u8, i32); 2] = match line2 {
        Some(detail) => [
            (Slot::Title, line1, 2, middle - 30),
            (Slot::Detail, detail, 1, middle + 30),
        ],
        None => [(Slot::Title, line1, 2, middle), (Slot::Detail, "", 1, middle)],
    };

    for (slot, text, size, center_y) in lines {
        if text.is_empty() {
            continue;
        }
        let text: Line = bounded(text);
        let font = FontKind::Label;
        let size = fit_size(font, &text, size, FULL_ROW);
        let width = font.text_width(&text, size);
        let height = font.height(size) as i32;

        let _ = frame.regions.push(TextRegion {
            slot,
            text,
            font,
            size,
            origin: Point::new(x_for(Align::Center, width), center_y - height / 2),
            color,
        });
    }
    frame
}
