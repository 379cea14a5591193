//! Render engine
//!
//! Composes a frame, rasterizes it into the pixel buffer and pushes the
//! whole buffer to the panel. The push is the only side effect and happens
//! exactly once per call.

use embedded_graphics::pixelcolor::Rgb565;
use htp1_core::config::LayoutSettings;
use htp1_core::status::RemoteStatus;

use crate::backend::{DisplayDriver, DisplayError};
use crate::frame::Frame;
use crate::layout::{compose, compose_message};
use crate::metrics::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::raster::{rasterize, PixelBuffer};

/// Pixels in one full frame
pub const FRAME_PIXELS: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize;

/// Renderer owning the panel driver and a borrowed frame buffer
pub struct Renderer<'a, D> {
    driver: D,
    buffer: PixelBuffer<'a>,
}

impl<'a, D: DisplayDriver> Renderer<'a, D> {
    /// Create a renderer drawing into `pixels`
    ///
    /// `pixels` must hold at least [`FRAME_PIXELS`] entries.
    pub fn new(driver: D, pixels: &'a mut [u16]) -> Result<Self, DisplayError> {
        Ok(Self {
            driver,
            buffer: PixelBuffer::new(pixels, DISPLAY_WIDTH, DISPLAY_HEIGHT)?,
        })
    }

    /// Render the status screen for the current layout
    pub fn render(
        &mut self,
        status: &RemoteStatus,
        layout: &LayoutSettings,
    ) -> Result<Frame, DisplayError> {
        let frame = compose(status, layout);
        self.present(&frame)?;
        Ok(frame)
    }

    /// Render a centered one- or two-line message
    pub fn render_message(
        &mut self,
        line1: &str,
        line2: Option<&str>,
        color: Rgb565,
    ) -> Result<Frame, DisplayError> {
        let frame = compose_message(line1, line2, color);
        self.present(&frame)?;
        Ok(frame)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if let Err(never) = rasterize(frame, &mut self.buffer) {
            match never {}
        }
        self.driver.push_pixels(
            0,
            0,
            DISPLAY_WIDTH as u16,
            DISPLAY_HEIGHT as u16,
            self.buffer.pixels(),
        )
    }

    /// Last rasterized frame
    pub fn buffer(&self) -> &PixelBuffer<'a> {
        &self.buffer
    }

    /// Get access to the panel driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get mutable access to the panel driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
