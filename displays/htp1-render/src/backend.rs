//! Display driver trait
//!
//! The panel is driven by full-frame pushes only; there is no partial or
//! incremental update path.

/// Display driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Push rectangle outside the panel
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
    /// Pixel buffer smaller than the area it describes
    BufferOverflow,
}

/// Panel driver
///
/// Implemented by the board support code for the concrete panel.
pub trait DisplayDriver {
    /// Push a rectangle of RGB565 pixels, row-major, `width * height` long
    fn push_pixels(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError>;

    /// Set the raw backlight brightness
    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Turn the panel on or off
    fn set_power(&mut self, on: bool) -> Result<(), DisplayError>;
}
