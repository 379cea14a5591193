//! Layout, theming and rasterization for the HTP-1 companion display
//!
//! This crate turns a [`RemoteStatus`](htp1_core::RemoteStatus) snapshot
//! and the user's [`LayoutSettings`](htp1_core::LayoutSettings) into
//! pixels:
//!
//! - `layout`: per-mode recipe table, resolved into a [`Frame`]
//! - `text`: codec abbreviation and input-name resolution
//! - `metrics`: glyph sizes and the auto-shrink rule
//! - `theme`: theme palette table
//! - `raster`: drawing a frame into an RGB565 [`PixelBuffer`]
//! - `renderer`: compose, rasterize and push in one call
//! - `backlight`: dim/sleep policy for the panel
//!
//! The panel itself is reached only through [`DisplayDriver`].

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod backlight;
pub mod frame;
pub mod layout;
pub mod metrics;
pub mod raster;
pub mod renderer;
pub mod text;
pub mod theme;

pub use backend::{DisplayDriver, DisplayError};
pub use backlight::{Backlight, BacklightState, PanelCommand};
pub use frame::{Frame, Slot, TextRegion};
pub use layout::{compose, compose_message};
pub use raster::PixelBuffer;
pub use renderer::{Renderer, FRAME_PIXELS};
pub use theme::{palette, Palette, ALERT};
