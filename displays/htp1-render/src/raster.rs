//! Frame rasterization
//!
//! Frames are drawn with `embedded-graphics` into a [`PixelBuffer`]. The
//! bitmap fonts are scaled by drawing each font pixel as a solid square
//! through the [`Scaled`] adapter.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::backend::DisplayError;
use crate::frame::{Frame, TextRegion};

/// Draw target that magnifies every pixel by an integer factor
pub struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    factor: u32,
}

impl<'a, D: DrawTarget> Scaled<'a, D> {
    /// Draw onto `inner` with pixel (0, 0) mapped to `origin`
    pub fn new(inner: &'a mut D, origin: Point, factor: u32) -> Self {
        Self {
            inner,
            origin,
            factor: factor.max(1),
        }
    }
}

impl<D: DrawTarget> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let inner = self.inner.bounding_box();
        let factor = self.factor as i32;
        Rectangle::new(
            (inner.top_left - self.origin) / factor,
            Size::new(
                inner.size.width / self.factor + 1,
                inner.size.height / self.factor + 1,
            ),
        )
    }
}

impl<D: DrawTarget> DrawTarget for Scaled<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let cell = Size::new_equal(self.factor);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.factor as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, cell), color)?;
        }
        Ok(())
    }
}

/// Caller-owned RGB565 frame buffer
pub struct PixelBuffer<'a> {
    pixels: &'a mut [u16],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `pixels` as a `width` x `height` row-major buffer
    pub fn new(pixels: &'a mut [u16], width: u32, height: u32) -> Result<Self, DisplayError> {
        let needed = width as usize * height as usize;
        if pixels.len() < needed {
            return Err(DisplayError::BufferOverflow);
        }
        Ok(Self {
            pixels: &mut pixels[..needed],
            width,
            height,
        })
    }

    /// Raw pixels, row-major
    pub fn pixels(&self) -> &[u16] {
        self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl OriginDimensions for PixelBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.width && y < self.height {
                let i = self.index(x, y);
                self.pixels[i] = color.into_storage();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        let raw = color.into_storage();
        for y in area.top_left.y..=bottom_right.y {
            let start = self.index(area.top_left.x as u32, y as u32);
            let end = self.index(bottom_right.x as u32, y as u32);
            self.pixels[start..=end].fill(raw);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.into_storage());
        Ok(())
    }
}

fn draw_region<D>(region: &TextRegion, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(region.font.base(), region.color);
    let mut scaled = Scaled::new(target, region.origin, region.font.scale(region.size));
    Text::with_baseline(&region.text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    Ok(())
}

/// Draw a complete frame
///
/// Clears to the background, draws every region in order, then the banner
/// (area cleared first) on top.
pub fn rasterize<D>(frame: &Frame, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(frame.background)?;
    for region in &frame.regions {
        draw_region(region, target)?;
    }
    if let Some(banner) = &frame.banner {
        target.fill_solid(&banner.area, frame.background)?;
        draw_region(&banner.text, target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::frame::Slot;
    use crate::metrics::FontKind;
    use crate::theme::{ALERT, BACKGROUND};
    use htp1_core::status::bounded;

    #[test]
    fn test_buffer_too_small() {
        let mut pixels = vec![0u16; 10];
        assert!(matches!(
            PixelBuffer::new(&mut pixels, 4, 4),
            Err(DisplayError::BufferOverflow)
        ));
    }

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut pixels = vec![0u16; 16];
        let mut buffer = PixelBuffer::new(&mut pixels, 4, 4).unwrap();
        buffer
            .fill_solid(&Rectangle::new(Point::new(2, 2), Size::new(10, 10)), ALERT)
            .unwrap();
        assert_eq!(buffer.pixel(1, 1), Some(0));
        assert_eq!(buffer.pixel(2, 2), Some(0xF800));
        assert_eq!(buffer.pixel(3, 3), Some(0xF800));
        assert_eq!(buffer.pixel(4, 4), None);
    }

    #[test]
    fn test_scaled_pixel_is_a_square() {
        let mut pixels = vec![0u16; 64];
        let mut buffer = PixelBuffer::new(&mut pixels, 8, 8).unwrap();
        let mut scaled = Scaled::new(&mut buffer, Point::new(2, 2), 3);
        Pixel(Point::new(0, 0), ALERT).draw(&mut scaled).unwrap();

        let lit = buffer.pixels().iter().filter(|&&p| p == 0xF800).count();
        assert_eq!(lit, 9);
        assert_eq!(buffer.pixel(2, 2), Some(0xF800));
        assert_eq!(buffer.pixel(4, 4), Some(0xF800));
        assert_eq!(buffer.pixel(5, 5), Some(0));
    }

    #[test]
    fn test_text_lands_inside_its_cells() {
        let mut pixels = vec![0u16; 120 * 60];
        let mut buffer = PixelBuffer::new(&mut pixels, 120, 60).unwrap();
        let mut frame = Frame::new(BACKGROUND);
        let region = TextRegion {
            slot: Slot::Volume,
            text: bounded("8"),
            font: FontKind::Volume,
            size: 1,
            origin: Point::new(20, 5),
            color: ALERT,
        };
        let bounds = region.bounds();
        frame.regions.push(region).unwrap();

        rasterize(&frame, &mut buffer).unwrap();

        let mut lit = 0;
        for y in 0..60 {
            for x in 0..120 {
                if buffer.pixel(x, y) == Some(0xF800) {
                    lit += 1;
                    assert!(bounds.contains(Point::new(x as i32, y as i32)));
                }
            }
        }
        assert!(lit > 0);
    }
}
