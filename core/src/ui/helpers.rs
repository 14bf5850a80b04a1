// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_8X13, MonoFont, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    text::{renderer::TextRenderer, Baseline},
};
use image::{imageops, Rgb};

use crate::Frame;

/// Overlay font
pub const FONT: &MonoFont<'static> = &FONT_8X13;

/// Opaque [DrawTarget] over a [Frame]
pub struct FrameTarget<'a>(pub &'a mut Frame);

impl<'a> OriginDimensions for FrameTarget<'a> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl<'a> DrawTarget for FrameTarget<'a> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some((x, y)) = clip(self.0, p) {
                self.0.put_pixel(x, y, Rgb([c.r(), c.g(), c.b()]));
            }
        }
        Ok(())
    }
}

/// Alpha-blending [DrawTarget] over a [Frame]
///
/// Each drawn pixel is blended once with the underlying frame, so only
/// fill styles (which emit each pixel exactly once) should be used.
pub struct Translucent<'a> {
    frame: &'a mut Frame,
    alpha: u8,
}

impl<'a> Translucent<'a> {
    /// Create a blending target with the provided opacity
    pub fn new(frame: &'a mut Frame, alpha: u8) -> Self {
        Self { frame, alpha }
    }
}

impl<'a> OriginDimensions for Translucent<'a> {
    fn size(&self) -> Size {
        Size::new(self.frame.width(), self.frame.height())
    }
}

impl<'a> DrawTarget for Translucent<'a> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some((x, y)) = clip(self.frame, p) {
                let bg = self.frame.get_pixel(x, y).0;
                let fg = [c.r(), c.g(), c.b()];

                let mut out = [0u8; 3];
                for i in 0..3 {
                    out[i] = blend(fg[i], bg[i], self.alpha);
                }

                self.frame.put_pixel(x, y, Rgb(out));
            }
        }
        Ok(())
    }
}

/// Blend foreground over background channel with alpha (0..=255)
pub fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Map a draw point onto frame coordinates, `None` if out of bounds
fn clip(frame: &Frame, p: Point) -> Option<(u32, u32)> {
    let (x, y) = (u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?);
    match x < frame.width() && y < frame.height() {
        true => Some((x, y)),
        false => None,
    }
}

/// Width of the provided string in the overlay font
pub fn text_width(s: &str) -> u32 {
    MonoTextStyle::new(FONT, Rgb888::BLACK)
        .measure_string(s, Point::zero(), Baseline::Top)
        .bounding_box
        .size
        .width
}

/// Fit a frame to the viewport
///
/// Frames exceeding the viewport are downsampled (nearest-neighbour,
/// preserving aspect ratio), frames smaller than the viewport are
/// centred on a black canvas.
pub fn fit_to_viewport(frame: &Frame, viewport: (u32, u32)) -> Frame {
    let (vw, vh) = viewport;
    let (fw, fh) = frame.dimensions();

    if (fw, fh) == (vw, vh) || fw == 0 || fh == 0 {
        return frame.clone();
    }

    // Downsample when either dimension exceeds the viewport
    let scaled = if fw > vw || fh > vh {
        let (sw, sh) = match fw as u64 * vh as u64 > fh as u64 * vw as u64 {
            // Width limited
            true => (vw, (fh as u64 * vw as u64 / fw as u64) as u32),
            // Height limited
            false => ((fw as u64 * vh as u64 / fh as u64) as u32, vh),
        };
        imageops::resize(frame, sw.max(1), sh.max(1), imageops::FilterType::Nearest)
    } else {
        frame.clone()
    };

    if scaled.dimensions() == (vw, vh) {
        return scaled;
    }

    // Letterbox onto a black canvas
    let mut canvas = Frame::new(vw, vh);
    let x = (vw as i64 - scaled.width() as i64) / 2;
    let y = (vh as i64 - scaled.height() as i64) / 2;
    imageops::replace(&mut canvas, &scaled, x, y);

    canvas
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blend_bounds() {
        assert_eq!(blend(200, 10, 255), 200);
        assert_eq!(blend(200, 10, 0), 10);
        assert_eq!(blend(0, 128, 191), 32);
    }

    #[test]
    fn fit_same_size() {
        let f = Frame::from_pixel(240, 240, Rgb([1, 2, 3]));
        assert_eq!(fit_to_viewport(&f, (240, 240)), f);
    }

    #[test]
    fn fit_downsample() {
        let f = Frame::from_pixel(480, 480, Rgb([9, 9, 9]));
        let o = fit_to_viewport(&f, (240, 240));

        assert_eq!(o.dimensions(), (240, 240));
        assert!(o.pixels().all(|p| p.0 == [9, 9, 9]));
    }

    #[test]
    fn fit_downsample_aspect() {
        let f = Frame::from_pixel(640, 480, Rgb([9, 9, 9]));
        let o = fit_to_viewport(&f, (240, 240));

        // 240x180 centred vertically
        assert_eq!(o.dimensions(), (240, 240));
        assert_eq!(o.get_pixel(120, 10).0, [0, 0, 0]);
        assert_eq!(o.get_pixel(120, 120).0, [9, 9, 9]);
        assert_eq!(o.get_pixel(120, 229).0, [0, 0, 0]);
    }

    #[test]
    fn fit_letterbox() {
        let f = Frame::from_pixel(100, 100, Rgb([200, 200, 200]));
        let o = fit_to_viewport(&f, (240, 240));

        assert_eq!(o.dimensions(), (240, 240));
        assert_eq!(o.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(o.get_pixel(69, 120).0, [0, 0, 0]);
        assert_eq!(o.get_pixel(70, 70).0, [200, 200, 200]);
        assert_eq!(o.get_pixel(169, 169).0, [200, 200, 200]);
        assert_eq!(o.get_pixel(170, 120).0, [0, 0, 0]);
    }

    #[test]
    fn draw_clipped() {
        let mut f = Frame::new(4, 4);
        let mut t = FrameTarget(&mut f);

        t.draw_iter([
            Pixel(Point::new(-1, 0), Rgb888::WHITE),
            Pixel(Point::new(4, 0), Rgb888::WHITE),
            Pixel(Point::new(1, 1), Rgb888::WHITE),
        ])
        .unwrap();

        assert_eq!(f.get_pixel(1, 1).0, [255, 255, 255]);
        assert_eq!(f.pixels().filter(|p| p.0 != [0, 0, 0]).count(), 1);
    }

    #[test]
    fn font_width() {
        assert_eq!(text_width("100%"), 4 * FONT.character_size.width);
    }
}
