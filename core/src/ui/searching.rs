// Copyright (c) 2022-2023 The MobileCoin Foundation

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use super::{FrameTarget, FONT};
use crate::{Frame, OverlayConfig};

/// Searching overlay, centred instruction text near the bottom edge
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Searching<'a> {
    instructions: &'a str,
}

impl<'a> Searching<'a> {
    pub fn new(instructions: &'a str) -> Self {
        Self { instructions }
    }

    /// Render the overlay onto a frame
    pub fn render(&self, frame: &mut Frame, c: &OverlayConfig) {
        let p = Point::new(
            frame.width() as i32 / 2,
            frame.height() as i32 - c.edge_padding as i32,
        );

        let mut t = FrameTarget(frame);
        let style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Alphabetic)
            .build();

        // Drop shadow then text
        for (offset, color) in [(Point::new(1, 1), Rgb888::BLACK), (Point::zero(), c.text())] {
            Text::with_text_style(
                self.instructions,
                p + offset,
                MonoTextStyle::new(FONT, color),
                style,
            )
            .draw(&mut t)
            .unwrap_or_else(|e| match e {});
        }
    }
}

#[cfg(test)]
mod test {
    use image::Rgb;

    use super::*;

    const GRAY: [u8; 3] = [128, 128, 128];

    #[test]
    fn instructions_near_bottom() {
        let c = OverlayConfig::default();
        let mut f = Frame::from_pixel(240, 240, Rgb(GRAY));

        Searching::new("Scan a QR code").render(&mut f, &c);

        let changed = |y0: u32, y1: u32, colour: [u8; 3]| {
            (y0..y1).any(|y| (0..240).any(|x| f.get_pixel(x, y).0 == colour))
        };

        // Text and shadow drawn within the bottom band
        assert!(changed(240 - 32, 240, c.text_color));
        assert!(changed(240 - 32, 240, [0, 0, 0]));

        // Nothing drawn above
        assert!(!changed(0, 240 - 32, c.text_color));
        assert!(!changed(0, 240 - 32, [0, 0, 0]));

        // Edges left clear
        assert_eq!(f.get_pixel(2, 230).0, GRAY);
    }

    #[test]
    fn empty_instructions() {
        let mut f = Frame::from_pixel(32, 32, Rgb(GRAY));
        Searching::new("").render(&mut f, &OverlayConfig::default());
        assert!(f.pixels().all(|p| p.0 == GRAY));
    }
}
