// Copyright (c) 2022-2023 The MobileCoin Foundation

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use super::{text_width, FrameTarget, Translucent, FONT};
use crate::{Frame, OverlayConfig, ScanStatus};

/// Progress overlay, a translucent panel anchored to the bottom edge
/// containing a completion bar and percentage, with a status indicator
/// above the panel's right end
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Progress {
    percent: u8,
    indicator: Option<ScanStatus>,
}

impl Progress {
    /// Create a progress overlay, `percent` is clamped to 100
    pub fn new(percent: u8, indicator: Option<ScanStatus>) -> Self {
        Self {
            percent: percent.min(100),
            indicator,
        }
    }

    /// Render the overlay onto a frame
    pub fn render(&self, frame: &mut Frame, c: &OverlayConfig) {
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        let edge = c.edge_padding as i32;
        let panel_h = c.panel_height as i32;

        let panel_w = (w - 2 * edge).max(0);
        let panel_y = h - edge - panel_h;

        // Translucent background panel
        RoundedRectangle::with_equal_corners(
            Rectangle::new(
                Point::new(edge, panel_y),
                Size::new(panel_w as u32, c.panel_height),
            ),
            Size::new(c.panel_radius, c.panel_radius),
        )
        .into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK))
        .draw(&mut Translucent::new(frame, c.panel_opacity))
        .unwrap_or_else(|e| match e {});

        let mut t = FrameTarget(frame);

        // Progress bar, leaving room for the percentage text
        let text_w = text_width("100%") as i32;
        let bar_w = (panel_w - 2 * edge - text_w - edge / 2).max(0);
        let bar_h = c.bar_thickness as i32;
        let bar = Point::new(2 * edge, panel_y + (panel_h - bar_h) / 2);
        let bar_r = c.panel_radius.min(c.bar_thickness / 2);

        RoundedRectangle::with_equal_corners(
            Rectangle::new(bar, Size::new(bar_w as u32, c.bar_thickness)),
            Size::new(bar_r, bar_r),
        )
        .into_styled(PrimitiveStyle::with_fill(c.inactive()))
        .draw(&mut t)
        .unwrap_or_else(|e| match e {});

        let fill_w = bar_w * self.percent as i32 / 100;
        if fill_w > 0 {
            RoundedRectangle::with_equal_corners(
                Rectangle::new(bar, Size::new(fill_w as u32, c.bar_thickness)),
                Size::new(bar_r, bar_r),
            )
            .into_styled(PrimitiveStyle::with_fill(c.progress()))
            .draw(&mut t)
            .unwrap_or_else(|e| match e {});
        }

        // Percentage, right-aligned within the panel
        let s = format!("{}%", self.percent);
        Text::with_text_style(
            &s,
            Point::new(edge + panel_w - edge, panel_y + panel_h / 2),
            MonoTextStyle::new(FONT, c.text()),
            TextStyleBuilder::new()
                .alignment(Alignment::Right)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(&mut t)
        .unwrap_or_else(|e| match e {});

        // Status indicator
        let color = match self.indicator {
            Some(ScanStatus::AddedPart) => c.success(),
            Some(ScanStatus::RepeatedPart) => c.inactive(),
            Some(ScanStatus::Miss | ScanStatus::Complete | ScanStatus::Invalid) | None => return,
        };

        let d = c.indicator_size as i32;
        Circle::new(
            Point::new(
                w - edge - d,
                panel_y - c.component_padding as i32 - d,
            ),
            c.indicator_size,
        )
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(color)
                .stroke_color(Rgb888::BLACK)
                .stroke_width(1)
                .build(),
        )
        .draw(&mut t)
        .unwrap_or_else(|e| match e {});
    }
}
