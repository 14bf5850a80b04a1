// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;

use crate::CaptureMode;

/// Default polling interval for both scan loops
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Default instruction line shown while searching for a code
pub const DEFAULT_INSTRUCTIONS: &str = "< back  |  Scan a QR code";

/// Scanner configuration
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// Camera capture mode
    pub capture: CaptureMode,
    /// Interval between polls when no frame is ready, and between renders
    pub poll_interval: Duration,
    /// Instruction text for the searching overlay
    pub instructions: String,
    /// Overlay styling
    pub overlay: OverlayConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            capture: CaptureMode::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// Overlay geometry and palette
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// Padding between components and the viewport edge
    pub edge_padding: u32,
    /// Padding between adjacent components
    pub component_padding: u32,
    /// Progress panel height
    pub panel_height: u32,
    /// Progress panel corner radius
    pub panel_radius: u32,
    /// Progress panel opacity (0 transparent, 255 opaque)
    pub panel_opacity: u8,
    /// Progress bar thickness
    pub bar_thickness: u32,
    /// Status indicator diameter
    pub indicator_size: u32,

    /// Body text colour
    pub text_color: [u8; 3],
    /// Inactive / repeated colour
    pub inactive_color: [u8; 3],
    /// Progress bar fill colour
    pub progress_color: [u8; 3],
    /// Added-part indicator colour
    pub success_color: [u8; 3],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            edge_padding: 8,
            component_padding: 8,
            panel_height: 32,
            panel_radius: 8,
            panel_opacity: 191,
            bar_thickness: 4,
            indicator_size: 10,

            text_color: [0xdd, 0xdd, 0xdd],
            inactive_color: [0x41, 0x41, 0x41],
            progress_color: [0x00, 0xdd, 0x00],
            success_color: [0x00, 0xdd, 0x00],
        }
    }
}

impl OverlayConfig {
    pub(crate) fn text(&self) -> Rgb888 {
        rgb(self.text_color)
    }

    pub(crate) fn inactive(&self) -> Rgb888 {
        rgb(self.inactive_color)
    }

    pub(crate) fn progress(&self) -> Rgb888 {
        rgb(self.progress_color)
    }

    pub(crate) fn success(&self) -> Rgb888 {
        rgb(self.success_color)
    }
}

fn rgb(c: [u8; 3]) -> Rgb888 {
    Rgb888::new(c[0], c[1], c[2])
}
