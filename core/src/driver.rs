// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Platform collaborator traits

use strum::{Display as StrumDisplay, EnumIter, EnumString};

use crate::DecodeStatus;

/// Captured image frame (always delivered as 8-bit RGB)
pub type Frame = image::RgbImage;

/// Sensor pixel format requested from the frame source
#[derive(Copy, Clone, PartialEq, Eq, Debug, StrumDisplay, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// Packed 8-bit RGB
    Rgb888,
    /// Planar YUV 4:2:0, converted to RGB by the driver
    Yuv420,
}

/// Video stream configuration for [`FrameSource::start`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureMode {
    /// Capture resolution (width, height)
    pub resolution: (u32, u32),
    /// Target frames per second
    pub frame_rate: u32,
    /// Sensor pixel format
    pub pixel_format: PixelFormat,
}

impl Default for CaptureMode {
    /// 480x480 RGB at 6 fps
    fn default() -> Self {
        Self {
            resolution: (480, 480),
            frame_rate: 6,
            pixel_format: PixelFormat::Rgb888,
        }
    }
}

/// [`FrameSource`] provides camera frames, shared by the decode and render loops
///
/// All methods are non-blocking.
pub trait FrameSource: Sync {
    /// Start the video stream
    fn start(&self, mode: CaptureMode) -> anyhow::Result<()>;

    /// Fetch the next frame not yet read, in arrival order
    ///
    /// `Ok(None)` indicates no new frame is ready yet.
    fn read(&self) -> anyhow::Result<Option<Frame>>;

    /// Fetch the most recent frame for preview without consuming it
    fn latest(&self) -> anyhow::Result<Option<Frame>>;

    /// Stop the video stream, subsequent reads return `None`
    fn stop(&self);
}

/// [`Decoder`] performs QR symbol decode and multi-part reassembly
pub trait Decoder: Send {
    /// Submit a frame, returning its classification
    ///
    /// Errors are fatal to the scan.
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<DecodeStatus>;

    /// Fetch completion percentage (0..=100)
    ///
    /// `weighted` requests partial credit for redundant / combined frames.
    /// Returns `None` where unavailable.
    fn percent_complete(&self, weighted: bool) -> Option<u8>;
}

impl<T: Decoder> Decoder for &mut T {
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<DecodeStatus> {
        T::submit(self, frame)
    }

    fn percent_complete(&self, weighted: bool) -> Option<u8> {
        T::percent_complete(self, weighted)
    }
}

/// [`Display`] surface for presenting composited frames
pub trait Display: Send {
    /// Viewport size (width, height)
    fn size(&self) -> (u32, u32);

    /// Present a fully composited frame
    fn show(&mut self, frame: &Frame) -> anyhow::Result<()>;
}
