// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Scan overlay rendering
//!
//! [compose] draws scan feedback over a preview [Frame] using
//! `embedded-graphics` primitives, either the operator instructions while
//! searching for a code, or a progress panel once the decoder reports
//! partial completion.

use strum::{Display, EnumIter, EnumString};

use crate::{Frame, OverlayConfig, ScanStatus};

mod helpers;
pub use helpers::*;

mod progress;
pub use progress::*;

mod searching;
pub use searching::*;

/// Overlay mode, selected by raw decoder progress
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumIter)]
pub enum OverlayMode {
    /// No data decoded yet, show instructions
    Searching,
    /// Partial data decoded, show progress
    Progress,
}

/// Inputs for a single overlay render
#[derive(Clone, PartialEq, Debug)]
pub struct OverlayState<'a> {
    /// Latest frame classification
    pub status: ScanStatus,
    /// Frames submitted so far
    pub frames_submitted: u64,
    /// Raw (unweighted) completion percentage
    pub percent: u8,
    /// Weighted completion percentage where available
    pub weighted_percent: Option<u8>,
    /// Instruction text for searching mode
    pub instructions: &'a str,
}

impl<'a> OverlayState<'a> {
    /// Resolve overlay mode
    pub fn mode(&self) -> OverlayMode {
        match self.percent {
            0 => OverlayMode::Searching,
            _ => OverlayMode::Progress,
        }
    }

    /// Weighted percentage for display, clamped to 100
    pub fn display_percent(&self) -> u8 {
        self.weighted_percent.unwrap_or(0).min(100)
    }

    /// Indicator state for the latest frame, `None` hides the indicator
    pub fn indicator(&self) -> Option<ScanStatus> {
        if self.frames_submitted == 0 {
            return None;
        }

        match self.status {
            ScanStatus::AddedPart | ScanStatus::RepeatedPart => Some(self.status),
            ScanStatus::Miss | ScanStatus::Complete | ScanStatus::Invalid => None,
        }
    }
}

/// Composite scan feedback over a frame, returning a new frame
///
/// The input frame is expected to be viewport-sized (see [fit_to_viewport]).
pub fn compose(frame: &Frame, state: &OverlayState, config: &OverlayConfig) -> Frame {
    let mut out = frame.clone();

    match state.mode() {
        OverlayMode::Searching => Searching::new(state.instructions).render(&mut out, config),
        OverlayMode::Progress => {
            Progress::new(state.display_percent(), state.indicator()).render(&mut out, config)
        }
    }

    out
}

#[cfg(test)]
mod test {
    use image::Rgb;

    use super::*;

    const GRAY: [u8; 3] = [128, 128, 128];

    fn state(percent: u8, weighted: Option<u8>, status: ScanStatus, n: u64) -> OverlayState<'static> {
        OverlayState {
            status,
            frames_submitted: n,
            percent,
            weighted_percent: weighted,
            instructions: "< back  |  Scan a QR code",
        }
    }

    fn frame() -> Frame {
        Frame::from_pixel(240, 240, Rgb(GRAY))
    }

    #[test]
    fn mode_selection() {
        assert_eq!(
            state(0, Some(40), ScanStatus::AddedPart, 3).mode(),
            OverlayMode::Searching
        );
        assert_eq!(
            state(1, None, ScanStatus::Miss, 3).mode(),
            OverlayMode::Progress
        );
    }

    #[test]
    fn percent_clamp() {
        assert_eq!(state(5, None, ScanStatus::Miss, 1).display_percent(), 0);
        assert_eq!(state(5, Some(250), ScanStatus::Miss, 1).display_percent(), 100);
        assert_eq!(state(5, Some(42), ScanStatus::Miss, 1).display_percent(), 42);
    }

    #[test]
    fn indicator_visibility() {
        assert_eq!(state(5, None, ScanStatus::AddedPart, 0).indicator(), None);
        assert_eq!(
            state(5, None, ScanStatus::AddedPart, 1).indicator(),
            Some(ScanStatus::AddedPart)
        );
        assert_eq!(
            state(5, None, ScanStatus::RepeatedPart, 1).indicator(),
            Some(ScanStatus::RepeatedPart)
        );
        assert_eq!(state(5, None, ScanStatus::Miss, 1).indicator(), None);
        assert_eq!(state(5, None, ScanStatus::Complete, 1).indicator(), None);
        assert_eq!(state(5, None, ScanStatus::Invalid, 1).indicator(), None);
    }

    #[test]
    fn compose_preserves_input() {
        let f = frame();
        let c = OverlayConfig::default();

        let o = compose(&f, &state(10, Some(10), ScanStatus::AddedPart, 1), &c);

        assert_eq!(f, frame());
        assert_ne!(o, f);
        assert_eq!(o.dimensions(), f.dimensions());
    }
}
