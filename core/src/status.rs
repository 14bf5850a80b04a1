// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::{Mutex, PoisonError};

use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Raw [`Decoder`][crate::Decoder] response for a submitted frame
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumVariantNames, EnumIter)]
pub enum DecodeStatus {
    /// No QR symbol recognised
    NoMatch,
    /// Valid data not previously seen
    NewPart,
    /// Valid data already seen
    DuplicatePart,
    /// Assembly finished
    Complete,
    /// Unrecoverable / unsupported payload
    Invalid,
}

/// Classification of a frame's contribution to the scan
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumVariantNames, EnumIter)]
pub enum ScanStatus {
    /// Nothing decodable in the frame
    Miss,
    /// Frame added new data
    AddedPart,
    /// Frame repeated data already collected
    RepeatedPart,
    /// Scan complete
    Complete,
    /// Scan failed, payload unusable
    Invalid,
}

impl ScanStatus {
    /// Check whether this status ends the scan
    pub fn is_terminal(&self) -> bool {
        match self {
            ScanStatus::Complete | ScanStatus::Invalid => true,
            ScanStatus::Miss | ScanStatus::AddedPart | ScanStatus::RepeatedPart => false,
        }
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        ScanStatus::Miss
    }
}

impl From<DecodeStatus> for ScanStatus {
    fn from(s: DecodeStatus) -> Self {
        match s {
            DecodeStatus::NoMatch => ScanStatus::Miss,
            DecodeStatus::NewPart => ScanStatus::AddedPart,
            DecodeStatus::DuplicatePart => ScanStatus::RepeatedPart,
            DecodeStatus::Complete => ScanStatus::Complete,
            DecodeStatus::Invalid => ScanStatus::Invalid,
        }
    }
}

/// Scan progress shared between the decode (writer) and render (reader) loops
///
/// Each field has its own lock so neither loop waits on the other, readers
/// may observe the two fields from different frame submissions.
#[derive(Debug, Default)]
pub struct ScanStatusTracker {
    latest_status: Mutex<ScanStatus>,
    frames_submitted: Mutex<u64>,
}

impl ScanStatusTracker {
    /// Create a new tracker for a scan
    pub fn new() -> Self {
        Self::default()
    }

    /// Classification of the most recently submitted frame
    pub fn latest_status(&self) -> ScanStatus {
        *self
            .latest_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the classification of the most recent frame
    pub fn set_latest_status(&self, status: ScanStatus) {
        *self
            .latest_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Number of frames submitted to the decoder
    pub fn frames_submitted(&self) -> u64 {
        *self
            .frames_submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Increment submitted frame count, returning the new value
    pub fn increment_frames_submitted(&self) -> u64 {
        let mut n = self
            .frames_submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *n += 1;
        *n
    }
}
