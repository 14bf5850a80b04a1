// Copyright (c) 2022-2023 The MobileCoin Foundation

/// [Scanner][super::Scanner] errors
///
/// All variants are fatal to the scan, transient conditions (no frame
/// ready, no QR in view) are retried internally and terminal scan states
/// are reported via [ScanOutcome][super::ScanOutcome].
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Frame source failure
    #[error("frame source error: {0}")]
    Source(anyhow::Error),

    /// Decoder failure
    #[error("decoder error: {0}")]
    Decoder(anyhow::Error),

    /// Display failure
    #[error("display error: {0}")]
    Display(anyhow::Error),

    /// A scan loop panicked
    #[error("scan loop panicked")]
    LoopPanicked,
}
