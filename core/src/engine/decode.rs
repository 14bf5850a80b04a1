// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::{Mutex, PoisonError};

use super::{LoopContext, ScanError, ScanOutcome};
use crate::{Decoder, FrameSource, ScanStatus};

/// Decode loop, submits frames to the decoder in arrival order
///
/// Returns `Ok(None)` when halted by the render loop.
pub(crate) fn decode_loop<S: FrameSource, D: Decoder>(
    ctx: &LoopContext,
    source: &S,
    decoder: &Mutex<D>,
) -> Result<Option<ScanOutcome>, ScanError> {
    #[cfg(feature = "log")]
    log::debug!("decode loop start");

    let mut last = ctx.tracker.latest_status();

    loop {
        if ctx.cancel.is_cancelled() {
            #[cfg(feature = "log")]
            log::debug!("decode loop cancelled");
            return Ok(Some(ScanOutcome::Cancelled));
        }

        if ctx.halted() {
            return Ok(None);
        }

        // Poll for the next frame
        let frame = match source.read().map_err(ScanError::Source)? {
            Some(f) => f,
            None => {
                ctx.wait();
                continue;
            }
        };

        let status = {
            let mut d = decoder.lock().unwrap_or_else(PoisonError::into_inner);
            d.submit(&frame).map_err(ScanError::Decoder)?
        };
        let status = ScanStatus::from(status);

        let _n = ctx.tracker.increment_frames_submitted();
        ctx.tracker.set_latest_status(status);

        if status != last {
            #[cfg(feature = "log")]
            log::trace!("frame {}: {} -> {}", _n, last, status);
            last = status;
        }

        match status {
            ScanStatus::Complete => return Ok(Some(ScanOutcome::Complete)),
            ScanStatus::Invalid => return Ok(Some(ScanOutcome::Invalid)),
            ScanStatus::Miss | ScanStatus::AddedPart | ScanStatus::RepeatedPart => (),
        }
    }
}
