// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::{Mutex, PoisonError, TryLockError};

use super::{LoopContext, ScanError};
use crate::{
    ui::{compose, fit_to_viewport, OverlayState},
    Decoder, Display, FrameSource,
};

/// Last percentages read from the decoder
#[derive(Copy, Clone, Default, Debug)]
struct Percentages {
    raw: u8,
    weighted: Option<u8>,
}

impl Percentages {
    fn update<D: Decoder>(&mut self, d: &D) {
        self.raw = d.percent_complete(false).unwrap_or(0);
        self.weighted = d.percent_complete(true);
    }
}

/// Render loop, composites the most recent frame until halted or cancelled
pub(crate) fn render_loop<S: FrameSource, D: Decoder, V: Display>(
    ctx: &LoopContext,
    source: &S,
    decoder: &Mutex<D>,
    display: &Mutex<V>,
) -> Result<(), ScanError> {
    #[cfg(feature = "log")]
    log::debug!("render loop start");

    let mut percent = Percentages::default();

    while !ctx.halted() && !ctx.cancel.is_cancelled() {
        let frame = match source.latest().map_err(ScanError::Source)? {
            Some(f) => f,
            None => {
                ctx.wait();
                continue;
            }
        };

        // Reuse the previous reading while the decode loop holds the decoder
        match decoder.try_lock() {
            Ok(d) => percent.update(&*d),
            Err(TryLockError::Poisoned(p)) => percent.update(&*p.into_inner()),
            Err(TryLockError::WouldBlock) => (),
        }

        let state = OverlayState {
            status: ctx.tracker.latest_status(),
            frames_submitted: ctx.tracker.frames_submitted(),
            percent: percent.raw,
            weighted_percent: percent.weighted,
            instructions: &ctx.config.instructions,
        };

        {
            let mut d = display.lock().unwrap_or_else(PoisonError::into_inner);

            let frame = fit_to_viewport(&frame, d.size());
            let out = compose(&frame, &state, &ctx.config.overlay);

            d.show(&out).map_err(ScanError::Display)?;
        }

        if ctx.wait() {
            break;
        }
    }

    #[cfg(feature = "log")]
    log::debug!("render loop exit");

    Ok(())
}
