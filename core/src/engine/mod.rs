// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Scanner] coordinates live QR scanning.
//!
//! Two loops share a single [FrameSource] session: the decode loop submits
//! every captured frame to the [Decoder] in arrival order and records its
//! [ScanStatus][crate::ScanStatus], while the render loop composites progress feedback over the
//! most recent frame and presents it via the [Display].

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
};

use strum::{Display as StrumDisplay, EnumIter, EnumString, EnumVariantNames};

use crate::{Decoder, Display, FrameSource, ScanConfig, ScanStatusTracker};

mod cancel;
pub use cancel::CancelToken;

mod error;
pub use error::ScanError;

mod decode;
mod render;

/// Terminal state of a scan
#[derive(Copy, Clone, PartialEq, Eq, Debug, StrumDisplay, EnumString, EnumVariantNames, EnumIter)]
pub enum ScanOutcome {
    /// Decoder finished assembling the payload
    Complete,
    /// Decoder rejected the payload
    Invalid,
    /// Scan cancelled by the operator
    Cancelled,
}

/// Result of a finished scan
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ScanReport {
    /// Terminal state
    pub outcome: ScanOutcome,
    /// Total frames submitted to the decoder
    pub frames_submitted: u64,
}

/// [Scanner] runs a single scan session, see [module level][self] docs
pub struct Scanner {
    config: ScanConfig,
    cancel: CancelToken,
    tracker: Arc<ScanStatusTracker>,
}

/// State shared by both loops for the duration of [Scanner::run]
pub(crate) struct LoopContext<'a> {
    pub config: &'a ScanConfig,
    pub cancel: &'a CancelToken,
    pub tracker: &'a ScanStatusTracker,
    halt: &'a AtomicBool,
}

impl<'a> LoopContext<'a> {
    /// Check whether the other loop has requested a halt
    pub fn halted(&self) -> bool {
        self.halt.load(Ordering::SeqCst)
    }

    /// Idle for one poll interval, returning early (with `true`) on
    /// cancellation or halt
    pub fn wait(&self) -> bool {
        self.cancel.wait_timeout(self.config.poll_interval, || self.halted())
    }
}

/// Raise the halt flag on drop, so a loop exiting for any reason
/// (including a panic) releases its peer
struct HaltGuard<'a, F: FnMut()> {
    halt: &'a AtomicBool,
    cancel: &'a CancelToken,
    on_halt: F,
}

impl<'a, F: FnMut()> Drop for HaltGuard<'a, F> {
    fn drop(&mut self) {
        self.halt.store(true, Ordering::SeqCst);
        self.cancel.wake();
        (self.on_halt)();
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Scanner {
    /// Create a new scanner with the provided configuration
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            tracker: Arc::new(ScanStatusTracker::new()),
        }
    }

    /// Fetch scanner configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Fetch a [CancelToken] for this scan
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Fetch the [ScanStatusTracker] for this scan
    pub fn tracker(&self) -> Arc<ScanStatusTracker> {
        self.tracker.clone()
    }

    /// Run the scan to completion
    ///
    /// This blocks until the decoder reports [ScanOutcome::Complete] or
    /// [ScanOutcome::Invalid], the [CancelToken] is raised, or a fatal
    /// [ScanError] occurs. The frame source is always stopped on return.
    pub fn run<S, D, V>(
        self,
        source: &S,
        decoder: D,
        display: &Mutex<V>,
    ) -> Result<ScanReport, ScanError>
    where
        S: FrameSource,
        D: Decoder,
        V: Display,
    {
        #[cfg(feature = "log")]
        log::debug!("starting scan: {:?}", self.config.capture);

        source
            .start(self.config.capture)
            .map_err(ScanError::Source)?;

        let halt = AtomicBool::new(false);
        let decoder = Mutex::new(decoder);

        let ctx = LoopContext {
            config: &self.config,
            cancel: &self.cancel,
            tracker: &self.tracker,
            halt: &halt,
        };

        let (decode_res, render_res) = thread::scope(|s| {
            let decode_handle = s.spawn(|| {
                let _g = HaltGuard {
                    halt: &halt,
                    cancel: &self.cancel,
                    on_halt: || source.stop(),
                };
                decode::decode_loop(&ctx, source, &decoder)
            });

            let render_handle = s.spawn(|| {
                let _g = HaltGuard {
                    halt: &halt,
                    cancel: &self.cancel,
                    on_halt: || (),
                };
                render::render_loop(&ctx, source, &decoder, display)
            });

            (decode_handle.join(), render_handle.join())
        });

        let frames_submitted = self.tracker.frames_submitted();

        #[cfg(feature = "log")]
        log::debug!("scan stopped after {} frames", frames_submitted);

        // Render failures take priority as the decode loop only
        // observes them as a halt
        match render_res {
            Ok(Ok(())) => (),
            Ok(Err(e)) => {
                #[cfg(feature = "log")]
                log::warn!("render loop failed: {}", e);
                return Err(e);
            }
            Err(_) => return Err(ScanError::LoopPanicked),
        }

        let outcome = match decode_res {
            Ok(Ok(Some(o))) => o,
            // Halted without a render error, treat as cancelled
            Ok(Ok(None)) => ScanOutcome::Cancelled,
            Ok(Err(e)) => {
                #[cfg(feature = "log")]
                log::warn!("decode loop failed: {}", e);
                return Err(e);
            }
            Err(_) => return Err(ScanError::LoopPanicked),
        };

        #[cfg(feature = "log")]
        log::debug!("scan outcome: {}", outcome);

        Ok(ScanReport {
            outcome,
            frames_submitted,
        })
    }
}
