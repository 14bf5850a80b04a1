#![allow(unused)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use image::Rgb;
use log::{debug, trace};

use seedqr_scan::{
    CaptureMode, DecodeStatus, Decoder, Display, Frame, FrameSource, ScanStatus, ScanStatusTracker,
};

pub const VIEWPORT: (u32, u32) = (240, 240);

/// Initialise logging for tests
pub fn init_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}

/// Build a solid test frame, `n` distinguishes frames by colour
pub fn frame(n: u8, width: u32, height: u32) -> Frame {
    Frame::from_pixel(width, height, Rgb([n, n, n]))
}

/// Frame source replaying a fixed queue of frames
#[derive(Default)]
pub struct ScriptedSource {
    queue: Mutex<VecDeque<Frame>>,
    latest: Mutex<Option<Frame>>,
    reads: AtomicUsize,
    fail_after: Option<usize>,
    fail_start: bool,
    pub mode: Mutex<Option<CaptureMode>>,
    pub started: AtomicBool,
    pub stopped: AtomicBool,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            queue: Mutex::new(frames.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Fail reads once `n` frames have been delivered
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Fail on stream start
    pub fn fail_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Frames not yet read
    pub fn remaining(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl FrameSource for ScriptedSource {
    fn start(&self, mode: CaptureMode) -> anyhow::Result<()> {
        if self.fail_start {
            return Err(anyhow::anyhow!("camera unavailable"));
        }

        debug!("source start: {:?}", mode);

        *self.mode.lock().unwrap() = Some(mode);
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self) -> anyhow::Result<Option<Frame>> {
        if self.stopped.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let n = self.reads.load(Ordering::SeqCst);
        if self.fail_after == Some(n) {
            return Err(anyhow::anyhow!("camera disconnected after {n} frames"));
        }

        let f = match self.queue.lock().unwrap().pop_front() {
            Some(f) => f,
            None => return Ok(None),
        };

        self.reads.fetch_add(1, Ordering::SeqCst);
        *self.latest.lock().unwrap() = Some(f.clone());

        trace!("source read {}", n);

        Ok(Some(f))
    }

    fn latest(&self) -> anyhow::Result<Option<Frame>> {
        Ok(self.latest.lock().unwrap().clone())
    }

    fn stop(&self) {
        debug!("source stop");
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Decoder replaying a fixed script of responses, recording the tracker
/// status observed and the frame (by colour) received at each submission
pub struct ScriptedDecoder {
    script: VecDeque<DecodeStatus>,
    tracker: Arc<ScanStatusTracker>,
    parts: u8,
    total: u8,
    panic_on_submit: bool,
    fail_on_submit: bool,
    pub observed: Vec<ScanStatus>,
    pub frames: Vec<u8>,
}

impl ScriptedDecoder {
    pub fn new(
        tracker: Arc<ScanStatusTracker>,
        script: impl IntoIterator<Item = DecodeStatus>,
    ) -> Self {
        let script: VecDeque<_> = script.into_iter().collect();
        let total = script
            .iter()
            .filter(|s| **s == DecodeStatus::NewPart)
            .count()
            .max(1) as u8;

        Self {
            script,
            tracker,
            parts: 0,
            total,
            panic_on_submit: false,
            fail_on_submit: false,
            observed: vec![],
            frames: vec![],
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_on_submit = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_submit = true;
        self
    }
}

impl Decoder for ScriptedDecoder {
    fn submit(&mut self, frame: &Frame) -> anyhow::Result<DecodeStatus> {
        self.observed.push(self.tracker.latest_status());
        self.frames.push(frame.get_pixel(0, 0).0[0]);

        if self.fail_on_submit {
            return Err(anyhow::anyhow!("decoder fault"));
        }
        if self.panic_on_submit {
            panic!("decoder panic");
        }

        let s = self.script.pop_front().unwrap_or(DecodeStatus::NoMatch);
        if s == DecodeStatus::NewPart {
            self.parts += 1;
        }

        Ok(s)
    }

    fn percent_complete(&self, _weighted: bool) -> Option<u8> {
        Some((self.parts as u32 * 100 / self.total as u32) as u8)
    }
}

/// Display recording presented frames
pub struct RecordingDisplay {
    size: (u32, u32),
    fail: bool,
    pub shown: usize,
    pub last: Option<Frame>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            size: VIEWPORT,
            fail: false,
            shown: 0,
            last: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl Display for RecordingDisplay {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn show(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("display detached"));
        }

        self.shown += 1;
        self.last = Some(frame.clone());
        Ok(())
    }
}
