//! Test scan cancellation and live preview rendering

use std::{
    sync::Mutex,
    thread,
    time::{Duration, Instant},
};

use seedqr_scan::{
    engine::{ScanOutcome, Scanner},
    DecodeStatus, ScanConfig,
};

mod helpers;
use helpers::*;

/// Idle loops are woken by cancellation, so both must exit within a
/// small multiple of the poll interval
const MAX_CANCEL_POLLS: u32 = 3;

#[test]
fn cancel_while_scanning() -> anyhow::Result<()> {
    init_logging();

    let config = ScanConfig::default();
    let poll = config.poll_interval;

    let scanner = Scanner::new(config);
    let cancel = scanner.cancel_token();
    let tracker = scanner.tracker();

    // Oversized frames are downsampled to the viewport for preview
    let source = ScriptedSource::new((0..3).map(|n| frame(n * 50, 480, 480)));
    let mut decoder = ScriptedDecoder::new(tracker.clone(), [DecodeStatus::NewPart]);
    let display = Mutex::new(RecordingDisplay::new());

    let (r, cancelled_at) = thread::scope(|s| {
        let h = s.spawn(|| {
            thread::sleep(Duration::from_millis(200));
            cancel.cancel();
            Instant::now()
        });

        let r = scanner.run(&source, &mut decoder, &display);
        (r, h.join().unwrap())
    });
    let latency = cancelled_at.elapsed();

    let r = r?;
    assert_eq!(r.outcome, ScanOutcome::Cancelled);
    assert_eq!(r.frames_submitted, 3);
    assert!(source.is_stopped());

    assert!(
        latency < poll * MAX_CANCEL_POLLS,
        "cancellation took {latency:?} (poll interval {poll:?})"
    );

    // Preview frames were presented at viewport size
    let d = display.lock().unwrap();
    assert!(d.shown > 0);
    assert_eq!(d.last.as_ref().map(|f| f.dimensions()), Some(VIEWPORT));

    Ok(())
}

#[test]
fn cancel_with_long_poll_interval() -> anyhow::Result<()> {
    init_logging();

    // Far longer than any acceptable cancellation latency
    let config = ScanConfig {
        poll_interval: Duration::from_secs(10),
        ..Default::default()
    };

    let scanner = Scanner::new(config);
    let cancel = scanner.cancel_token();

    let source = ScriptedSource::new([frame(1, 240, 240)]);
    let mut decoder = ScriptedDecoder::new(scanner.tracker(), [DecodeStatus::NewPart]);
    let display = Mutex::new(RecordingDisplay::new());

    let (r, cancelled_at) = thread::scope(|s| {
        let h = s.spawn(|| {
            thread::sleep(Duration::from_millis(100));
            cancel.cancel();
            Instant::now()
        });

        let r = scanner.run(&source, &mut decoder, &display);
        (r, h.join().unwrap())
    });
    let latency = cancelled_at.elapsed();

    let r = r?;
    assert_eq!(r.outcome, ScanOutcome::Cancelled);
    assert_eq!(r.frames_submitted, 1);
    assert!(source.is_stopped());
    assert!(latency < Duration::from_secs(1), "cancellation took {latency:?}");

    Ok(())
}

#[test]
fn cancel_before_run() -> anyhow::Result<()> {
    init_logging();

    let scanner = Scanner::default();
    scanner.cancel_token().cancel();

    let source = ScriptedSource::new((0..3).map(|n| frame(n, 240, 240)));
    let mut decoder = ScriptedDecoder::new(scanner.tracker(), []);
    let display = Mutex::new(RecordingDisplay::new());

    let r = scanner.run(&source, &mut decoder, &display)?;

    // Nothing submitted, nothing resumable
    assert_eq!(r.outcome, ScanOutcome::Cancelled);
    assert_eq!(r.frames_submitted, 0);
    assert_eq!(source.remaining(), 3);
    assert!(source.is_stopped());

    Ok(())
}
