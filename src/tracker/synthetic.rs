//! Synthetic tracker: generates mouth geometry sweeping between smile and
//! frown, for demos and tests without a camera or a recording.

use crate::tracker::types::{FaceObservation, Point, TrackerEvent};
use crate::tracker::TrackerError;
use crossbeam_channel::{bounded, Receiver, Sender};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Vertical offset amplitude in landmark units. A sweep of this size drives
/// the expression estimate across most of its range in both directions.
const SWEEP_AMPLITUDE: f64 = 4.0;

/// Mouth geometry anchor in a nominal 640x480 frame.
const CORNER_Y: f64 = 240.0;
const LEFT_CORNER_X: f64 = 200.0;
const RIGHT_CORNER_X: f64 = 280.0;
const LIP_X: f64 = 240.0;

pub struct SyntheticTracker {
    frame_interval: Duration,
    sweep_period: Duration,
    sender: Sender<TrackerEvent>,
    receiver: Receiver<TrackerEvent>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SyntheticTracker {
    /// Create a synthetic tracker with the default 8 second sweep period.
    pub fn new(frame_interval: Duration) -> Self {
        Self::with_sweep_period(frame_interval, Duration::from_secs(8))
    }

    /// Create a synthetic tracker with a custom smile-to-frown sweep period.
    pub fn with_sweep_period(frame_interval: Duration, sweep_period: Duration) -> Self {
        let (sender, receiver) = bounded(256);
        Self {
            frame_interval,
            sweep_period,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start generating frames.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(TrackerError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let interval = self.frame_interval;
        let period_secs = self.sweep_period.as_secs_f64();

        let _ = sender.send(TrackerEvent::Ready);

        self.handle = Some(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut elapsed = 0.0_f64;

            while running.load(Ordering::SeqCst) {
                let phase = elapsed / period_secs * std::f64::consts::TAU;
                let offset = SWEEP_AMPLITUDE * phase.sin();
                let jitter = rng.gen_range(-0.2..0.2);

                let face = mouth_geometry(offset + jitter);
                let _ = sender.send(TrackerEvent::Frame(vec![face]));

                thread::sleep(interval);
                elapsed += interval.as_secs_f64();
            }
        }));

        Ok(())
    }

    /// Stop generating frames and join the producer thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for tracker events.
    pub fn receiver(&self) -> &Receiver<TrackerEvent> {
        &self.receiver
    }
}

impl Drop for SyntheticTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build a face whose lip-center midpoint sits `offset` units below the
/// mouth-corner midpoint (negative = corners below lips = smile).
fn mouth_geometry(offset: f64) -> FaceObservation {
    FaceObservation::from_mouth(
        Point::new(LEFT_CORNER_X, CORNER_Y),
        Point::new(RIGHT_CORNER_X, CORNER_Y),
        Point::new(LIP_X, CORNER_Y + offset - 0.5),
        Point::new(LIP_X, CORNER_Y + offset + 0.5),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expression;

    #[test]
    fn test_mouth_geometry_offset_sign() {
        let smile = expression::estimate(&mouth_geometry(-2.0)).expect("No estimate");
        let frown = expression::estimate(&mouth_geometry(2.0)).expect("No estimate");
        assert!(smile < 0.0);
        assert!(frown > 0.0);
    }

    #[test]
    fn test_synthetic_tracker_emits_faces() {
        let mut tracker = SyntheticTracker::new(Duration::from_millis(1));
        tracker.start().expect("Failed to start tracker");

        let first = tracker
            .receiver()
            .recv_timeout(Duration::from_secs(1))
            .expect("No event received");
        assert!(matches!(first, TrackerEvent::Ready));

        let second = tracker
            .receiver()
            .recv_timeout(Duration::from_secs(1))
            .expect("No frame received");
        match second {
            TrackerEvent::Frame(faces) => assert_eq!(faces.len(), 1),
            other => panic!("expected frame, got {other:?}"),
        }

        tracker.stop();
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_double_start_is_rejected() {
        let mut tracker = SyntheticTracker::new(Duration::from_millis(50));
        tracker.start().expect("Failed to start tracker");
        assert!(matches!(tracker.start(), Err(TrackerError::AlreadyRunning)));
        tracker.stop();
    }
}
