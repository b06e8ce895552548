//! Face tracking boundary for the moodfeed engine.
//!
//! Video capture and the landmark model itself live outside this crate.
//! This module provides the producers that stand in for that black box:
//! replay of recorded landmark frames, and a synthetic generator for demos
//! and tests. Both deliver [`TrackerEvent`]s over a bounded channel from a
//! background thread: `Ready` once, then zero-or-more-face frames.

pub mod replay;
pub mod synthetic;
pub mod types;

// Re-export commonly used types
pub use replay::ReplayTracker;
pub use synthetic::SyntheticTracker;
pub use types::{
    FaceObservation, Point, RecordedFace, ReplayFrame, TrackerEvent, LEFT_MOUTH_CORNER,
    LOWER_LIP_CENTER, RIGHT_MOUTH_CORNER, UPPER_LIP_CENTER,
};

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Detection configuration handed to the tracking model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum number of faces the model tracks per frame.
    pub max_faces: usize,
    /// Whether the model refines lip/eye landmark positions.
    pub refine_landmarks: bool,
    /// Whether the input image is mirrored before detection.
    pub mirror_input: bool,
    /// How simultaneous faces collapse into one expression update.
    pub aggregation: AggregationPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_faces: 1,
            refine_landmarks: true,
            mirror_input: false,
            aggregation: AggregationPolicy::Last,
        }
    }
}

/// Aggregation policy for frames carrying more than one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// The last face in frame order wins.
    Last,
    /// The first face in frame order wins.
    First,
    /// Average the per-face expression estimates.
    Average,
}

/// Errors raised by tracker producers.
#[derive(Debug)]
pub enum TrackerError {
    AlreadyRunning,
    Io(String),
    Malformed { line: usize, message: String },
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::AlreadyRunning => write!(f, "Tracker is already running"),
            TrackerError::Io(e) => write!(f, "IO error: {e}"),
            TrackerError::Malformed { line, message } => {
                write!(f, "Malformed recording at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for TrackerError {}

/// Runtime-selected tracker producer.
pub enum Tracker {
    Replay(ReplayTracker),
    Synthetic(SyntheticTracker),
}

impl Tracker {
    /// Replay a landmark recording in a loop at the given frame cadence.
    pub fn replay(path: PathBuf, frame_interval: Duration) -> Self {
        Tracker::Replay(ReplayTracker::new(path, frame_interval).looped())
    }

    /// Generate synthetic smile/frown sweeps at the given frame cadence.
    pub fn synthetic(frame_interval: Duration) -> Self {
        Tracker::Synthetic(SyntheticTracker::new(frame_interval))
    }

    pub fn start(&mut self) -> Result<(), TrackerError> {
        match self {
            Tracker::Replay(t) => t.start(),
            Tracker::Synthetic(t) => t.start(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            Tracker::Replay(t) => t.stop(),
            Tracker::Synthetic(t) => t.stop(),
        }
    }

    pub fn receiver(&self) -> &Receiver<TrackerEvent> {
        match self {
            Tracker::Replay(t) => t.receiver(),
            Tracker::Synthetic(t) => t.receiver(),
        }
    }
}
