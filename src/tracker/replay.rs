//! Replay tracker: streams recorded landmark frames from a JSON Lines file.
//!
//! Each line holds one [`ReplayFrame`]. Frames are delivered at a fixed
//! cadence on a background thread, after a single `Ready` event. The file is
//! parsed up front so a malformed recording fails before anything is sent.

use crate::tracker::types::{FaceObservation, ReplayFrame, TrackerEvent};
use crate::tracker::TrackerError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct ReplayTracker {
    path: PathBuf,
    frame_interval: Duration,
    loop_playback: bool,
    sender: Sender<TrackerEvent>,
    receiver: Receiver<TrackerEvent>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ReplayTracker {
    /// Create a replay tracker for the given recording.
    pub fn new(path: PathBuf, frame_interval: Duration) -> Self {
        let (sender, receiver) = bounded(256);
        Self {
            path,
            frame_interval,
            loop_playback: false,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Restart playback from the first frame when the recording ends.
    pub fn looped(mut self) -> Self {
        self.loop_playback = true;
        self
    }

    /// Parse the recording and start delivering frames.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(TrackerError::AlreadyRunning);
        }

        let frames = load_frames(&self.path)?;
        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let interval = self.frame_interval;
        let loop_playback = self.loop_playback;

        let _ = sender.send(TrackerEvent::Ready);

        self.handle = Some(thread::spawn(move || {
            'playback: loop {
                for faces in &frames {
                    if !running.load(Ordering::SeqCst) {
                        break 'playback;
                    }
                    let _ = sender.send(TrackerEvent::Frame(faces.clone()));
                    thread::sleep(interval);
                }
                if !loop_playback {
                    break;
                }
            }
        }));

        Ok(())
    }

    /// Stop delivering frames and join the playback thread.
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

impl Drop for ReplayTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Load every frame of a recording, skipping blank lines.
fn load_frames(path: &Path) -> Result<Vec<Vec<FaceObservation>>, TrackerError> {
    let file = File::open(path).map_err(|e| TrackerError::Io(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TrackerError::Io(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: ReplayFrame =
            serde_json::from_str(&line).map_err(|e| TrackerError::Malformed {
                line: index + 1,
                message: e.to_string(),
            })?;
        frames.push(frame.faces.into_iter().map(Into::into).collect());
    }
    Ok(frames)
}
