//! Privacy-preserving transparency log.
//!
//! Tracks and exposes statistics about what the engine processed without
//! storing any imagery or identifying information. Counters distinguish
//! "tracking unavailable" from "no candidates" so a silent feed can be
//! diagnosed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Transparency statistics for the current session.
#[derive(Debug)]
pub struct TransparencyLog {
    /// Landmark frames received from the tracker
    frames_received: AtomicU64,
    /// Faces observed across those frames
    faces_observed: AtomicU64,
    /// Update-loop frames ticked
    frames_ticked: AtomicU64,
    /// Messages posted to the feed
    messages_posted: AtomicU64,
    /// Post cycles skipped because no candidate matched the window
    posts_skipped: AtomicU64,
    /// Session transcripts exported
    transcripts_exported: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl TransparencyLog {
    /// Create a new transparency log.
    pub fn new() -> Self {
        Self {
            frames_received: AtomicU64::new(0),
            faces_observed: AtomicU64::new(0),
            frames_ticked: AtomicU64::new(0),
            messages_posted: AtomicU64::new(0),
            posts_skipped: AtomicU64::new(0),
            transcripts_exported: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a transparency log with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        // Try to load existing stats
        if let Err(e) = log.load() {
            eprintln!("Note: Could not load previous transparency stats: {e}");
        }

        log
    }

    /// Record a landmark frame received from the tracker.
    pub fn record_frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record faces observed in a frame.
    pub fn record_faces_observed(&self, count: u64) {
        self.faces_observed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one update-loop tick.
    pub fn record_frame_ticked(&self) {
        self.frames_ticked.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message posted to the feed.
    pub fn record_message_posted(&self) {
        self.messages_posted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a post cycle skipped for lack of candidates.
    pub fn record_post_skipped(&self) {
        self.posts_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an exported session transcript.
    pub fn record_transcript_exported(&self) {
        self.transcripts_exported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            faces_observed: self.faces_observed.load(Ordering::Relaxed),
            frames_ticked: self.frames_ticked.load(Ordering::Relaxed),
            messages_posted: self.messages_posted.load(Ordering::Relaxed),
            posts_skipped: self.posts_skipped.load(Ordering::Relaxed),
            transcripts_exported: self.transcripts_exported.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Landmark frames received: {}\n\
             - Faces observed: {}\n\
             - Frames ticked: {}\n\
             - Messages posted: {}\n\
             - Post cycles skipped (no candidates): {}\n\
             - Transcripts exported: {}\n\
             - Session duration: {} seconds\n\
             \n\
             Privacy Guarantee:\n\
             - No video frames captured or stored\n\
             - Only landmark geometry is processed\n\
             - The feed is simulated; no viewer input is read",
            stats.frames_received,
            stats.faces_observed,
            stats.frames_ticked,
            stats.messages_posted,
            stats.posts_skipped,
            stats.transcripts_exported,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                frames_received: stats.frames_received,
                faces_observed: stats.faces_observed,
                frames_ticked: stats.frames_ticked,
                messages_posted: stats.messages_posted,
                posts_skipped: stats.posts_skipped,
                transcripts_exported: stats.transcripts_exported,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.frames_received
                    .store(persisted.frames_received, Ordering::Relaxed);
                self.faces_observed
                    .store(persisted.faces_observed, Ordering::Relaxed);
                self.frames_ticked
                    .store(persisted.frames_ticked, Ordering::Relaxed);
                self.messages_posted
                    .store(persisted.messages_posted, Ordering::Relaxed);
                self.posts_skipped
                    .store(persisted.posts_skipped, Ordering::Relaxed);
                self.transcripts_exported
                    .store(persisted.transcripts_exported, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.frames_received.store(0, Ordering::Relaxed);
        self.faces_observed.store(0, Ordering::Relaxed);
        self.frames_ticked.store(0, Ordering::Relaxed);
        self.messages_posted.store(0, Ordering::Relaxed);
        self.posts_skipped.store(0, Ordering::Relaxed);
        self.transcripts_exported.store(0, Ordering::Relaxed);
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of transparency statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyStats {
    pub frames_received: u64,
    pub faces_observed: u64,
    pub frames_ticked: u64,
    pub messages_posted: u64,
    pub posts_skipped: u64,
    pub transcripts_exported: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    frames_received: u64,
    faces_observed: u64,
    frames_ticked: u64,
    messages_posted: u64,
    posts_skipped: u64,
    transcripts_exported: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared transparency log.
pub type SharedTransparencyLog = Arc<TransparencyLog>;

/// Create a new shared transparency log.
pub fn create_shared_log() -> SharedTransparencyLog {
    Arc::new(TransparencyLog::new())
}

/// Create a new shared transparency log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedTransparencyLog {
    Arc::new(TransparencyLog::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparency_log_counting() {
        let log = TransparencyLog::new();

        log.record_frame_received();
        log.record_frame_received();
        log.record_faces_observed(1);
        log.record_message_posted();
        log.record_post_skipped();

        let stats = log.stats();
        assert_eq!(stats.frames_received, 2);
        assert_eq!(stats.faces_observed, 1);
        assert_eq!(stats.messages_posted, 1);
        assert_eq!(stats.posts_skipped, 1);
    }

    #[test]
    fn test_transparency_log_reset() {
        let log = TransparencyLog::new();

        log.record_faces_observed(100);
        log.record_message_posted();
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.faces_observed, 0);
        assert_eq!(stats.messages_posted, 0);
    }

    #[test]
    fn test_summary_format() {
        let log = TransparencyLog::new();
        let summary = log.summary();

        assert!(summary.contains("Landmark frames received"));
        assert!(summary.contains("Messages posted"));
        assert!(summary.contains("Privacy Guarantee"));
        assert!(summary.contains("No video frames captured"));
    }

    #[test]
    fn test_persistence_roundtrip() {
        let path = std::env::temp_dir().join("moodfeed-transparency-test.json");
        let _ = std::fs::remove_file(&path);

        let log = TransparencyLog::with_persistence(path.clone());
        log.record_frame_received();
        log.record_message_posted();
        log.save().expect("Failed to save stats");

        let restored = TransparencyLog::with_persistence(path);
        let stats = restored.stats();
        assert_eq!(stats.frames_received, 1);
        assert_eq!(stats.messages_posted, 1);
    }
}
