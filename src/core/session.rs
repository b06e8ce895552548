//! Session state and the per-frame update loop.
//!
//! All mutable state lives in one [`FeedSession`] constructed at startup:
//! lifecycle, latest observation slot, sentiment window, scheduler, feed,
//! and RNG. The tracker delivers events asynchronously; [`FeedSession::tick`]
//! runs one frame of the pipeline and reports what happened.

use crate::config::Config;
use crate::core::expression;
use crate::core::feed::{ActiveFeed, FeedScheduler, PostedMessage};
use crate::core::render::{layout_feed, FeedLayout, RenderedEntry, Viewport};
use crate::core::sentiment::SentimentWindow;
use crate::core::store::MessageStore;
use crate::tracker::types::{FaceObservation, TrackerEvent};
use crate::tracker::{AggregationPolicy, TrackerConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

/// Lifecycle of the tracking collaborator as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// The tracking model has not reported readiness; frames are ignored.
    Uninitialized,
    /// Observations are being consumed.
    Ready,
}

/// Tracking availability for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// The model has not reported readiness yet.
    Unavailable,
    /// A face was consumed this frame; the window was updated.
    Observed,
    /// The model is ready but no face was available this frame; the
    /// previous window persists.
    Stale,
}

/// Outcome of one [`FeedSession::tick`].
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tracking: TrackingState,
    pub expression: Option<f64>,
    pub window: Option<SentimentWindow>,
    /// Size of the filtered candidate set this frame.
    pub candidates: usize,
    pub posted: Option<PostedMessage>,
    /// A deadline fired while no candidate was available.
    pub skipped_post: bool,
}

/// All mutable session state, constructed once at startup and torn down
/// with the session.
pub struct FeedSession {
    instance_id: Uuid,
    lifecycle: Lifecycle,
    tracker_config: TrackerConfig,
    store: MessageStore,
    window: Option<SentimentWindow>,
    feed: ActiveFeed,
    scheduler: FeedScheduler,
    layout: FeedLayout,
    /// Latest-only observation slot; newer frames overwrite unconsumed ones.
    pending: Option<Vec<FaceObservation>>,
    rng: StdRng,
    transcript: Vec<PostedMessage>,
}

impl FeedSession {
    pub fn new(store: MessageStore, config: &Config) -> Self {
        Self::build(store, config, StdRng::from_entropy())
    }

    /// Deterministic construction for tests and reproducible runs.
    pub fn with_seed(store: MessageStore, config: &Config, seed: u64) -> Self {
        Self::build(store, config, StdRng::seed_from_u64(seed))
    }

    fn build(store: MessageStore, config: &Config, rng: StdRng) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            lifecycle: Lifecycle::Uninitialized,
            tracker_config: config.tracker.clone(),
            store,
            window: None,
            feed: ActiveFeed::with_capacity(config.feed_capacity),
            scheduler: FeedScheduler::with_intervals(config.min_interval, config.max_interval),
            layout: FeedLayout::default(),
            pending: None,
            rng,
            transcript: Vec::new(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn window(&self) -> Option<SentimentWindow> {
        self.window
    }

    pub fn feed(&self) -> &ActiveFeed {
        &self.feed
    }

    /// When the next post becomes possible, if the timer is armed.
    pub fn next_post_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Consume a tracker event. Frames received before `Ready` are dropped.
    pub fn observe(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Ready => self.lifecycle = Lifecycle::Ready,
            TrackerEvent::Frame(faces) => {
                if self.lifecycle == Lifecycle::Ready {
                    self.pending = Some(faces);
                }
            }
        }
    }

    /// Run one frame of the update loop.
    ///
    /// Order matches the data flow: expression update from the pending
    /// observation, unconditional candidate recompute, then the posting
    /// timer. The first tick arms the timer without posting.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let (tracking, estimate) = self.consume_pending();
        if let Some(e) = estimate {
            self.window = Some(SentimentWindow::from_expression(e));
        }

        let candidates = self.store.filter(self.window.as_ref());

        let mut posted = None;
        let mut skipped_post = false;
        if !self.scheduler.is_armed() {
            self.scheduler.arm(now, &mut self.rng);
        } else if self.scheduler.due(now) {
            match candidates.choose(&mut self.rng) {
                Some(message) => {
                    let entry = self.feed.push((*message).clone());
                    self.transcript.push(entry.clone());
                    posted = Some(entry);
                }
                None => skipped_post = true,
            }
            self.scheduler.arm(now, &mut self.rng);
        }

        TickReport {
            tracking,
            expression: estimate,
            window: self.window,
            candidates: candidates.len(),
            posted,
            skipped_post,
        }
    }

    /// Lay out the current feed for the given viewport.
    pub fn layout(&self, viewport: Viewport) -> Vec<RenderedEntry> {
        layout_feed(&self.feed, viewport, &self.layout)
    }

    /// Every message posted this session, oldest first.
    pub fn transcript(&self) -> &[PostedMessage] {
        &self.transcript
    }

    /// Take the pending observation, if any, and estimate an expression
    /// from it per the configured aggregation policy.
    fn consume_pending(&mut self) -> (TrackingState, Option<f64>) {
        if self.lifecycle == Lifecycle::Uninitialized {
            return (TrackingState::Unavailable, None);
        }
        let faces = match self.pending.take() {
            Some(faces) if !faces.is_empty() => faces,
            _ => return (TrackingState::Stale, None),
        };

        let limit = faces.len().min(self.tracker_config.max_faces.max(1));
        match aggregate_expression(&faces[..limit], self.tracker_config.aggregation) {
            Some(e) => (TrackingState::Observed, Some(e)),
            None => (TrackingState::Stale, None),
        }
    }
}

/// Collapse per-face estimates into one value per the aggregation policy.
fn aggregate_expression(faces: &[FaceObservation], policy: AggregationPolicy) -> Option<f64> {
    let estimates: Vec<f64> = faces.iter().filter_map(expression::estimate).collect();
    match policy {
        AggregationPolicy::Last => estimates.last().copied(),
        AggregationPolicy::First => estimates.first().copied(),
        AggregationPolicy::Average => {
            if estimates.is_empty() {
                None
            } else {
                Some(estimates.iter().sum::<f64>() / estimates.len() as f64)
            }
        }
    }
}
