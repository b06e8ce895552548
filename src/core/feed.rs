//! Active feed buffer and the randomized posting scheduler.

use crate::core::store::Message;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of entries the feed retains.
pub const FEED_CAPACITY: usize = 100;

/// Default bounds for the randomized posting interval.
pub const MIN_POST_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_POST_INTERVAL: Duration = Duration::from_millis(2500);

/// A message that has been posted to the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedMessage {
    pub message: Message,
    pub posted_at: DateTime<Utc>,
}

/// Bounded, time-ordered buffer of currently displayed messages.
///
/// Appends at the tail and evicts the oldest entry once past capacity.
/// Eviction is strictly FIFO, never sentiment-based.
#[derive(Debug, Clone)]
pub struct ActiveFeed {
    entries: VecDeque<PostedMessage>,
    capacity: usize,
}

impl ActiveFeed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest entry if over capacity.
    pub fn push(&mut self, message: Message) -> PostedMessage {
        let entry = PostedMessage {
            message,
            posted_at: Utc::now(),
        };
        self.entries.push_back(entry.clone());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &PostedMessage> {
        self.entries.iter()
    }

    /// Newest to oldest, the order the renderer stacks entries in.
    pub fn newest_first(&self) -> impl Iterator<Item = &PostedMessage> {
        self.entries.iter().rev()
    }
}

impl Default for ActiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-state posting timer: waiting until a deadline, posting when due.
///
/// The deadline is advisory wall-clock comparison only, checked once per
/// frame; it is not a scheduled task.
#[derive(Debug)]
pub struct FeedScheduler {
    min_interval: Duration,
    max_interval: Duration,
    deadline: Option<Instant>,
}

impl FeedScheduler {
    pub fn new() -> Self {
        Self::with_intervals(MIN_POST_INTERVAL, MAX_POST_INTERVAL)
    }

    pub fn with_intervals(min_interval: Duration, max_interval: Duration) -> Self {
        Self {
            min_interval,
            max_interval,
            deadline: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the stored deadline has passed. An unarmed scheduler is
    /// never due.
    pub fn due(&self, now: Instant) -> bool {
        self.deadline.map(|d| now > d).unwrap_or(false)
    }

    /// Draw a fresh deadline uniformly in `[min_interval, max_interval)`
    /// past `now`.
    pub fn arm<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        let min_ms = self.min_interval.as_millis() as u64;
        let max_ms = self.max_interval.as_millis() as u64;
        let delay_ms = if max_ms > min_ms {
            rng.gen_range(min_ms..max_ms)
        } else {
            min_ms
        };
        self.deadline = Some(now + Duration::from_millis(delay_ms));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for FeedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn message(n: usize) -> Message {
        Message {
            text: format!("message {n}"),
            sentiment: 0.0,
        }
    }

    #[test]
    fn test_feed_evicts_oldest_past_capacity() {
        let mut feed = ActiveFeed::new();
        for n in 1..=101 {
            feed.push(message(n));
        }

        assert_eq!(feed.len(), FEED_CAPACITY);
        let texts: Vec<&str> = feed.iter().map(|p| p.message.text.as_str()).collect();
        assert_eq!(texts[0], "message 2");
        assert_eq!(texts[99], "message 101");
    }

    #[test]
    fn test_newest_first_order() {
        let mut feed = ActiveFeed::new();
        feed.push(message(1));
        feed.push(message(2));

        let mut newest = feed.newest_first();
        assert_eq!(newest.next().unwrap().message.text, "message 2");
        assert_eq!(newest.next().unwrap().message.text, "message 1");
    }

    #[test]
    fn test_scheduler_samples_within_bounds() {
        let mut scheduler = FeedScheduler::new();
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();

        for _ in 0..500 {
            scheduler.arm(now, &mut rng);
            let delay = scheduler.deadline().unwrap() - now;
            assert!(delay >= MIN_POST_INTERVAL);
            assert!(delay < MAX_POST_INTERVAL);
        }
    }

    #[test]
    fn test_scheduler_due_is_strict() {
        let mut scheduler = FeedScheduler::with_intervals(
            Duration::from_millis(100),
            Duration::from_millis(101),
        );
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();
        scheduler.arm(now, &mut rng);

        let deadline = scheduler.deadline().unwrap();
        assert!(!scheduler.due(now));
        assert!(!scheduler.due(deadline));
        assert!(scheduler.due(deadline + Duration::from_millis(1)));
    }

    #[test]
    fn test_unarmed_scheduler_is_not_due() {
        let scheduler = FeedScheduler::new();
        assert!(!scheduler.is_armed());
        assert!(!scheduler.due(Instant::now()));
    }
}
