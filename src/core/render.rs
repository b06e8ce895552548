//! Read-only feed layout: bottom-up stacking, fade, and sentiment hue.
//!
//! Layout is pure computation over the active feed and the current viewport.
//! Viewport dimensions are an input to every pass and are never cached, so
//! resizing takes effect on the next frame.

use crate::core::feed::ActiveFeed;
use serde::{Deserialize, Serialize};

/// Viewport dimensions, read fresh for every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Entries whose slot rises above this line are not drawn.
    pub fn chat_top(&self) -> f64 {
        self.height / 2.5
    }

    /// Entries below this line are fully opaque.
    pub fn fade_start(&self) -> f64 {
        self.height * 0.7
    }
}

/// Static layout constants for the feed column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeedLayout {
    pub padding_x: f64,
    pub padding_bottom: f64,
    /// Height reserved at the bottom for the (decorative) input row.
    pub input_height: f64,
    pub box_height: f64,
    pub box_margin: f64,
    /// Feed column width as a fraction of the viewport width.
    pub chat_width_ratio: f64,
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self {
            padding_x: 50.0,
            padding_bottom: 30.0,
            input_height: 50.0,
            box_height: 40.0,
            box_margin: 2.0,
            chat_width_ratio: 0.85,
        }
    }
}

/// One laid-out feed entry ready for drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedEntry {
    pub text: String,
    pub sentiment: f64,
    pub x: f64,
    /// Top of the entry's box.
    pub y: f64,
    pub max_width: f64,
    pub opacity: f64,
    /// Outline hue in degrees; fill is white at the same opacity.
    pub hue: f64,
}

/// Map a sentiment in [-1, 1] onto the red-to-green hue range [0, 120].
pub fn sentiment_hue(sentiment: f64) -> f64 {
    (sentiment + 1.0) / 2.0 * 120.0
}

/// Linear fade: fully opaque at or below `fade_start`, transparent at
/// `chat_top`, clamped outside the band.
pub fn fade_opacity(y: f64, fade_start: f64, chat_top: f64) -> f64 {
    if y >= fade_start {
        return 1.0;
    }
    ((y - chat_top) / (fade_start - chat_top)).clamp(0.0, 1.0)
}

/// Lay out the feed newest-first, stacking upward from the bottom baseline.
///
/// Iteration stops once the cursor crosses the chat-top threshold, so the
/// full buffer is never walked when most of it is off screen. The entry
/// straddling the threshold is still emitted.
pub fn layout_feed(feed: &ActiveFeed, viewport: Viewport, layout: &FeedLayout) -> Vec<RenderedEntry> {
    let slot_height = layout.box_height + layout.box_margin;
    let chat_top = viewport.chat_top();
    let fade_start = viewport.fade_start();
    let chat_width = viewport.width * layout.chat_width_ratio;

    let mut y = viewport.height - layout.padding_bottom - layout.input_height - slot_height;
    let mut entries = Vec::new();

    for posted in feed.newest_first() {
        entries.push(RenderedEntry {
            text: posted.message.text.clone(),
            sentiment: posted.message.sentiment,
            x: layout.padding_x,
            y,
            max_width: chat_width - layout.padding_x * 2.0,
            opacity: fade_opacity(y, fade_start, chat_top),
            hue: sentiment_hue(posted.message.sentiment),
        });

        y -= slot_height;
        if y < chat_top {
            break;
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Message;

    fn feed_of(count: usize) -> ActiveFeed {
        let mut feed = ActiveFeed::new();
        for n in 0..count {
            feed.push(Message {
                text: format!("message {n}"),
                sentiment: 0.0,
            });
        }
        feed
    }

    #[test]
    fn test_fade_interpolation() {
        assert_eq!(fade_opacity(700.0, 700.0, 300.0), 1.0);
        assert_eq!(fade_opacity(500.0, 700.0, 300.0), 0.5);
        assert_eq!(fade_opacity(300.0, 700.0, 300.0), 0.0);
        // Clamped outside the band.
        assert_eq!(fade_opacity(900.0, 700.0, 300.0), 1.0);
        assert_eq!(fade_opacity(100.0, 700.0, 300.0), 0.0);
    }

    #[test]
    fn test_hue_mapping() {
        assert_eq!(sentiment_hue(-1.0), 0.0);
        assert_eq!(sentiment_hue(0.0), 60.0);
        assert_eq!(sentiment_hue(1.0), 120.0);
    }

    #[test]
    fn test_entries_stack_upward_from_baseline() {
        let viewport = Viewport::new(1280.0, 1000.0);
        let layout = FeedLayout::default();
        let entries = layout_feed(&feed_of(3), viewport, &layout);

        // baseline = 1000 - 30 - 50 - 42
        assert_eq!(entries[0].y, 878.0);
        assert_eq!(entries[1].y, 836.0);
        assert_eq!(entries[2].y, 794.0);
        // Newest entry first.
        assert_eq!(entries[0].text, "message 2");
    }

    #[test]
    fn test_iteration_breaks_above_chat_top() {
        let viewport = Viewport::new(1280.0, 1000.0);
        let layout = FeedLayout::default();
        let entries = layout_feed(&feed_of(100), viewport, &layout);

        // chat_top = 400; baseline 878; 42 per slot. The cursor crosses
        // 400 after a dozen entries, far short of the full buffer.
        assert!(entries.len() < 20);
        let last = entries.last().unwrap();
        assert!(last.y >= viewport.chat_top() - layout.box_height);
    }

    #[test]
    fn test_empty_feed_lays_out_nothing() {
        let viewport = Viewport::new(1280.0, 720.0);
        let entries = layout_feed(&ActiveFeed::new(), viewport, &FeedLayout::default());
        assert!(entries.is_empty());
    }
}
