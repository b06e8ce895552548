//! Core pipeline for the moodfeed engine.
//!
//! This module contains:
//! - Expression estimation from mouth landmark geometry
//! - Sentiment window derivation and message filtering
//! - Feed scheduling, buffering, and layout
//! - The session struct tying the pipeline together

pub mod expression;
pub mod feed;
pub mod render;
pub mod sentiment;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use expression::EXPRESSION_LIMIT;
pub use feed::{ActiveFeed, FeedScheduler, PostedMessage, FEED_CAPACITY};
pub use render::{layout_feed, sentiment_hue, FeedLayout, RenderedEntry, Viewport};
pub use sentiment::{SentimentWindow, WINDOW_WIDTH};
pub use session::{FeedSession, Lifecycle, TickReport, TrackingState};
pub use store::{Message, MessageStore, StoreError};
