//! Moodfeed - expression-driven ambient chat feed engine.
//!
//! An external face tracker streams landmark observations; the engine maps
//! mouth geometry to a smile/frown scalar, slides a sentiment acceptance
//! window across a store of authored messages, and maintains a bounded chat
//! feed with faded, color-coded layout output.
//!
//! # Privacy Guarantees
//!
//! - **No imagery**: video frames never enter this crate, only landmark points
//! - **No retention**: landmark frames are discarded once the expression
//!   scalar is updated
//! - **Simulated chat**: every message is authored content; nothing a viewer
//!   types is read or sent anywhere
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      moodfeed engine                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │  Tracker  │──▶│ Expression │──▶│ Sentiment  │            │
//! │  │ (replay / │   │ estimator  │   │  window    │            │
//! │  │ synthetic)│   └────────────┘   └─────┬──────┘            │
//! │  └───────────┘                          ▼                   │
//! │  ┌───────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │  Renderer │◀──│   Active   │◀──│  Filter +  │            │
//! │  │  (layout) │   │    feed    │   │ scheduler  │            │
//! │  └───────────┘   └────────────┘   └────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use moodfeed::{Config, FeedSession, MessageStore, Tracker};
//! use std::time::{Duration, Instant};
//!
//! let config = Config::default();
//! let mut session = FeedSession::new(MessageStore::builtin(), &config);
//!
//! let mut tracker = Tracker::synthetic(Duration::from_millis(33));
//! tracker.start().expect("Failed to start tracker");
//!
//! loop {
//!     while let Ok(event) = tracker.receiver().try_recv() {
//!         session.observe(event);
//!     }
//!     let report = session.tick(Instant::now());
//!     if let Some(posted) = report.posted {
//!         println!("{}", posted.message.text);
//!     }
//!     std::thread::sleep(config.tick_interval);
//! }
//! ```

pub mod config;
pub mod core;
pub mod tracker;
pub mod transparency;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{
    ActiveFeed, FeedScheduler, FeedSession, Message, MessageStore, PostedMessage, RenderedEntry,
    SentimentWindow, StoreError, TickReport, TrackingState, Viewport,
};
pub use tracker::{
    AggregationPolicy, FaceObservation, Tracker, TrackerConfig, TrackerError, TrackerEvent,
};
pub use transparency::{SharedTransparencyLog, TransparencyLog, TransparencyStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Privacy declaration that can be displayed to users.
pub const PRIVACY_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                 MOODFEED - PRIVACY DECLARATION                   ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This engine reacts to your facial expression, locally.          ║
║                                                                  ║
║  ✓ WHAT WE PROCESS:                                              ║
║    • Landmark geometry from the external face tracker            ║
║    • One smile/frown scalar derived from four mouth points       ║
║                                                                  ║
║  ✗ WHAT WE NEVER CAPTURE OR STORE:                               ║
║    • Video frames or images                                      ║
║    • Face identity, embeddings, or recognition data              ║
║    • Anything you type (the chat is simulated)                   ║
║                                                                  ║
║  All processing happens locally. Landmark frames are discarded   ║
║  as soon as the expression scalar is updated.                    ║
║                                                                  ║
║  You can view session statistics anytime with:                   ║
║    moodfeed status                                               ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
