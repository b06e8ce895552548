//! Demonstration of the moodfeed engine without a camera.
//!
//! This example shows how to:
//! 1. Create a synthetic landmark source
//! 2. Feed observations into a session
//! 3. Tick the update loop and watch messages post
//! 4. Lay out the feed for a viewport
//!
//! Run with: cargo run --example feed_demo

use std::time::{Duration, Instant};

use moodfeed::{
    config::Config,
    core::{FeedSession, MessageStore, Viewport},
    tracker::{Tracker, TrackerEvent},
    PRIVACY_DECLARATION,
};

fn main() {
    println!("Moodfeed - Feed Demo");
    println!("====================");
    println!();

    // Display privacy declaration
    println!("{PRIVACY_DECLARATION}");
    println!();

    // Create components
    let config = Config::default();
    let mut session = FeedSession::new(MessageStore::builtin(), &config);
    let mut tracker = Tracker::synthetic(config.tick_interval);

    if let Err(e) = tracker.start() {
        eprintln!("Error starting tracker: {e}");
        return;
    }

    println!("Running for 15 seconds...");
    println!();

    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(15) {
        while let Ok(event) = tracker.receiver().try_recv() {
            if matches!(event, TrackerEvent::Ready) {
                println!("Tracker ready");
            }
            session.observe(event);
        }

        let report = session.tick(Instant::now());
        if let Some(posted) = report.posted {
            let window = report
                .window
                .map(|w| format!("[{:+.2}, {:+.2}]", w.min(), w.max()))
                .unwrap_or_else(|| "[full range]".to_string());
            println!(
                "{} ({:+.2}) {}",
                window, posted.message.sentiment, posted.message.text
            );
        }

        std::thread::sleep(config.tick_interval);
    }

    tracker.stop();

    // Lay out the final feed for a 1280x720 viewport
    println!();
    println!("Final layout (1280x720):");
    for entry in session.layout(Viewport::new(1280.0, 720.0)) {
        println!(
            "  y={:>5.1}  opacity={:.2}  hue={:>5.1}  {}",
            entry.y, entry.opacity, entry.hue, entry.text
        );
    }

    println!();
    println!("Posted {} messages in total.", session.transcript().len());
}
