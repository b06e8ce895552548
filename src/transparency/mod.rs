//! Transparency module for the moodfeed engine.
//!
//! This module provides tools for tracking and exposing what the engine
//! processed, supporting user trust: landmark geometry goes in, feed
//! activity comes out, and nothing else is retained.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, SharedTransparencyLog, TransparencyLog,
    TransparencyStats,
};
