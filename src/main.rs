//! Moodfeed CLI
//!
//! Expression-driven ambient chat feed engine.

use chrono::Utc;
use clap::{Parser, Subcommand};
use moodfeed::{
    config::Config,
    core::{FeedSession, MessageStore},
    tracker::{Tracker, TrackerEvent},
    transparency::create_shared_log_with_persistence,
    PRIVACY_DECLARATION, VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "moodfeed")]
#[command(version = VERSION)]
#[command(about = "Expression-driven ambient chat feed engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feed loop against a landmark source
    Run {
        /// Replay a landmark recording (JSON Lines) instead of the
        /// synthetic source
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Message file to load (JSON array of {text, sentiment})
        #[arg(long)]
        messages: Option<PathBuf>,

        /// Stop after this many seconds (runs until Ctrl+C if omitted)
        #[arg(long)]
        duration: Option<u64>,

        /// Seed the RNG for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Pause posting
    Pause,

    /// Resume posting
    Resume,

    /// Show current engine status
    Status,

    /// List the message store
    Messages {
        /// Message file to list instead of the configured one
        #[arg(long)]
        messages: Option<PathBuf>,
    },

    /// Display privacy declaration
    Privacy,

    /// Show configuration
    Config,

    /// Serve the observation/feed HTTP interface
    #[cfg(feature = "server")]
    Serve {
        /// Port to bind to (0 for random)
        #[arg(long, default_value = "7878")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            replay,
            messages,
            duration,
            seed,
        } => {
            cmd_run(replay, messages, duration, seed);
        }
        Commands::Pause => {
            cmd_pause();
        }
        Commands::Resume => {
            cmd_resume();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Messages { messages } => {
            cmd_messages(messages);
        }
        Commands::Privacy => {
            cmd_privacy();
        }
        Commands::Config => {
            cmd_config();
        }
        #[cfg(feature = "server")]
        Commands::Serve { port } => {
            cmd_serve(port);
        }
    }
}

fn cmd_run(
    replay: Option<PathBuf>,
    messages: Option<PathBuf>,
    duration: Option<u64>,
    seed: Option<u64>,
) {
    println!("Moodfeed v{VERSION}");
    println!();

    // Load or create configuration
    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    // Load the message store
    let store = match messages.as_ref().or(config.messages_path.as_ref()) {
        Some(path) => match MessageStore::load(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error loading messages from {path:?}: {e}");
                std::process::exit(1);
            }
        },
        None => MessageStore::builtin(),
    };

    println!("Starting feed...");
    println!("  Messages: {}", store.len());
    println!(
        "  Post interval: {}-{}ms",
        config.min_interval.as_millis(),
        config.max_interval.as_millis()
    );
    println!(
        "  Source: {}",
        match &replay {
            Some(path) => format!("replay {path:?}"),
            None => "synthetic".to_string(),
        }
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Set up transparency log
    let transparency_log =
        create_shared_log_with_persistence(config.data_path.join("transparency.json"));

    // Create the tracker
    let mut tracker = match replay {
        Some(path) => Tracker::replay(path, config.tick_interval),
        None => Tracker::synthetic(config.tick_interval),
    };

    // Create the session
    let mut session = match seed {
        Some(seed) => FeedSession::with_seed(store, &config, seed),
        None => FeedSession::new(store, &config),
    };
    println!("Instance ID: {}", session.instance_id());

    if let Err(e) = tracker.start() {
        eprintln!("Error starting tracker: {e}");
        std::process::exit(1);
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Support pause/resume from another process by polling the config file.
    let mut paused = config.paused;
    let mut last_config_check = Instant::now();

    if paused {
        println!("Posting is currently paused.");
        println!("Run `moodfeed resume` to start posting.");
        println!();
    }

    let started = Instant::now();

    // Main update loop
    while running.load(Ordering::SeqCst) {
        if let Some(secs) = duration {
            if started.elapsed() >= Duration::from_secs(secs) {
                break;
            }
        }

        // Periodically reload config so `moodfeed pause/resume` can control
        // a running engine.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if cfg.paused != paused {
                    paused = cfg.paused;
                    println!();
                    if paused {
                        println!("Pausing posting...");
                    } else {
                        println!("Resuming posting...");
                    }
                }
            }
            last_config_check = Instant::now();
        }

        if paused {
            // Keep draining so stale frames don't burst in on resume.
            while tracker.receiver().try_recv().is_ok() {}
            thread::sleep(Duration::from_millis(100));
            continue;
        }

        // Drain tracker events; newer frames overwrite unconsumed ones.
        while let Ok(event) = tracker.receiver().try_recv() {
            match &event {
                TrackerEvent::Ready => println!("Tracker ready"),
                TrackerEvent::Frame(faces) => {
                    transparency_log.record_frame_received();
                    transparency_log.record_faces_observed(faces.len() as u64);
                }
            }
            session.observe(event);
        }

        let report = session.tick(Instant::now());
        transparency_log.record_frame_ticked();

        if let Some(posted) = &report.posted {
            transparency_log.record_message_posted();
            println!(
                "[{}] ({:+.2}) {}",
                posted.posted_at.format("%H:%M:%S"),
                posted.message.sentiment,
                posted.message.text
            );
        }
        if report.skipped_post {
            transparency_log.record_post_skipped();
        }

        thread::sleep(config.tick_interval);
    }

    // Stop the tracker
    println!();
    println!("Stopping...");
    tracker.stop();

    // Export the session transcript
    let transcript = session.transcript();
    if !transcript.is_empty() {
        let export_path = config
            .export_path
            .join(format!("session_{}.json", Utc::now().format("%Y%m%d_%H%M%S")));

        if let Some(parent) = export_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match serde_json::to_string_pretty(transcript) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&export_path, json) {
                    eprintln!("Error writing transcript: {e}");
                } else {
                    println!(
                        "Exported {} posted messages to {:?}",
                        transcript.len(),
                        export_path
                    );
                    transparency_log.record_transcript_exported();
                }
            }
            Err(e) => {
                eprintln!("Error serializing transcript: {e}");
            }
        }
    }

    // Save transparency log
    if let Err(e) = transparency_log.save() {
        eprintln!("Warning: Could not save transparency log: {e}");
    }

    // Final stats
    println!();
    println!("{}", transparency_log.summary());
}

fn cmd_pause() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = true;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Posting paused. Use 'moodfeed resume' to continue.");
}

fn cmd_resume() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = false;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Posting resumed.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Moodfeed Status");
    println!("===============");
    println!();

    println!("Configuration:");
    println!(
        "  Post interval: {}-{}ms",
        config.min_interval.as_millis(),
        config.max_interval.as_millis()
    );
    println!("  Feed capacity: {}", config.feed_capacity);
    println!("  Max faces: {}", config.tracker.max_faces);
    println!(
        "  Messages: {}",
        match &config.messages_path {
            Some(path) => format!("{path:?}"),
            None => "built-in".to_string(),
        }
    );
    println!("  Paused: {}", config.paused);
    println!();

    // Load and show transparency stats if available
    let stats_path = config.data_path.join("transparency.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(frames) = stats.get("frames_received") {
                    println!("  Landmark frames received: {frames}");
                }
                if let Some(faces) = stats.get("faces_observed") {
                    println!("  Faces observed: {faces}");
                }
                if let Some(posted) = stats.get("messages_posted") {
                    println!("  Messages posted: {posted}");
                }
                if let Some(skipped) = stats.get("posts_skipped") {
                    println!("  Post cycles skipped: {skipped}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_messages(messages: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();

    let store = match messages.as_ref().or(config.messages_path.as_ref()) {
        Some(path) => match MessageStore::load(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error loading messages from {path:?}: {e}");
                std::process::exit(1);
            }
        },
        None => MessageStore::builtin(),
    };

    println!("{} messages:", store.len());
    for message in store.messages() {
        println!("  {:+.2}  {}", message.sentiment, message.text);
    }
}

fn cmd_privacy() {
    println!("{PRIVACY_DECLARATION}");
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

#[cfg(feature = "server")]
fn cmd_serve(port: u16) {
    use moodfeed::server::{run, ServerConfig};

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::load().unwrap_or_default();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error creating runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        match run(ServerConfig::new(port, config)).await {
            Ok((addr, shutdown_tx)) => {
                println!("Serving on http://{addr}");
                println!("  POST /observe              landmark frames");
                println!("  GET  /feed?width=&height=  rendered feed (one tick per poll)");
                println!("  GET  /health");
                println!();
                println!("Press Ctrl+C to stop");

                let _ = tokio::signal::ctrl_c().await;
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
    });
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Warning: Could not set Ctrl+C handler: {e}");
    }
}
