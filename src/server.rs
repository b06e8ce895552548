//! HTTP server for receiving landmark observations from a browser tracker.
//!
//! This module provides an HTTP server that:
//! - Accepts landmark frames from a browser face-mesh page via POST /observe
//! - Runs one frame of the session pipeline per feed poll
//! - Serves the rendered feed via GET /feed
//!
//! # Architecture
//!
//! ```text
//! Browser face mesh ──→ POST /observe ──→ moodfeed session ──→ GET /feed
//!                                              ↓
//!                                     [expression → window → post]
//! ```
//!
//! The consumer polls `/feed` at its display cadence; each poll is one tick
//! of the update loop, which keeps the posting timer's once-per-render-frame
//! semantics.

use crate::config::Config;
use crate::core::render::{RenderedEntry, Viewport};
use crate::core::sentiment::SentimentWindow;
use crate::core::session::{FeedSession, Lifecycle, TrackingState};
use crate::core::store::MessageStore;
use crate::tracker::types::{FaceObservation, RecordedFace, TrackerEvent};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Engine configuration for the hosted session
    pub config: Config,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(port: u16, config: Config) -> Self {
        Self { port, config }
    }
}

/// Shared server state
pub struct ServerState {
    /// The hosted feed session
    session: RwLock<FeedSession>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: &ServerConfig) -> Result<Self, crate::core::StoreError> {
        let store = match &config.config.messages_path {
            Some(path) => MessageStore::load(path)?,
            None => MessageStore::builtin(),
        };

        Ok(Self {
            session: RwLock::new(FeedSession::new(store, &config.config)),
        })
    }
}

/// Landmark frame from the browser tracker
#[derive(Debug, Clone, Deserialize)]
pub struct ObserveRequest {
    pub faces: Vec<RecordedFace>,
}

/// Response from the observe endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ObserveResponse {
    pub status: String,
    pub faces: usize,
}

/// Rendered feed for one viewport
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub tracking: TrackingState,
    pub window: Option<SentimentWindow>,
    pub candidates: usize,
    pub feed_len: usize,
    pub entries: Vec<RenderedEntry>,
}

/// Viewport query for the feed endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_width() -> f64 {
    1280.0
}

fn default_height() -> f64 {
    720.0
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /observe
///
/// Accepts one landmark frame. The first frame doubles as the readiness
/// signal from the external model.
async fn observe(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ObserveRequest>,
) -> Result<Json<ObserveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let faces: Vec<FaceObservation> = request.faces.into_iter().map(Into::into).collect();
    let count = faces.len();

    let mut session = state.session.write().await;
    if session.lifecycle() == Lifecycle::Uninitialized {
        session.observe(TrackerEvent::Ready);
    }
    session.observe(TrackerEvent::Frame(faces));

    Ok(Json(ObserveResponse {
        status: "ok".to_string(),
        faces: count,
    }))
}

/// GET /feed
///
/// Runs one tick of the update loop and returns the laid-out feed for the
/// requested viewport.
async fn feed(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let viewport = Viewport::new(query.width, query.height);

    let mut session = state.session.write().await;
    let report = session.tick(Instant::now());
    if let Some(posted) = &report.posted {
        tracing::debug!(
            sentiment = posted.message.sentiment,
            "posted: {}",
            posted.message.text
        );
    }

    Json(FeedResponse {
        tracking: report.tracking,
        window: report.window,
        candidates: report.candidates,
        feed_len: session.feed().len(),
        entries: session.layout(viewport),
    })
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config)?);

    let app = Router::new()
        .route("/health", get(health))
        .route("/observe", post(observe))
        .route("/feed", get(feed))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Moodfeed server listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
