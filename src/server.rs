//! JSON HTTP API.
//!
//! A stateless wrapper around the pipeline: every request carries its own
//! caption content, nothing is stored between requests.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/captions/parse` | Parse SRT/VTT content into cues |
//! | `POST` | `/segments` | Parse and segment caption content |
//! | `POST` | `/manifest` | Run the full pipeline for one video |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "no cues found in srt captions" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser player
//! can call the API directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ilearn_core::caption::CaptionFormat;
use ilearn_core::error::is_input_error;
use ilearn_core::models::{Cue, Segment};
use ilearn_core::segment::{segment_cues, SegmentOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::manifest::Manifest;
use crate::pipeline::{load_cues, run_pipeline, CaptionInput, VideoInput};

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Builds the API router. Exposed separately from [`run_server`] so it can
/// be driven without binding a socket.
pub fn router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/captions/parse", post(handle_parse))
        .route("/segments", post(handle_segments))
        .route("/manifest", post(handle_manifest))
        .layer(cors)
        .with_state(state)
}

/// Binds `[server].bind` and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = bind_addr.as_str(), "server listening");
    println!("iLearn API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// `"bad_request"` or `"internal"`.
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps [`InputError`](ilearn_core::error::InputError)s anywhere in the chain to 400, anything else to 500.
fn classify_pipeline_error(err: anyhow::Error) -> AppError {
    let msg = format!("{:#}", err);

    if is_input_error(&err) {
        bad_request(msg)
    } else {
        tracing::error!(error = msg.as_str(), "request failed");
        internal(msg)
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /captions/parse ============

#[derive(Deserialize)]
struct ParseRequest {
    content: String,
    #[serde(default)]
    format: Option<CaptionFormat>,
}

#[derive(Serialize)]
struct ParseResponse {
    format: CaptionFormat,
    cues: Vec<Cue>,
}

async fn handle_parse(Json(req): Json<ParseRequest>) -> Result<Json<ParseResponse>, AppError> {
    let captions = CaptionInput {
        content: req.content,
        format: req.format,
        file_name: None,
    };
    let (format, cues) = load_cues(&captions).map_err(classify_pipeline_error)?;
    Ok(Json(ParseResponse { format, cues }))
}

// ============ POST /segments ============

#[derive(Deserialize)]
struct SegmentsRequest {
    content: String,
    #[serde(default)]
    format: Option<CaptionFormat>,
    #[serde(default)]
    language: Option<String>,
    /// Falls back to `[segmentation]` from the server config.
    #[serde(default)]
    options: Option<SegmentOptions>,
}

#[derive(Serialize)]
struct SegmentsResponse {
    segments: Vec<Segment>,
}

async fn handle_segments(
    State(state): State<AppState>,
    Json(req): Json<SegmentsRequest>,
) -> Result<Json<SegmentsResponse>, AppError> {
    let options = req
        .options
        .unwrap_or_else(|| state.config.segmentation.segment_options());
    let language = req
        .language
        .as_deref()
        .unwrap_or(&state.config.segmentation.default_language);

    let captions = CaptionInput {
        content: req.content,
        format: req.format,
        file_name: None,
    };
    let (_, cues) = load_cues(&captions).map_err(classify_pipeline_error)?;
    let segments = segment_cues(&cues, &options, language).map_err(classify_pipeline_error)?;

    Ok(Json(SegmentsResponse { segments }))
}

// ============ POST /manifest ============

async fn handle_manifest(
    State(state): State<AppState>,
    Json(input): Json<VideoInput>,
) -> Result<Json<Manifest>, AppError> {
    let manifest = run_pipeline(&input, &state.config).map_err(classify_pipeline_error)?;
    Ok(Json(manifest))
}
