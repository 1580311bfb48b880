//! HTTP surface for doctriage.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /documents` – Accept an uploaded file (base64 payload), validate it at the
//!   boundary, and dispatch an ingestion task. Returns `202` with the task id.
//! - `GET /tasks/{id}` – Observe an upload task: status, progress, and failure cause.
//! - `DELETE /tasks/{id}` – Drop a task from the registry once the client is done with it.
//! - `GET /metrics` – Observe ingestion and fanout counters.
//!
//! Boundary validation (media type allow-list, 50 MiB size cap) lives here; everything
//! after acceptance is the pipeline's business.

use crate::metrics::{IngestMetrics, MetricsSnapshot};
use crate::models::{MediaType, UploadedFile};
use crate::pipeline::{IngestionPipeline, MAX_UPLOAD_BYTES, TaskRegistry, UploadTask};
use crate::roles::RoleCode;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Shared state behind the router.
pub struct AppState {
    /// Ingestion pipeline driving uploads.
    pub pipeline: Arc<IngestionPipeline>,
    /// Registry of live and finished upload tasks.
    pub registry: Arc<TaskRegistry>,
    /// Ingestion counters.
    pub metrics: Arc<IngestMetrics>,
}

/// Request-body ceiling for the router. The 50 MiB file cap expands by 4/3
/// under base64 plus the JSON envelope, so the transport limit sits above it;
/// the handler still enforces the cap on the decoded bytes.
const MAX_REQUEST_BYTES: usize = 70 * 1024 * 1024;

/// Build the HTTP router exposing the upload API surface.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents", post(upload_document))
        .route("/tasks/:id", get(get_task).delete(delete_task))
        .route("/metrics", get(get_metrics))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}

/// Request body for the `POST /documents` endpoint.
#[derive(Deserialize)]
struct UploadRequest {
    /// Original file name, used for titles and placeholders.
    file_name: String,
    /// Declared MIME type; must be PDF or a supported raster format.
    media_type: String,
    /// Base64-encoded file bytes.
    data: String,
    /// Uploading user id; excluded from the notification audience.
    uploader_id: String,
    /// Uploading user's role; selects the default category.
    uploader_role: String,
}

/// Success response for the `POST /documents` endpoint.
#[derive(Serialize)]
struct UploadAccepted {
    /// Identifier for polling `GET /tasks/{id}`.
    task_id: Uuid,
}

/// Accept an upload and dispatch the ingestion pipeline.
///
/// The pipeline runs detached: removal of interest in the task does not
/// interrupt an already-dispatched run.
async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadAccepted>), AppError> {
    let media_type = MediaType::from_mime(&request.media_type).ok_or_else(|| {
        AppError(
            StatusCode::BAD_REQUEST,
            format!("unsupported media type: {}", request.media_type),
        )
    })?;
    let uploader_role: RoleCode = request.uploader_role.parse().map_err(|()| {
        AppError(
            StatusCode::BAD_REQUEST,
            format!("unknown role: {}", request.uploader_role),
        )
    })?;
    let bytes = BASE64.decode(request.data.as_bytes()).map_err(|error| {
        AppError(
            StatusCode::BAD_REQUEST,
            format!("invalid base64 payload: {error}"),
        )
    })?;
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "file exceeds the {} MiB upload limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            ),
        ));
    }

    let file = UploadedFile {
        name: request.file_name,
        media_type,
        bytes,
    };
    let task = state.registry.register(file.name.clone());
    let task_id = task.id();

    let pipeline = state.pipeline.clone();
    let uploader_id = request.uploader_id;
    tokio::spawn(async move {
        // Terminal errors are already captured on the task handle.
        let _ = pipeline.run(file, &uploader_id, uploader_role, &task).await;
    });

    Ok((StatusCode::ACCEPTED, Json(UploadAccepted { task_id })))
}

/// Return the current snapshot of one upload task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadTask>, AppError> {
    let task = state
        .registry
        .get(id)
        .ok_or_else(|| AppError(StatusCode::NOT_FOUND, format!("unknown task: {id}")))?;
    Ok(Json(task.snapshot()))
}

/// Forget a task the client no longer cares about.
///
/// Removal only drops the registry entry; an ingestion run already
/// dispatched for the task keeps going.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .registry
        .remove(id)
        .ok_or_else(|| AppError(StatusCode::NOT_FOUND, format!("unknown task: {id}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return ingestion counters for observability dashboards.
async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}
