//! Per-file ingestion state machine.
//!
//! Sequences extraction, binary storage, row persistence, and the
//! best-effort summarization/notification fanout for one uploaded file.
//! The contract: an upload succeeds once the bytes are stored and a
//! document row exists; everything after that only enriches the document
//! and never turns success into failure.

pub mod task;

pub use task::{Stage, TaskHandle, TaskRegistry, TaskStatus, UploadTask};

use crate::category;
use crate::extract::{self, ExtractionError, ocr::OcrEngine};
use crate::fanout::{FanoutOrchestrator, FanoutReport};
use crate::metrics::IngestMetrics;
use crate::models::{Document, NewDocument, UploadedFile};
use crate::notify::NotificationDispatcher;
use crate::roles::RoleCode;
use crate::store::{ObjectStore, PersistenceError, StorageError};
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum accepted file size.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Terminal errors for an upload task.
///
/// Only extraction, storage, and primary-row persistence can fail an
/// upload; summarization and notification trouble degrades silently.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File rejected at the boundary before any processing.
    #[error("Upload rejected: {0}")]
    Rejected(String),
    /// Text extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Binary storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Document row insert failed (after best-effort cleanup of the binary).
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result of a completed ingestion run.
#[derive(Debug)]
pub struct IngestOutcome {
    /// The persisted document.
    pub document: Document,
    /// Fanout counters for diagnostics.
    pub fanout: FanoutReport,
    /// Number of notifications created.
    pub notified: usize,
}

/// Drives one uploaded file through the ingestion stages.
///
/// Each call to [`IngestionPipeline::run`] is independent; concurrent runs
/// share nothing mutable beyond the task registry and metrics.
pub struct IngestionPipeline {
    ocr: Arc<dyn OcrEngine>,
    objects: Arc<dyn ObjectStore>,
    store: Arc<dyn crate::store::DataStore>,
    fanout: FanoutOrchestrator,
    notifier: NotificationDispatcher,
    metrics: Arc<IngestMetrics>,
}

impl IngestionPipeline {
    /// Build a pipeline around its collaborators.
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        objects: Arc<dyn ObjectStore>,
        store: Arc<dyn crate::store::DataStore>,
        fanout: FanoutOrchestrator,
        notifier: NotificationDispatcher,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            ocr,
            objects,
            store,
            fanout,
            notifier,
            metrics,
        }
    }

    /// Validate a file against the upload acceptance constraints.
    pub fn validate(file: &UploadedFile) -> Result<(), IngestError> {
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(IngestError::Rejected(format!(
                "{} exceeds the {} MiB upload limit",
                file.name,
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// Run the full ingestion sequence for one file.
    ///
    /// The task handle is updated at each checkpoint; on any terminal error
    /// the task is failed with a human-readable cause before the error is
    /// returned.
    pub async fn run(
        &self,
        file: UploadedFile,
        uploader_id: &str,
        uploader_role: RoleCode,
        task: &TaskHandle,
    ) -> Result<IngestOutcome, IngestError> {
        if let Err(error) = Self::validate(&file) {
            task.fail(error.to_string());
            self.metrics.record_failure();
            return Err(error);
        }
        task.accept();
        tracing::info!(
            task_id = %task.id(),
            file = %file.name,
            media_type = ?file.media_type,
            size = file.bytes.len(),
            uploader = uploader_id,
            "Upload accepted"
        );

        task.advance(Stage::Extracting, 30);
        let content = match extract::extract_text(&file, self.ocr.as_ref()).await {
            Ok(content) => content,
            Err(error) => {
                task.fail(error.to_string());
                self.metrics.record_failure();
                return Err(error.into());
            }
        };
        task.set_progress(50);

        task.advance(Stage::Uploading, 50);
        let bucket = file.media_type.bucket();
        let path = storage_path(uploader_id, &file);
        let file_url = match self
            .objects
            .put(bucket, &path, file.bytes.clone(), file.media_type.mime())
            .await
        {
            Ok(url) => url,
            Err(error) => {
                task.fail(error.to_string());
                self.metrics.record_failure();
                return Err(error.into());
            }
        };
        task.advance(Stage::Persisting, 70);

        let new_document = NewDocument {
            title: file.title(),
            content,
            file_type: file.media_type,
            size_bytes: file.bytes.len() as u64,
            owner_id: uploader_id.to_string(),
            category: category::default_for_role(uploader_role).code.to_string(),
            severity_level: 1,
            tags: Vec::new(),
            status: "active".to_string(),
            storage_path: path.clone(),
            file_url,
        };
        let document = match self.store.insert_document(new_document).await {
            Ok(document) => document,
            Err(error) => {
                // The binary is already stored; compensate before reporting.
                // A failed cleanup is swallowed so the insert error stays
                // the one surfaced.
                if let Err(cleanup) = self.objects.delete(bucket, &path).await {
                    tracing::warn!(
                        bucket,
                        path = %path,
                        error = %cleanup,
                        "Compensating delete failed after insert error"
                    );
                }
                task.fail(error.to_string());
                self.metrics.record_failure();
                return Err(error.into());
            }
        };
        task.advance(Stage::Summarizing, 85);

        // Best-effort enrichment: nothing past this point can fail the task.
        let fanout = self.fanout.run(&document).await;
        let notified = self.notifier.dispatch(&document, uploader_id).await;

        self.metrics.record_document();
        task.complete();
        tracing::info!(
            task_id = %task.id(),
            document_id = %document.id,
            roles_completed = fanout.completed,
            notified,
            "Upload completed"
        );

        Ok(IngestOutcome {
            document,
            fanout,
            notified,
        })
    }
}

/// Storage path for an uploaded binary: `{user}/{timestamp}-{token}.{ext}`.
fn storage_path(user_id: &str, file: &UploadedFile) -> String {
    let timestamp = OffsetDateTime::now_utc().unix_timestamp();
    let token = Uuid::new_v4().simple();
    format!(
        "{user_id}/{timestamp}-{token}.{ext}",
        ext = file.media_type.extension()
    )
}
