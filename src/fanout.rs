//! Per-role summarization fanout.
//!
//! For one document, drives the summarizer and post-processor once per role
//! in [`RoleCode::ALL`], upserting each result and raising the document's
//! stored severity. The loop is sequential to bound provider load. Per-role
//! failures are logged and skipped; fanout never fails the upload.

use crate::metrics::IngestMetrics;
use crate::models::{Document, RoleSummaryRecord};
use crate::postprocess;
use crate::roles::RoleCode;
use crate::store::DataStore;
use crate::summarize::{Summarizer, SummarySource};
use std::sync::Arc;

/// Outcome of one fanout pass over all roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanoutReport {
    /// Roles whose summary row was written successfully.
    pub completed: usize,
    /// Roles that failed at persistence and were skipped.
    pub failed: usize,
    /// Highest severity computed across the pass.
    pub max_severity: u8,
}

/// Drives per-role summarization and persistence for one document.
pub struct FanoutOrchestrator {
    summarizer: Summarizer,
    store: Arc<dyn DataStore>,
    metrics: Arc<IngestMetrics>,
}

impl FanoutOrchestrator {
    /// Build an orchestrator around its collaborators.
    pub fn new(
        summarizer: Summarizer,
        store: Arc<dyn DataStore>,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            summarizer,
            store,
            metrics,
        }
    }

    /// Run the fanout for a document.
    ///
    /// Re-running for the same document overwrites each role's prior row
    /// (the store upserts by `(document_id, role_code)`) and can only raise
    /// the stored severity, never lower it.
    pub async fn run(&self, document: &Document) -> FanoutReport {
        let mut report = FanoutReport {
            max_severity: 1,
            ..FanoutReport::default()
        };

        for role in RoleCode::ALL {
            let output = self
                .summarizer
                .summarize(&document.content, role, &document.title)
                .await;
            self.metrics
                .record_summary(output.source == SummarySource::Fallback);

            let digest = postprocess::derive(&output.text, &document.content, role);
            let record = RoleSummaryRecord {
                document_id: document.id,
                role_code: role,
                summary: output.text,
                key_points: digest.key_points,
                action_items: digest.action_items,
                priority_score: digest.priority_score,
            };

            if let Err(error) = self.store.upsert_role_summary(&record).await {
                tracing::warn!(
                    document_id = %document.id,
                    role = %role,
                    error = %error,
                    "Failed to persist role summary; continuing fanout"
                );
                report.failed += 1;
                continue;
            }

            if let Err(error) = self
                .store
                .raise_severity(document.id, digest.severity_score)
                .await
            {
                tracing::warn!(
                    document_id = %document.id,
                    role = %role,
                    severity = digest.severity_score,
                    error = %error,
                    "Failed to raise document severity; continuing fanout"
                );
                report.failed += 1;
                continue;
            }

            report.max_severity = report.max_severity.max(digest.severity_score);
            report.completed += 1;
            tracing::debug!(
                document_id = %document.id,
                role = %role,
                priority = record.priority_score,
                severity = digest.severity_score,
                "Role summary written"
            );
        }

        tracing::info!(
            document_id = %document.id,
            completed = report.completed,
            failed = report.failed,
            max_severity = report.max_severity,
            "Summarization fanout finished"
        );
        report
    }
}
