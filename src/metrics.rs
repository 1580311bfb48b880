use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing ingestion and fanout activity.
#[derive(Default)]
pub struct IngestMetrics {
    documents_ingested: AtomicU64,
    documents_failed: AtomicU64,
    summaries_generated: AtomicU64,
    fallback_summaries: AtomicU64,
    notifications_sent: AtomicU64,
}

impl IngestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that completed the pipeline.
    pub fn record_document(&self) {
        self.documents_ingested.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document that terminated in error.
    pub fn record_failure(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one produced role summary, noting whether the fallback path was taken.
    pub fn record_summary(&self, fallback: bool) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
        if fallback {
            self.fallback_summaries.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record emitted notifications.
    pub fn record_notifications(&self, count: u64) {
        self.notifications_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_ingested: self.documents_ingested.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            fallback_summaries: self.fallback_summaries.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of ingestion counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents that completed the pipeline since startup.
    pub documents_ingested: u64,
    /// Documents that terminated in error since startup.
    pub documents_failed: u64,
    /// Role summaries produced across all documents.
    pub summaries_generated: u64,
    /// Role summaries that took the extractive fallback path.
    pub fallback_summaries: u64,
    /// Notifications emitted across all documents.
    pub notifications_sent: u64,
}
