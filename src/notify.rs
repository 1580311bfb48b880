//! Notification fanout to the roles a category targets.
//!
//! Runs after a document is persisted. Resolves the category's target roles
//! to currently-active users, excludes the uploader, and creates one
//! notification per recipient. Every failure here is logged and swallowed:
//! notification trouble never rolls back an upload. No deduplication is
//! performed across repeated dispatches for the same document.

use crate::category;
use crate::metrics::IngestMetrics;
use crate::models::{Document, NewNotification};
use crate::store::{DataStore, NotificationSink};
use std::sync::Arc;

/// Kind recorded on notifications produced by this pipeline.
const NOTIFICATION_KIND: &str = "document_upload";

/// Emits notifications for freshly persisted documents.
pub struct NotificationDispatcher {
    store: Arc<dyn DataStore>,
    sink: Arc<dyn NotificationSink>,
    metrics: Arc<IngestMetrics>,
}

impl NotificationDispatcher {
    /// Build a dispatcher around its collaborators.
    pub fn new(
        store: Arc<dyn DataStore>,
        sink: Arc<dyn NotificationSink>,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            store,
            sink,
            metrics,
        }
    }

    /// Notify every eligible user about a document. Returns the number of
    /// notifications created.
    pub async fn dispatch(&self, document: &Document, uploader_id: &str) -> usize {
        let Some(category) = category::by_code(&document.category) else {
            tracing::warn!(
                document_id = %document.id,
                category = %document.category,
                "Unknown category; skipping notification fanout"
            );
            return 0;
        };

        let users = match self
            .store
            .active_users_with_roles(category.target_roles)
            .await
        {
            Ok(users) => users,
            Err(error) => {
                tracing::warn!(
                    document_id = %document.id,
                    error = %error,
                    "Failed to resolve notification audience"
                );
                return 0;
            }
        };

        let mut sent = 0;
        for user_id in users {
            if user_id == uploader_id {
                continue;
            }
            let notification = NewNotification {
                recipient_id: user_id.clone(),
                title: format!("New document: {}", document.title),
                message: format!(
                    "A {} document was uploaded and is ready for review.",
                    category.name
                ),
                kind: NOTIFICATION_KIND.to_string(),
                document_id: document.id,
            };
            match self.sink.create(notification).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(
                        document_id = %document.id,
                        recipient = %user_id,
                        error = %error,
                        "Failed to create notification"
                    );
                }
            }
        }

        self.metrics.record_notifications(sent as u64);
        tracing::info!(
            document_id = %document.id,
            category = category.code,
            sent,
            "Notification fanout finished"
        );
        sent
    }
}
