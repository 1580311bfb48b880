//! End-to-end pipeline scenarios against in-memory collaborators.

use async_trait::async_trait;
use doctriage::fanout::FanoutOrchestrator;
use doctriage::metrics::IngestMetrics;
use doctriage::models::{
    Document, MediaType, NewDocument, NewNotification, RoleSummaryRecord, UploadedFile,
};
use doctriage::notify::NotificationDispatcher;
use doctriage::pipeline::{IngestionPipeline, TaskHandle, TaskStatus};
use doctriage::roles::RoleCode;
use doctriage::store::{
    DataStore, NotificationError, NotificationSink, ObjectStore, PersistenceError, StorageError,
};
use doctriage::summarize::Summarizer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct MemoryObjects {
    stored: Mutex<Vec<(String, String)>>,
    deleted: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.stored
            .lock()
            .expect("lock")
            .push((bucket.to_string(), path.to_string()));
        Ok(self.public_url(bucket, path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        self.deleted
            .lock()
            .expect("lock")
            .push((bucket.to_string(), path.to_string()));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://objects.test/{bucket}/{path}")
    }
}

struct MemoryStore {
    fail_insert: bool,
    documents: Mutex<HashMap<Uuid, Document>>,
    summaries: Mutex<HashMap<(Uuid, RoleCode), RoleSummaryRecord>>,
    users: Vec<(String, RoleCode, bool)>,
}

impl MemoryStore {
    fn new(users: Vec<(String, RoleCode, bool)>) -> Self {
        Self {
            fail_insert: false,
            documents: Mutex::new(HashMap::new()),
            summaries: Mutex::new(HashMap::new()),
            users,
        }
    }

    fn failing_inserts() -> Self {
        Self {
            fail_insert: true,
            documents: Mutex::new(HashMap::new()),
            summaries: Mutex::new(HashMap::new()),
            users: Vec::new(),
        }
    }

    fn severity_of(&self, id: Uuid) -> u8 {
        self.documents
            .lock()
            .expect("lock")
            .get(&id)
            .map(|document| document.severity_level)
            .expect("document present")
    }

    fn summary_rows(&self, id: Uuid) -> Vec<RoleSummaryRecord> {
        let summaries = self.summaries.lock().expect("lock");
        let mut rows: Vec<RoleSummaryRecord> = summaries
            .iter()
            .filter(|((document_id, _), _)| *document_id == id)
            .map(|(_, record)| record.clone())
            .collect();
        rows.sort_by_key(|record| record.role_code.as_str());
        rows
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn insert_document(&self, document: NewDocument) -> Result<Document, PersistenceError> {
        if self.fail_insert {
            return Err(PersistenceError::Decode(
                "database insert failed: disk full".into(),
            ));
        }
        let persisted = Document {
            id: Uuid::new_v4(),
            title: document.title,
            content: document.content,
            file_type: document.file_type,
            size_bytes: document.size_bytes,
            owner_id: document.owner_id,
            category: document.category,
            severity_level: document.severity_level,
            tags: document.tags,
            status: document.status,
            storage_path: document.storage_path,
            file_url: document.file_url,
        };
        self.documents
            .lock()
            .expect("lock")
            .insert(persisted.id, persisted.clone());
        Ok(persisted)
    }

    async fn upsert_role_summary(
        &self,
        record: &RoleSummaryRecord,
    ) -> Result<(), PersistenceError> {
        self.summaries
            .lock()
            .expect("lock")
            .insert((record.document_id, record.role_code), record.clone());
        Ok(())
    }

    async fn raise_severity(
        &self,
        document_id: Uuid,
        candidate: u8,
    ) -> Result<(), PersistenceError> {
        let mut documents = self.documents.lock().expect("lock");
        if let Some(document) = documents.get_mut(&document_id) {
            document.severity_level = document.severity_level.max(candidate);
        }
        Ok(())
    }

    async fn active_users_with_roles(
        &self,
        roles: &[RoleCode],
    ) -> Result<Vec<String>, PersistenceError> {
        let mut users = Vec::new();
        for (user_id, role, active) in &self.users {
            if *active && roles.contains(role) && !users.contains(user_id) {
                users.push(user_id.clone());
            }
        }
        Ok(users)
    }
}

#[derive(Default)]
struct MemorySink {
    created: Mutex<Vec<NewNotification>>,
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn create(&self, notification: NewNotification) -> Result<(), NotificationError> {
        self.created.lock().expect("lock").push(notification);
        Ok(())
    }
}

struct Harness {
    pipeline: IngestionPipeline,
    objects: Arc<MemoryObjects>,
    store: Arc<MemoryStore>,
    sink: Arc<MemorySink>,
    metrics: Arc<IngestMetrics>,
}

fn harness(store: MemoryStore) -> Harness {
    let metrics = Arc::new(IngestMetrics::new());
    let objects = Arc::new(MemoryObjects::default());
    let store = Arc::new(store);
    let sink = Arc::new(MemorySink::default());
    let data_store: Arc<dyn DataStore> = store.clone();
    let fanout = FanoutOrchestrator::new(Summarizer::new(None), data_store.clone(), metrics.clone());
    let notifier = NotificationDispatcher::new(data_store.clone(), sink.clone(), metrics.clone());
    let pipeline = IngestionPipeline::new(
        Arc::new(doctriage::extract::ocr::DisabledOcr),
        objects.clone(),
        data_store,
        fanout,
        notifier,
        metrics.clone(),
    );
    Harness {
        pipeline,
        objects,
        store,
        sink,
        metrics,
    }
}

fn pdf_file(text: &str) -> UploadedFile {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"%PDF-1.4\n<< /Length 200 >>\nstream\n");
    bytes.extend_from_slice(text.as_bytes());
    bytes.extend_from_slice(b"\nendstream\n");
    UploadedFile {
        name: "inspection-report.pdf".into(),
        media_type: MediaType::Pdf,
        bytes,
    }
}

fn default_users() -> Vec<(String, RoleCode, bool)> {
    vec![
        ("user-uploader".into(), RoleCode::Safety, true),
        ("user-control".into(), RoleCode::StationCtrl, true),
        ("user-maintenance".into(), RoleCode::Maintenance, true),
        ("user-inactive".into(), RoleCode::Safety, false),
    ]
}

#[tokio::test]
async fn pdf_upload_completes_and_fans_out() {
    let harness = harness(MemoryStore::new(default_users()));
    let file = pdf_file(
        "Urgent corrosion was found on the stairwell supports. \
         Crews must inspect the adjacent platforms this week. \
         A follow-up survey is scheduled for next month.",
    );
    let task = TaskHandle::new(file.name.clone());

    let outcome = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Safety, &task)
        .await
        .expect("upload succeeds");

    let snapshot = task.snapshot();
    assert_eq!(snapshot.status, TaskStatus::Completed);
    assert_eq!(snapshot.progress, 100);
    assert!(snapshot.error.is_none());

    assert_eq!(outcome.document.category, "SAFETY_BULLETIN");
    assert_eq!(outcome.document.owner_id, "user-uploader");
    assert!(outcome.document.content.contains("Urgent corrosion"));

    // One summary row per role, all from the deterministic fallback.
    let rows = harness.store.summary_rows(outcome.document.id);
    assert_eq!(rows.len(), RoleCode::ALL.len());
    for row in &rows {
        assert!(!row.summary.is_empty());
        assert!(row.priority_score >= 1 && row.priority_score <= 10);
    }

    // "urgent" sits in the high severity tier.
    assert_eq!(harness.store.severity_of(outcome.document.id), 4);

    // SAFETY_BULLETIN targets SAFETY and STATION_CTRL; the uploader and the
    // inactive safety user are excluded.
    let notifications = harness.sink.created.lock().expect("lock");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].recipient_id, "user-control");
    assert_eq!(notifications[0].kind, "document_upload");
    assert_eq!(outcome.notified, 1);

    let metrics = harness.metrics.snapshot();
    assert_eq!(metrics.documents_ingested, 1);
    assert_eq!(metrics.summaries_generated, RoleCode::ALL.len() as u64);
    assert_eq!(metrics.fallback_summaries, RoleCode::ALL.len() as u64);
}

#[tokio::test]
async fn insert_failure_triggers_compensating_delete() {
    let harness = harness(MemoryStore::failing_inserts());
    let file = pdf_file("The quarterly review found nothing remarkable at all.");
    let task = TaskHandle::new(file.name.clone());

    let error = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Operations, &task)
        .await
        .expect_err("insert fails");
    assert!(error.to_string().contains("disk full"));

    // The stored binary must be cleaned up, and the task must carry the
    // original database failure.
    let stored = harness.objects.stored.lock().expect("lock").clone();
    let deleted = harness.objects.deleted.lock().expect("lock").clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored, deleted);

    let snapshot = task.snapshot();
    assert_eq!(snapshot.status, TaskStatus::Error);
    assert!(snapshot.error.expect("cause").contains("disk full"));
    assert!(harness.sink.created.lock().expect("lock").is_empty());
    assert_eq!(harness.metrics.snapshot().documents_failed, 1);
}

#[tokio::test]
async fn fanout_rerun_overwrites_instead_of_duplicating() {
    let harness = harness(MemoryStore::new(default_users()));
    let file = pdf_file("The escalator handrail showed moderate wear during inspection.");
    let task = TaskHandle::new(file.name.clone());

    let outcome = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Maintenance, &task)
        .await
        .expect("upload succeeds");

    let first = harness.store.summary_rows(outcome.document.id);
    assert_eq!(first.len(), RoleCode::ALL.len());

    // Re-running the fanout with the same deterministic summarizer must
    // produce identical rows, not accumulate duplicates.
    let data_store: Arc<dyn DataStore> = harness.store.clone();
    let fanout = FanoutOrchestrator::new(
        Summarizer::new(None),
        data_store,
        Arc::new(IngestMetrics::new()),
    );
    fanout.run(&outcome.document).await;

    let second = harness.store.summary_rows(outcome.document.id);
    assert_eq!(first, second);
}

#[tokio::test]
async fn severity_is_never_lowered() {
    let harness = harness(MemoryStore::new(default_users()));
    let file = pdf_file("Routine cleaning was completed without any findings.");
    let task = TaskHandle::new(file.name.clone());

    let outcome = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Operations, &task)
        .await
        .expect("upload succeeds");
    assert_eq!(harness.store.severity_of(outcome.document.id), 1);

    // Simulate an earlier pass having observed a worse severity.
    harness
        .store
        .raise_severity(outcome.document.id, 5)
        .await
        .expect("raise");

    let data_store: Arc<dyn DataStore> = harness.store.clone();
    let fanout = FanoutOrchestrator::new(
        Summarizer::new(None),
        data_store,
        Arc::new(IngestMetrics::new()),
    );
    fanout.run(&outcome.document).await;

    assert_eq!(harness.store.severity_of(outcome.document.id), 5);
}

#[tokio::test]
async fn repeated_dispatch_duplicates_notifications() {
    let harness = harness(MemoryStore::new(default_users()));
    let file = pdf_file("A significant track defect was logged near the crossover.");
    let task = TaskHandle::new(file.name.clone());

    let outcome = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Safety, &task)
        .await
        .expect("upload succeeds");
    assert_eq!(harness.sink.created.lock().expect("lock").len(), 1);

    // No deduplication across invocations: re-dispatch creates fresh rows.
    let data_store: Arc<dyn DataStore> = harness.store.clone();
    let notifier = NotificationDispatcher::new(
        data_store,
        harness.sink.clone(),
        Arc::new(IngestMetrics::new()),
    );
    let sent = notifier.dispatch(&outcome.document, "user-uploader").await;
    assert_eq!(sent, 1);
    assert_eq!(harness.sink.created.lock().expect("lock").len(), 2);
}

#[tokio::test]
async fn image_upload_without_ocr_fails_extraction() {
    let harness = harness(MemoryStore::new(default_users()));
    let file = UploadedFile {
        name: "whiteboard.png".into(),
        media_type: MediaType::Png,
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    let task = TaskHandle::new(file.name.clone());

    let error = harness
        .pipeline
        .run(file, "user-uploader", RoleCode::Operations, &task)
        .await
        .expect_err("extraction fails");
    assert!(error.to_string().contains("OCR"));

    let snapshot = task.snapshot();
    assert_eq!(snapshot.status, TaskStatus::Error);
    // Nothing was stored, so nothing needs compensation.
    assert!(harness.objects.stored.lock().expect("lock").is_empty());
    assert!(harness.objects.deleted.lock().expect("lock").is_empty());
}
