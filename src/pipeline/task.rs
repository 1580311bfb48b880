//! Upload task state tracking.
//!
//! Each accepted upload gets an [`UploadTask`] observed through a shared
//! [`TaskHandle`]. Progress is monotonically non-decreasing while the task
//! is live, and terminal states are one-directional: nothing leaves
//! `Completed` or `Error`.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Stage labels reported while a task is processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Extracting text from the file bytes.
    Extracting,
    /// Storing the binary in the object store.
    Uploading,
    /// Writing the document row.
    Persisting,
    /// Best-effort summarization fanout.
    Summarizing,
}

/// Lifecycle status of an upload task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "stage")]
pub enum TaskStatus {
    /// Accepted but not yet started.
    Pending,
    /// Actively processing the named stage.
    Processing(Stage),
    /// Terminal: upload succeeded.
    Completed,
    /// Terminal: upload failed.
    Error,
}

impl TaskStatus {
    fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Snapshot of one upload task.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTask {
    /// Server-generated task identifier.
    pub id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Current lifecycle status.
    #[serde(flatten)]
    pub status: TaskStatus,
    /// Progress in [0, 100], non-decreasing while live.
    pub progress: u8,
    /// Failure cause, set only in the `Error` state.
    pub error: Option<String>,
}

/// Shared handle for observing and mutating one upload task.
#[derive(Clone)]
pub struct TaskHandle {
    inner: Arc<Mutex<UploadTask>>,
}

impl TaskHandle {
    /// Register a new pending task for a file.
    pub fn new(file_name: String) -> Self {
        Self {
            inner: Arc::new(Mutex::new(UploadTask {
                id: Uuid::new_v4(),
                file_name,
                status: TaskStatus::Pending,
                progress: 0,
                error: None,
            })),
        }
    }

    /// Task identifier.
    pub fn id(&self) -> Uuid {
        self.lock().id
    }

    /// Mark the task accepted, at the first progress checkpoint.
    pub fn accept(&self) {
        let mut task = self.lock();
        if task.status.is_terminal() {
            return;
        }
        task.progress = task.progress.max(10);
    }

    /// Enter a processing stage at the given progress checkpoint.
    ///
    /// Progress regressions are clamped away; terminal tasks are untouched.
    pub fn advance(&self, stage: Stage, progress: u8) {
        let mut task = self.lock();
        if task.status.is_terminal() {
            return;
        }
        task.status = TaskStatus::Processing(stage);
        task.progress = task.progress.max(progress.min(100));
    }

    /// Raise progress without changing the stage.
    pub fn set_progress(&self, progress: u8) {
        let mut task = self.lock();
        if task.status.is_terminal() {
            return;
        }
        task.progress = task.progress.max(progress.min(100));
    }

    /// Terminate the task successfully at progress 100.
    pub fn complete(&self) {
        let mut task = self.lock();
        if task.status.is_terminal() {
            return;
        }
        task.status = TaskStatus::Completed;
        task.progress = 100;
    }

    /// Terminate the task with a captured failure cause.
    pub fn fail(&self, message: impl Into<String>) {
        let mut task = self.lock();
        if task.status.is_terminal() {
            return;
        }
        task.status = TaskStatus::Error;
        task.error = Some(message.into());
    }

    /// Current snapshot of the task.
    pub fn snapshot(&self) -> UploadTask {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UploadTask> {
        self.inner.lock().expect("task lock poisoned")
    }
}

/// Tracked-task count at which finished tasks are swept from the registry.
const SWEEP_THRESHOLD: usize = 1024;

/// Registry of live and finished tasks, keyed by id.
///
/// Finished tasks stay queryable until the client removes them or the sweep
/// evicts them: once the map reaches [`SWEEP_THRESHOLD`] entries, every
/// terminal task is dropped on the next registration. Live tasks are never
/// evicted.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<Uuid, TaskHandle>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task for a file and return its handle.
    pub fn register(&self, file_name: String) -> TaskHandle {
        let handle = TaskHandle::new(file_name);
        let mut tasks = self.tasks.lock().expect("registry lock poisoned");
        if tasks.len() >= SWEEP_THRESHOLD {
            tasks.retain(|_, task| !task.snapshot().status.is_terminal());
        }
        tasks.insert(handle.id(), handle.clone());
        handle
    }

    /// Look up a task by id.
    pub fn get(&self, id: Uuid) -> Option<TaskHandle> {
        self.tasks
            .lock()
            .expect("registry lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Drop a task from the registry, returning its handle if it was tracked.
    ///
    /// An ingestion run already dispatched for the task is unaffected.
    pub fn remove(&self, id: Uuid) -> Option<TaskHandle> {
        self.tasks
            .lock()
            .expect("registry lock poisoned")
            .remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_never_regresses() {
        let handle = TaskHandle::new("file.pdf".into());
        handle.accept();
        handle.advance(Stage::Extracting, 30);
        handle.set_progress(50);
        handle.advance(Stage::Uploading, 20);
        assert_eq!(handle.snapshot().progress, 50);
    }

    #[test]
    fn checkpoints_follow_the_documented_sequence() {
        let handle = TaskHandle::new("file.pdf".into());
        let mut observed = vec![handle.snapshot().progress];
        handle.accept();
        observed.push(handle.snapshot().progress);
        handle.advance(Stage::Extracting, 30);
        observed.push(handle.snapshot().progress);
        handle.set_progress(50);
        observed.push(handle.snapshot().progress);
        handle.advance(Stage::Uploading, 70);
        observed.push(handle.snapshot().progress);
        handle.advance(Stage::Persisting, 85);
        observed.push(handle.snapshot().progress);
        handle.complete();
        observed.push(handle.snapshot().progress);

        assert_eq!(observed, vec![0, 10, 30, 50, 70, 85, 100]);
        assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn completed_tasks_are_frozen() {
        let handle = TaskHandle::new("file.pdf".into());
        handle.complete();
        handle.fail("late failure");
        handle.advance(Stage::Extracting, 30);

        let task = handle.snapshot();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.progress, 100);
        assert!(task.error.is_none());
    }

    #[test]
    fn failed_tasks_keep_their_cause() {
        let handle = TaskHandle::new("file.pdf".into());
        handle.advance(Stage::Persisting, 70);
        handle.fail("database insert failed");
        handle.complete();

        let task = handle.snapshot();
        assert_eq!(task.status, TaskStatus::Error);
        assert_eq!(task.error.as_deref(), Some("database insert failed"));
    }

    #[test]
    fn registry_round_trips_handles() {
        let registry = TaskRegistry::new();
        let handle = registry.register("scan.png".into());
        let fetched = registry.get(handle.id()).expect("registered task");
        assert_eq!(fetched.id(), handle.id());
        assert!(registry.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn removed_tasks_are_forgotten() {
        let registry = TaskRegistry::new();
        let handle = registry.register("scan.png".into());
        assert!(registry.remove(handle.id()).is_some());
        assert!(registry.get(handle.id()).is_none());
        assert!(registry.remove(handle.id()).is_none());
    }

    #[test]
    fn sweep_evicts_finished_tasks_but_keeps_live_ones() {
        let registry = TaskRegistry::new();
        let finished = registry.register("done.pdf".into());
        finished.complete();
        let failed = registry.register("broken.pdf".into());
        failed.fail("extraction failed");
        let live = registry.register("inflight.pdf".into());

        for _ in 0..SWEEP_THRESHOLD {
            registry.register("filler.pdf".into());
        }

        assert!(registry.get(finished.id()).is_none());
        assert!(registry.get(failed.id()).is_none());
        assert!(registry.get(live.id()).is_some());
    }
}
