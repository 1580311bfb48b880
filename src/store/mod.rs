//! External storage collaborators and their error taxonomy.
//!
//! The pipeline talks to three narrow interfaces: an object store for raw
//! binaries, a relational data store for rows, and a notification sink. Each
//! is an `async_trait` seam so tests can substitute in-memory fakes; the
//! REST-backed implementations live in [`object`] and [`data`].

pub mod data;
pub mod object;

pub use data::RestDataStore;
pub use object::HttpObjectStore;

use crate::models::{Document, NewDocument, NewNotification, RoleSummaryRecord};
use crate::roles::RoleCode;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the object store collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid object store URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Store responded with an unexpected status code.
    #[error("Unexpected object store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Errors returned by the relational data store collaborator.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Store responded with an unexpected status code.
    #[error("Unexpected data store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response body could not be decoded into the expected row shape.
    #[error("Malformed data store response: {0}")]
    Decode(String),
}

/// Errors returned by the notification sink collaborator.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Sink responded with an unexpected status code.
    #[error("Unexpected notification sink response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the sink.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Object store holding uploaded binaries.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes at `bucket/path` and return the public URL.
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete the object at `bucket/path`.
    async fn delete(&self, bucket: &str, path: &str) -> Result<(), StorageError>;

    /// Public URL for the object at `bucket/path`.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Relational store for documents, role summaries, and user lookups.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Insert a document row and return the persisted record.
    async fn insert_document(&self, document: NewDocument) -> Result<Document, PersistenceError>;

    /// Insert or overwrite the role summary keyed by `(document_id, role_code)`.
    async fn upsert_role_summary(&self, record: &RoleSummaryRecord)
    -> Result<(), PersistenceError>;

    /// Atomically set the document severity to `max(current, candidate)`.
    ///
    /// The monotonic-severity invariant rests on this being a single
    /// store-side operation, not a read followed by a write.
    async fn raise_severity(
        &self,
        document_id: Uuid,
        candidate: u8,
    ) -> Result<(), PersistenceError>;

    /// Ids of currently-active users holding any of the given roles.
    async fn active_users_with_roles(
        &self,
        roles: &[RoleCode],
    ) -> Result<Vec<String>, PersistenceError>;
}

/// Sink that delivers notifications to users.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Create one notification row.
    async fn create(&self, notification: NewNotification) -> Result<(), NotificationError>;
}
