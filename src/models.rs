//! Core data types shared across the ingestion pipeline.

use crate::roles::RoleCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media types accepted at the upload boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// PDF document.
    Pdf,
    /// PNG raster image.
    Png,
    /// JPEG raster image.
    Jpeg,
    /// WEBP raster image.
    Webp,
}

impl MediaType {
    /// Resolve a declared MIME type into a supported media type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Canonical MIME type sent to the object store.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// File extension used when building storage paths.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// Object store bucket for this media type: PDFs and images are kept apart.
    pub fn bucket(self) -> &'static str {
        match self {
            Self::Pdf => "documents",
            Self::Png | Self::Jpeg | Self::Webp => "images",
        }
    }

    /// Whether extraction goes through the OCR collaborator.
    pub fn is_image(self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// Raw file accepted at the upload boundary.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name as supplied by the client.
    pub name: String,
    /// Declared and validated media type.
    pub media_type: MediaType,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Derive a document title from the file name by dropping the extension.
    pub fn title(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.name.clone(),
        }
    }
}

/// Document row to insert after storage succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct NewDocument {
    /// Human-readable title derived from the file name.
    pub title: String,
    /// Extracted text content.
    pub content: String,
    /// Media type of the stored binary.
    pub file_type: MediaType,
    /// Size of the stored binary in bytes.
    pub size_bytes: u64,
    /// User that uploaded the file.
    pub owner_id: String,
    /// Category code resolved from the uploading role.
    pub category: String,
    /// Initial severity tier; raised later by the fanout.
    pub severity_level: u8,
    /// Tags attached at upload time.
    pub tags: Vec<String>,
    /// Lifecycle status of the row.
    pub status: String,
    /// Object store path of the stored binary.
    pub storage_path: String,
    /// Public URL of the stored binary.
    pub file_url: String,
}

/// Persisted document row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Primary key assigned by the relational store.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Extracted text content.
    pub content: String,
    /// Media type of the stored binary.
    pub file_type: MediaType,
    /// Size of the stored binary in bytes.
    pub size_bytes: u64,
    /// User that uploaded the file.
    pub owner_id: String,
    /// Category code.
    pub category: String,
    /// Current severity tier (1-5), monotonically raised by the fanout.
    pub severity_level: u8,
    /// Tags attached at upload time.
    pub tags: Vec<String>,
    /// Lifecycle status of the row.
    pub status: String,
    /// Object store path of the stored binary.
    pub storage_path: String,
    /// Public URL of the stored binary.
    pub file_url: String,
}

/// Per-role summary row, keyed by `(document_id, role_code)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummaryRecord {
    /// Document the summary belongs to.
    pub document_id: Uuid,
    /// Role the summary was produced for.
    pub role_code: RoleCode,
    /// Summary text (provider output or extractive fallback).
    pub summary: String,
    /// Ordered key points derived from the summary.
    pub key_points: Vec<String>,
    /// Ordered action items derived from the summary.
    pub action_items: Vec<String>,
    /// Role-weighted urgency score in [1, 10].
    pub priority_score: u8,
}

/// Notification row emitted once per eligible recipient.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    /// Recipient user id.
    pub recipient_id: String,
    /// Short notification title.
    pub title: String,
    /// Longer notification body.
    pub message: String,
    /// Notification kind, always `document_upload` for this pipeline.
    pub kind: String,
    /// Document the notification refers to.
    pub document_id: Uuid,
}
