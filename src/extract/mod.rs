//! Text extraction from uploaded binaries.
//!
//! Two paths, selected by the declared media type: a heuristic PDF stream
//! scrape (deliberately not a conformant content-stream decoder) and an OCR
//! collaborator for raster images.

pub mod ocr;
pub mod pdf;

use crate::models::UploadedFile;
use ocr::{OcrEngine, OcrError};
use thiserror::Error;

/// Errors surfaced while extracting text from an uploaded file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// File buffer could not be read at all.
    #[error("Unreadable file buffer: {0}")]
    Unreadable(String),
    /// OCR collaborator reported a failure.
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Extract text from a file, dispatching on its media type.
///
/// PDFs go through the in-process stream scrape; images are delegated to the
/// OCR collaborator. PDFs only fail on an unreadable (empty) buffer.
pub async fn extract_text(
    file: &UploadedFile,
    ocr: &dyn OcrEngine,
) -> Result<String, ExtractionError> {
    if file.bytes.is_empty() {
        return Err(ExtractionError::Unreadable(format!(
            "{} contained no bytes",
            file.name
        )));
    }

    if file.media_type.is_image() {
        let text = ocr.recognize(&file.bytes).await?;
        tracing::debug!(file = %file.name, chars = text.len(), "OCR extraction complete");
        Ok(text)
    } else {
        let text = pdf::scrape_streams(&file.bytes, &file.name);
        tracing::debug!(file = %file.name, chars = text.len(), "PDF extraction complete");
        Ok(text)
    }
}
