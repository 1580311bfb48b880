//! Heuristic PDF text scrape.
//!
//! Scans the raw bytes for `stream ... endstream` regions that follow a
//! `/Length` marker, strips non-printable characters, and concatenates the
//! results. Most real PDFs carry compressed streams, so the filename
//! placeholder path is common on realistic inputs; that degraded output is
//! accepted behavior, not an error.

use regex::bytes::Regex;
use std::sync::OnceLock;

/// Upper bound on the scraped text length, in characters.
const MAX_SCRAPED_CHARS: usize = 2000;

fn stream_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Unicode mode is off: stream regions are arbitrary bytes, not UTF-8.
        Regex::new(r"(?s-u)/Length[^>]*>>\s*stream\r?\n?(.*?)endstream")
            .expect("stream regex compiles")
    })
}

/// Scrape printable text out of uncompressed PDF content streams.
///
/// Returns `"PDF content from {file_name}"` when no stream region is found
/// or every matched region strips down to nothing.
pub fn scrape_streams(bytes: &[u8], file_name: &str) -> String {
    let mut pieces = Vec::new();
    for capture in stream_regex().captures_iter(bytes) {
        if let Some(region) = capture.get(1) {
            let cleaned = strip_non_printable(region.as_bytes());
            if !cleaned.is_empty() {
                pieces.push(cleaned);
            }
        }
    }

    if pieces.is_empty() {
        return format!("PDF content from {file_name}");
    }

    let mut text = pieces.join(" ");
    if text.chars().count() > MAX_SCRAPED_CHARS {
        text = text.chars().take(MAX_SCRAPED_CHARS).collect();
    }
    text
}

/// Keep graphic ASCII, collapsing runs of everything else into single spaces.
fn strip_non_printable(bytes: &[u8]) -> String {
    let mut cleaned = String::with_capacity(bytes.len());
    let mut last_was_space = true;
    for &byte in bytes {
        if (0x21..=0x7e).contains(&byte) {
            cleaned.push(byte as char);
            last_was_space = false;
        } else if !last_was_space {
            cleaned.push(' ');
            last_was_space = true;
        }
    }
    cleaned.trim().to_string()
}
