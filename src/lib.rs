#![deny(missing_docs)]

//! Core library for the doctriage ingestion server.

/// HTTP routing and REST handlers.
pub mod api;
/// Read-only category reference data.
pub mod category;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from uploaded binaries.
pub mod extract;
/// Per-role summarization fanout.
pub mod fanout;
/// Structured logging and tracing setup.
pub mod logging;
/// Ingestion metrics helpers.
pub mod metrics;
/// Core data types shared across the pipeline.
pub mod models;
/// Notification fanout after persistence.
pub mod notify;
/// Per-file ingestion state machine.
pub mod pipeline;
/// Key-point, action-item, priority, and severity heuristics.
pub mod postprocess;
/// Fixed role set and per-role summary configuration.
pub mod roles;
/// External storage collaborators.
pub mod store;
/// Role-aware summarization with provider fallback.
pub mod summarize;
