//! # Clonelookup - Clone benchmark lookup
//!
//! Diagnostic lookups against a BigCloneBench-style dataset.
//!
//! Clonelookup provides:
//! - Read-only SQLite access returning schema-agnostic result sets
//! - Function resolution by one or two identifiers
//! - Symmetric clone-pair correlation
//! - Bounded source extraction from the on-disk corpus
//! - A tabular report driving the whole lookup

pub mod storage;
pub mod query;
pub mod extract;
pub mod report;
pub mod jsonl;
pub mod ui;
pub mod output;
pub mod config;

// Re-exports for convenient access
pub use storage::{SqliteStore, ResultSet, Record, Value};
pub use query::{Lookup, FunctionResolver, CloneCorrelator, FunctionRecord, ClonePairRecord};
pub use extract::{SourceExtractor, ResolvedFunction, SourceExcerpt, ExtractError};
pub use report::{Reporter, ReportSummary};

use std::path::PathBuf;

/// Result type alias for Clonelookup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Clonelookup operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("The path '{}' does not appear to be the benchmark root directory (missing bigclonebenchdb/)", .0.display())]
    InvalidProjectRoot(PathBuf),

    #[error("Please provide either one or two function IDs (got {0})")]
    InvalidIdCount(usize),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in column {column}: {value}")]
    InvalidValue { column: String, value: String },

    #[error("Record on line {line} has no '{field}' field")]
    MissingField { line: usize, field: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
