//! Error types for registry, pool and metadata lookups.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{InternalIndex, TaskLane};

/// A metadata lookup against the shell service failed.
///
/// Never crosses to the interactive thread: the worker logs it and produces no result.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service has nothing of this kind for the item (e.g. thumbnail of a directory).
    #[error("{what} not available for {}", .path.display())]
    Unsupported { what: &'static str, path: PathBuf },

    #[error("I/O error for path {}: {}", .1.display(), .0)]
    Io(#[source] std::io::Error, PathBuf),

    #[error("Could not decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
}

/// Errors from the enrichment core.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The internal index was retired or never existed.
    #[error("No item with internal index {0}")]
    NotFound(InternalIndex),

    /// No row at this position.
    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    /// Lane queue is full and nothing could be superseded or dropped.
    #[error("The {0} queue is saturated")]
    QueueSaturated(TaskLane),

    /// The worker pool was shut down.
    #[error("Worker pool is closed")]
    PoolClosed,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
