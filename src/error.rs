//! Error types for profiler construction, configuration, and report output
//!
//! Failures raised by a wrapped target are never converted into these errors:
//! `Err` values and panics from the target reach the caller untouched. Only
//! the profiler's own failures live here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors owned by the profiler itself
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// `wrap` was asked to proxy a capability with nothing to measure
    #[error("capability `{capability}` does not declare any #[profiled] methods")]
    NoProfiledMethods { capability: &'static str },

    #[error("failed to write profiling data to {destination}")]
    Write {
        destination: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read profiler config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid profiler config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ProfilerError>;
