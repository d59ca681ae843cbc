//! Library half of the `dybuf-fixtures` tool.
//!
//! - [`config`]: optional TOML settings (fixture directory, file set, log level).
//! - [`generate`]: writes the canonical fixture files.
//! - [`verify`]: runs the conformance checkers over a fixture directory.

pub mod config;
pub mod generate;
pub mod verify;

use std::path::PathBuf;

use dybuf_core::conformance::ConformanceError;
use dybuf_core::DyBufError;
use thiserror::Error;

/// Errors raised while generating or verifying fixture files.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("codec error while building cases: {0}")]
    Codec(#[from] DyBufError),

    #[error("{path} fails conformance: {source}")]
    Conformance {
        path: PathBuf,
        #[source]
        source: ConformanceError,
    },
}
