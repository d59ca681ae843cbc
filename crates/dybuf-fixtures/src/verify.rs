//! Runs the conformance checkers over a fixture directory.

use std::path::{Path, PathBuf};

use dybuf_core::conformance::{
    check_typdex, check_varint_signed, check_varint_unsigned, check_varlen_bytes,
    check_varlen_strings, ConformanceError, FixtureFile, FixtureKind,
};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::FixtureError;

/// Outcome of checking one fixture file.
#[derive(Debug)]
pub struct FileReport {
    pub kind: FixtureKind,
    pub path: PathBuf,
    /// Number of cases that passed, or the first failure.
    pub outcome: Result<usize, FixtureError>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Checks a single fixture file in `dir`.
pub fn verify_file(dir: &Path, kind: FixtureKind) -> Result<usize, FixtureError> {
    let path = dir.join(kind.file_name());
    let text = std::fs::read_to_string(&path).map_err(|source| FixtureError::Io {
        path: path.clone(),
        source,
    })?;

    match kind {
        FixtureKind::VarintUnsigned => run(&path, &text, check_varint_unsigned),
        FixtureKind::VarintSigned => run(&path, &text, check_varint_signed),
        FixtureKind::Typdex => run(&path, &text, check_typdex),
        FixtureKind::VarlenBytes => run(&path, &text, check_varlen_bytes),
        FixtureKind::VarlenStrings => run(&path, &text, check_varlen_strings),
    }
}

/// Checks every file in `kinds`, logging each result.  Never stops early.
pub fn verify_dir(dir: &Path, kinds: &[FixtureKind]) -> Vec<FileReport> {
    kinds
        .iter()
        .map(|&kind| {
            let outcome = verify_file(dir, kind);
            let path = dir.join(kind.file_name());
            match &outcome {
                Ok(cases) => info!(file = kind.file_name(), cases, "conformance passed"),
                Err(e) => error!(file = kind.file_name(), error = %e, "conformance failed"),
            }
            FileReport { kind, path, outcome }
        })
        .collect()
}

fn run<C: DeserializeOwned>(
    path: &Path,
    text: &str,
    check: fn(&[C]) -> Result<usize, ConformanceError>,
) -> Result<usize, FixtureError> {
    let file: FixtureFile<C> = serde_json::from_str(text).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    check(&file.cases).map_err(|source| FixtureError::Conformance {
        path: path.to_path_buf(),
        source,
    })
}
