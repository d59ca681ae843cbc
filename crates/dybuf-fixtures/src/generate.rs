//! Writes the canonical fixture files.
//!
//! The layout is one compact JSON object per line inside a `cases` array,
//! which is what every dybuf implementation emits, so regenerated files diff
//! cleanly against committed ones:
//!
//! ```text
//! {
//!   "cases": [
//!     {"id":"zero","value_dec":"0","value_hex":"0x0","encoded_hex":"00"},
//!     ...
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use dybuf_core::conformance::cases::{
    canonical_typdex, canonical_varint_signed, canonical_varint_unsigned, canonical_varlen_bytes,
    canonical_varlen_strings,
};
use dybuf_core::conformance::FixtureKind;
use serde::Serialize;
use tracing::{debug, info};

use crate::FixtureError;

/// Renders `cases` in the shared fixture layout.
pub fn render_cases<C: Serialize>(cases: &[C]) -> serde_json::Result<String> {
    let mut out = String::from("{\n  \"cases\": [\n");
    for (i, case) in cases.iter().enumerate() {
        out.push_str("    ");
        out.push_str(&serde_json::to_string(case)?);
        if i + 1 < cases.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("  ]\n}\n");
    Ok(out)
}

/// Renders the canonical file for `kind`.
pub fn render_fixture(kind: FixtureKind) -> Result<String, FixtureError> {
    let rendered = match kind {
        FixtureKind::VarintUnsigned => render_cases(&canonical_varint_unsigned()?),
        FixtureKind::VarintSigned => render_cases(&canonical_varint_signed()?),
        FixtureKind::Typdex => render_cases(&canonical_typdex()?),
        FixtureKind::VarlenBytes => render_cases(&canonical_varlen_bytes()?),
        FixtureKind::VarlenStrings => render_cases(&canonical_varlen_strings()?),
    };
    rendered.map_err(|source| FixtureError::Json {
        path: PathBuf::from(kind.file_name()),
        source,
    })
}

/// Writes the canonical file for each of `kinds` into `dir`, creating it if
/// needed.  Returns the paths written.
pub fn generate_dir(dir: &Path, kinds: &[FixtureKind]) -> Result<Vec<PathBuf>, FixtureError> {
    std::fs::create_dir_all(dir).map_err(|source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let path = dir.join(kind.file_name());
        let text = render_fixture(kind)?;
        std::fs::write(&path, &text).map_err(|source| FixtureError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "fixture written");
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "fixtures generated");
    Ok(written)
}
