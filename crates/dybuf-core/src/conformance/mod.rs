//! Cross-implementation conformance vectors.
//!
//! Each fixture file is `{"cases": [...]}` with one object per case.  A case
//! passes when decoding `encoded_hex` yields the stated value while consuming
//! every byte, and encoding the value reproduces `encoded_hex` exactly.
//!
//! This module holds the case types (serde-ready), the canonical case tables
//! the fixture tool writes, and one checker per file.  Reading and writing the
//! JSON text is left to the caller.

pub mod cases;
pub mod check;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DyBufError;

pub use cases::{
    FixtureFile, TypdexCase, VarintSignedCase, VarintUnsignedCase, VarlenBytesCase,
    VarlenStringCase,
};
pub use check::{
    check_typdex, check_varint_signed, check_varint_unsigned, check_varlen_bytes,
    check_varlen_strings,
};

// ── Fixture kinds ─────────────────────────────────────────────────────────────

/// The five fixture files shared by every dybuf implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    VarintUnsigned,
    VarintSigned,
    Typdex,
    VarlenBytes,
    VarlenStrings,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 5] = [
        FixtureKind::VarintUnsigned,
        FixtureKind::VarintSigned,
        FixtureKind::Typdex,
        FixtureKind::VarlenBytes,
        FixtureKind::VarlenStrings,
    ];

    /// File name inside a fixture directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FixtureKind::VarintUnsigned => "varint_unsigned.json",
            FixtureKind::VarintSigned => "varint_signed.json",
            FixtureKind::Typdex => "typdex.json",
            FixtureKind::VarlenBytes => "varlen_bytes.json",
            FixtureKind::VarlenStrings => "varlen_strings.json",
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// First failure found in a fixture file, tagged with the failing case id.
#[derive(Debug, Error, PartialEq)]
pub enum ConformanceError {
    #[error("case {id}: invalid hex: {source}")]
    InvalidHex { id: String, source: hex::FromHexError },

    #[error("case {id}: cannot interpret {field} value {value:?}")]
    InvalidValue {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("case {id}: decode failed: {source}")]
    Decode { id: String, source: DyBufError },

    #[error("case {id}: encode failed: {source}")]
    Encode { id: String, source: DyBufError },

    #[error("case {id}: decoded {actual}, expected {expected}")]
    ValueMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("case {id}: consumed {consumed} of {len} bytes")]
    TrailingBytes { id: String, consumed: usize, len: usize },

    #[error("case {id}: encoded {actual}, expected {expected}")]
    EncodingMismatch {
        id: String,
        expected: String,
        actual: String,
    },
}

impl ConformanceError {
    /// Id of the failing case.
    pub fn case_id(&self) -> &str {
        match self {
            ConformanceError::InvalidHex { id, .. }
            | ConformanceError::InvalidValue { id, .. }
            | ConformanceError::Decode { id, .. }
            | ConformanceError::Encode { id, .. }
            | ConformanceError::ValueMismatch { id, .. }
            | ConformanceError::TrailingBytes { id, .. }
            | ConformanceError::EncodingMismatch { id, .. } => id,
        }
    }
}
