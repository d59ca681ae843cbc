//! Conformance against the shared fixture vectors in `tests/fixtures/v1`.
//!
//! Every case must decode to its stated value consuming all bytes, and
//! re-encode to the identical hex.  The canonical tables must also reproduce
//! the committed files case for case.

use std::path::PathBuf;

use dybuf_core::conformance::cases::{
    canonical_typdex, canonical_varint_signed, canonical_varint_unsigned, canonical_varlen_bytes,
    canonical_varlen_strings,
};
use dybuf_core::conformance::{
    check_typdex, check_varint_signed, check_varint_unsigned, check_varlen_bytes,
    check_varlen_strings, FixtureFile, FixtureKind, TypdexCase, VarintSignedCase,
    VarintUnsignedCase, VarlenBytesCase, VarlenStringCase,
};
use serde::de::DeserializeOwned;

fn load<C: DeserializeOwned>(kind: FixtureKind) -> Vec<C> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/v1")
        .join(kind.file_name());
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    let file: FixtureFile<C> = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("cannot parse {}: {e}", path.display()));
    file.cases
}

#[test]
fn test_varint_unsigned_fixtures() {
    let cases: Vec<VarintUnsignedCase> = load(FixtureKind::VarintUnsigned);
    assert_eq!(check_varint_unsigned(&cases), Ok(18));
    assert_eq!(cases, canonical_varint_unsigned().unwrap());
}

#[test]
fn test_varint_signed_fixtures() {
    let cases: Vec<VarintSignedCase> = load(FixtureKind::VarintSigned);
    assert_eq!(check_varint_signed(&cases), Ok(7));
    assert_eq!(cases, canonical_varint_signed().unwrap());
}

#[test]
fn test_typdex_fixtures() {
    let cases: Vec<TypdexCase> = load(FixtureKind::Typdex);
    assert_eq!(check_typdex(&cases), Ok(8));
    assert_eq!(cases, canonical_typdex().unwrap());
}

#[test]
fn test_varlen_bytes_fixtures() {
    let cases: Vec<VarlenBytesCase> = load(FixtureKind::VarlenBytes);
    assert_eq!(check_varlen_bytes(&cases), Ok(3));
    assert_eq!(cases, canonical_varlen_bytes().unwrap());
}

#[test]
fn test_varlen_strings_fixtures() {
    let cases: Vec<VarlenStringCase> = load(FixtureKind::VarlenStrings);
    assert_eq!(check_varlen_strings(&cases), Ok(3));
    assert_eq!(cases, canonical_varlen_strings().unwrap());
}
