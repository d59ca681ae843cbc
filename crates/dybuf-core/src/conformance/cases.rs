//! Fixture case types and the canonical case tables.
//!
//! Field names match the JSON keys written by every dybuf implementation, so
//! `serde_json::to_string` of a case produces the same object text.

use serde::{Deserialize, Serialize};

use crate::buffer::DyBuf;
use crate::codec::typdex::{encode_typdex, Typdex, TYPDEX_INDEX_MAX};
use crate::codec::varint::BIAS;
use crate::error::Result;

/// Top-level shape of every fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFile<C> {
    pub cases: Vec<C>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarintUnsignedCase {
    pub id: String,
    /// Decimal text; 64-bit values do not survive a JSON number round trip.
    pub value_dec: String,
    pub value_hex: String,
    pub encoded_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarintSignedCase {
    pub id: String,
    pub value_dec: String,
    /// `0x..` or `-0x..` of the magnitude.
    pub value_hex: String,
    pub encoded_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypdexCase {
    pub id: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub index: u32,
    pub encoded_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarlenBytesCase {
    pub id: String,
    pub payload_hex: String,
    pub payload_length: usize,
    pub encoded_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarlenStringCase {
    pub id: String,
    pub utf8: String,
    pub encoded_hex: String,
}

// ── Case construction ─────────────────────────────────────────────────────────

impl VarintUnsignedCase {
    pub fn from_value(id: &str, value: u64) -> Result<Self> {
        let mut buf = DyBuf::with_capacity(16)?;
        buf.append_var_u64(value)?;
        Ok(Self {
            id: id.to_string(),
            value_dec: value.to_string(),
            value_hex: format!("{value:#x}"),
            encoded_hex: hex::encode(buf.snapshot_written()),
        })
    }
}

impl VarintSignedCase {
    pub fn from_value(id: &str, value: i64) -> Result<Self> {
        let mut buf = DyBuf::with_capacity(16)?;
        buf.append_var_i64(value)?;
        let sign = if value < 0 { "-" } else { "" };
        Ok(Self {
            id: id.to_string(),
            value_dec: value.to_string(),
            value_hex: format!("{sign}{:#x}", value.unsigned_abs()),
            encoded_hex: hex::encode(buf.snapshot_written()),
        })
    }
}

impl TypdexCase {
    pub fn from_tag(id: &str, type_code: u8, index: u32) -> Result<Self> {
        let (bytes, len) = encode_typdex(Typdex::new(type_code, index))?;
        Ok(Self {
            id: id.to_string(),
            type_code,
            index,
            encoded_hex: hex::encode(&bytes[..len]),
        })
    }
}

impl VarlenBytesCase {
    pub fn from_payload(id: &str, payload: &[u8]) -> Result<Self> {
        let mut buf = DyBuf::with_capacity(payload.len() + 9)?;
        buf.append_bytes_with_len(payload)?;
        Ok(Self {
            id: id.to_string(),
            payload_hex: hex::encode(payload),
            payload_length: payload.len(),
            encoded_hex: hex::encode(buf.snapshot_written()),
        })
    }
}

impl VarlenStringCase {
    pub fn from_text(id: &str, text: &str) -> Result<Self> {
        let mut buf = DyBuf::with_capacity(text.len() + 10)?;
        buf.append_str_with_len(text)?;
        Ok(Self {
            id: id.to_string(),
            utf8: text.to_string(),
            encoded_hex: hex::encode(buf.snapshot_written()),
        })
    }
}

// ── Canonical tables ──────────────────────────────────────────────────────────

/// Unsigned cases: 0, 1, then the first and last value of every tier, then
/// `u64::MAX`.
pub fn canonical_varint_unsigned() -> Result<Vec<VarintUnsignedCase>> {
    let mut cases = vec![
        VarintUnsignedCase::from_value("zero", 0)?,
        VarintUnsignedCase::from_value("one", 1)?,
        VarintUnsignedCase::from_value("tier1_max", BIAS[1] - 1)?,
    ];
    for tier in 2..=8 {
        cases.push(VarintUnsignedCase::from_value(&format!("tier{tier}_min"), BIAS[tier - 1])?);
        cases.push(VarintUnsignedCase::from_value(&format!("tier{tier}_max"), BIAS[tier] - 1)?);
    }
    cases.push(VarintUnsignedCase::from_value("u64_max", u64::MAX)?);
    Ok(cases)
}

pub fn canonical_varint_signed() -> Result<Vec<VarintSignedCase>> {
    [
        ("zero", 0),
        ("one", 1),
        ("minus_one", -1),
        ("large_positive", 1_234_567_890_123_456_789),
        ("large_negative", -1_234_567_890_123_456_789),
        ("int64_max", i64::MAX),
        ("int64_min", i64::MIN),
    ]
    .into_iter()
    .map(|(id, value)| VarintSignedCase::from_value(id, value))
    .collect()
}

/// Typdex cases at the edges of each tier.
pub fn canonical_typdex() -> Result<Vec<TypdexCase>> {
    [
        ("tier1_zero", 0x00, 0),
        ("tier1_max", 0x0F, 0x07),
        ("tier2_min_type", 0x10, 0),
        ("tier2_max", 0x3F, 0xFF),
        ("tier3_min_type", 0x40, 0x100),
        ("tier3_max", 0xFF, 0x1FFF),
        ("tier4_min_index", 0x01, 0x2000),
        ("tier4_max", 0xAA, TYPDEX_INDEX_MAX),
    ]
    .into_iter()
    .map(|(id, type_code, index)| TypdexCase::from_tag(id, type_code, index))
    .collect()
}

pub fn canonical_varlen_bytes() -> Result<Vec<VarlenBytesCase>> {
    const MEDIUM: [u8; 16] = [
        0x00, 0x01, 0x7F, 0x80, 0xFF, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x7A, 0x7B,
        0x7C, 0x7D,
    ];
    Ok(vec![
        VarlenBytesCase::from_payload("empty", &[])?,
        VarlenBytesCase::from_payload("small", &[0x11, 0x22, 0x33])?,
        VarlenBytesCase::from_payload("medium", &MEDIUM)?,
    ])
}

pub fn canonical_varlen_strings() -> Result<Vec<VarlenStringCase>> {
    Ok(vec![
        VarlenStringCase::from_text("empty", "")?,
        VarlenStringCase::from_text("hello_world", "hello world")?,
        VarlenStringCase::from_text("sentence", "dybuf fixture cross-language sample")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_table_covers_every_tier_edge() {
        let cases = canonical_varint_unsigned().unwrap();
        assert_eq!(cases.len(), 18);
        let tier3_min = cases.iter().find(|c| c.id == "tier3_min").unwrap();
        assert_eq!(tier3_min.value_dec, "16512");
        assert_eq!(tier3_min.value_hex, "0x4080");
        assert_eq!(tier3_min.encoded_hex, "c00000");
    }

    #[test]
    fn test_signed_hex_carries_sign_outside_prefix() {
        let case = VarintSignedCase::from_value("int64_min", i64::MIN).unwrap();
        assert_eq!(case.value_hex, "-0x8000000000000000");
        assert_eq!(case.encoded_hex, "fffefdfbf7efdfbf7f");
    }

    #[test]
    fn test_typdex_case_renames_type_field() {
        let case = TypdexCase::from_tag("tier2_max", 0x3F, 0xFF).unwrap();
        assert_eq!(case.encoded_hex, "bfff");
    }

    #[test]
    fn test_string_case_counts_terminator() {
        let case = VarlenStringCase::from_text("empty", "").unwrap();
        assert_eq!(case.encoded_hex, "0100");
    }
}
