//! Fixture checkers.  Each returns the number of cases checked, or the first
//! failure.

use tracing::debug;

use crate::buffer::DyBuf;
use crate::codec::typdex::{decode_typdex, encode_typdex, Typdex};
use crate::conformance::cases::{
    TypdexCase, VarintSignedCase, VarintUnsignedCase, VarlenBytesCase, VarlenStringCase,
};
use crate::conformance::ConformanceError;
use crate::error::DyBufError;

type CheckResult<T> = std::result::Result<T, ConformanceError>;

pub fn check_varint_unsigned(cases: &[VarintUnsignedCase]) -> CheckResult<usize> {
    for case in cases {
        let id = case.id.as_str();
        let value: u64 = parse_value(id, "value_dec", &case.value_dec, |s| s.parse().ok())?;
        let from_hex = parse_value(id, "value_hex", &case.value_hex, |s| {
            u64::from_str_radix(s.strip_prefix("0x")?, 16).ok()
        })?;
        if from_hex != value {
            return Err(invalid(id, "value_hex", &case.value_hex));
        }

        let encoded = decode_hex(id, &case.encoded_hex)?;
        let mut reader = DyBuf::view(&encoded);
        let decoded = reader.next_var_u64().map_err(|e| decode_err(id, e))?;
        expect_value(id, value, decoded)?;
        expect_consumed(id, &reader)?;

        let mut writer = DyBuf::with_capacity(encoded.len()).map_err(|e| encode_err(id, e))?;
        writer.append_var_u64(value).map_err(|e| encode_err(id, e))?;
        expect_encoding(id, &encoded, writer.snapshot_written())?;
    }
    debug!(cases = cases.len(), "unsigned varint fixtures pass");
    Ok(cases.len())
}

pub fn check_varint_signed(cases: &[VarintSignedCase]) -> CheckResult<usize> {
    for case in cases {
        let id = case.id.as_str();
        let value: i64 = parse_value(id, "value_dec", &case.value_dec, |s| s.parse().ok())?;
        let from_hex = parse_value(id, "value_hex", &case.value_hex, parse_signed_hex)?;
        if from_hex != value {
            return Err(invalid(id, "value_hex", &case.value_hex));
        }

        let encoded = decode_hex(id, &case.encoded_hex)?;
        let mut reader = DyBuf::view(&encoded);
        let decoded = reader.next_var_i64().map_err(|e| decode_err(id, e))?;
        expect_value(id, value, decoded)?;
        expect_consumed(id, &reader)?;

        let mut writer = DyBuf::with_capacity(encoded.len()).map_err(|e| encode_err(id, e))?;
        writer.append_var_i64(value).map_err(|e| encode_err(id, e))?;
        expect_encoding(id, &encoded, writer.snapshot_written())?;
    }
    debug!(cases = cases.len(), "signed varint fixtures pass");
    Ok(cases.len())
}

pub fn check_typdex(cases: &[TypdexCase]) -> CheckResult<usize> {
    for case in cases {
        let id = case.id.as_str();
        let expected = Typdex::new(case.type_code, case.index);

        let encoded = decode_hex(id, &case.encoded_hex)?;
        let (decoded, consumed) = decode_typdex(&encoded).map_err(|e| decode_err(id, e))?;
        expect_value(id, format!("{expected:?}"), format!("{decoded:?}"))?;
        if consumed != encoded.len() {
            return Err(ConformanceError::TrailingBytes {
                id: id.to_string(),
                consumed,
                len: encoded.len(),
            });
        }

        let (bytes, len) = encode_typdex(expected).map_err(|e| encode_err(id, e))?;
        expect_encoding(id, &encoded, &bytes[..len])?;
    }
    debug!(cases = cases.len(), "typdex fixtures pass");
    Ok(cases.len())
}

pub fn check_varlen_bytes(cases: &[VarlenBytesCase]) -> CheckResult<usize> {
    for case in cases {
        let id = case.id.as_str();
        let payload = decode_hex(id, &case.payload_hex)?;
        if payload.len() != case.payload_length {
            return Err(invalid(id, "payload_length", &case.payload_length.to_string()));
        }

        let encoded = decode_hex(id, &case.encoded_hex)?;
        let mut reader = DyBuf::view(&encoded);
        let decoded = reader.next_bytes_with_len().map_err(|e| decode_err(id, e))?;
        expect_value(id, hex::encode(&payload), hex::encode(decoded))?;
        expect_consumed(id, &reader)?;

        let mut writer = DyBuf::with_capacity(encoded.len()).map_err(|e| encode_err(id, e))?;
        writer.append_bytes_with_len(&payload).map_err(|e| encode_err(id, e))?;
        expect_encoding(id, &encoded, writer.snapshot_written())?;
    }
    debug!(cases = cases.len(), "length-prefixed bytes fixtures pass");
    Ok(cases.len())
}

pub fn check_varlen_strings(cases: &[VarlenStringCase]) -> CheckResult<usize> {
    for case in cases {
        let id = case.id.as_str();
        let encoded = decode_hex(id, &case.encoded_hex)?;
        let mut reader = DyBuf::view(&encoded);
        let decoded = reader.next_str_with_len().map_err(|e| decode_err(id, e))?;
        expect_value(id, case.utf8.as_str(), decoded)?;
        expect_consumed(id, &reader)?;

        let mut writer = DyBuf::with_capacity(encoded.len()).map_err(|e| encode_err(id, e))?;
        writer.append_str_with_len(&case.utf8).map_err(|e| encode_err(id, e))?;
        expect_encoding(id, &encoded, writer.snapshot_written())?;
    }
    debug!(cases = cases.len(), "length-prefixed string fixtures pass");
    Ok(cases.len())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_value<T>(
    id: &str,
    field: &'static str,
    text: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> CheckResult<T> {
    parse(text).ok_or_else(|| invalid(id, field, text))
}

/// Parses `0x..` / `-0x..`, including `-0x8000000000000000`.
fn parse_signed_hex(text: &str) -> Option<i64> {
    match text.strip_prefix('-') {
        Some(magnitude) => {
            let m = u64::from_str_radix(magnitude.strip_prefix("0x")?, 16).ok()?;
            0i64.checked_sub_unsigned(m)
        }
        None => i64::from_str_radix(text.strip_prefix("0x")?, 16).ok(),
    }
}

fn decode_hex(id: &str, text: &str) -> CheckResult<Vec<u8>> {
    hex::decode(text).map_err(|source| ConformanceError::InvalidHex {
        id: id.to_string(),
        source,
    })
}

fn invalid(id: &str, field: &'static str, value: &str) -> ConformanceError {
    ConformanceError::InvalidValue {
        id: id.to_string(),
        field,
        value: value.to_string(),
    }
}

fn decode_err(id: &str, source: DyBufError) -> ConformanceError {
    ConformanceError::Decode {
        id: id.to_string(),
        source,
    }
}

fn encode_err(id: &str, source: DyBufError) -> ConformanceError {
    ConformanceError::Encode {
        id: id.to_string(),
        source,
    }
}

fn expect_value<T: PartialEq + ToString>(id: &str, expected: T, actual: T) -> CheckResult<()> {
    if expected == actual {
        return Ok(());
    }
    Err(ConformanceError::ValueMismatch {
        id: id.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

fn expect_consumed(id: &str, reader: &DyBuf<'_>) -> CheckResult<()> {
    if reader.remainder() == 0 {
        return Ok(());
    }
    Err(ConformanceError::TrailingBytes {
        id: id.to_string(),
        consumed: reader.position(),
        len: reader.extent(),
    })
}

fn expect_encoding(id: &str, expected: &[u8], actual: &[u8]) -> CheckResult<()> {
    if expected == actual {
        return Ok(());
    }
    Err(ConformanceError::EncodingMismatch {
        id: id.to_string(),
        expected: hex::encode(expected),
        actual: hex::encode(actual),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::cases::{canonical_typdex, canonical_varint_signed};

    #[test]
    fn test_signed_hex_parses_both_signs_and_min() {
        assert_eq!(parse_signed_hex("0x7fffffffffffffff"), Some(i64::MAX));
        assert_eq!(parse_signed_hex("-0x1"), Some(-1));
        assert_eq!(parse_signed_hex("-0x8000000000000000"), Some(i64::MIN));
        assert_eq!(parse_signed_hex("12"), None);
    }

    #[test]
    fn test_canonical_tables_pass_their_own_checks() {
        assert_eq!(check_varint_signed(&canonical_varint_signed().unwrap()), Ok(7));
        assert_eq!(check_typdex(&canonical_typdex().unwrap()), Ok(8));
    }

    #[test]
    fn test_wrong_encoding_reports_case_id() {
        // Arrange – 128 is two bytes, this claims a three-byte form.
        let cases = vec![VarintUnsignedCase {
            id: "bad".to_string(),
            value_dec: "128".to_string(),
            value_hex: "0x80".to_string(),
            encoded_hex: "c00000".to_string(),
        }];

        // Act
        let err = check_varint_unsigned(&cases).unwrap_err();

        // Assert
        assert_eq!(err.case_id(), "bad");
        assert!(matches!(err, ConformanceError::ValueMismatch { .. }));
    }

    #[test]
    fn test_trailing_bytes_are_reported() {
        let cases = vec![VarlenBytesCase {
            id: "extra".to_string(),
            payload_hex: "11".to_string(),
            payload_length: 1,
            encoded_hex: "011100".to_string(),
        }];
        assert_eq!(
            check_varlen_bytes(&cases),
            Err(ConformanceError::TrailingBytes {
                id: "extra".to_string(),
                consumed: 2,
                len: 3,
            })
        );
    }

    #[test]
    fn test_bad_hex_is_reported() {
        let cases = vec![VarlenStringCase {
            id: "oops".to_string(),
            utf8: String::new(),
            encoded_hex: "0g".to_string(),
        }];
        assert!(matches!(
            check_varlen_strings(&cases),
            Err(ConformanceError::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_mismatched_hex_and_decimal_values_are_rejected() {
        let cases = vec![VarintUnsignedCase {
            id: "disagree".to_string(),
            value_dec: "1".to_string(),
            value_hex: "0x2".to_string(),
            encoded_hex: "01".to_string(),
        }];
        assert!(matches!(
            check_varint_unsigned(&cases),
            Err(ConformanceError::InvalidValue { field: "value_hex", .. })
        ));
    }
}
