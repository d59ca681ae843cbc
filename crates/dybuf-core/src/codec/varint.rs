//! Tiered variable-length integers.
//!
//! The first byte of an encoded value opens with a unary tier marker: `k - 1`
//! set bits followed by a clear bit announce a `k`-byte group.  The `7k` bits
//! left after the marker hold `value - BIAS[k - 1]`, most significant bit
//! first.  The bias makes the tiers disjoint, so every value has exactly one
//! encoding.
//!
//! ```text
//!  tier  first byte   bytes  range
//!   1    0xxxxxxx      1     0 ..= 0x7F
//!   2    10xxxxxx      2     0x80 ..= 0x407F
//!   3    110xxxxx      3     0x4080 ..= 0x20_407F
//!   ...
//!   8    11111110      8     0x02_0408_1020_4080 ..= 0x0102_0408_1020_407F
//!   9    11111111      9     0x0102_0408_1020_4080 ..= u64::MAX
//! ```
//!
//! The ninth tier is an escape: a full 8-byte payload follows the `0xFF`
//! marker.  Signed integers are zigzag-folded onto the unsigned scheme so that
//! small magnitudes of either sign stay short.
//!
//! # Examples
//!
//! ```rust
//! use dybuf_core::codec::varint::{decode_varuint, varuint_len};
//!
//! assert_eq!(varuint_len(127), 1);
//! assert_eq!(varuint_len(128), 2);
//! assert_eq!(decode_varuint(&[0x80, 0x00]).unwrap(), (128, 2));
//! ```

use tracing::trace;

use crate::buffer::DyBuf;
use crate::error::{DyBufError, Result};

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 9;

/// Offset subtracted from a value before it is packed into tier `k` (index
/// `k - 1`).  `BIAS[k] = BIAS[k - 1] + 2^(7k)`.
pub const BIAS: [u64; MAX_VARINT_LEN] = [
    0,
    0x80,
    0x4080,
    0x20_4080,
    0x1020_4080,
    0x08_1020_4080,
    0x0408_1020_4080,
    0x02_0408_1020_4080,
    0x0102_0408_1020_4080,
];

/// First-byte marker bits of each tier.
const MARKER: [u8; MAX_VARINT_LEN] = [0x00, 0x80, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE, 0xFF];

// ── Pure functions ────────────────────────────────────────────────────────────

/// Number of bytes `value` occupies once encoded (1..=9).
pub fn varuint_len(value: u64) -> usize {
    BIAS[1..]
        .iter()
        .position(|&next_bias| value < next_bias)
        .map_or(MAX_VARINT_LEN, |tier| tier + 1)
}

/// Writes the encoding of `value` into `out`.
///
/// `out.len()` must equal [`varuint_len`]`(value)`.
pub fn encode_varuint_into(value: u64, out: &mut [u8]) {
    let len = out.len();
    debug_assert_eq!(len, varuint_len(value));

    if len == MAX_VARINT_LEN {
        out[0] = MARKER[MAX_VARINT_LEN - 1];
        out[1..].copy_from_slice(&(value - BIAS[MAX_VARINT_LEN - 1]).to_be_bytes());
        return;
    }

    // The payload is 7*len bits wide, so the top `len` bits of the group are
    // free for the marker.
    let payload = (value - BIAS[len - 1]).to_be_bytes();
    out.copy_from_slice(&payload[payload.len() - len..]);
    out[0] |= MARKER[len - 1];
}

/// Decodes one unsigned varint from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// - [`DyBufError::UnexpectedEnd`] if `bytes` holds less than the group the
///   marker announces.
/// - [`DyBufError::VarintOverflow`] if a 9-byte payload plus its bias exceeds
///   `u64::MAX`.
pub fn decode_varuint(bytes: &[u8]) -> Result<(u64, usize)> {
    let first = *bytes
        .first()
        .ok_or(DyBufError::UnexpectedEnd { needed: 1, remainder: 0 })?;
    let len = first.leading_ones() as usize + 1;
    let group = bytes.get(..len).ok_or(DyBufError::UnexpectedEnd {
        needed: len,
        remainder: bytes.len(),
    })?;

    let mut raw = [0u8; 8];
    if len == MAX_VARINT_LEN {
        raw.copy_from_slice(&group[1..]);
        let value = u64::from_be_bytes(raw)
            .checked_add(BIAS[MAX_VARINT_LEN - 1])
            .ok_or_else(|| {
                trace!(group = ?group, "varint payload overflows u64");
                DyBufError::VarintOverflow
            })?;
        return Ok((value, len));
    }

    let start = raw.len() - len;
    raw[start..].copy_from_slice(group);
    raw[start] &= !MARKER[len - 1];
    Ok((u64::from_be_bytes(raw) + BIAS[len - 1], len))
}

/// Folds a signed value so small magnitudes map to small unsigned values:
/// `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

// ── Buffer operations ─────────────────────────────────────────────────────────

impl DyBuf<'_> {
    /// Appends `value` as an unsigned varint.
    ///
    /// # Errors
    ///
    /// Fails only if the buffer cannot make room (see [`DyBuf::reserve`]).
    pub fn append_var_u64(&mut self, value: u64) -> Result<&mut Self> {
        let len = varuint_len(value);
        encode_varuint_into(value, self.write_slot(len)?);
        Ok(self)
    }

    /// Appends `value` as a zigzag-folded signed varint.
    pub fn append_var_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.append_var_u64(zigzag_encode(value))
    }

    /// Decodes the unsigned varint at the cursor without advancing.
    pub fn peek_var_u64(&self) -> Result<u64> {
        decode_varuint(self.unread()).map(|(value, _)| value)
    }

    /// Decodes the unsigned varint at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// See [`decode_varuint`].  The cursor does not move on error.
    pub fn next_var_u64(&mut self) -> Result<u64> {
        let (value, consumed) = decode_varuint(self.unread())?;
        self.advance(consumed)?;
        Ok(value)
    }

    pub fn peek_var_i64(&self) -> Result<i64> {
        self.peek_var_u64().map(zigzag_decode)
    }

    pub fn next_var_i64(&mut self) -> Result<i64> {
        self.next_var_u64().map(zigzag_decode)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = DyBuf::with_capacity(MAX_VARINT_LEN).unwrap();
        buf.append_var_u64(value).unwrap();
        buf.into_vec()
    }

    #[test]
    fn test_bias_table_follows_recurrence() {
        for k in 1..MAX_VARINT_LEN {
            assert_eq!(BIAS[k], BIAS[k - 1] + (1u64 << (7 * k)), "tier {}", k + 1);
        }
    }

    #[test]
    fn test_tier_boundaries_are_exact() {
        // Every tier's first value and the value just below it.
        for k in 1..MAX_VARINT_LEN {
            assert_eq!(varuint_len(BIAS[k] - 1), k, "last value of tier {k}");
            assert_eq!(varuint_len(BIAS[k]), k + 1, "first value of tier {}", k + 1);
        }
        assert_eq!(varuint_len(0), 1);
        assert_eq!(varuint_len(u64::MAX), 9);
    }

    #[test]
    fn test_tier2_tier3_boundary_16511_and_16512() {
        assert_eq!(encode(16_511), vec![0xBF, 0xFF]);
        assert_eq!(encode(16_512), vec![0xC0, 0x00, 0x00]);
    }

    #[test]
    fn test_first_byte_carries_tier_marker() {
        for (k, marker) in MARKER.iter().enumerate() {
            let bytes = encode(BIAS[k]);
            assert_eq!(bytes.len(), k + 1);
            assert_eq!(bytes[0], *marker, "tier {} first value", k + 1);
        }
    }

    #[test]
    fn test_u64_max_uses_escape_tier() {
        assert_eq!(
            encode(u64::MAX),
            vec![0xFF, 0xFE, 0xFD, 0xFB, 0xF7, 0xEF, 0xDF, 0xBF, 0x7F]
        );
    }

    #[test]
    fn test_decode_reports_consumed_length() {
        let bytes = [0xC0, 0x00, 0x00, 0xAA];
        assert_eq!(decode_varuint(&bytes).unwrap(), (16_512, 3));
    }

    #[test]
    fn test_decode_truncated_group_fails() {
        assert_eq!(
            decode_varuint(&[0xE0, 0x00]),
            Err(DyBufError::UnexpectedEnd { needed: 4, remainder: 2 })
        );
        assert_eq!(
            decode_varuint(&[]),
            Err(DyBufError::UnexpectedEnd { needed: 1, remainder: 0 })
        );
    }

    #[test]
    fn test_decode_escape_tier_overflow_is_rejected() {
        // One past the largest valid 9-byte payload.
        let bytes = [0xFF, 0xFE, 0xFD, 0xFB, 0xF7, 0xEF, 0xDF, 0xBF, 0x80];
        assert_eq!(decode_varuint(&bytes), Err(DyBufError::VarintOverflow));
    }

    #[test]
    fn test_zigzag_maps_small_magnitudes_to_small_codes() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn test_zigzag_decode_inverts_encode_at_extremes() {
        for v in [0, 1, -1, 63, -64, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }

    #[test]
    fn test_signed_minus_one_is_single_byte() {
        let mut buf = DyBuf::with_capacity(1).unwrap();
        buf.append_var_i64(-1).unwrap();
        assert_eq!(buf.snapshot_written(), &[0x01]);
    }

    #[test]
    fn test_next_var_u64_advances_and_peek_does_not() {
        // Arrange
        let mut buf = DyBuf::with_capacity(0).unwrap();
        buf.append_var_u64(300).unwrap().append_var_i64(-5).unwrap();
        let mut reader = DyBuf::view(buf.snapshot_written());

        // Act / Assert
        assert_eq!(reader.peek_var_u64().unwrap(), 300);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.next_var_u64().unwrap(), 300);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.next_var_i64().unwrap(), -5);
        assert_eq!(reader.remainder(), 0);
    }

    #[test]
    fn test_failed_varint_append_leaves_position() {
        let mut backing = [0u8; 2];
        let mut buf = DyBuf::borrowed(&mut backing);
        buf.append_var_u64(1).unwrap();

        let result = buf.append_var_u64(16_512);

        assert!(matches!(result, Err(DyBufError::CapacityExhausted { needed: 3, .. })));
        assert_eq!(buf.position(), 1);
    }
}
