//! Property tests for the varint, typdex and length-prefixed codecs.

use dybuf_core::codec::typdex::{decode_typdex, encode_typdex, Typdex, TYPDEX_INDEX_MAX};
use dybuf_core::codec::varint::{decode_varuint, varuint_len, BIAS};
use dybuf_core::DyBuf;
use proptest::prelude::*;

/// Tier predicted from the bias table alone.
fn predicted_tier(value: u64) -> usize {
    (1..BIAS.len()).find(|&k| value < BIAS[k]).unwrap_or(BIAS.len())
}

/// Values spread over every tier, not just the top one.
fn any_tiered_u64() -> impl Strategy<Value = u64> {
    (0u32..64).prop_flat_map(|bits| {
        let max = if bits == 63 { u64::MAX } else { (1u64 << (bits + 1)) - 1 };
        0..=max
    })
}

proptest! {
    #[test]
    fn prop_varuint_round_trips_with_predicted_length(value in any_tiered_u64()) {
        let mut buf = DyBuf::with_capacity(0).unwrap();
        buf.append_var_u64(value).unwrap();
        let bytes = buf.snapshot_written();

        prop_assert_eq!(bytes.len(), predicted_tier(value));
        prop_assert_eq!(bytes.len(), varuint_len(value));
        prop_assert_eq!(decode_varuint(bytes).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn prop_varint_signed_round_trips(value in any::<i64>()) {
        let mut buf = DyBuf::with_capacity(0).unwrap();
        buf.append_var_i64(value).unwrap();

        let mut reader = DyBuf::view(buf.snapshot_written());
        prop_assert_eq!(reader.next_var_i64().unwrap(), value);
        prop_assert_eq!(reader.remainder(), 0);
    }

    #[test]
    fn prop_small_magnitudes_stay_short(value in -64i64..64) {
        let mut buf = DyBuf::with_capacity(1).unwrap();
        buf.append_var_i64(value).unwrap();
        prop_assert_eq!(buf.position(), 1);
    }

    #[test]
    fn prop_typdex_round_trips_in_smallest_tier(type_code in any::<u8>(), index in 0..=TYPDEX_INDEX_MAX) {
        let tag = Typdex::new(type_code, index);
        let (bytes, len) = encode_typdex(tag).unwrap();

        let expected_len = if type_code <= 0x0F && index <= 7 {
            1
        } else if type_code <= 0x3F && index <= 0xFF {
            2
        } else if index <= 0x1FFF {
            3
        } else {
            4
        };
        prop_assert_eq!(len, expected_len);
        prop_assert_eq!(decode_typdex(&bytes[..len]).unwrap(), (tag, len));
    }

    #[test]
    fn prop_bytes_with_len_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut buf = DyBuf::with_capacity(0).unwrap();
        buf.append_bytes_with_len(&payload).unwrap();
        prop_assert_eq!(buf.position(), varuint_len(payload.len() as u64) + payload.len());

        let mut reader = DyBuf::view(buf.snapshot_written());
        prop_assert_eq!(reader.next_bytes_with_len().unwrap(), payload.as_slice());
        prop_assert_eq!(reader.remainder(), 0);
    }

    #[test]
    fn prop_strings_with_len_round_trip(text in "\\PC{0,64}") {
        let mut buf = DyBuf::with_capacity(0).unwrap();
        buf.append_str_with_len(&text).unwrap();

        let mut reader = DyBuf::view(buf.snapshot_written());
        prop_assert_eq!(reader.next_str_with_len().unwrap(), text.as_str());
        prop_assert_eq!(reader.remainder(), 0);
    }
}
