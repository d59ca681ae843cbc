//! Wire codecs layered on [`crate::DyBuf`].
//!
//! Each submodule exposes pure functions over byte slices (`decode_*`,
//! `encode_*`) and extends `DyBuf` with `append_*` / `peek_*` / `next_*`
//! methods built on them.  All multi-byte values are big-endian.
//!
//! - [`fixed`]: fixed-width integers.
//! - [`varint`]: tiered unsigned and zigzag signed varints.
//! - [`typdex`]: combined (type, index) tags.
//! - [`varlen`]: length-prefixed bytes and text.

pub mod fixed;
pub mod typdex;
pub mod varint;
pub mod varlen;

pub use typdex::{decode_typdex, encode_typdex, Typdex, TYPDEX_INDEX_MAX};
pub use varint::{decode_varuint, varuint_len, zigzag_decode, zigzag_encode, MAX_VARINT_LEN};
pub use varlen::decode_len_prefixed;
