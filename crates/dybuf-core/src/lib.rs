//! # dybuf-core
//!
//! Compact big-endian binary serialization:
//!
//! - [`buffer`]: [`DyBuf`], a byte buffer with one cursor whose storage is
//!   owned, cloned, adopted, borrowed or a read-only view.
//! - [`codec`]: fixed-width integers, tiered varints, typdex tags and
//!   length-prefixed payloads, as `append_*` / `peek_*` / `next_*` methods on
//!   `DyBuf` plus pure slice functions.
//! - [`packet`]: self-describing `(tag, value)*` packets with a version
//!   marker and an end-of-packet marker.
//! - [`conformance`]: the cross-implementation fixture cases and checkers.
//!
//! # Quick start
//!
//! ```rust
//! use dybuf_core::DyBuf;
//!
//! let mut buf = DyBuf::with_capacity(16).unwrap();
//! buf.append_var_u64(16_512).unwrap().append_str_with_len("hi").unwrap();
//! assert_eq!(buf.snapshot_written(), &[0xC0, 0x00, 0x00, 0x03, b'h', b'i', 0x00]);
//!
//! let mut reader = DyBuf::view(buf.snapshot_written());
//! assert_eq!(reader.next_var_u64().unwrap(), 16_512);
//! assert_eq!(reader.next_str_with_len().unwrap(), "hi");
//! assert_eq!(reader.remainder(), 0);
//! ```

pub mod buffer;
pub mod codec;
pub mod conformance;
pub mod error;
pub mod packet;

pub use buffer::{DyBuf, Ownership};
pub use codec::Typdex;
pub use error::{DyBufError, Result};
pub use packet::{Field, FieldType, PacketReader, PacketWriter};
