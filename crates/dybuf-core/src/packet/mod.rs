//! Self-describing packets built from typdex-tagged fields.
//!
//! ```text
//! [tag(Version, 0)][varuint version]
//! [tag(type, index)][value] ...
//! [tag(Eof, 0)]
//! ```
//!
//! A packet has no field count; readers stop at `Eof`.  Writing and reading
//! are separate types ([`PacketWriter`] and [`PacketReader`]), so a packet
//! cannot be appended to while it is being decoded.
//!
//! # Value encodings
//!
//! | type | value |
//! |---|---|
//! | `Bool` | 1 byte, non-zero is true |
//! | `Int` | zigzag varint |
//! | `Uint` / `Version` | varint |
//! | `Float` / `Double` | IEEE-754, big-endian, 4 / 8 bytes |
//! | `String` | varuint(len + 1), UTF-8, `0x00` |
//! | `Bytes` | varuint(len), raw bytes |
//! | `Eof` | nothing |

pub mod field;
pub mod reader;
pub mod writer;

pub use field::{Field, FieldType};
pub use reader::{decode_field, PacketReader};
pub use writer::PacketWriter;
