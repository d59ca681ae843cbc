//! Field type codes and decoded field values.

// ── Field type codes ──────────────────────────────────────────────────────────

/// Type code carried in the typdex tag of every packet field.
///
/// All built-in codes fit in four bits, so a field with an index below 8 costs
/// a single tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldType {
    /// End of packet; carries no value.
    Eof = 0x0,
    Bool = 0x1,
    Int = 0x2,
    Uint = 0x3,
    Float = 0x4,
    Double = 0x5,
    String = 0x6,
    Bytes = 0x7,
    /// Reserved; not decoded by this crate.
    Array = 0x8,
    /// Reserved; not decoded by this crate.
    Map = 0x9,
    /// Packet format version; value is an unsigned varint.
    Version = 0xF,
}

impl FieldType {
    /// Returns `true` for codes reserved for container types.
    pub fn is_reserved(self) -> bool {
        matches!(self, FieldType::Array | FieldType::Map)
    }
}

impl TryFrom<u8> for FieldType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x0 => Ok(FieldType::Eof),
            0x1 => Ok(FieldType::Bool),
            0x2 => Ok(FieldType::Int),
            0x3 => Ok(FieldType::Uint),
            0x4 => Ok(FieldType::Float),
            0x5 => Ok(FieldType::Double),
            0x6 => Ok(FieldType::String),
            0x7 => Ok(FieldType::Bytes),
            0x8 => Ok(FieldType::Array),
            0x9 => Ok(FieldType::Map),
            0xF => Ok(FieldType::Version),
            _ => Err(()),
        }
    }
}

// ── Decoded values ────────────────────────────────────────────────────────────

/// One decoded packet field.  Text and bytes borrow from the packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Eof,
    Version(u64),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f32),
    Double(f64),
    String(&'a str),
    Bytes(&'a [u8]),
}

impl Field<'_> {
    /// Type code this value is tagged with on the wire.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Eof => FieldType::Eof,
            Field::Version(_) => FieldType::Version,
            Field::Bool(_) => FieldType::Bool,
            Field::Int(_) => FieldType::Int,
            Field::Uint(_) => FieldType::Uint,
            Field::Float(_) => FieldType::Float,
            Field::Double(_) => FieldType::Double,
            Field::String(_) => FieldType::String,
            Field::Bytes(_) => FieldType::Bytes,
        }
    }
}
