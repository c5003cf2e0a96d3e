//! # Primitive Data Type Catalog
//!
//! This module provides the canonical `DataType` enum for packrec: the closed
//! set of field kinds a schema may declare, together with their fixed byte
//! widths.
//!
//! ## Type Table
//!
//! | Code | Type | Width (bytes) |
//! |------|------|---------------|
//! | 0 | Int8 | 1 |
//! | 1 | UInt8 | 1 |
//! | 2 | Int16 | 2 |
//! | 3 | UInt16 | 2 |
//! | 4 | Int32 | 4 |
//! | 5 | UInt32 | 4 |
//! | 6 | Int64 | 8 |
//! | 7 | UInt64 | 8 |
//! | 8 | Float32 | 4 |
//! | 9 | Float64 | 8 |
//! | 10 | Char | 1 |
//! | 11 | Nest | sub-schema total size |
//!
//! ## Storage Encoding
//!
//! The `#[repr(u8)]` discriminant doubles as the type code written by the
//! schema descriptor codec, so the numbering above is part of the descriptor
//! format and must not be reordered.
//!
//! ## Usage
//!
//! ```ignore
//! use packrec::types::DataType;
//!
//! assert_eq!(DataType::Int64.fixed_size(), Some(8));
//! assert_eq!(DataType::Nest.fixed_size(), None);
//! ```

/// Field kind declared in a schema.
///
/// `Nest` is the only kind without a fixed width; its width is the total size
/// of the sub-schema referenced by the field descriptor.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8 = 0,
    UInt8 = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    Int64 = 6,
    UInt64 = 7,
    Float32 = 8,
    Float64 = 9,
    Char = 10,
    Nest = 11,
}

impl DataType {
    /// Returns the fixed byte width of one element, or None for `Nest`.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::UInt8 | DataType::Char => Some(1),
            DataType::Int16 | DataType::UInt16 => Some(2),
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => Some(4),
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => Some(8),
            DataType::Nest => None,
        }
    }

    /// Returns true for the composite `Nest` kind.
    pub fn is_nested(&self) -> bool {
        matches!(self, DataType::Nest)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::UInt8
                | DataType::Int16
                | DataType::UInt16
                | DataType::Int32
                | DataType::UInt32
                | DataType::Int64
                | DataType::UInt64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Stable numeric code used by the descriptor codec.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Char => "char",
            DataType::Nest => "nest",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for DataType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataType::Int8),
            1 => Ok(DataType::UInt8),
            2 => Ok(DataType::Int16),
            3 => Ok(DataType::UInt16),
            4 => Ok(DataType::Int32),
            5 => Ok(DataType::UInt32),
            6 => Ok(DataType::Int64),
            7 => Ok(DataType::UInt64),
            8 => Ok(DataType::Float32),
            9 => Ok(DataType::Float64),
            10 => Ok(DataType::Char),
            11 => Ok(DataType::Nest),
            _ => eyre::bail!("invalid DataType code: {}", value),
        }
    }
}

/// Byte order used to encode multi-byte numeric fields of a schema.
///
/// Little-endian is the default; big-endian is available
/// for peers that lay records out in network order.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little = 0,
    Big = 1,
}

impl Endian {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Endian {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Endian::Little),
            1 => Ok(Endian::Big),
            _ => eyre::bail!("invalid endian code: {}", value),
        }
    }
}
