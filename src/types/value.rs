//! # Field Values
//!
//! This module provides `Value`, the closed tagged variant exchanged with the
//! field accessor. There is exactly one variant per [`DataType`], so a value's
//! kind can be checked against a field's declared type without any implicit
//! widening or narrowing.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | DataType |
//! |---------|-----------|----------|
//! | Int8 | i8 | Int8 |
//! | UInt8 | u8 | UInt8 |
//! | Int16 | i16 | Int16 |
//! | UInt16 | u16 | UInt16 |
//! | Int32 | i32 | Int32 |
//! | UInt32 | u32 | UInt32 |
//! | Int64 | i64 | Int64 |
//! | UInt64 | u64 | UInt64 |
//! | Float32 | f32 | Float32 |
//! | Float64 | f64 | Float64 |
//! | Char | u8 | Char |
//! | Nest | Vec<u8> | Nest (raw bytes of one nested element) |
//!
//! ## Typed Access
//!
//! The [`Primitive`] trait maps native Rust numbers onto their variant so
//! callers can write `instance.set(0, 1.5f32)` instead of building a `Value`
//! by hand. `Char` has no native mapping (`u8` already means `UInt8`); use
//! `Value::Char` for it.

use super::DataType;

/// A single element value of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Char(u8),
    Nest(Vec<u8>),
}

impl Value {
    /// Returns the DataType this value encodes as.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int8(_) => DataType::Int8,
            Value::UInt8(_) => DataType::UInt8,
            Value::Int16(_) => DataType::Int16,
            Value::UInt16(_) => DataType::UInt16,
            Value::Int32(_) => DataType::Int32,
            Value::UInt32(_) => DataType::UInt32,
            Value::Int64(_) => DataType::Int64,
            Value::UInt64(_) => DataType::UInt64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::Char(_) => DataType::Char,
            Value::Nest(_) => DataType::Nest,
        }
    }

    /// Returns the nested element bytes if this is a `Nest` value.
    pub fn as_nested(&self) -> Option<&[u8]> {
        match self {
            Value::Nest(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Native Rust types with a one-to-one `Value` variant.
pub trait Primitive: Copy + Sized {
    const DATA_TYPE: DataType;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_primitive! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}
