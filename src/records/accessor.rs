//! # Field Accessor
//!
//! Typed, ordinal-addressed reads and writes over a schema-shaped buffer.
//! The same surface is shared by every buffer holder through two traits:
//!
//! | Trait | Implemented by | Provides |
//! |-------|----------------|----------|
//! | [`FieldRead`] | `Instance`, `InstanceView`, `InstanceMut` | `get_*`, `field_bytes`, `nested` |
//! | [`FieldWrite`] | `Instance`, `InstanceMut` | `set_*`, `nested_mut` |
//!
//! ## Addressing
//!
//! ```text
//! element e of field i  =  [offset_i + e * width_i, offset_i + (e + 1) * width_i)
//! ```
//!
//! `get_value`/`set_value` address element 0, which for a `count == 1` field
//! is the whole field. Array fields use `get_element`/`set_element` or the
//! whole-field `get_array`/`set_array`.
//!
//! ## Write Guarantees
//!
//! - The value's kind must equal the field's DataType exactly; there is no
//!   widening (`Int8` into `Int16`) or reinterpretation (`UInt8` into `Char`).
//! - Every check happens before the first byte is written, so a failed write
//!   leaves the buffer unchanged.
//! - A successful write touches only the targeted element (or field) range.
//!
//! ## Encoding
//!
//! Multi-byte numbers use the schema's [`Endian`] (little by default).
//! Floats are stored as their IEEE-754 bit pattern, so reads are
//! bit-identical to what was written. `Nest` values are copied verbatim.

use std::ops::Range;

use eyre::{bail, Result};

use crate::records::error::LayoutError;
use crate::records::schema::{FieldDescriptor, Schema};
use crate::records::view::{InstanceMut, InstanceView};
use crate::types::{DataType, Endian, Primitive, Value};

macro_rules! encode_num {
    ($value:expr, $endian:expr) => {
        match $endian {
            Endian::Little => $value.to_le_bytes(),
            Endian::Big => $value.to_be_bytes(),
        }
    };
}

macro_rules! decode_num {
    ($ty:ty, $bytes:expr, $endian:expr) => {{
        let raw: [u8; std::mem::size_of::<$ty>()] = $bytes
            .try_into()
            .map_err(|_| eyre::eyre!("insufficient data for {}", stringify!($ty)))?;
        match $endian {
            Endian::Little => <$ty>::from_le_bytes(raw),
            Endian::Big => <$ty>::from_be_bytes(raw),
        }
    }};
}

/// Writes `value` into `dst`. `dst` must be exactly one element wide and the
/// value must already have passed `check_value`.
fn encode(value: &Value, endian: Endian, dst: &mut [u8]) {
    match value {
        Value::Int8(v) => dst.copy_from_slice(&v.to_le_bytes()),
        Value::UInt8(v) | Value::Char(v) => dst.copy_from_slice(&[*v]),
        Value::Int16(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::UInt16(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::Int32(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::UInt32(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::Int64(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::UInt64(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::Float32(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::Float64(v) => dst.copy_from_slice(&encode_num!(v, endian)),
        Value::Nest(bytes) => dst.copy_from_slice(bytes),
    }
}

fn decode(data_type: DataType, endian: Endian, bytes: &[u8]) -> Result<Value> {
    Ok(match data_type {
        DataType::Int8 => Value::Int8(decode_num!(i8, bytes, endian)),
        DataType::UInt8 => Value::UInt8(decode_num!(u8, bytes, endian)),
        DataType::Char => Value::Char(decode_num!(u8, bytes, endian)),
        DataType::Int16 => Value::Int16(decode_num!(i16, bytes, endian)),
        DataType::UInt16 => Value::UInt16(decode_num!(u16, bytes, endian)),
        DataType::Int32 => Value::Int32(decode_num!(i32, bytes, endian)),
        DataType::UInt32 => Value::UInt32(decode_num!(u32, bytes, endian)),
        DataType::Int64 => Value::Int64(decode_num!(i64, bytes, endian)),
        DataType::UInt64 => Value::UInt64(decode_num!(u64, bytes, endian)),
        DataType::Float32 => Value::Float32(decode_num!(f32, bytes, endian)),
        DataType::Float64 => Value::Float64(decode_num!(f64, bytes, endian)),
        DataType::Nest => Value::Nest(bytes.to_vec()),
    })
}

fn locate(schema: &Schema, ordinal: usize, element: usize) -> Result<(&FieldDescriptor, Range<usize>)> {
    let field = schema.field(ordinal)?;
    if element >= field.count() {
        bail!(LayoutError::ElementOutOfRange {
            ordinal,
            element,
            count: field.count(),
        });
    }
    Ok((field, field.placement().element_range(element)))
}

fn check_type(field: &FieldDescriptor, ordinal: usize, actual: DataType) -> Result<()> {
    if field.data_type() != actual {
        bail!(LayoutError::TypeMismatch {
            ordinal,
            expected: field.data_type(),
            actual,
        });
    }
    Ok(())
}

fn check_value(field: &FieldDescriptor, ordinal: usize, value: &Value) -> Result<()> {
    check_type(field, ordinal, value.data_type())?;
    if let Value::Nest(bytes) = value {
        if bytes.len() != field.element_width() {
            bail!(LayoutError::SizeMismatch {
                expected: field.element_width(),
                actual: bytes.len(),
            });
        }
    }
    Ok(())
}

fn nested_schema(field: &FieldDescriptor, ordinal: usize) -> Result<&Schema> {
    match field.nested() {
        Some(sub) => Ok(sub),
        None => bail!(LayoutError::TypeMismatch {
            ordinal,
            expected: field.data_type(),
            actual: DataType::Nest,
        }),
    }
}

pub(crate) fn read_element(
    schema: &Schema,
    data: &[u8],
    ordinal: usize,
    element: usize,
) -> Result<Value> {
    let (field, range) = locate(schema, ordinal, element)?;
    decode(field.data_type(), schema.endian(), &data[range])
}

pub(crate) fn write_element(
    schema: &Schema,
    data: &mut [u8],
    ordinal: usize,
    element: usize,
    value: &Value,
) -> Result<()> {
    let (field, range) = locate(schema, ordinal, element)?;
    check_value(field, ordinal, value)?;
    encode(value, schema.endian(), &mut data[range]);
    Ok(())
}

pub(crate) fn write_field(
    schema: &Schema,
    data: &mut [u8],
    ordinal: usize,
    values: &[Value],
) -> Result<()> {
    let field = schema.field(ordinal)?;
    if values.len() != field.count() {
        bail!(LayoutError::CountMismatch {
            ordinal,
            expected: field.count(),
            actual: values.len(),
        });
    }
    for value in values {
        check_value(field, ordinal, value)?;
    }

    let placement = field.placement();
    for (element, value) in values.iter().enumerate() {
        encode(value, schema.endian(), &mut data[placement.element_range(element)]);
    }
    Ok(())
}

pub(crate) mod sealed {
    /// Implemented only by buffer holders whose length is checked against
    /// the schema on construction.
    pub trait Sealed {}
}

/// Read access to a schema-shaped buffer.
///
/// Sealed: every implementor guarantees `as_bytes().len() ==
/// schema().total_size()`, which the provided methods rely on when slicing.
/// Buffers of unchecked length go through `InstanceView::new` instead.
///
/// ```compile_fail
/// use packrec::{FieldRead, Schema};
///
/// struct Unchecked(Vec<u8>, Schema);
///
/// impl FieldRead for Unchecked {
///     fn schema(&self) -> &Schema {
///         &self.1
///     }
///
///     fn as_bytes(&self) -> &[u8] {
///         &self.0
///     }
/// }
/// ```
pub trait FieldRead: sealed::Sealed {
    fn schema(&self) -> &Schema;

    /// The whole buffer; always exactly `schema().total_size()` bytes.
    fn as_bytes(&self) -> &[u8];

    /// Raw bytes of field `ordinal`, all elements included.
    fn field_bytes(&self, ordinal: usize) -> Result<&[u8]> {
        let field = self.schema().field(ordinal)?;
        Ok(&self.as_bytes()[field.placement().range()])
    }

    fn get_value(&self, ordinal: usize) -> Result<Value> {
        self.get_element(ordinal, 0)
    }

    fn get_element(&self, ordinal: usize, element: usize) -> Result<Value> {
        read_element(self.schema(), self.as_bytes(), ordinal, element)
    }

    /// Decodes every element of field `ordinal`.
    fn get_array(&self, ordinal: usize) -> Result<Vec<Value>> {
        let schema = self.schema();
        let field = schema.field(ordinal)?;
        let data = self.as_bytes();
        let placement = field.placement();
        (0..field.count())
            .map(|element| {
                decode(
                    field.data_type(),
                    schema.endian(),
                    &data[placement.element_range(element)],
                )
            })
            .collect()
    }

    fn get<T: Primitive>(&self, ordinal: usize) -> Result<T> {
        self.get_element_as(ordinal, 0)
    }

    fn get_element_as<T: Primitive>(&self, ordinal: usize, element: usize) -> Result<T> {
        check_type(self.schema().field(ordinal)?, ordinal, T::DATA_TYPE)?;
        let value = self.get_element(ordinal, element)?;
        T::from_value(value).ok_or_else(|| {
            eyre::eyre!("field {} decoded to an unexpected variant", ordinal)
        })
    }

    /// Bytes of a `Char` field, including any trailing zero padding.
    fn get_chars(&self, ordinal: usize) -> Result<&[u8]> {
        check_type(self.schema().field(ordinal)?, ordinal, DataType::Char)?;
        self.field_bytes(ordinal)
    }

    /// Read-only view of one element of a `Nest` field, typed by the
    /// sub-schema.
    fn nested(&self, ordinal: usize, element: usize) -> Result<InstanceView<'_>> {
        let schema = self.schema();
        let (field, range) = locate(schema, ordinal, element)?;
        let sub = nested_schema(field, ordinal)?;
        InstanceView::new(&self.as_bytes()[range], sub)
    }
}

/// Write access to a schema-shaped buffer.
pub trait FieldWrite: FieldRead {
    /// Schema and buffer borrowed together, so nested views can hold both.
    fn parts_mut(&mut self) -> (&Schema, &mut [u8]);

    fn set_value(&mut self, ordinal: usize, value: Value) -> Result<()> {
        self.set_element(ordinal, 0, value)
    }

    fn set_element(&mut self, ordinal: usize, element: usize, value: Value) -> Result<()> {
        let (schema, data) = self.parts_mut();
        write_element(schema, data, ordinal, element, &value)
    }

    /// Writes every element of field `ordinal`; `values.len()` must equal the
    /// field's count.
    fn set_array(&mut self, ordinal: usize, values: &[Value]) -> Result<()> {
        let (schema, data) = self.parts_mut();
        write_field(schema, data, ordinal, values)
    }

    fn set<T: Primitive>(&mut self, ordinal: usize, value: T) -> Result<()> {
        self.set_value(ordinal, value.into_value())
    }

    /// Copies `chars` into a `Char` field and zero-fills the remainder.
    fn set_chars(&mut self, ordinal: usize, chars: &[u8]) -> Result<()> {
        let (schema, data) = self.parts_mut();
        let field = schema.field(ordinal)?;
        check_type(field, ordinal, DataType::Char)?;
        if chars.len() > field.count() {
            bail!(LayoutError::CountMismatch {
                ordinal,
                expected: field.count(),
                actual: chars.len(),
            });
        }
        let dst = &mut data[field.placement().range()];
        dst[..chars.len()].copy_from_slice(chars);
        dst[chars.len()..].fill(0);
        Ok(())
    }

    /// Mutable view of one element of a `Nest` field, typed by the
    /// sub-schema. Writes through the view land in this buffer.
    fn nested_mut(&mut self, ordinal: usize, element: usize) -> Result<InstanceMut<'_>> {
        let (schema, data) = self.parts_mut();
        let (field, range) = locate(schema, ordinal, element)?;
        let sub = nested_schema(field, ordinal)?;
        InstanceMut::new(&mut data[range], sub)
    }
}
