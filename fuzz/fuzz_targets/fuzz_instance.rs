//! Fuzz testing for instance field access.
//!
//! Builds a schema from arbitrary field lists, then applies arbitrary
//! writes. Every write either succeeds and touches only its target element,
//! or fails and leaves the buffer untouched.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use packrec::{DataType, FieldRead, FieldWrite, Schema, Value};

#[derive(Debug, Arbitrary)]
struct InstanceInput {
    fields: Vec<(FuzzDataType, u8)>,
    writes: Vec<FuzzWrite>,
    raw: Vec<u8>,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzDataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Char,
}

impl From<FuzzDataType> for DataType {
    fn from(t: FuzzDataType) -> Self {
        match t {
            FuzzDataType::Int8 => DataType::Int8,
            FuzzDataType::UInt8 => DataType::UInt8,
            FuzzDataType::Int16 => DataType::Int16,
            FuzzDataType::UInt16 => DataType::UInt16,
            FuzzDataType::Int32 => DataType::Int32,
            FuzzDataType::UInt32 => DataType::UInt32,
            FuzzDataType::Int64 => DataType::Int64,
            FuzzDataType::UInt64 => DataType::UInt64,
            FuzzDataType::Float32 => DataType::Float32,
            FuzzDataType::Float64 => DataType::Float64,
            FuzzDataType::Char => DataType::Char,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzWrite {
    ordinal: u8,
    element: u8,
    value: FuzzValue,
}

#[derive(Debug, Arbitrary)]
enum FuzzValue {
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
}

impl From<&FuzzValue> for Value {
    fn from(v: &FuzzValue) -> Self {
        match *v {
            FuzzValue::Int8(x) => Value::Int8(x),
            FuzzValue::UInt8(x) => Value::UInt8(x),
            FuzzValue::Int16(x) => Value::Int16(x),
            FuzzValue::UInt16(x) => Value::UInt16(x),
            FuzzValue::Int32(x) => Value::Int32(x),
            FuzzValue::UInt32(x) => Value::UInt32(x),
            FuzzValue::Int64(x) => Value::Int64(x),
            FuzzValue::UInt64(x) => Value::UInt64(x),
            FuzzValue::Float32(x) => Value::Float32(x),
            FuzzValue::Float64(x) => Value::Float64(x),
            FuzzValue::Char(x) => Value::Char(x),
        }
    }
}

fuzz_target!(|input: InstanceInput| {
    let mut schema = Schema::new();
    for &(data_type, count) in input.fields.iter().take(64) {
        let _ = schema.add_field(data_type.into(), count as usize);
    }

    if let Ok(instance) = schema.instance_from_bytes(&input.raw) {
        assert_eq!(instance.as_bytes(), input.raw.as_slice());
    }

    let Ok(mut instance) = schema.create_instance() else {
        return;
    };

    for write in input.writes.iter().take(256) {
        let ordinal = write.ordinal as usize;
        let element = write.element as usize;
        let value = Value::from(&write.value);
        let before = instance.to_bytes();

        match instance.set_element(ordinal, element, value.clone()) {
            Ok(()) => {
                let field = schema.field(ordinal).unwrap();
                let range = field.placement().element_range(element);
                let after = instance.as_bytes();
                assert_eq!(&before[..range.start], &after[..range.start]);
                assert_eq!(&before[range.end..], &after[range.end..]);

                let read = instance.get_element(ordinal, element).unwrap();
                match (&read, &value) {
                    (Value::Float32(a), Value::Float32(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                    (Value::Float64(a), Value::Float64(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                    _ => assert_eq!(read, value),
                }
            }
            Err(_) => assert_eq!(instance.as_bytes(), before.as_slice()),
        }
    }
});
