//! Tests for the records module

use super::*;
use crate::config::MAX_NESTING_DEPTH;
use crate::types::{DataType, Endian, Value};

fn xyz_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field(DataType::Float32, 1).unwrap();
    schema.add_field(DataType::Float32, 1).unwrap();
    schema.add_field(DataType::Float32, 1).unwrap();
    schema
}

fn mixed_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field(DataType::Int8, 1).unwrap();
    schema.add_field(DataType::UInt16, 1).unwrap();
    schema.add_field(DataType::Float32, 1).unwrap();
    schema.add_field(DataType::Int64, 1).unwrap();
    schema
}

fn kind(err: &eyre::Report) -> &LayoutError {
    err.downcast_ref::<LayoutError>()
        .expect("error should carry a LayoutError")
}

#[test]
fn schema_starts_empty() {
    let schema = Schema::new();
    assert_eq!(schema.field_count(), 0);
    assert_eq!(schema.total_size(), 0);
    assert_eq!(schema.endian(), Endian::Little);
    assert!(schema.is_empty());
    assert!(!schema.is_frozen());
}

#[test]
fn add_field_assigns_ordinals_in_insertion_order() {
    let mut schema = Schema::new();
    assert_eq!(schema.add_field(DataType::Int8, 1).unwrap(), 0);
    assert_eq!(schema.add_field(DataType::UInt16, 1).unwrap(), 1);
    assert_eq!(schema.add_field(DataType::Float32, 1).unwrap(), 2);
    assert_eq!(schema.add_field(DataType::Int64, 1).unwrap(), 3);
}

#[test]
fn schema_calculates_packed_offsets() {
    let schema = mixed_schema();

    assert_eq!(schema.field(0).unwrap().offset(), 0);
    assert_eq!(schema.field(1).unwrap().offset(), 1);
    assert_eq!(schema.field(2).unwrap().offset(), 3);
    assert_eq!(schema.field(3).unwrap().offset(), 7);
    assert_eq!(schema.total_size(), 1 + 2 + 4 + 8);
    schema.verify_layout().unwrap();
}

#[test]
fn append_grows_total_by_count_times_width_and_keeps_offsets() {
    let mut schema = mixed_schema();
    let before: Vec<usize> = schema.fields().iter().map(|f| f.offset()).collect();
    let total_before = schema.total_size();

    schema.add_field(DataType::UInt32, 5).unwrap();

    assert_eq!(schema.total_size(), total_before + 5 * 4);
    let after: Vec<usize> = schema.fields()[..4].iter().map(|f| f.offset()).collect();
    assert_eq!(before, after);
    assert_eq!(schema.field(4).unwrap().offset(), total_before);
    assert_eq!(schema.field(4).unwrap().byte_size(), 20);
}

#[test]
fn add_field_rejects_zero_count() {
    let mut schema = Schema::new();
    let err = schema.add_field(DataType::Int32, 0).unwrap_err();
    assert_eq!(kind(&err), &LayoutError::InvalidCount { count: 0 });
    assert_eq!(schema.field_count(), 0);
}

#[test]
fn add_field_rejects_bare_nest() {
    let mut schema = Schema::new();
    let err = schema.add_field(DataType::Nest, 1).unwrap_err();
    assert_eq!(kind(&err), &LayoutError::NestRequiresSchema);
}

#[test]
fn field_lookup_out_of_range() {
    let schema = xyz_schema();
    let err = schema.field(3).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::IndexOutOfRange {
            ordinal: 3,
            field_count: 3
        }
    );
}

#[test]
fn three_float32_scenario_round_trips_bit_identical() {
    let schema = xyz_schema();
    assert_eq!(schema.total_size(), 12);

    let mut instance = schema.create_instance().unwrap();
    instance.set_value(0, Value::Float32(1.1)).unwrap();
    instance.set_value(1, Value::Float32(2.2)).unwrap();
    instance.set_value(2, Value::Float32(3.3)).unwrap();

    let bytes = instance.to_bytes();
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[0..4], &1.1f32.to_le_bytes());
    assert_eq!(&bytes[4..8], &2.2f32.to_le_bytes());
    assert_eq!(&bytes[8..12], &3.3f32.to_le_bytes());

    let restored = Instance::from_bytes(&schema, &bytes).unwrap();
    let x: f32 = restored.get(0).unwrap();
    let y: f32 = restored.get(1).unwrap();
    let z: f32 = restored.get(2).unwrap();
    assert_eq!(x.to_bits(), 1.1f32.to_bits());
    assert_eq!(y.to_bits(), 2.2f32.to_bits());
    assert_eq!(z.to_bits(), 3.3f32.to_bits());
}

#[test]
fn new_instance_is_zero_filled() {
    let schema = mixed_schema();
    let instance = schema.create_instance().unwrap();
    assert_eq!(instance.len(), schema.total_size());
    assert!(instance.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn mixed_types_read_back_exactly() {
    let schema = mixed_schema();
    let mut instance = schema.create_instance().unwrap();

    instance.set(0, -120i8).unwrap();
    instance.set(1, 65000u16).unwrap();
    instance.set(2, 2.75f32).unwrap();
    instance.set(3, -9_000_000_000_000_000_000i64).unwrap();

    assert_eq!(instance.get_value(0).unwrap(), Value::Int8(-120));
    assert_eq!(instance.get_value(1).unwrap(), Value::UInt16(65000));
    assert_eq!(instance.get_value(2).unwrap(), Value::Float32(2.75));
    assert_eq!(
        instance.get_value(3).unwrap(),
        Value::Int64(-9_000_000_000_000_000_000)
    );
}

#[test]
fn set_value_touches_only_target_field() {
    let schema = mixed_schema();
    let mut instance = schema.create_instance().unwrap();
    let before = instance.to_bytes();

    instance.set(2, f32::from_bits(0xFFFF_FFFF)).unwrap();

    let after = instance.to_bytes();
    let range = schema.field(2).unwrap().placement().range();
    for (i, (b, a)) in before.iter().zip(&after).enumerate() {
        if !range.contains(&i) {
            assert_eq!(b, a, "byte {} outside field 2 changed", i);
        }
    }
    assert_eq!(&after[range], &[0xFF; 4]);
}

#[test]
fn type_mismatch_leaves_buffer_unchanged() {
    let schema = mixed_schema();
    let mut instance = schema.create_instance().unwrap();
    instance.set(1, 7u16).unwrap();
    let before = instance.to_bytes();

    let err = instance.set_value(1, Value::Int16(7)).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::TypeMismatch {
            ordinal: 1,
            expected: DataType::UInt16,
            actual: DataType::Int16
        }
    );
    assert_eq!(instance.to_bytes(), before);
}

#[test]
fn no_implicit_widening_or_reinterpretation() {
    let mut schema = Schema::new();
    schema.add_field(DataType::Int16, 1).unwrap();
    schema.add_field(DataType::Char, 1).unwrap();
    schema.add_field(DataType::Float64, 1).unwrap();
    let mut instance = schema.create_instance().unwrap();

    assert!(instance.set_value(0, Value::Int8(1)).is_err());
    assert!(instance.set_value(1, Value::UInt8(b'a')).is_err());
    assert!(instance.set_value(2, Value::Float32(1.0)).is_err());
    assert!(instance.set_value(1, Value::Char(b'a')).is_ok());
    assert!(instance.get::<u8>(1).is_err());
}

#[test]
fn out_of_range_ordinal_is_rejected() {
    let schema = xyz_schema();
    let mut instance = schema.create_instance().unwrap();

    let err = instance.get_value(3).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::IndexOutOfRange {
            ordinal: 3,
            field_count: 3
        }
    );

    let err = instance.set_value(99, Value::Float32(0.0)).unwrap_err();
    assert!(matches!(kind(&err), LayoutError::IndexOutOfRange { .. }));
    assert!(instance.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn array_elements_are_addressed_by_index() {
    let mut schema = Schema::new();
    schema.add_field(DataType::UInt8, 1).unwrap();
    schema.add_field(DataType::Int32, 4).unwrap();
    let mut instance = schema.create_instance().unwrap();

    for i in 0..4 {
        instance
            .set_element(1, i, Value::Int32(i as i32 * -10))
            .unwrap();
    }

    assert_eq!(instance.get_element(1, 2).unwrap(), Value::Int32(-20));
    assert_eq!(
        instance.get_array(1).unwrap(),
        vec![
            Value::Int32(0),
            Value::Int32(-10),
            Value::Int32(-20),
            Value::Int32(-30)
        ]
    );
    assert_eq!(&instance.as_bytes()[1 + 8..1 + 12], &(-20i32).to_le_bytes());
    assert_eq!(instance.get_element_as::<i32>(1, 3).unwrap(), -30);
}

#[test]
fn element_out_of_range_is_rejected() {
    let mut schema = Schema::new();
    schema.add_field(DataType::UInt16, 3).unwrap();
    let mut instance = schema.create_instance().unwrap();

    let err = instance.set_element(0, 3, Value::UInt16(1)).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::ElementOutOfRange {
            ordinal: 0,
            element: 3,
            count: 3
        }
    );
    assert!(instance.get_element(0, 10).is_err());
}

#[test]
fn set_array_validates_everything_before_writing() {
    let mut schema = Schema::new();
    schema.add_field(DataType::UInt16, 3).unwrap();
    let mut instance = schema.create_instance().unwrap();

    let err = instance
        .set_array(0, &[Value::UInt16(1), Value::UInt16(2)])
        .unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::CountMismatch {
            ordinal: 0,
            expected: 3,
            actual: 2
        }
    );

    let err = instance
        .set_array(0, &[Value::UInt16(1), Value::UInt16(2), Value::Int16(3)])
        .unwrap_err();
    assert!(matches!(kind(&err), LayoutError::TypeMismatch { .. }));
    assert!(instance.as_bytes().iter().all(|&b| b == 0));

    instance
        .set_array(0, &[Value::UInt16(1), Value::UInt16(2), Value::UInt16(3)])
        .unwrap();
    assert_eq!(instance.as_bytes(), &[1, 0, 2, 0, 3, 0]);
}

#[test]
fn char_fields_pad_with_zeros() {
    let mut schema = Schema::new();
    schema.add_field(DataType::Char, 8).unwrap();
    let mut instance = schema.create_instance().unwrap();

    instance.set_chars(0, b"hello").unwrap();
    assert_eq!(instance.get_chars(0).unwrap(), b"hello\0\0\0");

    instance.set_chars(0, b"hi").unwrap();
    assert_eq!(instance.get_chars(0).unwrap(), b"hi\0\0\0\0\0\0");

    let err = instance.set_chars(0, b"too long!").unwrap_err();
    assert!(matches!(kind(&err), LayoutError::CountMismatch { .. }));
    assert_eq!(instance.get_element(0, 1).unwrap(), Value::Char(b'i'));
}

#[test]
fn from_bytes_requires_exact_size() {
    let schema = xyz_schema();
    for len in [0usize, 11, 13, 24] {
        let err = Instance::from_bytes(&schema, &vec![0u8; len]).unwrap_err();
        assert_eq!(
            kind(&err),
            &LayoutError::SizeMismatch {
                expected: 12,
                actual: len
            }
        );
    }
}

#[test]
fn oversized_instance_reports_allocation_failure() {
    let mut schema = Schema::new();
    let huge = isize::MAX as usize + 1;
    schema.add_field(DataType::Int8, huge).unwrap();
    assert_eq!(schema.total_size(), huge);

    let err = schema.create_instance().unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::AllocationFailure { requested: huge }
    );
    assert!(!schema.is_frozen());

    schema.add_field(DataType::Int8, 1).unwrap();
    assert_eq!(schema.field_count(), 2);
}

#[test]
fn add_field_reports_size_overflow() {
    let mut schema = Schema::new();
    schema.add_field(DataType::UInt16, 1).unwrap();

    let err = schema.add_field(DataType::Int64, usize::MAX / 2).unwrap_err();
    assert_eq!(kind(&err), &LayoutError::SizeOverflow);
    assert_eq!(schema.field_count(), 1);
    assert_eq!(schema.total_size(), 2);

    let mut schema = Schema::new();
    schema.add_field(DataType::Int8, usize::MAX).unwrap();
    let err = schema.add_field(DataType::Int8, 1).unwrap_err();
    assert_eq!(kind(&err), &LayoutError::SizeOverflow);
}

#[test]
fn builder_capacity_failure_is_an_error() {
    let err = Schema::builder()
        .capacity(usize::MAX)
        .field(DataType::Int8, 1)
        .build()
        .unwrap_err();
    assert!(matches!(
        kind(&err),
        LayoutError::AllocationFailure { .. }
    ));

    let schema = Schema::builder()
        .capacity(0)
        .field(DataType::Int8, 1)
        .build()
        .unwrap();
    assert_eq!(schema.total_size(), 1);
}

#[test]
fn instance_freezes_schema() {
    let mut schema = xyz_schema();
    {
        let instance = schema.create_instance().unwrap();
        instance.destroy();
    }
    assert!(schema.is_frozen());

    let err = schema.add_field(DataType::Int8, 1).unwrap_err();
    assert_eq!(kind(&err), &LayoutError::SchemaFrozen { field_count: 3 });
    assert_eq!(schema.total_size(), 12);
}

#[test]
fn from_bytes_and_views_freeze_schema() {
    let schema = xyz_schema();
    let bytes = [0u8; 12];
    let _view = InstanceView::new(&bytes, &schema).unwrap();
    assert!(schema.is_frozen());
}

#[test]
fn view_borrows_data_zero_copy() {
    let schema = xyz_schema();
    let data = vec![0u8; 12];
    let view = InstanceView::new(&data, &schema).unwrap();
    assert!(std::ptr::eq(view.data().as_ptr(), data.as_ptr()));
    assert!(std::ptr::eq(view.as_bytes().as_ptr(), data.as_ptr()));
}

#[test]
fn view_rejects_wrong_size() {
    let schema = xyz_schema();
    let err = InstanceView::new(&[0u8; 4], &schema).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::SizeMismatch {
            expected: 12,
            actual: 4
        }
    );
}

#[test]
fn instance_mut_writes_into_borrowed_slice() {
    let schema = mixed_schema();
    let mut page = vec![0u8; schema.total_size()];
    {
        let mut record = InstanceMut::new(&mut page, &schema).unwrap();
        record.set(1, 0x0102u16).unwrap();
        assert_eq!(record.as_view().get::<u16>(1).unwrap(), 0x0102);
    }
    assert_eq!(&page[1..3], &[0x02, 0x01]);
}

#[test]
fn nested_field_width_is_sub_schema_size() {
    let point = xyz_schema();
    let mut path = Schema::new();
    path.add_field(DataType::UInt32, 1).unwrap();
    let ordinal = path.add_nested(point, 3).unwrap();
    path.add_field(DataType::UInt8, 1).unwrap();

    let field = path.field(ordinal).unwrap();
    assert_eq!(field.data_type(), DataType::Nest);
    assert_eq!(field.element_width(), 12);
    assert_eq!(field.byte_size(), 36);
    assert_eq!(field.nested().unwrap().field_count(), 3);
    assert_eq!(path.field(2).unwrap().offset(), 40);
    assert_eq!(path.total_size(), 41);
    assert_eq!(path.depth(), 1);
    path.verify_layout().unwrap();
}

#[test]
fn nesting_freezes_sub_schema() {
    let point = std::sync::Arc::new(xyz_schema());
    let mut parent = Schema::new();
    parent.add_nested(std::sync::Arc::clone(&point), 1).unwrap();
    assert!(point.is_frozen());
}

#[test]
fn nested_mut_writes_land_in_parent_buffer() {
    let point = xyz_schema();
    let mut path = Schema::new();
    path.add_field(DataType::UInt32, 1).unwrap();
    path.add_nested(point, 2).unwrap();

    let mut instance = path.create_instance().unwrap();
    instance.set(0, 7u32).unwrap();
    {
        let mut second = instance.nested_mut(1, 1).unwrap();
        second.set(0, 1.5f32).unwrap();
        second.set(2, -4.0f32).unwrap();
    }

    let bytes = instance.to_bytes();
    assert_eq!(&bytes[4 + 12..4 + 16], &1.5f32.to_le_bytes());
    assert_eq!(&bytes[4 + 20..4 + 24], &(-4.0f32).to_le_bytes());
    assert!(bytes[4..16].iter().all(|&b| b == 0));

    let view = instance.nested(1, 1).unwrap();
    assert_eq!(view.get::<f32>(0).unwrap(), 1.5);
    assert_eq!(view.get::<f32>(2).unwrap(), -4.0);
    assert_eq!(instance.get::<u32>(0).unwrap(), 7);
}

#[test]
fn nest_values_copy_whole_elements() {
    let mut inner = Schema::new();
    inner.add_field(DataType::UInt16, 2).unwrap();
    let mut outer = Schema::new();
    outer.add_nested(inner, 2).unwrap();

    let mut instance = outer.create_instance().unwrap();
    instance
        .set_element(0, 1, Value::Nest(vec![1, 2, 3, 4]))
        .unwrap();
    assert_eq!(instance.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(
        instance.get_element(0, 1).unwrap(),
        Value::Nest(vec![1, 2, 3, 4])
    );

    let err = instance
        .set_element(0, 0, Value::Nest(vec![9; 3]))
        .unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::SizeMismatch {
            expected: 4,
            actual: 3
        }
    );
    assert_eq!(instance.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
}

#[test]
fn nested_access_on_primitive_field_is_type_mismatch() {
    let schema = xyz_schema();
    let instance = schema.create_instance().unwrap();
    let err = instance.nested(0, 0).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::TypeMismatch {
            ordinal: 0,
            expected: DataType::Float32,
            actual: DataType::Nest
        }
    );
}

#[test]
fn nesting_depth_is_limited() {
    let mut current = Schema::new();
    current.add_field(DataType::UInt8, 1).unwrap();

    for _ in 0..MAX_NESTING_DEPTH {
        let mut parent = Schema::new();
        parent.add_nested(current, 1).unwrap();
        current = parent;
    }
    assert_eq!(current.depth(), MAX_NESTING_DEPTH);

    let mut too_deep = Schema::new();
    let err = too_deep.add_nested(current, 1).unwrap_err();
    assert_eq!(
        kind(&err),
        &LayoutError::NestingTooDeep {
            depth: MAX_NESTING_DEPTH + 1,
            max: MAX_NESTING_DEPTH
        }
    );
}

#[test]
fn big_endian_schema_encodes_network_order() {
    let schema = Schema::builder()
        .endian(Endian::Big)
        .field(DataType::UInt32, 1)
        .field(DataType::Int16, 1)
        .build()
        .unwrap();
    let mut instance = schema.create_instance().unwrap();
    instance.set(0, 0x0A0B_0C0Du32).unwrap();
    instance.set(1, -2i16).unwrap();

    assert_eq!(instance.as_bytes(), &[0x0A, 0x0B, 0x0C, 0x0D, 0xFF, 0xFE]);
    assert_eq!(instance.get::<u32>(0).unwrap(), 0x0A0B_0C0D);
    assert_eq!(instance.get::<i16>(1).unwrap(), -2);
}

#[test]
fn builder_applies_fields_in_order() {
    let point = xyz_schema();
    let schema = Schema::builder()
        .capacity(2)
        .field(DataType::UInt8, 1)
        .nested(point, 2)
        .field(DataType::Char, 4)
        .build()
        .unwrap();

    assert_eq!(schema.field_count(), 3);
    assert_eq!(schema.total_size(), 1 + 24 + 4);
    assert_eq!(schema.field(2).unwrap().offset(), 25);
}

#[test]
fn builder_surfaces_append_errors() {
    let err = Schema::builder()
        .field(DataType::Int8, 0)
        .build()
        .unwrap_err();
    assert_eq!(kind(&err), &LayoutError::InvalidCount { count: 0 });
}

#[test]
fn reset_and_copy_from_bytes() {
    let schema = xyz_schema();
    let mut instance = schema.create_instance().unwrap();
    instance.set(1, 9.5f32).unwrap();
    instance.reset();
    assert!(instance.as_bytes().iter().all(|&b| b == 0));

    let err = instance.copy_from_bytes(&[1u8; 5]).unwrap_err();
    assert!(matches!(kind(&err), LayoutError::SizeMismatch { .. }));
    assert!(instance.as_bytes().iter().all(|&b| b == 0));

    instance.copy_from_bytes(&[1u8; 12]).unwrap();
    assert_eq!(instance.as_bytes(), &[1u8; 12]);
}

#[test]
fn serializer_round_trip_is_byte_identical() {
    let schema = mixed_schema();
    let mut instance = schema.create_instance().unwrap();
    instance.set(0, 5i8).unwrap();
    instance.set(3, i64::MIN).unwrap();

    let bytes = serialize(&instance);
    let restored = deserialize(&schema, &bytes).unwrap();
    assert_eq!(restored, instance);
    assert_eq!(serialize(&restored), bytes);
}

#[test]
fn destroy_instances_then_schema() {
    let schema = xyz_schema();
    let a = schema.create_instance().unwrap();
    let b = a.clone();
    a.destroy();
    assert_eq!(b.len(), 12);
    b.destroy();
    schema.destroy();
}

#[test]
fn schema_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schema>();

    let schema = xyz_schema();
    let mut a = schema.create_instance().unwrap();
    let mut b = schema.create_instance().unwrap();
    a.set(0, 1.0f32).unwrap();
    b.set(0, 2.0f32).unwrap();

    std::thread::scope(|s| {
        let ha = s.spawn(|| a.get::<f32>(0).unwrap());
        let hb = s.spawn(|| b.get::<f32>(0).unwrap());
        assert_eq!(ha.join().unwrap(), 1.0);
        assert_eq!(hb.join().unwrap(), 2.0);
    });
}

#[test]
fn layout_error_helper_downcasts() {
    let schema = xyz_schema();
    let instance = schema.create_instance().unwrap();
    let err = instance.get_value(5).unwrap_err();
    assert!(matches!(
        layout_error(&err),
        Some(LayoutError::IndexOutOfRange { .. })
    ));
    assert_eq!(
        err.to_string(),
        "field index 5 out of range (field count 3)"
    );
}

#[test]
fn borrowed_views_share_the_instance_buffer() {
    let schema = xyz_schema();
    let mut instance = schema.create_instance().unwrap();
    instance.set(1, 4.5f32).unwrap();

    let view = instance.view();
    assert!(std::ptr::eq(view.as_bytes().as_ptr(), instance.as_bytes().as_ptr()));
    assert_eq!(view.get::<f32>(1).unwrap(), 4.5);

    let mut bytes = instance.to_bytes();
    let mut record = InstanceMut::new(&mut bytes, &schema).unwrap();
    record.clear();
    assert!(record.as_bytes().iter().all(|&b| b == 0));
}
