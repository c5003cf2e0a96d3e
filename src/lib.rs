//! # packrec - Schema-Driven Packed Binary Records
//!
//! packrec describes fixed-size binary records with a runtime schema and
//! reads and writes their fields in O(1) by ordinal. It prioritizes:
//!
//! - **Deterministic layout**: Offsets are fixed when a field is appended
//! - **Zero padding**: Fields are packed back to back, byte for byte
//! - **Exact typing**: Values never widen or reinterpret across types
//! - **Zero-copy access**: Views read and write caller-owned slices in place
//!
//! ## Quick Start
//!
//! ```ignore
//! use packrec::{DataType, FieldRead, FieldWrite, Schema, Value};
//!
//! let mut schema = Schema::new();
//! schema.add_field(DataType::Float32, 1)?; // x
//! schema.add_field(DataType::Float32, 1)?; // y
//! schema.add_field(DataType::Float32, 1)?; // z
//! assert_eq!(schema.total_size(), 12);
//!
//! let mut point = schema.create_instance()?;
//! point.set_value(1, Value::Float32(2.2))?;
//!
//! let bytes = packrec::serialize(&point);
//! let restored = packrec::deserialize(&schema, &bytes)?;
//! assert_eq!(restored.get::<f32>(1)?, 2.2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   FieldRead / FieldWrite (accessor)  │
//! ├──────────────────┬──────────────────┤
//! │ Instance (owned) │ InstanceView/Mut │
//! ├──────────────────┴──────────────────┤
//! │  Schema + Layout Planner (offsets)   │
//! ├─────────────────────────────────────┤
//! │    DataType Catalog (type widths)    │
//! └─────────────────────────────────────┘
//!        Serializer / Schema Descriptor
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: `DataType` catalog, `Endian`, `Value`
//! - [`records`]: Schema, layout planner, instances, accessors, serializer
//! - [`encoding`]: Schema descriptor export/import
//! - [`config`]: Limits and format constants
//!
//! ## Errors
//!
//! Every fallible operation returns `eyre::Result`. Layout violations carry
//! a [`LayoutError`] that callers can recover with
//! `report.downcast_ref::<LayoutError>()` or [`layout_error`].

#[macro_use]
mod macros;

pub mod config;
pub mod encoding;
pub mod records;
pub mod types;

pub use encoding::{decode_schema, encode_schema};
pub use records::{
    deserialize, layout_error, serialize, serialize_into, FieldDescriptor, FieldIndex, FieldRead,
    FieldWrite, Instance, InstanceMut, InstanceView, LayoutError, Schema, SchemaBuilder,
};
pub use types::{DataType, Endian, Primitive, Value};
