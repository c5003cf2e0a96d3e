//! # Packed Records with O(1) Field Access
//!
//! This module provides schema-driven, fixed-size binary records. A schema
//! lists typed fields in order; every field gets a byte offset when it is
//! appended, so reading or writing field N is a bounds check plus a slice
//! copy, never a scan.
//!
//! ## Record Binary Layout
//!
//! ```text
//! +-----------------+-----------------+-----+-------------------+
//! | Field 0         | Field 1         | ... | Field N-1         |
//! | count_0 * w_0   | count_1 * w_1   |     | count_N-1 * w_N-1 |
//! +-----------------+-----------------+-----+-------------------+
//! ^ offset 0        ^ offset_1                                  ^ total_size
//! ```
//!
//! | Property | Rule |
//! |----------|------|
//! | **Header** | None; the schema is the only description of the bytes |
//! | **Padding** | None; fields are packed back to back |
//! | **Numbers** | Schema endianness, little-endian unless configured |
//! | **Arrays** | `count` contiguous elements of the field's width |
//! | **Nest** | `count` contiguous copies of a sub-schema's layout |
//!
//! ## Design Goals
//!
//! 1. **O(1) field access**: Offsets are computed once, at append time
//! 2. **Deterministic size**: `total_size` is a pure function of the schema
//! 3. **Exact typing**: A value's kind must equal the field's type
//! 4. **Atomic writes**: A rejected write leaves the buffer unchanged
//!
//! ## Module Structure
//!
//! - `error`: `LayoutError` kinds carried inside `eyre` reports
//! - `layout`: Placement arithmetic (the layout planner)
//! - `schema`: `Schema`, `SchemaBuilder`, `FieldDescriptor`
//! - `instance`: Owned `Instance` buffers
//! - `view`: Borrowed `InstanceView` / `InstanceMut`
//! - `accessor`: `FieldRead` / `FieldWrite` typed access
//! - `serializer`: Byte-sequence conversion
//! - `names`: Optional name → ordinal index

pub mod accessor;
pub mod error;
pub mod instance;
pub mod layout;
pub mod names;
pub mod schema;
pub mod serializer;
pub mod view;

#[cfg(test)]
mod tests;

pub use accessor::{FieldRead, FieldWrite};
pub use error::{layout_error, LayoutError};
pub use instance::Instance;
pub use layout::{FieldPlacement, Layout};
pub use names::FieldIndex;
pub use schema::{FieldDescriptor, Schema, SchemaBuilder};
pub use serializer::{deserialize, serialize, serialize_into};
pub use view::{InstanceMut, InstanceView};
