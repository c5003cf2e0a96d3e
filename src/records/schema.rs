//! # Schema Definition
//!
//! This module provides the `Schema` struct: an ordered, append-only list of
//! field descriptors plus the derived total instance size. Offsets are placed
//! incrementally on every append, so reads never recompute layout.
//!
//! ## Schema Internals
//!
//! - `fields`: Field descriptors in ordinal order, each with its placement
//! - `total_size`: Sum of all field byte sizes (the instance buffer length)
//! - `endian`: Byte order of multi-byte numeric fields
//! - `depth`: Nesting depth (0 when no field is a `Nest`)
//! - `frozen`: Set once any instance or view is bound to the schema
//!
//! ## Append-Before-Instantiate
//!
//! Instances are sized from `total_size` when they are created. Appending a
//! field afterwards would leave existing buffers too short, so the first
//! instance freezes the schema and further appends fail with
//! `LayoutError::SchemaFrozen`. While an instance is alive the shared borrow
//! it holds already rules out `&mut Schema` at compile time.
//!
//! ## Usage
//!
//! ```ignore
//! let mut point = Schema::new();
//! point.add_field(DataType::Float32, 1)?; // x
//! point.add_field(DataType::Float32, 1)?; // y
//!
//! let mut path = Schema::builder().endian(Endian::Little).build()?;
//! path.add_field(DataType::UInt32, 1)?;   // id
//! path.add_nested(point, 8)?;             // points[8]
//! assert_eq!(path.total_size(), 4 + 8 * 8);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eyre::{bail, ensure, Result};
use tracing::{debug, trace};

use crate::config::{INITIAL_FIELD_CAPACITY, MAX_NESTING_DEPTH};
use crate::records::error::LayoutError;
use crate::records::instance::Instance;
use crate::records::layout::{self, FieldPlacement};
use crate::types::{DataType, Endian};

#[derive(Debug)]
pub struct FieldDescriptor {
    data_type: DataType,
    count: usize,
    placement: FieldPlacement,
    nested: Option<Arc<Schema>>,
}

impl FieldDescriptor {
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn offset(&self) -> usize {
        self.placement.offset
    }

    pub fn byte_size(&self) -> usize {
        self.placement.byte_size
    }

    pub fn element_width(&self) -> usize {
        self.placement.element_width
    }

    pub fn placement(&self) -> &FieldPlacement {
        &self.placement
    }

    /// Sub-schema of a `Nest` field.
    pub fn nested(&self) -> Option<&Schema> {
        self.nested.as_deref()
    }

    pub fn nested_arc(&self) -> Option<&Arc<Schema>> {
        self.nested.as_ref()
    }
}

#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    total_size: usize,
    endian: Endian,
    depth: usize,
    frozen: AtomicBool,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Creates an empty little-endian schema.
    pub fn new() -> Self {
        Self::with_options(Endian::Little, INITIAL_FIELD_CAPACITY)
    }

    pub fn with_endian(endian: Endian) -> Self {
        Self::with_options(endian, INITIAL_FIELD_CAPACITY)
    }

    fn with_options(endian: Endian, capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            total_size: 0,
            endian,
            depth: 0,
            frozen: AtomicBool::new(false),
        }
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Appends a primitive field of `count` elements and returns its ordinal.
    pub fn add_field(&mut self, data_type: DataType, count: usize) -> Result<usize> {
        if data_type.is_nested() {
            bail!(LayoutError::NestRequiresSchema);
        }
        self.push(data_type, count, None)
    }

    /// Appends a `Nest` field embedding `count` copies of `sub`.
    ///
    /// The sub-schema's size is captured now; `sub` is frozen so its layout
    /// can never drift from the width recorded here.
    pub fn add_nested(&mut self, sub: impl Into<Arc<Schema>>, count: usize) -> Result<usize> {
        let sub = sub.into();
        let depth = sub.depth + 1;
        if depth > MAX_NESTING_DEPTH {
            bail!(LayoutError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        let ordinal = self.push(DataType::Nest, count, Some(Arc::clone(&sub)))?;
        sub.freeze();
        self.depth = self.depth.max(depth);
        Ok(ordinal)
    }

    fn push(
        &mut self,
        data_type: DataType,
        count: usize,
        nested: Option<Arc<Schema>>,
    ) -> Result<usize> {
        if self.is_frozen() {
            debug!(
                field_count = self.fields.len(),
                %data_type,
                "rejected append to frozen schema"
            );
            bail!(LayoutError::SchemaFrozen {
                field_count: self.fields.len(),
            });
        }

        let placement = layout::place(self.total_size, data_type, count, nested.as_deref())?;

        self.fields
            .try_reserve(1)
            .map_err(|_| LayoutError::AllocationFailure {
                requested: std::mem::size_of::<FieldDescriptor>(),
            })?;

        let ordinal = self.fields.len();
        self.fields.push(FieldDescriptor {
            data_type,
            count,
            placement,
            nested,
        });
        self.total_size = placement.end();

        trace!(
            ordinal,
            %data_type,
            count,
            offset = placement.offset,
            byte_size = placement.byte_size,
            "appended field"
        );

        Ok(ordinal)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, ordinal: usize) -> Result<&FieldDescriptor> {
        match self.fields.get(ordinal) {
            Some(field) => Ok(field),
            None => bail!(LayoutError::IndexOutOfRange {
                ordinal,
                field_count: self.fields.len(),
            }),
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Disallows further appends. Called implicitly when an instance or view
    /// is bound to this schema, or when it is nested into another schema.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            debug!(
                field_count = self.fields.len(),
                total_size = self.total_size,
                "schema frozen"
            );
        }
    }

    /// Allocates a zero-filled instance of this schema.
    pub fn create_instance(&self) -> Result<Instance<'_>> {
        Instance::new(self)
    }

    /// Copies `bytes` into a new instance; the length must equal `total_size`.
    pub fn instance_from_bytes(&self, bytes: &[u8]) -> Result<Instance<'_>> {
        Instance::from_bytes(self, bytes)
    }

    /// Replays the layout planner over all descriptors and checks it agrees
    /// with the incrementally placed offsets.
    pub fn verify_layout(&self) -> Result<()> {
        let planned = layout::plan(&self.fields)?;
        ensure!(
            planned.total_size() == self.total_size,
            "planned total size {} differs from schema total size {}",
            planned.total_size(),
            self.total_size
        );
        for (ordinal, (field, placement)) in
            self.fields.iter().zip(planned.placements()).enumerate()
        {
            ensure!(
                field.placement == *placement,
                "field {} placed at {:?}, planner expects {:?}",
                ordinal,
                field.placement,
                placement
            );
        }
        Ok(())
    }

    /// Releases the schema. Instances borrow the schema, so this cannot be
    /// called while any of them is still alive.
    pub fn destroy(self) {
        debug!(
            field_count = self.fields.len(),
            total_size = self.total_size,
            "schema destroyed"
        );
    }
}

#[derive(Debug)]
enum PendingField {
    Primitive(DataType, usize),
    Nested(Arc<Schema>, usize),
}

/// Fluent configuration for a new `Schema`.
///
/// ```ignore
/// let schema = Schema::builder()
///     .endian(Endian::Big)
///     .field(DataType::UInt16, 1)
///     .field(DataType::Char, 32)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    endian: Endian,
    capacity: Option<usize>,
    fields: Vec<PendingField>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Initial descriptor capacity; defaults to `INITIAL_FIELD_CAPACITY`.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn field(mut self, data_type: DataType, count: usize) -> Self {
        self.fields.push(PendingField::Primitive(data_type, count));
        self
    }

    pub fn nested(mut self, sub: impl Into<Arc<Schema>>, count: usize) -> Self {
        self.fields.push(PendingField::Nested(sub.into(), count));
        self
    }

    pub fn build(self) -> Result<Schema> {
        let capacity = self
            .capacity
            .unwrap_or(INITIAL_FIELD_CAPACITY)
            .max(self.fields.len());
        let mut schema = Schema::with_options(self.endian, 0);
        schema
            .fields
            .try_reserve_exact(capacity)
            .map_err(|_| LayoutError::AllocationFailure {
                requested: capacity.saturating_mul(std::mem::size_of::<FieldDescriptor>()),
            })?;
        for pending in self.fields {
            match pending {
                PendingField::Primitive(data_type, count) => {
                    schema.add_field(data_type, count)?;
                }
                PendingField::Nested(sub, count) => {
                    schema.add_nested(sub, count)?;
                }
            }
        }
        Ok(schema)
    }
}
