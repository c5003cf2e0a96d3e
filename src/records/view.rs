//! # InstanceView / InstanceMut - Zero-Copy Buffer Access
//!
//! This module provides borrowed, schema-checked views over byte slices that
//! already have the exact layout of a schema:
//!
//! - `InstanceView` reads from `&[u8]` (a page, a network frame, or one
//!   element of a `Nest` field)
//! - `InstanceMut` reads and writes through `&mut [u8]`
//!
//! Neither allocates. Both require `data.len() == schema.total_size()` and
//! freeze the schema, the same as creating an owned `Instance`.
//!
//! ## Usage
//!
//! ```ignore
//! let view = InstanceView::new(frame, &schema)?;
//! let id: u32 = view.get(0)?;
//!
//! let mut inner = instance.nested_mut(2, 0)?; // element 0 of Nest field 2
//! inner.set(1, 2.5f32)?;
//! ```
//!
//! ## Thread Safety
//!
//! `InstanceView` is `Copy` and borrows immutably; any number of views may
//! read the same bytes concurrently.

use eyre::{bail, Result};

use crate::records::accessor::{sealed, FieldRead, FieldWrite};
use crate::records::error::LayoutError;
use crate::records::instance::Instance;
use crate::records::schema::Schema;

fn check_len(schema: &Schema, len: usize) -> Result<()> {
    if len != schema.total_size() {
        bail!(LayoutError::SizeMismatch {
            expected: schema.total_size(),
            actual: len,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct InstanceView<'a> {
    data: &'a [u8],
    schema: &'a Schema,
}

impl<'a> InstanceView<'a> {
    pub fn new(data: &'a [u8], schema: &'a Schema) -> Result<Self> {
        check_len(schema, data.len())?;
        schema.freeze();
        Ok(Self { data, schema })
    }

    /// Caller guarantees the length matches and the schema is frozen.
    pub(crate) fn from_parts(data: &'a [u8], schema: &'a Schema) -> Self {
        Self { data, schema }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copies the viewed bytes into an owned instance.
    pub fn to_instance(&self) -> Result<Instance<'a>> {
        Instance::from_bytes(self.schema, self.data)
    }
}

impl sealed::Sealed for InstanceView<'_> {}

impl FieldRead for InstanceView<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

#[derive(Debug)]
pub struct InstanceMut<'a> {
    data: &'a mut [u8],
    schema: &'a Schema,
}

impl<'a> InstanceMut<'a> {
    pub fn new(data: &'a mut [u8], schema: &'a Schema) -> Result<Self> {
        check_len(schema, data.len())?;
        schema.freeze();
        Ok(Self { data, schema })
    }

    pub fn as_view(&self) -> InstanceView<'_> {
        InstanceView::from_parts(&*self.data, self.schema)
    }

    /// Zero-fills the viewed bytes.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl sealed::Sealed for InstanceMut<'_> {}

impl FieldRead for InstanceMut<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn as_bytes(&self) -> &[u8] {
        &*self.data
    }
}

impl FieldWrite for InstanceMut<'_> {
    fn parts_mut(&mut self) -> (&Schema, &mut [u8]) {
        (self.schema, &mut *self.data)
    }
}
