//! # Instance - Owned Record Buffers
//!
//! An `Instance` is a fixed-size byte buffer bound to one `Schema`. The
//! buffer is allocated once, at exactly `schema.total_size()` bytes, and is
//! never resized. Field reads and writes go through
//! [`FieldRead`]/[`FieldWrite`].
//!
//! ## Lifecycle
//!
//! ```text
//! Schema::create_instance()  ──┐
//! Instance::from_bytes()     ──┼──> Instance<'s> ──> set/get ──> to_bytes()
//! serializer::deserialize()  ──┘          │
//!                                         └──> destroy() / drop
//! ```
//!
//! The instance borrows its schema for `'s`, so the schema cannot be
//! destroyed (or appended to) while the instance is alive. `destroy`
//! consumes the instance; there is no handle left to reuse afterwards.
//!
//! ## Allocation
//!
//! Buffers are reserved with `try_reserve_exact`, so a failed allocation is
//! reported as `LayoutError::AllocationFailure` rather than aborting.

use eyre::{bail, Result};
use tracing::{debug, trace};

use crate::records::accessor::{sealed, FieldRead, FieldWrite};
use crate::records::error::LayoutError;
use crate::records::schema::Schema;
use crate::records::view::InstanceView;

#[derive(Debug, Clone)]
pub struct Instance<'s> {
    schema: &'s Schema,
    buffer: Box<[u8]>,
}

fn allocate(size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| LayoutError::AllocationFailure { requested: size })?;
    Ok(buffer)
}

impl<'s> Instance<'s> {
    /// Allocates a zero-filled buffer of `schema.total_size()` bytes.
    pub fn new(schema: &'s Schema) -> Result<Self> {
        let size = schema.total_size();
        let mut buffer = allocate(size)?;
        buffer.resize(size, 0);
        schema.freeze();
        trace!(size, "allocated instance");
        Ok(Self {
            schema,
            buffer: buffer.into_boxed_slice(),
        })
    }

    /// Copies `bytes` verbatim; `bytes.len()` must equal `schema.total_size()`.
    pub fn from_bytes(schema: &'s Schema, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != schema.total_size() {
            debug!(
                expected = schema.total_size(),
                actual = bytes.len(),
                "rejected instance bytes"
            );
            bail!(LayoutError::SizeMismatch {
                expected: schema.total_size(),
                actual: bytes.len(),
            });
        }
        let mut buffer = allocate(bytes.len())?;
        buffer.extend_from_slice(bytes);
        schema.freeze();
        trace!(size = bytes.len(), "materialized instance from bytes");
        Ok(Self {
            schema,
            buffer: buffer.into_boxed_slice(),
        })
    }

    /// Returns the schema with its full `'s` lifetime.
    pub fn schema_ref(&self) -> &'s Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Exact copy of the buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    pub fn view(&self) -> InstanceView<'_> {
        InstanceView::from_parts(&self.buffer, self.schema)
    }

    /// Zero-fills every field.
    pub fn reset(&mut self) {
        self.buffer.fill(0);
    }

    /// Overwrites the whole buffer; `bytes.len()` must equal the buffer size.
    /// On mismatch the buffer is left unchanged.
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.buffer.len() {
            bail!(LayoutError::SizeMismatch {
                expected: self.buffer.len(),
                actual: bytes.len(),
            });
        }
        self.buffer.copy_from_slice(bytes);
        Ok(())
    }

    /// Releases the buffer.
    pub fn destroy(self) {
        trace!(size = self.buffer.len(), "instance destroyed");
    }
}

impl PartialEq for Instance<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.buffer == other.buffer
    }
}

impl Eq for Instance<'_> {}

impl sealed::Sealed for Instance<'_> {}

impl FieldRead for Instance<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl FieldWrite for Instance<'_> {
    fn parts_mut(&mut self) -> (&Schema, &mut [u8]) {
        (self.schema, &mut self.buffer[..])
    }
}
