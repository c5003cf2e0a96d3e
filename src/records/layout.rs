//! # Layout Planner
//!
//! Pure placement arithmetic for packed records. Given the end of the
//! previous field, a DataType, an element count and (for `Nest`) the
//! referenced sub-schema, [`place`] returns where the field lands and how many
//! bytes it occupies. [`plan`] replays the same arithmetic over a whole
//! descriptor sequence.
//!
//! ## Packing Rules
//!
//! ```text
//! offset_0     = 0
//! offset_i     = offset_{i-1} + byte_size_{i-1}
//! byte_size_i  = count_i * element_width_i
//! total_size   = offset_{n-1} + byte_size_{n-1}
//! ```
//!
//! No alignment padding is ever inserted. `element_width` of a `Nest` field is
//! the sub-schema's `total_size` at the moment the field is placed.

use std::ops::Range;

use eyre::{bail, ensure, Result};

use crate::records::error::LayoutError;
use crate::records::schema::{FieldDescriptor, Schema};
use crate::types::DataType;

/// Byte placement of one field inside an instance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPlacement {
    pub offset: usize,
    pub byte_size: usize,
    pub element_width: usize,
}

impl FieldPlacement {
    pub fn end(&self) -> usize {
        self.offset + self.byte_size
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Byte range of one element. Caller guarantees `element < count`.
    pub fn element_range(&self, element: usize) -> Range<usize> {
        let start = self.offset + element * self.element_width;
        start..start + self.element_width
    }
}

/// Width in bytes of a single element of `data_type`.
pub fn element_width(data_type: DataType, nested: Option<&Schema>) -> Result<usize> {
    match (data_type.fixed_size(), nested) {
        (Some(size), None) => Ok(size),
        (None, Some(sub)) => {
            ensure!(sub.total_size() > 0, "cannot nest an empty schema");
            Ok(sub.total_size())
        }
        (None, None) => bail!(LayoutError::NestRequiresSchema),
        (Some(_), Some(_)) => bail!("{} fields cannot reference a sub-schema", data_type),
    }
}

/// Places a field of `count` elements immediately after `end`.
pub fn place(
    end: usize,
    data_type: DataType,
    count: usize,
    nested: Option<&Schema>,
) -> Result<FieldPlacement> {
    if count == 0 {
        bail!(LayoutError::InvalidCount { count });
    }
    let element_width = element_width(data_type, nested)?;
    let byte_size = count
        .checked_mul(element_width)
        .ok_or(LayoutError::SizeOverflow)?;
    end.checked_add(byte_size)
        .ok_or(LayoutError::SizeOverflow)?;

    Ok(FieldPlacement {
        offset: end,
        byte_size,
        element_width,
    })
}

/// Placements of a full descriptor sequence, recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    placements: Vec<FieldPlacement>,
    total_size: usize,
}

impl Layout {
    pub fn placement(&self, ordinal: usize) -> Option<&FieldPlacement> {
        self.placements.get(ordinal)
    }

    pub fn placements(&self) -> &[FieldPlacement] {
        &self.placements
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

pub fn plan(fields: &[FieldDescriptor]) -> Result<Layout> {
    let mut placements = Vec::with_capacity(fields.len());
    let mut end = 0usize;

    for field in fields {
        let placement = place(end, field.data_type(), field.count(), field.nested())?;
        end = placement.end();
        placements.push(placement);
    }

    Ok(Layout {
        placements,
        total_size: end,
    })
}
