//! # Field Name Index
//!
//! Schemas address fields by ordinal only and never store names. Callers
//! that want named access keep a `FieldIndex` next to the schema: it maps
//! names to the ordinals returned by `add_field`/`add_nested`.
//!
//! ```ignore
//! let mut schema = Schema::new();
//! let mut names = FieldIndex::new();
//! names.define(&mut schema, "x", DataType::Float32, 1)?;
//! names.define(&mut schema, "y", DataType::Float32, 1)?;
//!
//! let mut point = schema.create_instance()?;
//! point.set(names.ordinal("y")?, 2.2f32)?;
//! ```

use std::sync::Arc;

use eyre::{bail, Result};
use hashbrown::HashMap;

use crate::records::error::LayoutError;
use crate::records::schema::Schema;
use crate::types::DataType;

#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    ordinals: HashMap<String, usize>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field to `schema` and records its ordinal under `name`.
    /// The name is checked first, so a duplicate leaves the schema untouched.
    pub fn define(
        &mut self,
        schema: &mut Schema,
        name: &str,
        data_type: DataType,
        count: usize,
    ) -> Result<usize> {
        self.check_unused(name)?;
        let ordinal = schema.add_field(data_type, count)?;
        self.ordinals.insert(name.to_string(), ordinal);
        Ok(ordinal)
    }

    pub fn define_nested(
        &mut self,
        schema: &mut Schema,
        name: &str,
        sub: impl Into<Arc<Schema>>,
        count: usize,
    ) -> Result<usize> {
        self.check_unused(name)?;
        let ordinal = schema.add_nested(sub, count)?;
        self.ordinals.insert(name.to_string(), ordinal);
        Ok(ordinal)
    }

    /// Records a name for an ordinal that already exists in some schema.
    pub fn insert(&mut self, name: &str, ordinal: usize) -> Result<()> {
        self.check_unused(name)?;
        self.ordinals.insert(name.to_string(), ordinal);
        Ok(())
    }

    pub fn ordinal(&self, name: &str) -> Result<usize> {
        match self.ordinals.get(name) {
            Some(&ordinal) => Ok(ordinal),
            None => bail!(LayoutError::FieldNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ordinals.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// Names in ordinal order.
    pub fn names(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, usize)> = self
            .ordinals
            .iter()
            .map(|(name, &ordinal)| (name.as_str(), ordinal))
            .collect();
        entries.sort_by_key(|&(_, ordinal)| ordinal);
        entries.into_iter().map(|(name, _)| name).collect()
    }

    fn check_unused(&self, name: &str) -> Result<()> {
        if self.ordinals.contains_key(name) {
            bail!(LayoutError::DuplicateField {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
