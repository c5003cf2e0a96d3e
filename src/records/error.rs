//! # Layout Error Kinds
//!
//! Every fallible packrec operation returns `eyre::Result`. Failures that a
//! caller may want to branch on are raised as a `LayoutError` so they can be
//! recovered from the report:
//!
//! ```ignore
//! match instance.set_value(3, Value::Int8(1)) {
//!     Err(e) if matches!(
//!         e.downcast_ref::<LayoutError>(),
//!         Some(LayoutError::TypeMismatch { .. })
//!     ) => { /* ... */ }
//!     other => other?,
//! }
//! ```
//!
//! Use-after-destroy and double-destroy have no variant: `destroy` consumes
//! its receiver and instances borrow their schema, so neither compiles.

use crate::types::DataType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A field name has no ordinal in the `FieldIndex`.
    FieldNotFound { name: String },
    /// A field name was defined twice in the same `FieldIndex`.
    DuplicateField { name: String },
    IndexOutOfRange { ordinal: usize, field_count: usize },
    ElementOutOfRange { ordinal: usize, element: usize, count: usize },
    TypeMismatch { ordinal: usize, expected: DataType, actual: DataType },
    /// Byte length differs from the size required by the schema or field.
    SizeMismatch { expected: usize, actual: usize },
    /// Whole-field write supplied the wrong number of elements.
    CountMismatch { ordinal: usize, expected: usize, actual: usize },
    InvalidCount { count: usize },
    NestRequiresSchema,
    NestingTooDeep { depth: usize, max: usize },
    /// Append attempted after an instance was created from the schema.
    SchemaFrozen { field_count: usize },
    SizeOverflow,
    AllocationFailure { requested: usize },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::FieldNotFound { name } => write!(f, "field '{}' not found", name),
            LayoutError::DuplicateField { name } => {
                write!(f, "field '{}' is already defined", name)
            }
            LayoutError::IndexOutOfRange {
                ordinal,
                field_count,
            } => write!(
                f,
                "field index {} out of range (field count {})",
                ordinal, field_count
            ),
            LayoutError::ElementOutOfRange {
                ordinal,
                element,
                count,
            } => write!(
                f,
                "element {} out of range for field {} (count {})",
                element, ordinal, count
            ),
            LayoutError::TypeMismatch {
                ordinal,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for field {}: expected {}, got {}",
                ordinal, expected, actual
            ),
            LayoutError::SizeMismatch { expected, actual } => write!(
                f,
                "size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            LayoutError::CountMismatch {
                ordinal,
                expected,
                actual,
            } => write!(
                f,
                "count mismatch for field {}: expected {} elements, got {}",
                ordinal, expected, actual
            ),
            LayoutError::InvalidCount { count } => {
                write!(f, "invalid field count {}: must be at least 1", count)
            }
            LayoutError::NestRequiresSchema => {
                write!(f, "nest fields must be added with a sub-schema")
            }
            LayoutError::NestingTooDeep { depth, max } => write!(
                f,
                "nesting depth {} exceeds maximum {}",
                depth, max
            ),
            LayoutError::SchemaFrozen { field_count } => write!(
                f,
                "schema is frozen at {} fields: instances already exist",
                field_count
            ),
            LayoutError::SizeOverflow => write!(f, "schema size overflows usize"),
            LayoutError::AllocationFailure { requested } => {
                write!(f, "failed to allocate {} bytes", requested)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Returns the `LayoutError` carried by a report, if any.
pub fn layout_error(report: &eyre::Report) -> Option<&LayoutError> {
    report.downcast_ref::<LayoutError>()
}
