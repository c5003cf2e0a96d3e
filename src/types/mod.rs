//! # Type System for packrec
//!
//! ## Module Structure
//!
//! - `data_type`: The primitive `DataType` catalog and schema `Endian`
//! - `value`: The closed `Value` variant and the `Primitive` mapping trait
//!
//! ## Usage
//!
//! ```ignore
//! use packrec::types::{DataType, Primitive, Value};
//!
//! let v = Value::from(42i32);
//! assert_eq!(v.data_type(), DataType::Int32);
//! assert_eq!(i32::from_value(v), Some(42));
//! ```

mod data_type;
mod value;

pub use data_type::{DataType, Endian};
pub use value::{Primitive, Value};
