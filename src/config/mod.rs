//! # packrec Configuration Module
//!
//! Compile-time configuration for packrec. Runtime, per-schema settings
//! (endianness, descriptor capacity) are set through
//! [`SchemaBuilder`](crate::records::SchemaBuilder); everything here is a
//! constant shared by every schema.
//!
//! ## Module Organization
//!
//! - [`constants`]: Limits and descriptor format constants with dependency documentation

pub mod constants;
pub use constants::*;
