//! # Encoding Module
//!
//! Byte formats that travel alongside instance buffers:
//!
//! - **Schema descriptors**: a versioned, self-checking export of a `Schema`
//!   so a reader can rebuild the layout that produced a byte sequence

pub mod descriptor;

pub use descriptor::{decode_schema, encode_schema, encoded_len, DescriptorHeader};
