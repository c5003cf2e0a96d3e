//! # Internal Macros
//!
//! Getter generator for zerocopy header structs whose integer fields use the
//! little-endian wrapper types (`U32`, `U64`).
//!
//! ```ignore
//! use zerocopy::little_endian::{U32, U64};
//!
//! #[repr(C)]
//! struct Header {
//!     version: U32,
//!     body_size: U64,
//! }
//!
//! impl Header {
//!     zerocopy_getters! {
//!         version: u32,
//!         body_size: u64,
//!     }
//! }
//!
//! // Generates:
//! // pub fn version(&self) -> u32 { self.version.get() }
//! // pub fn body_size(&self) -> u64 { self.body_size.get() }
//! ```

/// Generates getter methods for zerocopy little-endian fields.
#[macro_export]
macro_rules! zerocopy_getters {
    ($($field:ident : $native_ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $field(&self) -> $native_ty {
                self.$field.get()
            }
        )*
    };
}
