//! # packrec Configuration Constants
//!
//! This module centralizes the numeric limits and format constants used by
//! the schema builder, the layout planner and the descriptor codec. Values
//! that depend on each other live next to each other.
//!
//! ## Dependency Graph
//!
//! ```text
//! DESCRIPTOR_HEADER_SIZE (32 bytes)
//!       │
//!       └─> magic (4) + version (4) + body_size (8) + endian (1) + reserved (15)
//!
//! DESCRIPTOR_ENTRY_SIZE (12 bytes)
//!       │
//!       └─> type code (4) + element count (8)
//!             Nest entries are followed by DESCRIPTOR_NEST_PREFIX_SIZE bytes
//!             (endian byte + nested field count) and the nested entries.
//!
//! MAX_NESTING_DEPTH (16)
//!       │
//!       ├─> Schema::add_nested rejects sub-schemas at this depth
//!       └─> decode_schema stops recursing at this depth
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `DESCRIPTOR_HEADER_SIZE` matches `size_of::<DescriptorHeader>()`
//!    (asserted next to the struct in `encoding::descriptor`)
//! 2. `DESCRIPTOR_ENTRY_SIZE == size_of::<u32>() + size_of::<u64>()`
//! 3. `MAX_NESTING_DEPTH > 0`

// ============================================================================
// SCHEMA CONFIGURATION
// ============================================================================

/// Initial capacity reserved for field descriptors by `Schema::new`.
/// Appends past this grow the descriptor vector geometrically.
pub const INITIAL_FIELD_CAPACITY: usize = 16;

/// Maximum depth of `Nest` fields. A flat schema has depth 0; nesting a
/// schema of depth `d` produces a parent of depth `d + 1`.
pub const MAX_NESTING_DEPTH: usize = 16;

const _: () = assert!(MAX_NESTING_DEPTH > 0, "MAX_NESTING_DEPTH must allow at least one level");

// ============================================================================
// SCHEMA DESCRIPTOR FORMAT
// ============================================================================

/// Magic bytes at the start of an exported schema descriptor.
pub const DESCRIPTOR_MAGIC: &[u8; 4] = b"PKRC";

/// Descriptor format version written by `encode_schema`.
pub const DESCRIPTOR_VERSION: u32 = 1;

/// Size of the fixed descriptor header.
pub const DESCRIPTOR_HEADER_SIZE: usize = 32;

/// Size of the field-count prefix at the start of every descriptor body.
pub const DESCRIPTOR_COUNT_SIZE: usize = 8;

/// Size of one field entry: u32 type code followed by u64 element count.
pub const DESCRIPTOR_ENTRY_SIZE: usize = 12;

/// Extra bytes following a Nest entry before the nested entries:
/// one endian byte plus the nested field count.
pub const DESCRIPTOR_NEST_PREFIX_SIZE: usize = 1 + DESCRIPTOR_COUNT_SIZE;

const _: () = assert!(
    DESCRIPTOR_ENTRY_SIZE == std::mem::size_of::<u32>() + std::mem::size_of::<u64>(),
    "DESCRIPTOR_ENTRY_SIZE must equal the packed type code + count width"
);
