//! # Schema Descriptors
//!
//! Instance bytes carry no header, so a reader needs the exact schema that
//! produced them. This module exports a `Schema` as a compact, self-checking
//! byte descriptor and rebuilds an equivalent schema from one.
//!
//! ## Descriptor Layout
//!
//! ```text
//! +---------------------------+
//! | DescriptorHeader (32B)    |  magic, version, body_size, endian
//! +---------------------------+
//! | field_count: u64          |
//! | entry 0: code u32, n u64  |
//! | entry 1 ...               |
//! |   Nest entry:             |
//! |     endian: u8            |
//! |     nested body (recurse) |
//! +---------------------------+
//! ```
//!
//! All descriptor integers are little-endian regardless of the schema's own
//! endianness; the schema endianness is carried as data.
//!
//! ## Validation
//!
//! `decode_schema` rejects, before building anything that could be observed:
//! - wrong magic or unsupported version
//! - `body_size` that disagrees with the buffer
//! - unknown type or endian codes
//! - truncated entries and trailing bytes
//! - nesting deeper than `MAX_NESTING_DEPTH`
//!
//! Field-level rules (zero counts, empty nested schemas) are enforced by the
//! same `Schema::add_field`/`add_nested` calls used to build schemas by hand,
//! so a decoded schema obeys every invariant a hand-built one does.

use eyre::{bail, ensure, eyre, Result};
use tracing::{debug, trace};
use zerocopy::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{
    DESCRIPTOR_COUNT_SIZE, DESCRIPTOR_ENTRY_SIZE, DESCRIPTOR_HEADER_SIZE, DESCRIPTOR_MAGIC,
    DESCRIPTOR_NEST_PREFIX_SIZE, DESCRIPTOR_VERSION, MAX_NESTING_DEPTH,
};
use crate::records::Schema;
use crate::types::{DataType, Endian};

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct DescriptorHeader {
    magic: [u8; 4],
    version: U32,
    body_size: U64,
    endian: u8,
    reserved: [u8; 15],
}

const _: () = assert!(std::mem::size_of::<DescriptorHeader>() == DESCRIPTOR_HEADER_SIZE);

impl DescriptorHeader {
    pub fn new(endian: Endian, body_size: u64) -> Self {
        Self {
            magic: *DESCRIPTOR_MAGIC,
            version: U32::new(DESCRIPTOR_VERSION),
            body_size: U64::new(body_size),
            endian: endian.code(),
            reserved: [0u8; 15],
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= DESCRIPTOR_HEADER_SIZE,
            "buffer too small for DescriptorHeader: {} < {}",
            bytes.len(),
            DESCRIPTOR_HEADER_SIZE
        );

        let header = Self::ref_from_bytes(&bytes[..DESCRIPTOR_HEADER_SIZE])
            .map_err(|e| eyre!("failed to parse DescriptorHeader: {:?}", e))?;

        ensure!(
            &header.magic == DESCRIPTOR_MAGIC,
            "invalid magic bytes in schema descriptor"
        );

        ensure!(
            header.version.get() == DESCRIPTOR_VERSION,
            "unsupported descriptor version: {} (expected {})",
            header.version.get(),
            DESCRIPTOR_VERSION
        );

        Ok(header)
    }

    zerocopy_getters! {
        version: u32,
        body_size: u64,
    }

    pub fn endian(&self) -> Result<Endian> {
        Endian::try_from(self.endian)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct DescriptorEntry {
    code: U32,
    count: U64,
}

const _: () = assert!(std::mem::size_of::<DescriptorEntry>() == DESCRIPTOR_ENTRY_SIZE);

fn body_len(schema: &Schema) -> usize {
    DESCRIPTOR_COUNT_SIZE
        + schema
            .fields()
            .iter()
            .map(|field| match field.nested() {
                Some(sub) => DESCRIPTOR_ENTRY_SIZE + 1 + body_len(sub),
                None => DESCRIPTOR_ENTRY_SIZE,
            })
            .sum::<usize>()
}

/// Exact size of `encode_schema(schema)`.
pub fn encoded_len(schema: &Schema) -> usize {
    DESCRIPTOR_HEADER_SIZE + body_len(schema)
}

pub fn encode_schema(schema: &Schema) -> Vec<u8> {
    let body = body_len(schema);
    let mut out = Vec::with_capacity(DESCRIPTOR_HEADER_SIZE + body);

    let header = DescriptorHeader::new(schema.endian(), body as u64);
    out.extend_from_slice(header.as_bytes());
    encode_body(schema, &mut out);

    debug_assert_eq!(out.len(), DESCRIPTOR_HEADER_SIZE + body);
    trace!(
        fields = schema.field_count(),
        bytes = out.len(),
        "encoded schema descriptor"
    );
    out
}

fn encode_body(schema: &Schema, out: &mut Vec<u8>) {
    out.extend_from_slice(U64::new(schema.field_count() as u64).as_bytes());
    for field in schema.fields() {
        let entry = DescriptorEntry {
            code: U32::new(field.data_type().code() as u32),
            count: U64::new(field.count() as u64),
        };
        out.extend_from_slice(entry.as_bytes());

        if let Some(sub) = field.nested() {
            out.push(sub.endian().code());
            encode_body(sub, out);
        }
    }
}

pub fn decode_schema(bytes: &[u8]) -> Result<Schema> {
    let header = DescriptorHeader::from_bytes(bytes)?;
    let body = &bytes[DESCRIPTOR_HEADER_SIZE..];

    if header.body_size() != body.len() as u64 {
        debug!(
            declared = header.body_size(),
            actual = body.len(),
            "schema descriptor size mismatch"
        );
        bail!(
            "descriptor body size mismatch: header declares {} bytes, found {}",
            header.body_size(),
            body.len()
        );
    }

    let mut reader = BodyReader { bytes: body };
    let schema = reader.schema(header.endian()?, 0)?;

    ensure!(
        reader.bytes.is_empty(),
        "{} trailing bytes after schema descriptor body",
        reader.bytes.len()
    );

    trace!(
        fields = schema.field_count(),
        total_size = schema.total_size(),
        "decoded schema descriptor"
    );
    Ok(schema)
}

struct BodyReader<'a> {
    bytes: &'a [u8],
}

impl BodyReader<'_> {
    fn schema(&mut self, endian: Endian, depth: usize) -> Result<Schema> {
        ensure!(
            depth <= MAX_NESTING_DEPTH,
            "schema descriptor nests deeper than {}",
            MAX_NESTING_DEPTH
        );

        let field_count = self.u64()?;
        let max_fields = (self.bytes.len() / DESCRIPTOR_ENTRY_SIZE) as u64;
        ensure!(
            field_count <= max_fields,
            "descriptor declares {} fields but only {} bytes remain",
            field_count,
            self.bytes.len()
        );

        let mut schema = Schema::with_endian(endian);
        for _ in 0..field_count {
            let entry = self.entry()?;
            let count = usize::try_from(entry.count.get())
                .map_err(|_| eyre!("element count {} exceeds usize", entry.count.get()))?;
            let code = u8::try_from(entry.code.get())
                .map_err(|_| eyre!("invalid DataType code: {}", entry.code.get()))?;

            match DataType::try_from(code)? {
                DataType::Nest => {
                    ensure!(
                        self.bytes.len() >= DESCRIPTOR_NEST_PREFIX_SIZE,
                        "truncated nested schema prefix"
                    );
                    let nested_endian = Endian::try_from(self.u8()?)?;
                    let sub = self.schema(nested_endian, depth + 1)?;
                    schema.add_nested(sub, count)?;
                }
                data_type => {
                    schema.add_field(data_type, count)?;
                }
            }
        }
        Ok(schema)
    }

    fn entry(&mut self) -> Result<DescriptorEntry> {
        let (entry, rest) = DescriptorEntry::read_from_prefix(self.bytes)
            .map_err(|_| eyre!("truncated field entry in schema descriptor"))?;
        self.bytes = rest;
        Ok(entry)
    }

    fn u64(&mut self) -> Result<u64> {
        let (value, rest) = U64::read_from_prefix(self.bytes)
            .map_err(|_| eyre!("truncated field count in schema descriptor"))?;
        self.bytes = rest;
        Ok(value.get())
    }

    fn u8(&mut self) -> Result<u8> {
        let (&first, rest) = self
            .bytes
            .split_first()
            .ok_or_else(|| eyre!("truncated endian byte in schema descriptor"))?;
        self.bytes = rest;
        Ok(first)
    }
}
