//! # Serializer
//!
//! Byte-sequence conversion for instances. The serialized form is the
//! instance buffer itself: no header, framing, checksum or version. A byte
//! sequence is only meaningful next to the exact schema that produced it;
//! ship the schema separately (see `encoding::descriptor`) when the reader
//! does not already have it.
//!
//! Round-trip law: `deserialize(s, &serialize(&i))` is byte-identical to `i`.

use eyre::Result;

use crate::records::accessor::FieldRead;
use crate::records::instance::Instance;
use crate::records::schema::Schema;

pub fn serialize<R: FieldRead + ?Sized>(record: &R) -> Vec<u8> {
    record.as_bytes().to_vec()
}

/// Appends the record's bytes to `out`, reusing its allocation.
pub fn serialize_into<R: FieldRead + ?Sized>(record: &R, out: &mut Vec<u8>) {
    out.extend_from_slice(record.as_bytes());
}

pub fn deserialize<'s>(schema: &'s Schema, bytes: &[u8]) -> Result<Instance<'s>> {
    Instance::from_bytes(schema, bytes)
}
