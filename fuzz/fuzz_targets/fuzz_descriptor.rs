//! Fuzz testing for the schema descriptor decoder.
//!
//! Feeds arbitrary bytes to `decode_schema`. Decoding must never panic, and
//! any schema it accepts must re-encode to the same body. Reserved header
//! bytes are ignored on decode, so only the body is compared.

#![no_main]

use libfuzzer_sys::fuzz_target;

use packrec::config::DESCRIPTOR_HEADER_SIZE;
use packrec::encoding::{decode_schema, encode_schema, encoded_len};

fuzz_target!(|data: &[u8]| {
    if let Ok(schema) = decode_schema(data) {
        let encoded = encode_schema(&schema);
        assert_eq!(encoded.len(), encoded_len(&schema));
        assert_eq!(encoded.len(), data.len());
        assert_eq!(&encoded[DESCRIPTOR_HEADER_SIZE..], &data[DESCRIPTOR_HEADER_SIZE..]);
        assert!(schema.verify_layout().is_ok());
    }
});
