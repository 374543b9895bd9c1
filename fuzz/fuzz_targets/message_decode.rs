//! Fuzz target for message decoding
//!
//! Feeds arbitrary bytes to the inbound frame decoder to find:
//! - Parser crashes or panics
//! - Payloads that decode but do not survive re-encoding
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tchat_proto::{decode, decode_bytes, encode};

fuzz_target!(|data: &[u8]| {
    let Ok(message) = decode_bytes(data) else {
        return;
    };

    // Anything accepted once must round-trip
    let json = encode(&message).expect("decoded message must encode");
    let again = decode(&json).expect("encoded message must decode");
    assert_eq!(message, again);
});
