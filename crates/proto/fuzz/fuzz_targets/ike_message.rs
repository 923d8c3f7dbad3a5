//! Fuzz target for IKE message and payload chain parsing.
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run ike_message -- -max_total_time=300
//! ```

#![no_main]
use libfuzzer_sys::fuzz_target;
use nwu_proto::ikev2::{IkeMessage, IkePayload, IkePayloadContainer, PayloadType};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut message) = IkeMessage::decode(data) {
        let serialized = message.encode().expect("Decoded message should encode");
        let reparsed = IkeMessage::decode(&serialized).expect("Round-trip parsing should never fail");
        assert_eq!(message.payloads, reparsed.payloads);

        for payload in message.payloads.payloads() {
            if let IkePayload::N(notify) = payload {
                let _ = notify.vendor_notify();
            }
        }
    }

    // Bare chains as found inside a decrypted SK payload
    if let Some((&first, rest)) = data.split_first() {
        if let Some(first) = PayloadType::from_u8(first) {
            let _ = IkePayloadContainer::decode(first, rest);
        }
    }
});
