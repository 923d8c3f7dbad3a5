//! Fuzz target for EAP packet parsing.
//!
//! Covers the envelope and the MD5, AKA and expanded (EAP-5G) method
//! decoders, plus AT_MAC verification.
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run eap_packet -- -max_total_time=300
//! ```

#![no_main]
use libfuzzer_sys::fuzz_target;
use nwu_proto::eap::{Eap, Eap5gDirection, Eap5gMessage, EapTypeData, MacProvider};

struct ZeroMac;

impl MacProvider for ZeroMac {
    fn compute_mac(&self, _message: &[u8]) -> nwu_proto::Result<[u8; 16]> {
        Ok([0u8; 16])
    }
}

fuzz_target!(|data: &[u8]| {
    let _ = Eap::verify_mac(data, &ZeroMac);

    if let Ok(eap) = Eap::decode(data) {
        // A decoded packet must encode and decode back to itself
        let serialized = eap.encode().expect("Decoded packet should encode");
        let reparsed = Eap::decode(&serialized).expect("Round-trip parsing should never fail");
        assert_eq!(eap, reparsed);

        if let Some(EapTypeData::Expanded(expanded)) = &eap.type_data {
            let _ = Eap5gMessage::parse(&expanded.vendor_data, Eap5gDirection::ToUe);
            let _ = Eap5gMessage::parse(&expanded.vendor_data, Eap5gDirection::ToGateway);
        }
    }
});
