//! Decoder Robustness Tests
//!
//! Every decoder is bounded by its input: arbitrary bytes produce a value or
//! an error, never a panic or an out-of-bounds read.

use nwu_proto::eap::{
    AkaAttrType, AkaSubtype, AnParameter, Eap, Eap5gDirection, Eap5gMessage, EapAka, EapCode,
    EapExpanded, EapMd5, EapMethod, MacProvider,
};
use nwu_proto::ikev2::{
    AuthPayload, CertPayload, CertReqPayload, ConfigurationAttribute, CpPayload, DeletePayload,
    IdPayload, IkeHeader, IkeMessage, IkePayload, IkePayloadContainer, IndividualTrafficSelector,
    KePayload, NoncePayload, NotifyPayload, PayloadType, Proposal, QosInfo, SaPayload, SkPayload,
    Transform, TransformAttribute, TsPayload, VendorIdPayload,
};
use proptest::prelude::*;

const PAYLOAD_TYPES: [PayloadType; 17] = [
    PayloadType::None,
    PayloadType::SA,
    PayloadType::KE,
    PayloadType::IDi,
    PayloadType::IDr,
    PayloadType::CERT,
    PayloadType::CERTREQ,
    PayloadType::AUTH,
    PayloadType::Nonce,
    PayloadType::N,
    PayloadType::D,
    PayloadType::V,
    PayloadType::TSi,
    PayloadType::TSr,
    PayloadType::SK,
    PayloadType::CP,
    PayloadType::EAP,
];

struct SumMac;

impl MacProvider for SumMac {
    fn compute_mac(&self, message: &[u8]) -> nwu_proto::Result<[u8; 16]> {
        let mut mac = [0u8; 16];
        for (i, byte) in message.iter().enumerate() {
            mac[i % 16] = mac[i % 16].wrapping_mul(31).wrapping_add(*byte);
        }
        Ok(mac)
    }
}

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Bytes that start with a plausible EAP header so the method decoders run
fn arb_eap_packet() -> impl Strategy<Value = Vec<u8>> {
    (
        1u8..=4,
        any::<u8>(),
        prop::sample::select(vec![4u8, 23, 254]),
        prop::collection::vec(any::<u8>(), 0..256),
    )
        .prop_map(|(code, id, eap_type, body)| {
            let length = (5 + body.len()) as u16;
            let mut packet = vec![code, id];
            packet.extend_from_slice(&length.to_be_bytes());
            packet.push(eap_type);
            packet.extend_from_slice(&body);
            packet
        })
}

fn small_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..24)
}

fn arb_transform() -> impl Strategy<Value = Transform> {
    let attribute = prop_oneof![
        Just(None),
        (0u16..0x8000, any::<u16>())
            .prop_map(|(attr_type, value)| Some(TransformAttribute::Fixed { attr_type, value })),
        (0u16..0x8000, small_bytes())
            .prop_map(|(attr_type, value)| Some(TransformAttribute::Variable { attr_type, value })),
    ];
    (any::<u8>(), any::<u16>(), attribute).prop_map(|(transform_type, transform_id, attribute)| {
        Transform {
            transform_type,
            transform_id,
            attribute,
        }
    })
}

fn arb_proposal() -> impl Strategy<Value = Proposal> {
    (
        any::<u8>(),
        any::<u8>(),
        prop::collection::vec(any::<u8>(), 0..9),
        prop::collection::vec(arb_transform(), 0..5),
    )
        .prop_map(|(proposal_number, protocol_id, spi, transforms)| Proposal {
            proposal_number,
            protocol_id,
            spi,
            transforms,
        })
}

fn arb_selector() -> impl Strategy<Value = IndividualTrafficSelector> {
    let addresses = prop_oneof![
        (any::<[u8; 4]>(), any::<[u8; 4]>()).prop_map(|(a, b)| (7u8, a.to_vec(), b.to_vec())),
        (any::<[u8; 16]>(), any::<[u8; 16]>()).prop_map(|(a, b)| (8u8, a.to_vec(), b.to_vec())),
    ];
    (addresses, any::<u8>(), any::<u16>(), any::<u16>()).prop_map(
        |((ts_type, start_address, end_address), ip_protocol_id, start_port, end_port)| {
            IndividualTrafficSelector {
                ts_type,
                ip_protocol_id,
                start_port,
                end_port,
                start_address,
                end_address,
            }
        },
    )
}

fn arb_ts() -> impl Strategy<Value = TsPayload> {
    prop::collection::vec(arb_selector(), 0..4).prop_map(|selectors| TsPayload { selectors })
}

fn arb_eap() -> impl Strategy<Value = Eap> {
    prop_oneof![
        any::<u8>().prop_map(Eap::success),
        any::<u8>().prop_map(Eap::failure),
        any::<u8>().prop_map(|id| {
            Eap::with_type_data(EapCode::Request, id, EapExpanded::eap5g_start())
        }),
        (any::<u8>(), prop::collection::vec(any::<u8>(), 1..32)).prop_map(|(id, pdu)| {
            Eap::with_type_data(EapCode::Request, id, EapExpanded::eap5g_nas(&pdu).unwrap())
        }),
    ]
}

/// Any payload except SK, which can only close a chain
fn arb_inner_payload() -> impl Strategy<Value = IkePayload> {
    prop_oneof![
        prop::collection::vec(arb_proposal(), 0..3).prop_map(|p| IkePayload::SA(SaPayload::new(p))),
        (any::<u16>(), small_bytes()).prop_map(|(g, d)| IkePayload::KE(KePayload::new(g, d))),
        (any::<u8>(), small_bytes()).prop_map(|(t, d)| IkePayload::IDi(IdPayload::new(t, d))),
        (any::<u8>(), small_bytes()).prop_map(|(t, d)| IkePayload::IDr(IdPayload::new(t, d))),
        (any::<u8>(), small_bytes())
            .prop_map(|(encoding, data)| IkePayload::CERT(CertPayload { encoding, data })),
        (any::<u8>(), small_bytes()).prop_map(|(encoding, authority)| {
            IkePayload::CERTREQ(CertReqPayload { encoding, authority })
        }),
        (any::<u8>(), small_bytes()).prop_map(|(m, d)| IkePayload::AUTH(AuthPayload::new(m, d))),
        small_bytes().prop_map(|nonce| IkePayload::Nonce(NoncePayload { nonce })),
        (any::<u8>(), any::<u16>(), prop::collection::vec(any::<u8>(), 0..9), small_bytes())
            .prop_map(|(p, t, spi, d)| IkePayload::N(NotifyPayload::new(p, t, &spi, &d))),
        (any::<u8>(), prop::collection::vec(any::<u32>(), 0..4)).prop_map(|(p, spis)| {
            IkePayload::D(DeletePayload::new(p, 4, spis.len() as u16, &spis))
        }),
        small_bytes().prop_map(|vendor_id| IkePayload::V(VendorIdPayload { vendor_id })),
        arb_ts().prop_map(IkePayload::TSi),
        arb_ts().prop_map(IkePayload::TSr),
        (
            any::<u8>(),
            prop::collection::vec((0u16..0x8000, small_bytes()), 0..4),
        )
            .prop_map(|(cfg_type, attrs)| {
                let attributes = attrs
                    .into_iter()
                    .map(|(attr_type, value)| ConfigurationAttribute { attr_type, value })
                    .collect();
                IkePayload::CP(CpPayload {
                    cfg_type,
                    attributes,
                })
            }),
        arb_eap().prop_map(IkePayload::EAP),
    ]
}

fn arb_sk() -> impl Strategy<Value = IkePayload> {
    (prop::sample::select(PAYLOAD_TYPES.to_vec()), small_bytes())
        .prop_map(|(next, data)| IkePayload::SK(SkPayload::new(next, data)))
}

/// Containers the encoder accepts, with the Critical bit set at random
fn arb_container() -> impl Strategy<Value = IkePayloadContainer> {
    (
        prop::collection::vec((arb_inner_payload(), any::<bool>()), 0..6),
        prop::option::of((arb_sk(), any::<bool>())),
    )
        .prop_map(|(payloads, sk)| {
            let mut container = IkePayloadContainer::new();
            for (payload, critical) in payloads.into_iter().chain(sk) {
                if critical {
                    container.push_critical(payload);
                } else {
                    container.push(payload);
                }
            }
            container
        })
}

proptest! {
    #[test]
    fn eap_decoders_never_panic(data in arb_bytes()) {
        let _ = Eap::decode(&data);
        let _ = EapMd5::decode(&data);
        let _ = EapAka::decode(&data);
        let _ = EapExpanded::decode(&data);
        let _ = Eap5gMessage::parse(&data, Eap5gDirection::ToUe);
        let _ = Eap5gMessage::parse(&data, Eap5gDirection::ToGateway);
        let _ = AnParameter::decode_list(&data);
        let _ = Eap::verify_mac(&data, &SumMac);
    }

    #[test]
    fn framed_eap_never_panics(packet in arb_eap_packet()) {
        let _ = Eap::decode(&packet);
        let _ = Eap::verify_mac(&packet, &SumMac);
    }

    #[test]
    fn ikev2_decoders_never_panic(data in arb_bytes()) {
        for payload_type in PAYLOAD_TYPES {
            let _ = IkePayloadContainer::decode(payload_type, &data);
        }
        let _ = IkeHeader::from_bytes(&data);
        let _ = IkeMessage::decode(&data);
        let _ = SaPayload::from_payload_data(&data);
        let _ = TsPayload::from_payload_data(&data);
        let _ = CpPayload::from_payload_data(&data);
        let _ = DeletePayload::from_payload_data(&data);
        let _ = QosInfo::decode(&data);
        if let Ok(notify) = NotifyPayload::from_payload_data(&data) {
            let _ = notify.vendor_notify();
        }
    }

    #[test]
    fn built_chains_reencode_identically(container in arb_container()) {
        let data = container.encode().unwrap();
        let decoded = IkePayloadContainer::decode(container.first_payload_type(), &data).unwrap();
        prop_assert_eq!(&decoded, &container);

        let reencoded = decoded.encode().unwrap();
        prop_assert_eq!(reencoded, data);
    }

    #[test]
    fn accepted_bytes_reencode_to_a_fixed_point(data in arb_bytes()) {
        // Reserved fields are normalized on the first pass, never after
        if let Ok(payloads) = IkePayloadContainer::decode(PayloadType::Nonce, &data) {
            let reencoded = payloads.encode().unwrap();
            let again = IkePayloadContainer::decode(PayloadType::Nonce, &reencoded).unwrap();
            prop_assert_eq!(&again, &payloads);
            prop_assert_eq!(again.encode().unwrap(), reencoded);
        }
    }

    #[test]
    fn aka_mac_verifies_after_encode(
        rand in prop::array::uniform16(any::<u8>()),
        autn in prop::array::uniform16(any::<u8>()),
        identifier in any::<u8>(),
    ) {
        let mut aka = EapAka::new(AkaSubtype::CHALLENGE);
        aka.set_attr(AkaAttrType::RAND, &rand).unwrap();
        aka.set_attr(AkaAttrType::AUTN, &autn).unwrap();

        let mut eap = Eap::with_type_data(EapCode::Request, identifier, aka);
        let bytes = eap.encode_with_mac(&SumMac).unwrap();
        prop_assert!(Eap::verify_mac(&bytes, &SumMac).unwrap());
    }
}
