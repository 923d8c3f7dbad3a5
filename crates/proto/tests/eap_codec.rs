//! EAP Codec Integration Tests
//!
//! Full-packet vectors for EAP-MD5, EAP-AKA (including the AT_MAC
//! placeholder flow) and EAP-5G.

use nwu_proto::eap::expanded::eap5g;
use nwu_proto::eap::{
    AkaAttrType, AkaSubtype, AnParameter, Eap, Eap5gDirection, Eap5gMessage, EapAka, EapCode,
    EapExpanded, EapMd5, EapTypeData, MacProvider,
};
use nwu_proto::{ErrorKind, Result};

/// Deterministic stand-in for HMAC-SHA1-128 keyed with K_aut
struct FoldMac {
    key: u8,
}

impl MacProvider for FoldMac {
    fn compute_mac(&self, message: &[u8]) -> Result<[u8; 16]> {
        let mut mac = [self.key; 16];
        for (i, byte) in message.iter().enumerate() {
            mac[i % 16] = mac[i % 16].rotate_left(3) ^ byte;
        }
        Ok(mac)
    }
}

const CHALLENGE: [u8; 16] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10,
];

#[test]
fn test_md5_challenge_packet() {
    let eap = Eap::with_type_data(
        EapCode::Request,
        7,
        EapMd5::new(&CHALLENGE, "testuser").unwrap(),
    );
    let bytes = eap.encode().unwrap();

    let mut expected = vec![1, 7, 0, 30, 4, 16];
    expected.extend_from_slice(&CHALLENGE);
    expected.extend_from_slice(b"testuser");
    assert_eq!(bytes, expected);

    let decoded = Eap::decode(&bytes).unwrap();
    match decoded.type_data {
        Some(EapTypeData::Md5(md5)) => {
            assert_eq!(md5.value, CHALLENGE.to_vec());
            assert_eq!(md5.name_str(), Some("testuser"));
        }
        other => panic!("unexpected type data {:?}", other),
    }
}

#[test]
fn test_md5_rejects_short_value() {
    assert_eq!(
        EapMd5::new(&CHALLENGE[..15], "testuser").unwrap_err().kind(),
        ErrorKind::Validation
    );

    let mut bytes = vec![1, 7, 0, 21, 4, 15];
    bytes.extend_from_slice(&CHALLENGE[..15]);
    assert!(Eap::decode(&bytes).is_err());
}

fn aka_challenge() -> EapAka {
    let mut aka = EapAka::new(AkaSubtype::CHALLENGE);
    aka.set_attr(AkaAttrType::RAND, &[0xAA; 16]).unwrap();
    aka.set_attr(AkaAttrType::AUTN, &[0xBB; 16]).unwrap();
    aka
}

#[test]
fn test_aka_challenge_with_mac() {
    let provider = FoldMac { key: 0x5C };
    let mut eap = Eap::with_type_data(EapCode::Request, 3, aka_challenge());

    let bytes = eap.encode_with_mac(&provider).unwrap();
    assert_eq!(bytes.len(), 4 + 4 + 3 * 20);
    assert_eq!(&bytes[..8], &[1, 3, 0, 68, 23, 1, 0, 0]);
    assert_eq!(&bytes[8..12], &[1, 5, 0, 0]);
    assert_eq!(&bytes[28..32], &[2, 5, 0, 0]);
    assert_eq!(&bytes[48..52], &[11, 5, 0, 0]);
    assert_eq!(eap.mac_value_offset(), Some(52));

    // MAC is computed over the packet with a zeroed slot
    let mut zeroed = bytes.clone();
    zeroed[52..68].fill(0);
    assert_eq!(&bytes[52..68], &provider.compute_mac(&zeroed).unwrap());

    // The stored attribute carries the computed MAC
    let stored = eap.aka_mut().unwrap().get_attr(AkaAttrType::MAC).unwrap().value.clone();
    assert_eq!(stored, bytes[52..68].to_vec());

    assert!(Eap::verify_mac(&bytes, &provider).unwrap());
    assert!(!Eap::verify_mac(&bytes, &FoldMac { key: 0x36 }).unwrap());

    let mut tampered = bytes.clone();
    tampered[10] ^= 0x01;
    assert!(!Eap::verify_mac(&tampered, &provider).unwrap());
}

#[test]
fn test_aka_verify_mac_without_mac() {
    let eap = Eap::with_type_data(EapCode::Request, 3, aka_challenge());
    let bytes = eap.encode().unwrap();
    assert_eq!(
        Eap::verify_mac(&bytes, &FoldMac { key: 0 }).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_aka_response_round_trip() {
    let mut aka = EapAka::new(AkaSubtype::CHALLENGE);
    aka.set_attr(AkaAttrType::RES, &[0x11; 8]).unwrap();
    aka.init_mac().unwrap();

    let eap = Eap::with_type_data(EapCode::Response, 3, aka);
    let bytes = eap.encode().unwrap();
    // RES (length 4 units: header, 64-bit RES) precedes MAC
    assert_eq!(&bytes[8..12], &[3, 3, 0, 64]);

    let decoded = Eap::decode(&bytes).unwrap();
    match &decoded.type_data {
        Some(EapTypeData::Aka(aka)) => {
            let res = aka.get_attr(AkaAttrType::RES).unwrap();
            assert_eq!(res.res(), Some(&[0x11u8; 8][..]));
            assert_eq!(
                aka.attr_types(),
                vec![AkaAttrType::RES, AkaAttrType::MAC]
            );
        }
        other => panic!("unexpected type data {:?}", other),
    }
}

#[test]
fn test_aka_identity_request_and_response() {
    let mut request = EapAka::new(AkaSubtype::IDENTITY);
    request.set_attr(AkaAttrType::ANY_ID_REQ, &[]).unwrap();
    let bytes = Eap::with_type_data(EapCode::Request, 1, request)
        .encode()
        .unwrap();
    assert_eq!(bytes, vec![1, 1, 0, 12, 23, 5, 0, 0, 13, 1, 0, 0]);

    let mut response = EapAka::new(AkaSubtype::IDENTITY);
    response
        .set_attr(AkaAttrType::IDENTITY, b"0208930000000001")
        .unwrap();
    let eap = Eap::with_type_data(EapCode::Response, 1, response);
    let bytes = eap.encode().unwrap();
    assert_eq!(&bytes[8..12], &[14, 5, 0, 16]);
    assert_eq!(Eap::decode(&bytes).unwrap(), eap);
}

#[test]
fn test_eap5g_nas_to_gateway() {
    let params = vec![
        AnParameter::guami([0x02, 0xF8, 0x39, 0xCA, 0xFE, 0x00]),
        AnParameter::establishment_cause(eap5g::CAUSE_MO_SIGNALLING),
    ];
    let nas_pdu = [0x7E, 0x00, 0x41, 0x79];
    let expanded = EapExpanded::eap5g_nas_with_an_parameters(&params, &nas_pdu).unwrap();

    assert_eq!(
        expanded.vendor_data,
        vec![
            2, 0, // 5G-NAS, spare
            0, 11, // AN-parameters length
            1, 6, 0x02, 0xF8, 0x39, 0xCA, 0xFE, 0x00, // GUAMI
            4, 1, 3, // establishment cause
            0, 4, 0x7E, 0x00, 0x41, 0x79, // NAS PDU
        ]
    );

    let eap = Eap::with_type_data(EapCode::Response, 9, expanded);
    let decoded = Eap::decode(&eap.encode().unwrap()).unwrap();
    let vendor_data = match &decoded.type_data {
        Some(EapTypeData::Expanded(e)) if e.is_eap5g() => e.vendor_data.clone(),
        other => panic!("unexpected type data {:?}", other),
    };

    let message = Eap5gMessage::parse(&vendor_data, Eap5gDirection::ToGateway).unwrap();
    assert_eq!(
        message,
        Eap5gMessage::Nas {
            an_parameters: params,
            nas_pdu: nas_pdu.to_vec(),
        }
    );

    // The same bytes do not parse as a gateway-to-UE message
    assert!(Eap5gMessage::parse(&vendor_data, Eap5gDirection::ToUe).is_err());
}

#[test]
fn test_eap5g_start_stop() {
    let start = EapExpanded::eap5g_start();
    assert_eq!(
        Eap5gMessage::parse(&start.vendor_data, Eap5gDirection::ToUe).unwrap(),
        Eap5gMessage::Start
    );
    let stop = EapExpanded::eap5g_stop();
    assert_eq!(
        Eap5gMessage::parse(&stop.vendor_data, Eap5gDirection::ToGateway).unwrap(),
        Eap5gMessage::Stop
    );
}

#[test]
fn test_length_field_bounds_decoding() {
    let eap = Eap::with_type_data(EapCode::Request, 1, EapExpanded::eap5g_start());
    let mut bytes = eap.encode().unwrap();

    // Bytes beyond the Length field are not part of the packet
    bytes.extend_from_slice(&[0xFF; 3]);
    assert_eq!(Eap::decode(&bytes).unwrap(), eap);

    // Length larger than the buffer
    bytes.truncate(10);
    assert!(Eap::decode(&bytes).is_err());
}
