//! Codec Performance Benchmarks
//!
//! Encode and decode throughput for typical IKE_SA_INIT / IKE_AUTH payload
//! chains and EAP-AKA packets.
//!
//! Run with: `cargo bench --bench codec_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nwu_proto::eap::{AkaAttrType, AkaSubtype, Eap, EapAka, EapCode, MacProvider};
use nwu_proto::ikev2::constants::{dh, encr, integ, prf, ATTRIBUTE_TYPE_KEY_LENGTH};
use nwu_proto::ikev2::{IkePayloadContainer, PayloadType, ProtocolId, TransformType};

struct XorMac;

impl MacProvider for XorMac {
    fn compute_mac(&self, message: &[u8]) -> nwu_proto::Result<[u8; 16]> {
        let mut mac = [0u8; 16];
        for (i, byte) in message.iter().enumerate() {
            mac[i % 16] ^= byte;
        }
        Ok(mac)
    }
}

/// Create an IKE_SA_INIT payload set with `proposals` proposals
fn create_sa_init_payloads(proposals: usize) -> IkePayloadContainer {
    let mut payloads = IkePayloadContainer::new();
    payloads.build_security_association(|sa| {
        for number in 1..=proposals {
            let proposal = sa.build_proposal(number as u8, ProtocolId::Ike.to_u8(), &[]);
            let _ = proposal.build_transform(
                TransformType::Encr.to_u8(),
                encr::AES_CBC,
                Some(ATTRIBUTE_TYPE_KEY_LENGTH),
                Some(256),
                &[],
            );
            let _ = proposal.build_transform(
                TransformType::Prf.to_u8(),
                prf::HMAC_SHA2_256,
                None,
                None,
                &[],
            );
            let _ = proposal.build_transform(
                TransformType::Integ.to_u8(),
                integ::HMAC_SHA2_256_128,
                None,
                None,
                &[],
            );
            let _ = proposal.build_transform(TransformType::Dh.to_u8(), dh::MODP_2048, None, None, &[]);
        }
    });
    payloads.build_key_exchange(dh::MODP_2048, &[0x5A; 256]);
    payloads.build_nonce(&[0x33; 32]);
    payloads
}

fn create_aka_challenge() -> Eap {
    let mut aka = EapAka::new(AkaSubtype::CHALLENGE);
    aka.set_attr(AkaAttrType::RAND, &[0xAA; 16])
        .expect("Failed to set AT_RAND");
    aka.set_attr(AkaAttrType::AUTN, &[0xBB; 16])
        .expect("Failed to set AT_AUTN");
    Eap::with_type_data(EapCode::Request, 1, aka)
}

fn bench_payload_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_encode");

    for proposals in [1usize, 4, 16].iter() {
        let payloads = create_sa_init_payloads(*proposals);
        let size = payloads.encode().expect("Failed to encode payloads").len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(proposals),
            &payloads,
            |b, payloads| b.iter(|| black_box(payloads).encode().expect("Failed to encode")),
        );
    }

    group.finish();
}

fn bench_payload_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_decode");

    for proposals in [1usize, 4, 16].iter() {
        let bytes = create_sa_init_payloads(*proposals)
            .encode()
            .expect("Failed to encode payloads");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(proposals), &bytes, |b, bytes| {
            b.iter(|| {
                IkePayloadContainer::decode(PayloadType::SA, black_box(bytes))
                    .expect("Failed to decode")
            })
        });
    }

    group.finish();
}

fn bench_eap_aka(c: &mut Criterion) {
    let mut group = c.benchmark_group("eap_aka");

    group.bench_function("encode_with_mac", |b| {
        let eap = create_aka_challenge();
        b.iter(|| {
            let mut eap = eap.clone();
            eap.encode_with_mac(&XorMac).expect("Failed to encode")
        })
    });

    let bytes = create_aka_challenge()
        .encode_with_mac(&XorMac)
        .expect("Failed to encode");
    group.bench_function("decode", |b| {
        b.iter(|| Eap::decode(black_box(&bytes)).expect("Failed to decode"))
    });
    group.bench_function("verify_mac", |b| {
        b.iter(|| Eap::verify_mac(black_box(&bytes), &XorMac).expect("Failed to verify"))
    });

    group.finish();
}

criterion_group!(benches, bench_payload_encode, bench_payload_decode, bench_eap_aka);
criterion_main!(benches);
