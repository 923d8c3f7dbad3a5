//! IKEv2 and EAP payload codec for a non-3GPP access gateway.
//!
//! This crate builds and parses the messages exchanged between a UE and an
//! untrusted non-3GPP access gateway:
//!
//! - **IKEv2** payloads and payload chains (RFC 7296), including the 3GPP
//!   private notify types
//! - **EAP** envelopes (RFC 3748) carrying EAP-MD5, EAP-AKA (RFC 4187) or
//!   the expanded EAP-5G method (3GPP TS 24.502)
//!
//! Cryptography is out of scope: EAP-AKA MACs are computed by a caller
//! supplied [`MacProvider`](eap::MacProvider), and SK payloads carry opaque
//! ciphertext.
//!
//! # Example
//!
//! ```rust
//! use nwu_proto::ikev2::{IkePayloadContainer, PayloadType};
//!
//! let mut payloads = IkePayloadContainer::new();
//! payloads.build_eap5g_start(1);
//!
//! let wire = payloads.encode().unwrap();
//! let parsed = IkePayloadContainer::decode(PayloadType::EAP, &wire).unwrap();
//! assert_eq!(parsed, payloads);
//! ```
//!
//! # Security
//!
//! - All decoders are bounded by the input buffer and never panic
//! - MAC verification uses constant-time comparison (`subtle`)
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol
//! - [RFC 3748](https://datatracker.ietf.org/doc/html/rfc3748) - Extensible Authentication Protocol
//! - [RFC 4187](https://datatracker.ietf.org/doc/html/rfc4187) - EAP-AKA
//! - 3GPP TS 24.502 - Access to the 5GCN via non-3GPP access networks

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
pub mod eap;
pub mod error;
pub mod ikev2;
pub mod logging;

pub use config::{GatewayNotifyConfig, GatewayNotifyConfigBuilder};
pub use error::{Error, ErrorKind, Result};
