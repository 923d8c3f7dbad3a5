//! IKEv2 payload codec (RFC 7296)
//!
//! Builds and parses the payloads a non-3GPP access gateway exchanges with a
//! UE: SA proposals, key exchange, identities, authentication, traffic
//! selectors, configuration, notifications (including the 3GPP private
//! notify types) and EAP.
//!
//! # Payload Chain
//!
//! ```text
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Next Payload  |C|  RESERVED   |         Payload Length        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                         Payload Body                          ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Each payload names the type of the one that follows; the IKE header names
//! the first. [`IkePayloadContainer`] keeps the payloads in order and fills
//! the chain on encode.
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol
//! - 3GPP TS 24.502 - Access to the 5GCN via non-3GPP access networks

pub mod configuration;
pub mod constants;
pub mod container;
pub mod message;
pub mod notify;
pub mod payload;
pub mod proposal;
pub mod traffic_selector;

pub use configuration::{ConfigurationAttribute, CpPayload};
pub use constants::{
    AuthMethod, CertificateEncoding, ConfigurationType, ExchangeType, IdType, IkeFlags,
    PayloadType, ProtocolId, TrafficSelectorType, TransformType,
};
pub use container::IkePayloadContainer;
pub use message::{IkeHeader, IkeMessage};
pub use notify::{DeletePayload, NotifyPayload, QosInfo, VendorNotify};
pub use payload::{
    AuthPayload, CertPayload, CertReqPayload, IdPayload, IkePayload, KePayload, NoncePayload,
    PayloadHeader, SkPayload, VendorIdPayload,
};
pub use proposal::{Proposal, SaPayload, Transform, TransformAttribute, TransformBuild};
pub use traffic_selector::{IndividualTrafficSelector, TsPayload};
