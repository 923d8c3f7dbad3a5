//! IKEv2 payload structures and parsing
//!
//! Implements IKE payloads as defined in RFC 7296 Section 3.2. Composite
//! payloads live in their own modules ([`proposal`](super::proposal),
//! [`traffic_selector`](super::traffic_selector),
//! [`configuration`](super::configuration), [`notify`](super::notify)).
//!
//! Type codes that are open registries (ID type, authentication method,
//! certificate encoding) are kept as raw numbers so unknown values survive
//! a decode/encode cycle.

use bytes::{Buf, BufMut};

use super::configuration::CpPayload;
use super::constants::PayloadType;
use super::notify::{DeletePayload, NotifyPayload};
use super::proposal::SaPayload;
use super::traffic_selector::TsPayload;
use crate::eap::Eap;
use crate::{Error, Result};

const CRITICAL_BIT: u8 = 0x80;

/// Generic IKE payload header (4 bytes)
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Next Payload  |C|  RESERVED   |         Payload Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadHeader {
    /// Next payload type
    pub next_payload: PayloadType,

    /// Critical bit (if set, must understand this payload)
    pub critical: bool,

    /// Total payload length including header (4 bytes + data)
    pub length: u16,
}

impl PayloadHeader {
    /// Payload header size
    pub const SIZE: usize = 4;

    /// Largest payload body that fits the 16-bit length field
    pub const MAX_DATA_LEN: usize = u16::MAX as usize - Self::SIZE;

    /// Create new payload header
    pub fn new(next_payload: PayloadType, critical: bool, length: u16) -> Self {
        PayloadHeader {
            next_payload,
            critical,
            length,
        }
    }

    /// Parse payload header from bytes
    ///
    /// # Errors
    ///
    /// Returns error if buffer is too short, the next payload type is
    /// unknown or the length is below the header size
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::too_short(Self::SIZE, data.len()));
        }

        let mut buf = &data[..Self::SIZE];
        let raw_next = buf.get_u8();
        let next_payload =
            PayloadType::from_u8(raw_next).ok_or(Error::UnsupportedPayload(raw_next))?;
        let critical = buf.get_u8() & CRITICAL_BIT != 0;
        let length = buf.get_u16();
        if (length as usize) < Self::SIZE {
            return Err(Error::Decode(format!(
                "payload length {} below header size",
                length
            )));
        }

        Ok(PayloadHeader {
            next_payload,
            critical,
            length,
        })
    }

    /// Serialize payload header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(self.next_payload.to_u8());
        buf.put_u8(if self.critical { CRITICAL_BIT } else { 0 });
        buf.put_u16(self.length);
        out
    }

    /// Get payload data length (excluding header)
    pub fn data_length(&self) -> usize {
        self.length as usize - Self::SIZE
    }
}

/// IKE payload variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IkePayload {
    /// Security Association
    SA(SaPayload),
    /// Key Exchange
    KE(KePayload),
    /// Identification - Initiator
    IDi(IdPayload),
    /// Identification - Responder
    IDr(IdPayload),
    /// Certificate
    CERT(CertPayload),
    /// Certificate Request
    CERTREQ(CertReqPayload),
    /// Authentication
    AUTH(AuthPayload),
    /// Nonce
    Nonce(NoncePayload),
    /// Notify
    N(NotifyPayload),
    /// Delete
    D(DeletePayload),
    /// Vendor ID
    V(VendorIdPayload),
    /// Traffic Selector - Initiator
    TSi(TsPayload),
    /// Traffic Selector - Responder
    TSr(TsPayload),
    /// Encrypted and Authenticated
    SK(SkPayload),
    /// Configuration
    CP(CpPayload),
    /// Extensible Authentication
    EAP(Eap),
}

impl IkePayload {
    /// Get payload type
    pub fn payload_type(&self) -> PayloadType {
        match self {
            IkePayload::SA(_) => PayloadType::SA,
            IkePayload::KE(_) => PayloadType::KE,
            IkePayload::IDi(_) => PayloadType::IDi,
            IkePayload::IDr(_) => PayloadType::IDr,
            IkePayload::CERT(_) => PayloadType::CERT,
            IkePayload::CERTREQ(_) => PayloadType::CERTREQ,
            IkePayload::AUTH(_) => PayloadType::AUTH,
            IkePayload::Nonce(_) => PayloadType::Nonce,
            IkePayload::N(_) => PayloadType::N,
            IkePayload::D(_) => PayloadType::D,
            IkePayload::V(_) => PayloadType::V,
            IkePayload::TSi(_) => PayloadType::TSi,
            IkePayload::TSr(_) => PayloadType::TSr,
            IkePayload::SK(_) => PayloadType::SK,
            IkePayload::CP(_) => PayloadType::CP,
            IkePayload::EAP(_) => PayloadType::EAP,
        }
    }

    /// Serialize payload body (without the generic header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        match self {
            IkePayload::SA(p) => p.to_payload_data(),
            IkePayload::KE(p) => Ok(p.to_payload_data()),
            IkePayload::IDi(p) | IkePayload::IDr(p) => Ok(p.to_payload_data()),
            IkePayload::CERT(p) => Ok(p.to_payload_data()),
            IkePayload::CERTREQ(p) => Ok(p.to_payload_data()),
            IkePayload::AUTH(p) => Ok(p.to_payload_data()),
            IkePayload::Nonce(p) => Ok(p.to_payload_data()),
            IkePayload::N(p) => p.to_payload_data(),
            IkePayload::D(p) => p.to_payload_data(),
            IkePayload::V(p) => Ok(p.to_payload_data()),
            IkePayload::TSi(p) | IkePayload::TSr(p) => p.to_payload_data(),
            IkePayload::SK(p) => Ok(p.to_payload_data()),
            IkePayload::CP(p) => p.to_payload_data(),
            IkePayload::EAP(eap) => eap.encode(),
        }
    }

    /// Parse payload body
    ///
    /// `header` is the payload's own generic header; only the Encrypted
    /// payload reads it (its Next Payload names the first inner payload).
    pub fn from_payload_data(
        payload_type: PayloadType,
        header: &PayloadHeader,
        data: &[u8],
    ) -> Result<Self> {
        let payload = match payload_type {
            PayloadType::SA => IkePayload::SA(SaPayload::from_payload_data(data)?),
            PayloadType::KE => IkePayload::KE(KePayload::from_payload_data(data)?),
            PayloadType::IDi => IkePayload::IDi(IdPayload::from_payload_data(data)?),
            PayloadType::IDr => IkePayload::IDr(IdPayload::from_payload_data(data)?),
            PayloadType::CERT => IkePayload::CERT(CertPayload::from_payload_data(data)?),
            PayloadType::CERTREQ => IkePayload::CERTREQ(CertReqPayload::from_payload_data(data)?),
            PayloadType::AUTH => IkePayload::AUTH(AuthPayload::from_payload_data(data)?),
            PayloadType::Nonce => IkePayload::Nonce(NoncePayload::from_payload_data(data)),
            PayloadType::N => IkePayload::N(NotifyPayload::from_payload_data(data)?),
            PayloadType::D => IkePayload::D(DeletePayload::from_payload_data(data)?),
            PayloadType::V => IkePayload::V(VendorIdPayload::from_payload_data(data)),
            PayloadType::TSi => IkePayload::TSi(TsPayload::from_payload_data(data)?),
            PayloadType::TSr => IkePayload::TSr(TsPayload::from_payload_data(data)?),
            PayloadType::SK => {
                IkePayload::SK(SkPayload::from_payload_data(header.next_payload, data))
            }
            PayloadType::CP => IkePayload::CP(CpPayload::from_payload_data(data)?),
            PayloadType::EAP => IkePayload::EAP(Eap::decode(data)?),
            PayloadType::None => {
                return Err(Error::Decode(
                    "payload type 0 marks the end of the chain".to_string(),
                ));
            }
        };
        Ok(payload)
    }
}

/// Read the 4-byte `type | RESERVED(24)` prefix shared by ID, AUTH and CP
pub(crate) fn split_typed_prefix(data: &[u8]) -> Result<(u8, &[u8])> {
    if data.len() < 4 {
        return Err(Error::too_short(4, data.len()));
    }
    Ok((data[0], &data[4..]))
}

/// Inverse of [`split_typed_prefix`]
pub(crate) fn join_typed_prefix(type_code: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + body.len());
    out.put_u8(type_code);
    out.put_bytes(0, 3);
    out.put_slice(body);
    out
}

/// Key Exchange Payload (RFC 7296 Section 3.4)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   Diffie-Hellman Group Num    |           RESERVED            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                       Key Exchange Data                       ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KePayload {
    /// Diffie-Hellman group number
    pub dh_group: u16,

    /// Key exchange data (public key)
    pub key_data: Vec<u8>,
}

impl KePayload {
    /// KE payload for `dh_group` carrying the public value
    pub fn new(dh_group: u16, key_data: Vec<u8>) -> Self {
        KePayload { dh_group, key_data }
    }

    /// Parse the body
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }
        let mut buf = data;
        let dh_group = buf.get_u16();
        buf.advance(2);
        Ok(KePayload {
            dh_group,
            key_data: buf.to_vec(),
        })
    }

    /// Serialize the body
    pub fn to_payload_data(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.key_data.len());
        out.put_u16(self.dh_group);
        out.put_u16(0);
        out.put_slice(&self.key_data);
        out
    }
}

/// Identification Payload (RFC 7296 Section 3.5)
///
/// Used for IDi (Initiator) and IDr (Responder) payloads.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   ID Type     |                 RESERVED                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                   Identification Data                         ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPayload {
    /// ID type (see [`IdType`](super::constants::IdType))
    pub id_type: u8,

    /// Identification data
    pub data: Vec<u8>,
}

impl IdPayload {
    /// IDi/IDr body
    pub fn new(id_type: u8, data: Vec<u8>) -> Self {
        IdPayload { id_type, data }
    }

    /// Parse the body
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        split_typed_prefix(data).map(|(id_type, rest)| IdPayload::new(id_type, rest.to_vec()))
    }

    /// Serialize the body
    pub fn to_payload_data(&self) -> Vec<u8> {
        join_typed_prefix(self.id_type, &self.data)
    }
}

/// Certificate Payload (RFC 7296 Section 3.6)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPayload {
    /// Certificate encoding
    pub encoding: u8,

    /// Certificate data
    pub data: Vec<u8>,
}

impl CertPayload {
    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        let (&encoding, rest) = data
            .split_first()
            .ok_or_else(|| Error::too_short(1, 0))?;
        Ok(CertPayload {
            encoding,
            data: rest.to_vec(),
        })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.data.len());
        bytes.push(self.encoding);
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// Certificate Request Payload (RFC 7296 Section 3.7)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertReqPayload {
    /// Certificate encoding
    pub encoding: u8,

    /// Concatenated SHA-1 hashes of trusted CA public keys
    pub authority: Vec<u8>,
}

impl CertReqPayload {
    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        let (&encoding, rest) = data
            .split_first()
            .ok_or_else(|| Error::too_short(1, 0))?;
        Ok(CertReqPayload {
            encoding,
            authority: rest.to_vec(),
        })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.authority.len());
        bytes.push(self.encoding);
        bytes.extend_from_slice(&self.authority);
        bytes
    }
}

/// Authentication Payload (RFC 7296 Section 3.8)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Auth Method   |                RESERVED                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                      Authentication Data                      ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// Authentication method (see [`AuthMethod`](super::constants::AuthMethod))
    pub auth_method: u8,

    /// Authentication data
    pub auth_data: Vec<u8>,
}

impl AuthPayload {
    /// AUTH body
    pub fn new(auth_method: u8, auth_data: Vec<u8>) -> Self {
        AuthPayload {
            auth_method,
            auth_data,
        }
    }

    /// Parse the body
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        split_typed_prefix(data).map(|(method, rest)| AuthPayload::new(method, rest.to_vec()))
    }

    /// Serialize the body
    pub fn to_payload_data(&self) -> Vec<u8> {
        join_typed_prefix(self.auth_method, &self.auth_data)
    }
}

/// Nonce Payload (RFC 7296 Section 3.9)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoncePayload {
    /// Nonce data
    pub nonce: Vec<u8>,
}

impl NoncePayload {
    /// Parse nonce payload from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Self {
        NoncePayload {
            nonce: data.to_vec(),
        }
    }

    /// Serialize nonce payload to bytes (without header)
    pub fn to_payload_data(&self) -> Vec<u8> {
        self.nonce.clone()
    }
}

/// Vendor ID Payload (RFC 7296 Section 3.12)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorIdPayload {
    /// Vendor ID data
    pub vendor_id: Vec<u8>,
}

impl VendorIdPayload {
    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Self {
        VendorIdPayload {
            vendor_id: data.to_vec(),
        }
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Vec<u8> {
        self.vendor_id.clone()
    }
}

/// Encrypted and Authenticated Payload (RFC 7296 Section 3.14)
///
/// Carried opaquely: IV, ciphertext, padding and ICV are produced and
/// consumed by the SA's cipher, outside this codec. The generic header's
/// Next Payload names the first payload inside the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkPayload {
    /// Type of the first inner payload
    pub next_payload: PayloadType,

    /// Opaque encrypted data
    pub encrypted_data: Vec<u8>,
}

impl SkPayload {
    /// Create new SK payload
    pub fn new(next_payload: PayloadType, encrypted_data: Vec<u8>) -> Self {
        SkPayload {
            next_payload,
            encrypted_data,
        }
    }

    /// Parse from data (without header)
    pub fn from_payload_data(next_payload: PayloadType, data: &[u8]) -> Self {
        SkPayload {
            next_payload,
            encrypted_data: data.to_vec(),
        }
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Vec<u8> {
        self.encrypted_data.clone()
    }
}
