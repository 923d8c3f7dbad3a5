//! Extensible Authentication Protocol envelope (RFC 3748 Section 4)
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Code      |  Identifier   |            Length             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Type      |  Type-Data ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-
//! ```
//!
//! Requests and responses carry exactly one of the supported methods
//! ([`EapTypeData`]); Success and Failure are header-only.

pub mod aka;
pub mod expanded;
pub mod md5;

use bytes::{BufMut, BytesMut};
use subtle::ConstantTimeEq;

pub use aka::{AkaAttrType, AkaAttribute, AkaIdentity, AkaSubtype, EapAka, MacProvider};
pub use expanded::{AnParameter, Eap5gDirection, Eap5gMessage, EapExpanded};
pub use md5::EapMd5;

use crate::logging;
use crate::{Error, Result};

/// EAP header size (Code, Identifier, Length)
pub const EAP_HEADER_LEN: usize = 4;

/// EAP Code (RFC 3748 Section 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EapCode {
    /// Request
    Request = 1,
    /// Response
    Response = 2,
    /// Success
    Success = 3,
    /// Failure
    Failure = 4,
}

impl EapCode {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(EapCode::Request),
            2 => Some(EapCode::Response),
            3 => Some(EapCode::Success),
            4 => Some(EapCode::Failure),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether packets with this code carry a Type field
    pub fn has_type_data(self) -> bool {
        matches!(self, EapCode::Request | EapCode::Response)
    }
}

/// EAP method type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EapType {
    /// Identity
    Identity = 1,
    /// Notification
    Notification = 2,
    /// Legacy Nak
    Nak = 3,
    /// MD5-Challenge
    Md5Challenge = 4,
    /// EAP-AKA (RFC 4187)
    Aka = 23,
    /// EAP-AKA' (RFC 5448)
    AkaPrime = 50,
    /// Expanded type
    Expanded = 254,
}

impl EapType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(EapType::Identity),
            2 => Some(EapType::Notification),
            3 => Some(EapType::Nak),
            4 => Some(EapType::Md5Challenge),
            23 => Some(EapType::Aka),
            50 => Some(EapType::AkaPrime),
            254 => Some(EapType::Expanded),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// An EAP method's type data codec
///
/// `encode` output and `decode` input start with the Type byte.
pub trait EapMethod: Sized {
    /// Method type tag
    fn eap_type(&self) -> EapType;

    /// Serialize Type plus type data
    fn encode(&self) -> Result<Vec<u8>>;

    /// Parse Type plus type data
    fn decode(data: &[u8]) -> Result<Self>;
}

/// Type data of a Request or Response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EapTypeData {
    /// MD5-Challenge
    Md5(EapMd5),
    /// EAP-AKA
    Aka(EapAka),
    /// Expanded (EAP-5G)
    Expanded(EapExpanded),
}

impl EapTypeData {
    /// Method type tag
    pub fn eap_type(&self) -> EapType {
        match self {
            EapTypeData::Md5(m) => m.eap_type(),
            EapTypeData::Aka(m) => m.eap_type(),
            EapTypeData::Expanded(m) => m.eap_type(),
        }
    }

    /// Serialize Type plus type data
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            EapTypeData::Md5(m) => m.encode(),
            EapTypeData::Aka(m) => m.encode(),
            EapTypeData::Expanded(m) => m.encode(),
        }
    }

    /// Parse type data, dispatching on the Type byte
    pub fn decode(data: &[u8]) -> Result<Self> {
        let type_byte = *data.first().ok_or_else(|| Error::too_short(1, 0))?;
        match EapType::from_u8(type_byte) {
            Some(EapType::Md5Challenge) => EapMd5::decode(data).map(EapTypeData::Md5),
            Some(EapType::Aka) => EapAka::decode(data).map(EapTypeData::Aka),
            Some(EapType::Expanded) => EapExpanded::decode(data).map(EapTypeData::Expanded),
            _ => Err(Error::Decode(format!("unsupported EAP type {}", type_byte))),
        }
    }
}

impl From<EapMd5> for EapTypeData {
    fn from(m: EapMd5) -> Self {
        EapTypeData::Md5(m)
    }
}

impl From<EapAka> for EapTypeData {
    fn from(m: EapAka) -> Self {
        EapTypeData::Aka(m)
    }
}

impl From<EapExpanded> for EapTypeData {
    fn from(m: EapExpanded) -> Self {
        EapTypeData::Expanded(m)
    }
}

/// EAP packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eap {
    /// Code
    pub code: EapCode,
    /// Identifier matching responses to requests
    pub identifier: u8,
    /// Method data; `None` for Success and Failure
    pub type_data: Option<EapTypeData>,
}

impl Eap {
    /// Create a packet without type data
    pub fn new(code: EapCode, identifier: u8) -> Self {
        Eap {
            code,
            identifier,
            type_data: None,
        }
    }

    /// Create a Request or Response carrying a method
    pub fn with_type_data(code: EapCode, identifier: u8, type_data: impl Into<EapTypeData>) -> Self {
        Eap {
            code,
            identifier,
            type_data: Some(type_data.into()),
        }
    }

    /// EAP-Success
    pub fn success(identifier: u8) -> Self {
        Eap::new(EapCode::Success, identifier)
    }

    /// EAP-Failure
    pub fn failure(identifier: u8) -> Self {
        Eap::new(EapCode::Failure, identifier)
    }

    /// Mutable EAP-AKA type data, if this packet carries it
    pub fn aka_mut(&mut self) -> Option<&mut EapAka> {
        match &mut self.type_data {
            Some(EapTypeData::Aka(aka)) => Some(aka),
            _ => None,
        }
    }

    /// Serialize the packet, computing the Length field
    ///
    /// # Errors
    ///
    /// - `Validation` if the code and the presence of type data disagree
    /// - `Overflow` if the packet exceeds 65535 bytes
    /// - Any error from the method encoder
    pub fn encode(&self) -> Result<Vec<u8>> {
        let type_data = match (&self.type_data, self.code.has_type_data()) {
            (Some(data), true) => data.encode()?,
            (None, false) => Vec::new(),
            (Some(_), false) => {
                return Err(Error::Validation(format!(
                    "EAP {:?} carries no type data",
                    self.code
                )));
            }
            (None, true) => {
                return Err(Error::Validation(format!(
                    "EAP {:?} requires type data",
                    self.code
                )));
            }
        };

        let total = EAP_HEADER_LEN + type_data.len();
        let length =
            u16::try_from(total).map_err(|_| Error::overflow("EAP length", 0xFFFF, total))?;

        let mut buf = BytesMut::with_capacity(total);
        buf.put_u8(self.code.to_u8());
        buf.put_u8(self.identifier);
        buf.put_u16(length);
        buf.put_slice(&type_data);
        Ok(buf.to_vec())
    }

    /// Parse a packet
    ///
    /// Bytes past the EAP Length field are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_inner(data).inspect_err(|e| logging::log_decode_failed("EAP", &e.to_string()))
    }

    fn decode_inner(data: &[u8]) -> Result<Self> {
        if data.len() < EAP_HEADER_LEN {
            return Err(Error::too_short(EAP_HEADER_LEN, data.len()));
        }

        let code = EapCode::from_u8(data[0])
            .ok_or_else(|| Error::Decode(format!("invalid EAP code {}", data[0])))?;
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;

        if length < EAP_HEADER_LEN {
            return Err(Error::Decode(format!("EAP length {} below header size", length)));
        }
        if length > data.len() {
            return Err(Error::Decode(format!(
                "EAP length {} exceeds the {} available bytes",
                length,
                data.len()
            )));
        }

        let type_data = if code.has_type_data() {
            if length == EAP_HEADER_LEN {
                return Err(Error::Decode(format!("EAP {:?} without a Type field", code)));
            }
            Some(EapTypeData::decode(&data[EAP_HEADER_LEN..length])?)
        } else {
            if length != EAP_HEADER_LEN {
                return Err(Error::Decode(format!(
                    "EAP {:?} must have length 4, got {}",
                    code, length
                )));
            }
            None
        };

        Ok(Eap {
            code,
            identifier,
            type_data,
        })
    }

    /// Offset of the AT_MAC value from the start of the encoded packet
    pub fn mac_value_offset(&self) -> Option<usize> {
        match &self.type_data {
            Some(EapTypeData::Aka(aka)) => aka.mac_value_offset().map(|off| EAP_HEADER_LEN + off),
            _ => None,
        }
    }

    /// Serialize an EAP-AKA packet with its AT_MAC filled in
    ///
    /// The MAC slot is zeroed, the packet is serialized, the provider computes
    /// the MAC over those bytes and the result is written into the slot. The
    /// stored AT_MAC is updated to match the output.
    ///
    /// # Errors
    ///
    /// - `Validation` if the packet does not carry EAP-AKA
    /// - Any error from encoding or the provider
    pub fn encode_with_mac<P: MacProvider + ?Sized>(&mut self, provider: &P) -> Result<Vec<u8>> {
        let aka = self
            .aka_mut()
            .ok_or_else(|| Error::Validation("AT_MAC requires EAP-AKA type data".to_string()))?;
        aka.init_mac()?;

        let mut bytes = self.encode()?;
        let offset = self
            .mac_value_offset()
            .ok_or_else(|| Error::NotFound("EAP-AKA attribute AT_MAC".to_string()))?;

        let mac = provider.compute_mac(&bytes)?;
        let bytes_len = bytes.len();
        let slot = bytes
            .get_mut(offset..offset + aka::AKA_FIXED_VALUE_LEN)
            .ok_or_else(|| Error::too_short(offset + aka::AKA_FIXED_VALUE_LEN, bytes_len))?;
        slot.copy_from_slice(&mac);
        logging::log_mac_patched(offset, &mac);

        if let Some(aka) = self.aka_mut() {
            aka.set_attr(AkaAttrType::MAC, &mac)?;
        }
        Ok(bytes)
    }

    /// Check the AT_MAC of a received EAP-AKA packet
    ///
    /// The MAC is located in wire order, so attributes need not be sorted.
    ///
    /// # Errors
    ///
    /// - Any decode error for `raw`
    /// - `NotFound` if the packet has no AT_MAC
    pub fn verify_mac<P: MacProvider + ?Sized>(raw: &[u8], provider: &P) -> Result<bool> {
        let eap = Eap::decode(raw)?;
        if !matches!(eap.type_data, Some(EapTypeData::Aka(_))) {
            return Err(Error::Validation(
                "AT_MAC requires EAP-AKA type data".to_string(),
            ));
        }

        let length = u16::from_be_bytes([raw[2], raw[3]]) as usize;
        let mut message = raw[..length].to_vec();
        let offset = aka::scan_mac_value_offset(&message[EAP_HEADER_LEN..])
            .map(|off| EAP_HEADER_LEN + off)
            .ok_or_else(|| Error::NotFound("EAP-AKA attribute AT_MAC".to_string()))?;

        let slot = &mut message[offset..offset + aka::AKA_FIXED_VALUE_LEN];
        let received = slot.to_vec();
        slot.fill(0);

        let expected = provider.compute_mac(&message)?;
        Ok(bool::from(expected.ct_eq(&received[..])))
    }
}
