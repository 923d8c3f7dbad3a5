//! EAP-AKA method (RFC 4187)
//!
//! EAP-AKA type data is a fixed 4-byte header followed by a list of
//! attributes. Every attribute length is counted in 4-byte units and covers
//! the attribute's own Type/Length header.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Type (23)    |    Subtype    |           Reserved            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Attribute Type|    Length     |  Reserved / bit length / ...  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                          Value ...                            ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The attribute encodings are not uniform:
//!
//! - `AT_RAND`, `AT_AUTN`, `AT_MAC`: 2 reserved bytes + 16-byte value (length 5)
//! - `AT_AUTS`: no reserved field, 14-byte value (length 4)
//! - `AT_RES`: 16-bit RES length in bits, then RES zero-padded to 4 bytes
//! - `AT_NOTIFICATION`, `AT_CLIENT_ERROR_CODE`: the 2-byte code sits in the
//!   reserved slot, no value (length 1)
//! - `AT_ANY_ID_REQ`: reserved must be zero, no value (length 1)
//! - `AT_IDENTITY`: 16-bit actual identity length, identity, explicit padding
//!
//! Attributes are always emitted in ascending type order. `AT_MAC` therefore
//! sits at a stable offset, which the zero-fill / hash / patch sequence in
//! [`Eap::encode_with_mac`](super::Eap::encode_with_mac) relies on.

use std::collections::HashMap;
use std::fmt;

use bytes::{Buf, BufMut, BytesMut};

use super::{EapMethod, EapType};
use crate::logging;
use crate::{Error, Result};

/// Length of AT_RAND, AT_AUTN and AT_MAC values
pub const AKA_FIXED_VALUE_LEN: usize = 16;

/// Length of the AT_AUTS value
pub const AKA_AUTS_LEN: usize = 14;

/// Smallest accepted RES, in bits
pub const AKA_RES_MIN_BITS: usize = 32;

/// Largest accepted RES, in bits
pub const AKA_RES_MAX_BITS: usize = 128;

/// EAP-AKA header size (type, subtype, reserved)
pub const AKA_HEADER_LEN: usize = 4;

/// EAP-AKA attribute type (RFC 4187 Section 11)
///
/// Kept as a raw number so attributes this codec does not interpret still
/// survive a decode/encode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AkaAttrType(pub u8);

impl AkaAttrType {
    /// AT_RAND
    pub const RAND: Self = AkaAttrType(1);
    /// AT_AUTN
    pub const AUTN: Self = AkaAttrType(2);
    /// AT_RES
    pub const RES: Self = AkaAttrType(3);
    /// AT_AUTS
    pub const AUTS: Self = AkaAttrType(4);
    /// AT_MAC
    pub const MAC: Self = AkaAttrType(11);
    /// AT_NOTIFICATION
    pub const NOTIFICATION: Self = AkaAttrType(12);
    /// AT_ANY_ID_REQ
    pub const ANY_ID_REQ: Self = AkaAttrType(13);
    /// AT_IDENTITY
    pub const IDENTITY: Self = AkaAttrType(14);
    /// AT_CLIENT_ERROR_CODE
    pub const CLIENT_ERROR_CODE: Self = AkaAttrType(22);

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Whether the attribute header carries the 16-bit reserved slot
    pub fn has_reserved_field(self) -> bool {
        self != AkaAttrType::AUTS
    }
}

impl fmt::Display for AkaAttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            AkaAttrType::RAND => "AT_RAND",
            AkaAttrType::AUTN => "AT_AUTN",
            AkaAttrType::RES => "AT_RES",
            AkaAttrType::AUTS => "AT_AUTS",
            AkaAttrType::MAC => "AT_MAC",
            AkaAttrType::NOTIFICATION => "AT_NOTIFICATION",
            AkaAttrType::ANY_ID_REQ => "AT_ANY_ID_REQ",
            AkaAttrType::IDENTITY => "AT_IDENTITY",
            AkaAttrType::CLIENT_ERROR_CODE => "AT_CLIENT_ERROR_CODE",
            AkaAttrType(other) => return write!(f, "AT_{}", other),
        };
        f.write_str(name)
    }
}

/// EAP-AKA subtype (RFC 4187 Section 11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AkaSubtype(pub u8);

impl AkaSubtype {
    /// AKA-Challenge
    pub const CHALLENGE: Self = AkaSubtype(1);
    /// AKA-Authentication-Reject
    pub const AUTHENTICATION_REJECT: Self = AkaSubtype(2);
    /// AKA-Synchronization-Failure
    pub const SYNCHRONIZATION_FAILURE: Self = AkaSubtype(4);
    /// AKA-Identity
    pub const IDENTITY: Self = AkaSubtype(5);
    /// AKA-Notification
    pub const NOTIFICATION: Self = AkaSubtype(12);
    /// AKA-Reauthentication
    pub const REAUTHENTICATION: Self = AkaSubtype(13);
    /// AKA-Client-Error
    pub const CLIENT_ERROR: Self = AkaSubtype(14);
}

/// Identity carried by AT_IDENTITY, with its padding kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AkaIdentity {
    /// Identity bytes (the 16-bit actual length on the wire)
    pub identity: Vec<u8>,
    /// Padding bytes written after the identity
    pub padding: Vec<u8>,
}

/// One EAP-AKA attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AkaAttribute {
    /// Attribute type
    pub attr_type: AkaAttrType,

    /// Attribute length in 4-byte units, header included
    pub length: u8,

    /// 16-bit field after the length byte (reserved, RES bit length,
    /// notification code or identity length depending on the type)
    pub reserved: u16,

    /// Value bytes, padding included
    pub value: Vec<u8>,

    /// AT_IDENTITY content; `value` is empty when this is set
    pub identity: Option<AkaIdentity>,
}

impl AkaAttribute {
    fn fixed(attr_type: AkaAttrType, length: u8, reserved: u16, value: Vec<u8>) -> Self {
        AkaAttribute {
            attr_type,
            length,
            reserved,
            value,
            identity: None,
        }
    }

    fn identity(identity: &[u8], padding: Vec<u8>) -> Result<Self> {
        let actual_len = u16::try_from(identity.len())
            .map_err(|_| Error::overflow("AT_IDENTITY actual length", 0xFFFF, identity.len()))?;

        let total = 4 + identity.len() + padding.len();
        if total % 4 != 0 {
            return Err(Error::Validation(format!(
                "AT_IDENTITY: identity ({} bytes) plus padding ({} bytes) is not 4-byte aligned",
                identity.len(),
                padding.len()
            )));
        }
        let length = u8::try_from(total / 4)
            .map_err(|_| Error::overflow("AT_IDENTITY length", 255 * 4, total))?;

        Ok(AkaAttribute {
            attr_type: AkaAttrType::IDENTITY,
            length,
            reserved: actual_len,
            value: Vec::new(),
            identity: Some(AkaIdentity {
                identity: identity.to_vec(),
                padding,
            }),
        })
    }

    /// Total attribute size on the wire in bytes
    pub fn wire_len(&self) -> usize {
        self.length as usize * 4
    }

    /// RES trimmed to the bit length recorded in the reserved slot
    ///
    /// Returns `None` for other attribute types or an inconsistent bit length.
    pub fn res(&self) -> Option<&[u8]> {
        if self.attr_type != AkaAttrType::RES {
            return None;
        }
        let byte_len = (self.reserved as usize).div_ceil(8);
        self.value.get(..byte_len)
    }

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        let start = buf.len();

        buf.put_u8(self.attr_type.to_u8());
        buf.put_u8(self.length);

        match &self.identity {
            Some(id) => {
                let actual_len = u16::try_from(id.identity.len()).map_err(|_| {
                    Error::overflow("AT_IDENTITY actual length", 0xFFFF, id.identity.len())
                })?;
                buf.put_u16(actual_len);
                buf.put_slice(&id.identity);
                buf.put_slice(&id.padding);
            }
            None => {
                if self.attr_type.has_reserved_field() {
                    buf.put_u16(self.reserved);
                }
                buf.put_slice(&self.value);
            }
        }

        let written = buf.len() - start;
        if written != self.wire_len() {
            return Err(Error::Validation(format!(
                "{}: length field declares {} bytes but attribute encodes {}",
                self.attr_type,
                self.wire_len(),
                written
            )));
        }
        Ok(())
    }
}

/// Source of the AT_MAC value
///
/// The MAC is computed over the whole EAP packet with the AT_MAC value set
/// to zero. Key derivation and hashing live with the implementor.
pub trait MacProvider {
    /// Compute the 16-byte MAC over `message`
    fn compute_mac(&self, message: &[u8]) -> Result<[u8; AKA_FIXED_VALUE_LEN]>;
}

/// EAP-AKA type data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapAka {
    /// Subtype
    pub subtype: AkaSubtype,

    /// Reserved field of the EAP-AKA header
    pub reserved: u16,

    attributes: HashMap<AkaAttrType, AkaAttribute>,
}

impl EapAka {
    /// Create an empty EAP-AKA message
    pub fn new(subtype: AkaSubtype) -> Self {
        EapAka {
            subtype,
            reserved: 0,
            attributes: HashMap::new(),
        }
    }

    /// Create an EAP-AKA message from prebuilt attributes
    ///
    /// A later attribute with the same type replaces an earlier one.
    pub fn with_attributes<I>(subtype: AkaSubtype, attributes: I) -> Self
    where
        I: IntoIterator<Item = AkaAttribute>,
    {
        let mut aka = EapAka::new(subtype);
        for attr in attributes {
            aka.attributes.insert(attr.attr_type, attr);
        }
        aka
    }

    /// Validate `value` against the rules for `attr_type` and store it
    ///
    /// Replaces any attribute of the same type. On error nothing is stored.
    ///
    /// # Errors
    ///
    /// - `Validation` for unsupported types or values of the wrong size
    /// - `Overflow` for an identity too long for the length field
    pub fn set_attr(&mut self, attr_type: AkaAttrType, value: &[u8]) -> Result<()> {
        let attr = match attr_type {
            AkaAttrType::RAND | AkaAttrType::AUTN | AkaAttrType::MAC => {
                if value.len() != AKA_FIXED_VALUE_LEN {
                    return Err(Error::Validation(format!(
                        "{} requires {} bytes, got {}",
                        attr_type,
                        AKA_FIXED_VALUE_LEN,
                        value.len()
                    )));
                }
                AkaAttribute::fixed(attr_type, 5, 0, value.to_vec())
            }
            AkaAttrType::AUTS => {
                if value.len() != AKA_AUTS_LEN {
                    return Err(Error::Validation(format!(
                        "{} requires {} bytes, got {}",
                        attr_type,
                        AKA_AUTS_LEN,
                        value.len()
                    )));
                }
                AkaAttribute::fixed(attr_type, 4, 0, value.to_vec())
            }
            AkaAttrType::RES => {
                let bit_len = value.len() * 8;
                if !(AKA_RES_MIN_BITS..=AKA_RES_MAX_BITS).contains(&bit_len) {
                    return Err(Error::Validation(format!(
                        "{} must be between {} and {} bits, got {}",
                        attr_type, AKA_RES_MIN_BITS, AKA_RES_MAX_BITS, bit_len
                    )));
                }
                let padding = (4 - (value.len() + 4) % 4) % 4;
                let mut padded = value.to_vec();
                padded.resize(value.len() + padding, 0);
                let length = ((value.len() + 4 + padding) / 4) as u8;
                AkaAttribute::fixed(attr_type, length, bit_len as u16, padded)
            }
            AkaAttrType::NOTIFICATION | AkaAttrType::CLIENT_ERROR_CODE => {
                let code: [u8; 2] = value.try_into().map_err(|_| {
                    Error::Validation(format!(
                        "{} requires 2 bytes, got {}",
                        attr_type,
                        value.len()
                    ))
                })?;
                AkaAttribute::fixed(attr_type, 1, u16::from_be_bytes(code), Vec::new())
            }
            AkaAttrType::ANY_ID_REQ => {
                if !value.is_empty() {
                    return Err(Error::Validation(format!(
                        "{} carries no value, got {} bytes",
                        attr_type,
                        value.len()
                    )));
                }
                AkaAttribute::fixed(attr_type, 1, 0, Vec::new())
            }
            AkaAttrType::IDENTITY => {
                let padding = (4 - value.len() % 4) % 4;
                AkaAttribute::identity(value, vec![0u8; padding])?
            }
            other => {
                return Err(Error::Validation(format!(
                    "unsupported EAP-AKA attribute type: {}",
                    other
                )));
            }
        };

        self.insert(attr);
        Ok(())
    }

    /// Store an AT_IDENTITY whose padding is given as a hex string
    ///
    /// The padding is written verbatim, so non-zero padding survives a
    /// round trip.
    ///
    /// # Errors
    ///
    /// - `Validation` if `padding_hex` is not valid hex or the result is not
    ///   4-byte aligned
    pub fn set_identity(&mut self, identity: &[u8], padding_hex: &str) -> Result<()> {
        let padding = hex::decode(padding_hex).map_err(|e| {
            Error::Validation(format!("AT_IDENTITY padding {:?}: {}", padding_hex, e))
        })?;
        let attr = AkaAttribute::identity(identity, padding)?;
        self.insert(attr);
        Ok(())
    }

    fn insert(&mut self, attr: AkaAttribute) {
        logging::log_aka_attribute_set(attr.attr_type.to_u8(), attr.length);
        self.attributes.insert(attr.attr_type, attr);
    }

    /// Look up an attribute by type
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no attribute of that type is stored.
    pub fn get_attr(&self, attr_type: AkaAttrType) -> Result<&AkaAttribute> {
        self.attributes
            .get(&attr_type)
            .ok_or_else(|| Error::NotFound(format!("EAP-AKA attribute {}", attr_type)))
    }

    /// Whether an attribute of this type is stored
    pub fn contains(&self, attr_type: AkaAttrType) -> bool {
        self.attributes.contains_key(&attr_type)
    }

    /// Number of stored attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attributes are stored
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Stored attribute types in wire order (ascending)
    pub fn attr_types(&self) -> Vec<AkaAttrType> {
        let mut types: Vec<AkaAttrType> = self.attributes.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Stored attributes in wire order (ascending type)
    pub fn attributes(&self) -> Vec<&AkaAttribute> {
        self.attr_types()
            .into_iter()
            .filter_map(|t| self.attributes.get(&t))
            .collect()
    }

    /// Reserve the AT_MAC slot with 16 zero bytes
    pub fn init_mac(&mut self) -> Result<()> {
        self.set_attr(AkaAttrType::MAC, &[0u8; AKA_FIXED_VALUE_LEN])
    }

    /// Offset of the AT_MAC value from the start of the encoded type data
    ///
    /// Returns `None` when no AT_MAC is stored.
    pub fn mac_value_offset(&self) -> Option<usize> {
        if !self.contains(AkaAttrType::MAC) {
            return None;
        }
        let preceding: usize = self
            .attributes()
            .into_iter()
            .take_while(|attr| attr.attr_type < AkaAttrType::MAC)
            .map(AkaAttribute::wire_len)
            .sum();
        // Type, Length and the 2 reserved bytes precede the value
        Some(AKA_HEADER_LEN + preceding + 4)
    }
}

/// Locate the AT_MAC value in encoded EAP-AKA type data, in wire order
///
/// Works on received bytes whose attributes may not be sorted.
pub(crate) fn scan_mac_value_offset(type_data: &[u8]) -> Option<usize> {
    let mut offset = AKA_HEADER_LEN;
    while offset + 2 <= type_data.len() {
        let attr_type = AkaAttrType(type_data[offset]);
        let total = type_data[offset + 1] as usize * 4;
        if total == 0 {
            return None;
        }
        if attr_type == AkaAttrType::MAC {
            let value_offset = offset + 4;
            return (value_offset + AKA_FIXED_VALUE_LEN <= type_data.len()).then_some(value_offset);
        }
        offset += total;
    }
    None
}

impl EapMethod for EapAka {
    fn eap_type(&self) -> EapType {
        EapType::Aka
    }

    /// Serialize header plus attributes in ascending type order
    fn encode(&self) -> Result<Vec<u8>> {
        let body: usize = self.attributes.values().map(AkaAttribute::wire_len).sum();
        let mut buf = BytesMut::with_capacity(AKA_HEADER_LEN + body);

        buf.put_u8(EapType::Aka.to_u8());
        buf.put_u8(self.subtype.0);
        buf.put_u16(self.reserved);

        for attr in self.attributes() {
            attr.encode_into(&mut buf)?;
        }

        Ok(buf.to_vec())
    }

    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < AKA_HEADER_LEN {
            return Err(Error::too_short(AKA_HEADER_LEN, data.len()));
        }

        let mut buf = data;
        let eap_type = buf.get_u8();
        if eap_type != EapType::Aka.to_u8() {
            return Err(Error::UnexpectedType {
                expected: EapType::Aka.to_u8(),
                actual: eap_type,
            });
        }

        let mut aka = EapAka::new(AkaSubtype(buf.get_u8()));
        aka.reserved = buf.get_u16();

        while buf.has_remaining() {
            if buf.remaining() < 2 {
                return Err(Error::Decode(format!(
                    "EAP-AKA: {} trailing byte(s) cannot hold an attribute header",
                    buf.remaining()
                )));
            }
            let attr_type = AkaAttrType(buf.get_u8());
            let length = buf.get_u8();
            let total = length as usize * 4;

            let mut consumed = 2;
            let mut reserved = 0;
            if attr_type.has_reserved_field() {
                if buf.remaining() < 2 {
                    return Err(Error::Decode(format!(
                        "{}: truncated reserved field",
                        attr_type
                    )));
                }
                reserved = buf.get_u16();
                consumed += 2;
            }

            let value_len = total.checked_sub(consumed).ok_or_else(|| {
                Error::Decode(format!("{}: invalid attribute length {}", attr_type, length))
            })?;

            match attr_type {
                AkaAttrType::RAND | AkaAttrType::AUTN | AkaAttrType::MAC => {
                    if value_len != AKA_FIXED_VALUE_LEN {
                        return Err(Error::Decode(format!(
                            "{}: invalid value length {}, want {}",
                            attr_type, value_len, AKA_FIXED_VALUE_LEN
                        )));
                    }
                }
                AkaAttrType::ANY_ID_REQ => {
                    if reserved != 0 {
                        return Err(Error::Decode(format!(
                            "{}: reserved must be 0x0000, got 0x{:04x}",
                            attr_type, reserved
                        )));
                    }
                    if value_len != 0 {
                        return Err(Error::Decode(format!(
                            "{}: unexpected {} value bytes",
                            attr_type, value_len
                        )));
                    }
                }
                _ => {}
            }

            if value_len > buf.remaining() {
                return Err(Error::Decode(format!(
                    "{}: length {} exceeds the {} remaining bytes",
                    attr_type,
                    length,
                    buf.remaining() + consumed
                )));
            }
            let value = buf[..value_len].to_vec();
            buf.advance(value_len);

            let attr = if attr_type == AkaAttrType::IDENTITY {
                let actual_len = reserved as usize;
                if actual_len > value.len() {
                    return Err(Error::Decode(format!(
                        "{}: actual length {} exceeds value length {}",
                        attr_type,
                        actual_len,
                        value.len()
                    )));
                }
                let (identity, padding) = value.split_at(actual_len);
                AkaAttribute {
                    attr_type,
                    length,
                    reserved,
                    value: Vec::new(),
                    identity: Some(AkaIdentity {
                        identity: identity.to_vec(),
                        padding: padding.to_vec(),
                    }),
                }
            } else {
                AkaAttribute::fixed(attr_type, length, reserved, value)
            };

            aka.attributes.insert(attr_type, attr);
        }

        Ok(aka)
    }
}
