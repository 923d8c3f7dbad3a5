//! IKEv2 Security Association, Proposal and Transform structures
//!
//! Implements the SA payload substructures of RFC 7296 Section 3.3.
//!
//! # Structure
//!
//! ```text
//! SA Payload
//!   └── Proposal(s)
//!         └── Transform(s)
//!               └── optional Attribute (TV or TLV)
//! ```
//!
//! Proposal and Transform lengths cover the whole substructure, starting at
//! the Last/More byte.

use bytes::{BufMut, BytesMut};

use super::constants::TransformType;
use crate::logging;
use crate::{Error, Result};

/// Attribute Format bit: set for fixed 2-byte Type/Value attributes
const ATTRIBUTE_FORMAT_TV: u16 = 0x8000;

/// Last/More value of a Proposal followed by another Proposal
const MORE_PROPOSALS: u8 = 2;

/// Last/More value of a Transform followed by another Transform
const MORE_TRANSFORMS: u8 = 3;

/// Transform attribute (RFC 7296 Section 3.3.5)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |A|       Attribute Type        |    AF=0  Attribute Length     |
/// |F|                             |    AF=1  Attribute Value      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   AF=0  Attribute Value                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformAttribute {
    /// Type/Value form with a 2-byte value
    Fixed {
        /// Attribute type (15 bits)
        attr_type: u16,
        /// Value
        value: u16,
    },
    /// Type/Length/Value form
    Variable {
        /// Attribute type (15 bits)
        attr_type: u16,
        /// Value
        value: Vec<u8>,
    },
}

impl TransformAttribute {
    /// Attribute type without the format bit
    pub fn attr_type(&self) -> u16 {
        match self {
            TransformAttribute::Fixed { attr_type, .. }
            | TransformAttribute::Variable { attr_type, .. } => *attr_type,
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            TransformAttribute::Fixed { .. } => 4,
            TransformAttribute::Variable { value, .. } => 4 + value.len(),
        }
    }

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        let attr_type = self.attr_type();
        if attr_type & ATTRIBUTE_FORMAT_TV != 0 {
            return Err(Error::overflow(
                "transform attribute type",
                0x7FFF,
                attr_type as usize,
            ));
        }

        match self {
            TransformAttribute::Fixed { value, .. } => {
                buf.put_u16(ATTRIBUTE_FORMAT_TV | attr_type);
                buf.put_u16(*value);
            }
            TransformAttribute::Variable { value, .. } => {
                let len = u16::try_from(value.len()).map_err(|_| {
                    Error::overflow("transform attribute length", 0xFFFF, value.len())
                })?;
                buf.put_u16(attr_type);
                buf.put_u16(len);
                buf.put_slice(value);
            }
        }
        Ok(())
    }

    fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }
        let raw_type = u16::from_be_bytes([data[0], data[1]]);
        let field = u16::from_be_bytes([data[2], data[3]]);
        let attr_type = raw_type & !ATTRIBUTE_FORMAT_TV;

        if raw_type & ATTRIBUTE_FORMAT_TV != 0 {
            return Ok((
                TransformAttribute::Fixed {
                    attr_type,
                    value: field,
                },
                4,
            ));
        }

        let end = 4 + field as usize;
        if end > data.len() {
            return Err(Error::Decode(format!(
                "transform attribute length {} exceeds the {} remaining bytes",
                field,
                data.len() - 4
            )));
        }
        Ok((
            TransformAttribute::Variable {
                attr_type,
                value: data[4..end].to_vec(),
            },
            end,
        ))
    }
}

/// Outcome of [`Proposal::build_transform`]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformBuild {
    /// Transform appended as requested
    Appended,
    /// Nothing appended: the attribute type had neither a fixed nor a variable value
    Omitted,
}

/// Transform substructure (RFC 7296 Section 3.3.2)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Last Substruc |   RESERVED    |        Transform Length       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |Transform Type |   RESERVED    |          Transform ID         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                      Transform Attributes                     ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// Transform type (see [`TransformType`])
    pub transform_type: u8,

    /// Transform ID
    pub transform_id: u16,

    /// Optional attribute (key length for variable-key ciphers)
    pub attribute: Option<TransformAttribute>,
}

impl Transform {
    /// Fixed part of the Transform substructure
    pub const HEADER_LEN: usize = 8;

    /// Create new transform without attribute
    pub fn new(transform_type: TransformType, transform_id: u16) -> Self {
        Transform {
            transform_type: transform_type.to_u8(),
            transform_id,
            attribute: None,
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: TransformAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Serialize transform to bytes
    pub fn to_bytes(&self, is_last: bool) -> Result<Vec<u8>> {
        let attr_len = self
            .attribute
            .as_ref()
            .map_or(0, TransformAttribute::encoded_len);
        let total_len = Self::HEADER_LEN + attr_len;
        let length = u16::try_from(total_len)
            .map_err(|_| Error::overflow("transform length", 0xFFFF, total_len))?;

        let mut buf = BytesMut::with_capacity(total_len);
        buf.put_u8(if is_last { 0 } else { MORE_TRANSFORMS });
        buf.put_u8(0);
        buf.put_u16(length);
        buf.put_u8(self.transform_type);
        buf.put_u8(0);
        buf.put_u16(self.transform_id);
        if let Some(attr) = &self.attribute {
            attr.encode_into(&mut buf)?;
        }

        Ok(buf.to_vec())
    }

    /// Parse transform from bytes
    ///
    /// Returns (transform, is_last, bytes_consumed)
    pub fn from_bytes(data: &[u8]) -> Result<(Self, bool, usize)> {
        if data.len() < Self::HEADER_LEN {
            return Err(Error::too_short(Self::HEADER_LEN, data.len()));
        }

        let is_last = data[0] == 0;
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if length < Self::HEADER_LEN || length > data.len() {
            return Err(Error::Decode(format!(
                "transform length {} outside [{}, {}]",
                length,
                Self::HEADER_LEN,
                data.len()
            )));
        }

        let transform_type = data[4];
        let transform_id = u16::from_be_bytes([data[6], data[7]]);

        let attrs = &data[Self::HEADER_LEN..length];
        let attribute = if attrs.is_empty() {
            None
        } else {
            let (attr, used) = TransformAttribute::decode(attrs)?;
            if used != attrs.len() {
                return Err(Error::Decode(format!(
                    "transform carries {} bytes after its attribute",
                    attrs.len() - used
                )));
            }
            Some(attr)
        };

        Ok((
            Transform {
                transform_type,
                transform_id,
                attribute,
            },
            is_last,
            length,
        ))
    }
}

/// Proposal substructure (RFC 7296 Section 3.3.1)
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Last Substruc |   RESERVED    |         Proposal Length       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Proposal Num  |  Protocol ID  |    SPI Size   |Num  Transforms|
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                        SPI (variable)                         ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                        <Transforms>                           ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Transforms are kept in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Proposal number
    pub proposal_number: u8,

    /// Protocol ID (see [`ProtocolId`](super::constants::ProtocolId))
    pub protocol_id: u8,

    /// SPI (empty for the initial IKE SA)
    pub spi: Vec<u8>,

    /// Transforms
    pub transforms: Vec<Transform>,
}

impl Proposal {
    /// Fixed part of the Proposal substructure
    pub const HEADER_LEN: usize = 8;

    /// Create new proposal
    pub fn new(proposal_number: u8, protocol_id: u8, spi: &[u8]) -> Self {
        Proposal {
            proposal_number,
            protocol_id,
            spi: spi.to_vec(),
            transforms: Vec::new(),
        }
    }

    /// Append a transform
    ///
    /// The attribute is encoded as Type/Value when `attribute_value` is set,
    /// otherwise as Type/Length/Value when `variable_value` is non-empty.
    /// If `attribute_type` is set but neither value is, no transform is
    /// appended and `Omitted` is returned.
    pub fn build_transform(
        &mut self,
        transform_type: u8,
        transform_id: u16,
        attribute_type: Option<u16>,
        attribute_value: Option<u16>,
        variable_value: &[u8],
    ) -> TransformBuild {
        let attribute = match (attribute_type, attribute_value) {
            (None, _) => None,
            (Some(attr_type), Some(value)) => Some(TransformAttribute::Fixed { attr_type, value }),
            (Some(attr_type), None) if !variable_value.is_empty() => {
                Some(TransformAttribute::Variable {
                    attr_type,
                    value: variable_value.to_vec(),
                })
            }
            (Some(attr_type), None) => {
                logging::log_transform_omitted(transform_type, transform_id, attr_type);
                return TransformBuild::Omitted;
            }
        };

        self.transforms.push(Transform {
            transform_type,
            transform_id,
            attribute,
        });
        TransformBuild::Appended
    }

    /// Remove all transforms
    pub fn reset_transforms(&mut self) {
        self.transforms.clear();
    }

    /// Transforms of one type, in wire order
    pub fn transforms_of(&self, transform_type: TransformType) -> impl Iterator<Item = &Transform> {
        self.transforms
            .iter()
            .filter(move |t| t.transform_type == transform_type.to_u8())
    }

    /// Serialize proposal to bytes
    pub fn to_bytes(&self, is_last: bool) -> Result<Vec<u8>> {
        let spi_size = u8::try_from(self.spi.len())
            .map_err(|_| Error::overflow("SPI size", 255, self.spi.len()))?;
        let num_transforms = u8::try_from(self.transforms.len())
            .map_err(|_| Error::overflow("transform count", 255, self.transforms.len()))?;

        let mut transforms = BytesMut::new();
        for (i, t) in self.transforms.iter().enumerate() {
            transforms.put_slice(&t.to_bytes(i + 1 == self.transforms.len())?);
        }

        let total_len = Self::HEADER_LEN + self.spi.len() + transforms.len();
        let length = u16::try_from(total_len)
            .map_err(|_| Error::overflow("proposal length", 0xFFFF, total_len))?;

        let mut buf = BytesMut::with_capacity(total_len);
        buf.put_u8(if is_last { 0 } else { MORE_PROPOSALS });
        buf.put_u8(0);
        buf.put_u16(length);
        buf.put_u8(self.proposal_number);
        buf.put_u8(self.protocol_id);
        buf.put_u8(spi_size);
        buf.put_u8(num_transforms);
        buf.put_slice(&self.spi);
        buf.put_slice(&transforms);

        Ok(buf.to_vec())
    }

    /// Parse proposal from bytes
    ///
    /// Returns (proposal, is_last, bytes_consumed)
    pub fn from_bytes(data: &[u8]) -> Result<(Self, bool, usize)> {
        if data.len() < Self::HEADER_LEN {
            return Err(Error::too_short(Self::HEADER_LEN, data.len()));
        }

        let is_last = data[0] == 0;
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if length < Self::HEADER_LEN || length > data.len() {
            return Err(Error::Decode(format!(
                "proposal length {} outside [{}, {}]",
                length,
                Self::HEADER_LEN,
                data.len()
            )));
        }

        let proposal_number = data[4];
        let protocol_id = data[5];
        let spi_size = data[6] as usize;
        let num_transforms = data[7] as usize;

        let body = &data[Self::HEADER_LEN..length];
        if spi_size > body.len() {
            return Err(Error::Decode(format!(
                "SPI size {} exceeds proposal body of {} bytes",
                spi_size,
                body.len()
            )));
        }
        let spi = body[..spi_size].to_vec();

        let mut offset = spi_size;
        let mut transforms = Vec::with_capacity(num_transforms.min(body.len() / Transform::HEADER_LEN));
        for _ in 0..num_transforms {
            let (transform, _, consumed) = Transform::from_bytes(&body[offset..])?;
            transforms.push(transform);
            offset += consumed;
        }
        if offset != body.len() {
            return Err(Error::Decode(format!(
                "proposal {} has {} bytes after its {} transforms",
                proposal_number,
                body.len() - offset,
                num_transforms
            )));
        }

        Ok((
            Proposal {
                proposal_number,
                protocol_id,
                spi,
                transforms,
            },
            is_last,
            length,
        ))
    }
}

/// Security Association Payload (RFC 7296 Section 3.3)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaPayload {
    /// Proposals in wire order
    pub proposals: Vec<Proposal>,
}

impl SaPayload {
    /// Create new SA payload with proposals
    pub fn new(proposals: Vec<Proposal>) -> Self {
        SaPayload { proposals }
    }

    /// Append a proposal and return it for adding transforms
    pub fn build_proposal(&mut self, proposal_number: u8, protocol_id: u8, spi: &[u8]) -> &mut Proposal {
        self.proposals
            .push(Proposal::new(proposal_number, protocol_id, spi));
        let last = self.proposals.len() - 1;
        &mut self.proposals[last]
    }

    /// Remove all proposals
    pub fn reset(&mut self) {
        self.proposals.clear();
    }

    /// Parse SA payload from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        let mut proposals = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (proposal, _, consumed) = Proposal::from_bytes(&data[offset..])?;
            proposals.push(proposal);
            offset += consumed;
        }
        Ok(SaPayload { proposals })
    }

    /// Serialize SA payload to bytes (without header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        if self.proposals.len() > u8::MAX as usize {
            return Err(Error::overflow("proposal count", 255, self.proposals.len()));
        }

        let mut buf = BytesMut::new();
        for (i, p) in self.proposals.iter().enumerate() {
            buf.put_slice(&p.to_bytes(i + 1 == self.proposals.len())?);
        }
        Ok(buf.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ikev2::constants::{dh, encr, integ, prf, ProtocolId, ATTRIBUTE_TYPE_KEY_LENGTH};
    use crate::ErrorKind;

    fn ike_proposal() -> SaPayload {
        let mut sa = SaPayload::default();
        let proposal = sa.build_proposal(1, ProtocolId::Ike.to_u8(), &[]);
        let outcome = proposal.build_transform(
            TransformType::Encr.to_u8(),
            encr::AES_CBC,
            Some(ATTRIBUTE_TYPE_KEY_LENGTH),
            Some(256),
            &[],
        );
        assert_eq!(outcome, TransformBuild::Appended);
        let _ = proposal.build_transform(TransformType::Prf.to_u8(), prf::HMAC_SHA2_256, None, None, &[]);
        let _ = proposal.build_transform(
            TransformType::Integ.to_u8(),
            integ::HMAC_SHA2_256_128,
            None,
            None,
            &[],
        );
        let _ = proposal.build_transform(TransformType::Dh.to_u8(), dh::MODP_2048, None, None, &[]);
        sa
    }

    #[test]
    fn test_transform_serialization() {
        let t = Transform::new(TransformType::Encr, encr::AES_CBC).with_attribute(
            TransformAttribute::Fixed {
                attr_type: ATTRIBUTE_TYPE_KEY_LENGTH,
                value: 128,
            },
        );
        let bytes = t.to_bytes(true).unwrap();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 12, 1, 0, 0, 12, 0x80, 0x0E, 0x00, 0x80]
        );

        let (parsed, is_last, consumed) = Transform::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, t);
        assert!(is_last);
        assert_eq!(consumed, 12);

        assert_eq!(t.to_bytes(false).unwrap()[0], 3);
    }

    #[test]
    fn test_transform_tlv_attribute() {
        let mut proposal = Proposal::new(1, ProtocolId::Esp.to_u8(), &[1, 2, 3, 4]);
        let outcome = proposal.build_transform(1, 20, Some(17), None, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(outcome, TransformBuild::Appended);

        let bytes = proposal.transforms[0].to_bytes(true).unwrap();
        assert_eq!(&bytes[2..4], &[0, 15]);
        assert_eq!(&bytes[8..], &[0x00, 17, 0x00, 3, 0xAA, 0xBB, 0xCC]);

        let (parsed, _, _) = Transform::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, proposal.transforms[0]);
    }

    #[test]
    fn test_transform_without_attribute_value_is_omitted() {
        let mut proposal = Proposal::new(1, ProtocolId::Ike.to_u8(), &[]);
        let _ = proposal.build_transform(TransformType::Prf.to_u8(), prf::HMAC_SHA2_256, None, None, &[]);
        let before = proposal.to_bytes(true).unwrap();

        let outcome = proposal.build_transform(
            TransformType::Encr.to_u8(),
            encr::AES_CBC,
            Some(ATTRIBUTE_TYPE_KEY_LENGTH),
            None,
            &[],
        );
        assert_eq!(outcome, TransformBuild::Omitted);
        assert_eq!(proposal.transforms.len(), 1);
        assert_eq!(proposal.transforms[0].transform_type, TransformType::Prf.to_u8());
        // Wire bytes are unchanged
        assert_eq!(proposal.to_bytes(true).unwrap(), before);
    }

    #[test]
    fn test_sa_roundtrip() {
        let sa = ike_proposal();
        let data = sa.to_payload_data().unwrap();

        // 8 proposal header + 12 + 3 * 8 transforms
        assert_eq!(data.len(), 44);
        assert_eq!(&data[..8], &[0, 0, 0, 44, 1, 1, 0, 4]);

        let parsed = SaPayload::from_payload_data(&data).unwrap();
        assert_eq!(parsed, sa);
        assert_eq!(parsed.to_payload_data().unwrap(), data);
        assert_eq!(parsed.proposals[0].transforms_of(TransformType::Dh).count(), 1);
    }

    #[test]
    fn test_multiple_proposals() {
        let mut sa = ike_proposal();
        let esp = sa.build_proposal(2, ProtocolId::Esp.to_u8(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        let _ = esp.build_transform(TransformType::Esn.to_u8(), 0, None, None, &[]);

        let data = sa.to_payload_data().unwrap();
        assert_eq!(data[0], 2);
        assert_eq!(data[44], 0);

        let parsed = SaPayload::from_payload_data(&data).unwrap();
        assert_eq!(parsed.proposals.len(), 2);
        assert_eq!(parsed.proposals[1].spi, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        sa.reset();
        assert!(sa.proposals.is_empty());
    }

    #[test]
    fn test_proposal_decode_errors() {
        // Length beyond buffer
        assert!(Proposal::from_bytes(&[0, 0, 0, 40, 1, 1, 0, 0]).is_err());
        // Claims one transform, has none
        assert!(Proposal::from_bytes(&[0, 0, 0, 8, 1, 1, 0, 1]).is_err());
        // SPI size beyond proposal
        assert!(Proposal::from_bytes(&[0, 0, 0, 8, 1, 1, 4, 0]).is_err());
        // Trailing bytes after transforms
        let err = Proposal::from_bytes(&[0, 0, 0, 10, 1, 1, 0, 0, 9, 9]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        // Transform length below its header
        assert!(Transform::from_bytes(&[0, 0, 0, 4, 1, 0, 0, 12]).is_err());
        // TLV attribute longer than the transform
        assert!(Transform::from_bytes(&[0, 0, 0, 12, 1, 0, 0, 12, 0, 17, 0, 9]).is_err());
    }

    #[test]
    fn test_encode_overflow() {
        let mut proposal = Proposal::new(1, 1, &[0u8; 256]);
        assert_eq!(
            proposal.to_bytes(true).unwrap_err().kind(),
            ErrorKind::Overflow
        );

        proposal.spi.clear();
        for _ in 0..256 {
            let _ = proposal.build_transform(1, 12, None, None, &[]);
        }
        assert_eq!(
            proposal.to_bytes(true).unwrap_err().kind(),
            ErrorKind::Overflow
        );
    }
}
