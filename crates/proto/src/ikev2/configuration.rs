//! Configuration payload (RFC 7296 Section 3.15)
//!
//! ```text
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   CFG Type    |                    RESERVED                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |R|         Attribute Type      |            Length             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                             Value                             ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use bytes::{BufMut, BytesMut};

use super::payload::split_typed_prefix;
use crate::{Error, Result};

const ATTRIBUTE_TYPE_MASK: u16 = 0x7FFF;

/// One configuration attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationAttribute {
    /// Attribute type (15 bits, see [`cfg_attr`](super::constants::cfg_attr))
    pub attr_type: u16,
    /// Value; empty in a CFG_REQUEST asking for any value
    pub value: Vec<u8>,
}

/// CP payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpPayload {
    /// Configuration type (see [`ConfigurationType`](super::constants::ConfigurationType))
    pub cfg_type: u8,
    /// Attributes in wire order
    pub attributes: Vec<ConfigurationAttribute>,
}

impl CpPayload {
    /// Create an empty configuration payload
    pub fn new(cfg_type: u8) -> Self {
        CpPayload {
            cfg_type,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute
    pub fn build_configuration_attribute(&mut self, attr_type: u16, value: &[u8]) {
        self.attributes.push(ConfigurationAttribute {
            attr_type,
            value: value.to_vec(),
        });
    }

    /// Remove all attributes
    pub fn reset(&mut self) {
        self.attributes.clear();
    }

    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        let (cfg_type, mut rest) = split_typed_prefix(data)?;

        let mut attributes = Vec::new();
        while !rest.is_empty() {
            if rest.len() < 4 {
                return Err(Error::Decode(format!(
                    "configuration attribute header truncated at {} bytes",
                    rest.len()
                )));
            }
            let attr_type = u16::from_be_bytes([rest[0], rest[1]]) & ATTRIBUTE_TYPE_MASK;
            let len = u16::from_be_bytes([rest[2], rest[3]]) as usize;
            if 4 + len > rest.len() {
                return Err(Error::Decode(format!(
                    "configuration attribute {} length {} exceeds the {} remaining bytes",
                    attr_type,
                    len,
                    rest.len() - 4
                )));
            }
            attributes.push(ConfigurationAttribute {
                attr_type,
                value: rest[4..4 + len].to_vec(),
            });
            rest = &rest[4 + len..];
        }

        Ok(CpPayload {
            cfg_type,
            attributes,
        })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(4 + self.attributes.len() * 8);
        buf.put_u8(self.cfg_type);
        buf.put_slice(&[0u8; 3]);

        for attr in &self.attributes {
            if attr.attr_type > ATTRIBUTE_TYPE_MASK {
                return Err(Error::overflow(
                    "configuration attribute type",
                    ATTRIBUTE_TYPE_MASK as usize,
                    attr.attr_type as usize,
                ));
            }
            let len = u16::try_from(attr.value.len()).map_err(|_| {
                Error::overflow("configuration attribute length", 0xFFFF, attr.value.len())
            })?;
            buf.put_u16(attr.attr_type);
            buf.put_u16(len);
            buf.put_slice(&attr.value);
        }
        Ok(buf.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ikev2::constants::{cfg_attr, ConfigurationType};
    use crate::ErrorKind;

    #[test]
    fn test_cfg_reply_roundtrip() {
        let mut cp = CpPayload::new(ConfigurationType::Reply.to_u8());
        cp.build_configuration_attribute(cfg_attr::INTERNAL_IP4_ADDRESS, &[10, 0, 0, 2]);
        cp.build_configuration_attribute(cfg_attr::INTERNAL_IP4_NETMASK, &[255, 255, 255, 0]);

        let data = cp.to_payload_data().unwrap();
        assert_eq!(&data[..8], &[2, 0, 0, 0, 0, 1, 0, 4]);
        assert_eq!(data.len(), 4 + 8 + 8);
        assert_eq!(CpPayload::from_payload_data(&data).unwrap(), cp);
    }

    #[test]
    fn test_cfg_request_empty_values() {
        let mut cp = CpPayload::new(ConfigurationType::Request.to_u8());
        cp.build_configuration_attribute(cfg_attr::INTERNAL_IP4_ADDRESS, &[]);
        let data = cp.to_payload_data().unwrap();
        assert_eq!(data, vec![1, 0, 0, 0, 0, 1, 0, 0]);

        cp.reset();
        assert_eq!(cp.to_payload_data().unwrap(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_attribute_type_overflow() {
        let mut cp = CpPayload::new(1);
        cp.build_configuration_attribute(0x8001, &[]);
        assert_eq!(cp.to_payload_data().unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_decode_errors() {
        assert!(CpPayload::from_payload_data(&[1, 0]).is_err());
        assert!(CpPayload::from_payload_data(&[1, 0, 0, 0, 0, 1]).is_err());
        assert!(CpPayload::from_payload_data(&[1, 0, 0, 0, 0, 1, 0, 4, 10]).is_err());
    }
}
