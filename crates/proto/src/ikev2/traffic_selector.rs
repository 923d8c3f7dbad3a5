//! Traffic Selector payloads (RFC 7296 Section 3.13)
//!
//! ```text
//! TS payload body:
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Number of TSs |                 RESERVED                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                       <Traffic Selectors>                     ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!
//! Traffic Selector:
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   TS Type     |IP Protocol ID*|       Selector Length         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           Start Port*         |           End Port*           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                         Starting Address*                     ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                         Ending Address*                       ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{BufMut, BytesMut};

use super::constants::{ip_protocol, TrafficSelectorType};
use crate::{Error, Result};

/// One traffic selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualTrafficSelector {
    /// TS type (see [`TrafficSelectorType`])
    pub ts_type: u8,
    /// IP protocol ID (0 = any)
    pub ip_protocol_id: u8,
    /// Start port
    pub start_port: u16,
    /// End port
    pub end_port: u16,
    /// Starting address (4 or 16 bytes)
    pub start_address: Vec<u8>,
    /// Ending address (4 or 16 bytes)
    pub end_address: Vec<u8>,
}

impl IndividualTrafficSelector {
    /// Fixed part of a selector before the addresses
    pub const HEADER_LEN: usize = 8;

    /// Selector covering an IPv4 range, all protocols and ports
    pub fn ipv4_range(start: Ipv4Addr, end: Ipv4Addr) -> Self {
        IndividualTrafficSelector {
            ts_type: TrafficSelectorType::Ipv4AddrRange.to_u8(),
            ip_protocol_id: ip_protocol::ALL,
            start_port: 0,
            end_port: u16::MAX,
            start_address: start.octets().to_vec(),
            end_address: end.octets().to_vec(),
        }
    }

    /// Selector covering an IPv6 range, all protocols and ports
    pub fn ipv6_range(start: Ipv6Addr, end: Ipv6Addr) -> Self {
        IndividualTrafficSelector {
            ts_type: TrafficSelectorType::Ipv6AddrRange.to_u8(),
            ip_protocol_id: ip_protocol::ALL,
            start_port: 0,
            end_port: u16::MAX,
            start_address: start.octets().to_vec(),
            end_address: end.octets().to_vec(),
        }
    }

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        let ts_type = TrafficSelectorType::from_u8(self.ts_type).ok_or_else(|| {
            Error::Validation(format!("unsupported traffic selector type {}", self.ts_type))
        })?;
        let addr_len = ts_type.address_len();
        if self.start_address.len() != addr_len || self.end_address.len() != addr_len {
            return Err(Error::Validation(format!(
                "traffic selector type {} needs {}-byte addresses, got {} and {}",
                self.ts_type,
                addr_len,
                self.start_address.len(),
                self.end_address.len()
            )));
        }

        buf.put_u8(self.ts_type);
        buf.put_u8(self.ip_protocol_id);
        buf.put_u16((Self::HEADER_LEN + 2 * addr_len) as u16);
        buf.put_u16(self.start_port);
        buf.put_u16(self.end_port);
        buf.put_slice(&self.start_address);
        buf.put_slice(&self.end_address);
        Ok(())
    }

    fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < Self::HEADER_LEN {
            return Err(Error::too_short(Self::HEADER_LEN, data.len()));
        }

        let ts_type = TrafficSelectorType::from_u8(data[0])
            .ok_or_else(|| Error::Decode(format!("unsupported traffic selector type {}", data[0])))?;
        let addr_len = ts_type.address_len();
        let expected = Self::HEADER_LEN + 2 * addr_len;

        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if length != expected {
            return Err(Error::Decode(format!(
                "traffic selector length {}, want {}",
                length, expected
            )));
        }
        if length > data.len() {
            return Err(Error::too_short(length, data.len()));
        }

        let addrs = &data[Self::HEADER_LEN..length];
        Ok((
            IndividualTrafficSelector {
                ts_type: data[0],
                ip_protocol_id: data[1],
                start_port: u16::from_be_bytes([data[4], data[5]]),
                end_port: u16::from_be_bytes([data[6], data[7]]),
                start_address: addrs[..addr_len].to_vec(),
                end_address: addrs[addr_len..].to_vec(),
            },
            length,
        ))
    }
}

/// TSi / TSr payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsPayload {
    /// Selectors in wire order
    pub selectors: Vec<IndividualTrafficSelector>,
}

impl TsPayload {
    /// Append a selector
    pub fn build_individual_traffic_selector(
        &mut self,
        ts_type: u8,
        ip_protocol_id: u8,
        start_port: u16,
        end_port: u16,
        start_address: &[u8],
        end_address: &[u8],
    ) {
        self.selectors.push(IndividualTrafficSelector {
            ts_type,
            ip_protocol_id,
            start_port,
            end_port,
            start_address: start_address.to_vec(),
            end_address: end_address.to_vec(),
        });
    }

    /// Remove all selectors
    pub fn reset(&mut self) {
        self.selectors.clear();
    }

    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }

        let count = data[0] as usize;
        let mut offset = 4;
        let mut selectors = Vec::with_capacity(count);
        for _ in 0..count {
            let (selector, consumed) = IndividualTrafficSelector::from_bytes(&data[offset..])?;
            selectors.push(selector);
            offset += consumed;
        }

        if offset != data.len() {
            return Err(Error::Decode(format!(
                "{} bytes after {} traffic selectors",
                data.len() - offset,
                count
            )));
        }
        Ok(TsPayload { selectors })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        let count = u8::try_from(self.selectors.len())
            .map_err(|_| Error::overflow("traffic selector count", 255, self.selectors.len()))?;

        let mut buf = BytesMut::with_capacity(4 + self.selectors.len() * 40);
        buf.put_u8(count);
        buf.put_slice(&[0u8; 3]);
        for selector in &self.selectors {
            selector.encode_into(&mut buf)?;
        }
        Ok(buf.to_vec())
    }
}
