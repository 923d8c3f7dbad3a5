//! Notify and Delete payloads (RFC 7296 Sections 3.10 and 3.11)
//!
//! Also decodes the bodies of the 3GPP private notify types the gateway
//! sends during IKE_AUTH and CREATE_CHILD_SA (TS 24.502 Section 9.2).

use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};

use super::constants::vendor_notify;
use crate::{Error, Result};

/// Notify Payload
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Protocol ID  |   SPI Size    |      Notify Message Type      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                Security Parameter Index (SPI)                 ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~                       Notification Data                       ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPayload {
    /// Protocol ID
    pub protocol_id: u8,

    /// Notify message type
    pub notify_type: u16,

    /// SPI (SPI size is its length)
    pub spi: Vec<u8>,

    /// Notification data
    pub data: Vec<u8>,
}

impl NotifyPayload {
    /// Create new notify payload
    pub fn new(protocol_id: u8, notify_type: u16, spi: &[u8], data: &[u8]) -> Self {
        NotifyPayload {
            protocol_id,
            notify_type,
            spi: spi.to_vec(),
            data: data.to_vec(),
        }
    }

    /// Whether the type is an error (values below 16384)
    pub fn is_error(&self) -> bool {
        self.notify_type < 16384
    }

    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }

        let protocol_id = data[0];
        let spi_size = data[1] as usize;
        let notify_type = u16::from_be_bytes([data[2], data[3]]);

        if 4 + spi_size > data.len() {
            return Err(Error::Decode(format!(
                "notify SPI size {} exceeds the {} remaining bytes",
                spi_size,
                data.len() - 4
            )));
        }

        Ok(NotifyPayload {
            protocol_id,
            notify_type,
            spi: data[4..4 + spi_size].to_vec(),
            data: data[4 + spi_size..].to_vec(),
        })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        let spi_size = u8::try_from(self.spi.len())
            .map_err(|_| Error::overflow("SPI size", 255, self.spi.len()))?;

        let mut buf = BytesMut::with_capacity(4 + self.spi.len() + self.data.len());
        buf.put_u8(self.protocol_id);
        buf.put_u8(spi_size);
        buf.put_u16(self.notify_type);
        buf.put_slice(&self.spi);
        buf.put_slice(&self.data);
        Ok(buf.to_vec())
    }

    /// Typed body of a 3GPP private notify
    ///
    /// Returns `Ok(None)` for every other notify type.
    pub fn vendor_notify(&self) -> Result<Option<VendorNotify>> {
        let notify = match self.notify_type {
            vendor_notify::QOS_INFO_5G => VendorNotify::QosInfo(QosInfo::decode(&self.data)?),
            vendor_notify::NAS_IP4_ADDRESS => {
                VendorNotify::NasIp4Address(ipv4_from(&self.data, "NAS_IP4_ADDRESS")?)
            }
            vendor_notify::UP_IP4_ADDRESS => {
                VendorNotify::UpIp4Address(ipv4_from(&self.data, "UP_IP4_ADDRESS")?)
            }
            vendor_notify::NAS_TCP_PORT => {
                let port: [u8; 2] = self.data.as_slice().try_into().map_err(|_| {
                    Error::Decode(format!(
                        "NAS_TCP_PORT needs 2 bytes, got {}",
                        self.data.len()
                    ))
                })?;
                VendorNotify::NasTcpPort(u16::from_be_bytes(port))
            }
            _ => return Ok(None),
        };
        Ok(Some(notify))
    }
}

fn ipv4_from(data: &[u8], name: &str) -> Result<Ipv4Addr> {
    let octets: [u8; 4] = data
        .try_into()
        .map_err(|_| Error::Decode(format!("{} needs 4 bytes, got {}", name, data.len())))?;
    Ok(Ipv4Addr::from(octets))
}

/// 3GPP private notify bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorNotify {
    /// 5G_QOS_INFO
    QosInfo(QosInfo),
    /// NAS_IP4_ADDRESS
    NasIp4Address(Ipv4Addr),
    /// UP_IP4_ADDRESS
    UpIp4Address(Ipv4Addr),
    /// NAS_TCP_PORT
    NasTcpPort(u16),
}

/// 5G_QOS_INFO body
///
/// ```text
/// [length, PDU session ID, QFI count, QFI..., flags, DSCP?]
/// ```
///
/// The length byte counts the whole body including itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QosInfo {
    /// PDU session the child SA belongs to
    pub pdu_session_id: u8,
    /// QoS flow identifiers mapped to the child SA
    pub qfi_list: Vec<u8>,
    /// Default child SA of the PDU session (DCSI)
    pub is_default: bool,
    /// DSCP value, when specified (DSCPI)
    pub dscp: Option<u8>,
}

impl QosInfo {
    /// Serialize the notification data
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the QFI list or the whole body exceeds 255 bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let qfi_count = u8::try_from(self.qfi_list.len())
            .map_err(|_| Error::overflow("QFI list length", 255, self.qfi_list.len()))?;

        let mut flags = 0u8;
        if self.is_default {
            flags |= vendor_notify::QOS_INFO_BIT_DCSI;
        }
        if self.dscp.is_some() {
            flags |= vendor_notify::QOS_INFO_BIT_DSCPI;
        }

        let mut body = Vec::with_capacity(5 + self.qfi_list.len());
        // Length is patched once the body is complete
        body.push(0);
        body.push(self.pdu_session_id);
        body.push(qfi_count);
        body.extend_from_slice(&self.qfi_list);
        body.push(flags);
        if let Some(dscp) = self.dscp {
            body.push(dscp);
        }

        body[0] = u8::try_from(body.len())
            .map_err(|_| Error::overflow("5G_QOS_INFO length", 255, body.len()))?;
        Ok(body)
    }

    /// Parse the notification data
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }
        if data[0] as usize != data.len() {
            return Err(Error::Decode(format!(
                "5G_QOS_INFO length byte {} but body has {} bytes",
                data[0],
                data.len()
            )));
        }

        let pdu_session_id = data[1];
        let qfi_count = data[2] as usize;
        let flags_at = 3 + qfi_count;
        if flags_at >= data.len() {
            return Err(Error::Decode(format!(
                "5G_QOS_INFO QFI count {} exceeds the body",
                qfi_count
            )));
        }
        let qfi_list = data[3..flags_at].to_vec();
        let flags = data[flags_at];

        let is_default = flags & vendor_notify::QOS_INFO_BIT_DCSI != 0;
        let (dscp, end) = if flags & vendor_notify::QOS_INFO_BIT_DSCPI != 0 {
            let dscp = *data.get(flags_at + 1).ok_or_else(|| {
                Error::Decode("5G_QOS_INFO DSCP flag set without DSCP byte".to_string())
            })?;
            (Some(dscp), flags_at + 2)
        } else {
            (None, flags_at + 1)
        };

        if end != data.len() {
            return Err(Error::Decode(format!(
                "5G_QOS_INFO has {} trailing bytes",
                data.len() - end
            )));
        }

        Ok(QosInfo {
            pdu_session_id,
            qfi_list,
            is_default,
            dscp,
        })
    }
}

/// Delete Payload
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Protocol ID   |   SPI Size    |          Num of SPIs          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ~               Security Parameter Index(es) (SPI)              ~
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Deleting the IKE SA carries no SPIs; child SA SPIs are 4 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePayload {
    /// Protocol ID
    pub protocol_id: u8,
    /// SPI size
    pub spi_size: u8,
    /// Number of SPIs as carried on the wire
    pub num_spi: u16,
    /// SPIs
    pub spis: Vec<u32>,
}

impl DeletePayload {
    /// SPI size of AH/ESP SPIs
    pub const CHILD_SPI_SIZE: u8 = 4;

    /// Create new delete payload
    pub fn new(protocol_id: u8, spi_size: u8, num_spi: u16, spis: &[u32]) -> Self {
        DeletePayload {
            protocol_id,
            spi_size,
            num_spi,
            spis: spis.to_vec(),
        }
    }

    /// Parse from data (without header)
    pub fn from_payload_data(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::too_short(4, data.len()));
        }

        let protocol_id = data[0];
        let spi_size = data[1];
        let num_spi = u16::from_be_bytes([data[2], data[3]]);
        let body = &data[4..];

        if num_spi > 0 && spi_size != Self::CHILD_SPI_SIZE {
            return Err(Error::Decode(format!(
                "delete SPI size {} unsupported, want {}",
                spi_size,
                Self::CHILD_SPI_SIZE
            )));
        }
        if body.len() != num_spi as usize * spi_size as usize {
            return Err(Error::Decode(format!(
                "delete carries {} SPI bytes for {} SPIs of size {}",
                body.len(),
                num_spi,
                spi_size
            )));
        }

        let spis = body
            .chunks_exact(Self::CHILD_SPI_SIZE as usize)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(DeletePayload {
            protocol_id,
            spi_size,
            num_spi,
            spis,
        })
    }

    /// Serialize to bytes (without header)
    pub fn to_payload_data(&self) -> Result<Vec<u8>> {
        if self.num_spi as usize != self.spis.len() {
            return Err(Error::Validation(format!(
                "delete declares {} SPIs but lists {}",
                self.num_spi,
                self.spis.len()
            )));
        }
        if !self.spis.is_empty() && self.spi_size != Self::CHILD_SPI_SIZE {
            return Err(Error::Validation(format!(
                "delete SPI size must be {} when SPIs are listed, got {}",
                Self::CHILD_SPI_SIZE,
                self.spi_size
            )));
        }

        let mut buf = BytesMut::with_capacity(4 + self.spis.len() * 4);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.spi_size);
        buf.put_u16(self.num_spi);
        for spi in &self.spis {
            buf.put_u32(*spi);
        }
        Ok(buf.to_vec())
    }
}
