//! IKE message framing (RFC 7296 Section 3.1)
//!
//! The fixed 28-byte header followed by the payload chain it names.

use bytes::{Buf, BufMut};

use super::constants::{ExchangeType, IkeFlags, PayloadType};
use super::constants::{IKE_HEADER_SIZE, IKE_VERSION, MAX_IKE_MESSAGE_SIZE};
use super::container::IkePayloadContainer;
use crate::logging;
use crate::{Error, Result};

/// IKE header
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       IKE SA Initiator's SPI                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       IKE SA Responder's SPI                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Next Payload | MjVer | MnVer | Exchange Type |     Flags     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Message ID                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Length                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkeHeader {
    /// IKE SA initiator SPI
    pub initiator_spi: u64,
    /// IKE SA responder SPI; zero in the first IKE_SA_INIT request
    pub responder_spi: u64,
    /// First payload of the chain
    pub next_payload: PayloadType,
    /// Major/minor version byte
    pub version: u8,
    /// Exchange this message belongs to
    pub exchange_type: ExchangeType,
    /// Initiator/Response flags
    pub flags: IkeFlags,
    /// Message ID
    pub message_id: u32,
    /// Whole message length, header included
    pub length: u32,
}

impl IkeHeader {
    /// Header for an outgoing message
    ///
    /// `next_payload` and `length` are filled in by [`IkeMessage::encode`].
    pub fn new(
        initiator_spi: u64,
        responder_spi: u64,
        exchange_type: ExchangeType,
        flags: IkeFlags,
        message_id: u32,
    ) -> Self {
        IkeHeader {
            initiator_spi,
            responder_spi,
            next_payload: PayloadType::None,
            version: IKE_VERSION,
            exchange_type,
            flags,
            message_id,
            length: IKE_HEADER_SIZE as u32,
        }
    }

    /// Parse the fixed header
    ///
    /// # Errors
    ///
    /// - `BufferTooShort` below 28 bytes
    /// - `UnsupportedPayload` for an unknown first payload type
    /// - `Decode` for a version other than 2.0, an unknown exchange type, or a
    ///   length outside `[28, 65535]`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < IKE_HEADER_SIZE {
            return Err(Error::too_short(IKE_HEADER_SIZE, data.len()));
        }

        let mut buf = &data[..IKE_HEADER_SIZE];
        let initiator_spi = buf.get_u64();
        let responder_spi = buf.get_u64();

        let raw_next = buf.get_u8();
        let next_payload =
            PayloadType::from_u8(raw_next).ok_or(Error::UnsupportedPayload(raw_next))?;

        let version = buf.get_u8();
        if version != IKE_VERSION {
            return Err(Error::Decode(format!(
                "IKE version 0x{:02x} not supported",
                version
            )));
        }

        let raw_exchange = buf.get_u8();
        let exchange_type = ExchangeType::from_u8(raw_exchange)
            .ok_or_else(|| Error::Decode(format!("unknown exchange type {}", raw_exchange)))?;

        let flags = IkeFlags::new(buf.get_u8());
        let message_id = buf.get_u32();
        let length = buf.get_u32();

        if !(IKE_HEADER_SIZE as u32..=MAX_IKE_MESSAGE_SIZE).contains(&length) {
            return Err(Error::Decode(format!(
                "IKE message length {} outside [{}, {}]",
                length, IKE_HEADER_SIZE, MAX_IKE_MESSAGE_SIZE
            )));
        }

        Ok(IkeHeader {
            initiator_spi,
            responder_spi,
            next_payload,
            version,
            exchange_type,
            flags,
            message_id,
            length,
        })
    }

    /// Serialize the fixed header
    pub fn to_bytes(&self) -> [u8; IKE_HEADER_SIZE] {
        let mut out = [0u8; IKE_HEADER_SIZE];
        let mut buf = &mut out[..];
        buf.put_u64(self.initiator_spi);
        buf.put_u64(self.responder_spi);
        buf.put_u8(self.next_payload.to_u8());
        buf.put_u8(self.version);
        buf.put_u8(self.exchange_type.to_u8());
        buf.put_u8(self.flags.value());
        buf.put_u32(self.message_id);
        buf.put_u32(self.length);
        out
    }
}

/// A complete IKE message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkeMessage {
    /// Fixed header
    pub header: IkeHeader,
    /// Payload chain
    pub payloads: IkePayloadContainer,
}

impl IkeMessage {
    /// Create a message with no payloads
    pub fn new(header: IkeHeader) -> Self {
        IkeMessage {
            header,
            payloads: IkePayloadContainer::new(),
        }
    }

    /// Serialize the message
    ///
    /// Sets the header's Next Payload to the first payload type and its
    /// Length to the encoded size.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the message exceeds 65535 bytes, or any payload
    /// encoding error.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        let body = self.payloads.encode()?;
        let total = IKE_HEADER_SIZE + body.len();
        if total > MAX_IKE_MESSAGE_SIZE as usize {
            return Err(Error::overflow(
                "IKE message length",
                MAX_IKE_MESSAGE_SIZE as usize,
                total,
            ));
        }

        self.header.next_payload = self.payloads.first_payload_type();
        self.header.length = total as u32;

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Parse a message received from the network
    ///
    /// Bytes past the header's Length are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_inner(data)
            .inspect_err(|e| logging::log_decode_failed("IKE message", &e.to_string()))
    }

    fn decode_inner(data: &[u8]) -> Result<Self> {
        let header = IkeHeader::from_bytes(data)?;
        let length = header.length as usize;
        if length > data.len() {
            return Err(Error::too_short(length, data.len()));
        }

        let payloads =
            IkePayloadContainer::decode(header.next_payload, &data[IKE_HEADER_SIZE..length])?;
        Ok(IkeMessage { header, payloads })
    }
}
