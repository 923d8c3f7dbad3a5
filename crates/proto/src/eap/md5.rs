//! EAP-MD5-Challenge method (RFC 3748 Section 5.4)
//!
//! ```text
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Type (4)     |  Value-Size   |  Value ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Name ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The value is always 16 bytes here; the name runs to the end of the EAP
//! message.

use bytes::{BufMut, BytesMut};

use super::{EapMethod, EapType};
use crate::{Error, Result};

/// Size of the MD5 challenge/response value
pub const MD5_VALUE_SIZE: usize = 16;

/// Type and Value-Size bytes
const MD5_HEADER_LEN: usize = 2;

/// EAP-MD5-Challenge type data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapMd5 {
    /// Value-Size byte as carried on the wire
    pub value_size: u8,
    /// Challenge or response value
    pub value: Vec<u8>,
    /// Optional name, raw bytes
    pub name: Vec<u8>,
}

impl EapMd5 {
    /// Create an MD5 challenge with a 16-byte value
    ///
    /// # Errors
    ///
    /// Returns `Validation` unless `value` is exactly 16 bytes.
    pub fn new(value: &[u8], name: impl Into<Vec<u8>>) -> Result<Self> {
        let mut md5 = EapMd5 {
            value_size: MD5_VALUE_SIZE as u8,
            value: vec![0u8; MD5_VALUE_SIZE],
            name: name.into(),
        };
        md5.set_challenge_value(value)?;
        Ok(md5)
    }

    /// Replace the challenge value
    ///
    /// # Errors
    ///
    /// Returns `Validation` unless `value` is exactly 16 bytes.
    pub fn set_challenge_value(&mut self, value: &[u8]) -> Result<()> {
        if value.len() != MD5_VALUE_SIZE {
            return Err(Error::Validation(format!(
                "EAP-MD5 value must be {} bytes, got {}",
                MD5_VALUE_SIZE,
                value.len()
            )));
        }
        self.value_size = MD5_VALUE_SIZE as u8;
        self.value = value.to_vec();
        Ok(())
    }

    /// Replace the name
    pub fn set_name(&mut self, name: impl Into<Vec<u8>>) {
        self.name = name.into();
    }

    /// Name as UTF-8, if it is valid UTF-8
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }
}

impl EapMethod for EapMd5 {
    fn eap_type(&self) -> EapType {
        EapType::Md5Challenge
    }

    fn encode(&self) -> Result<Vec<u8>> {
        if self.value.len() != MD5_VALUE_SIZE || self.value_size as usize != MD5_VALUE_SIZE {
            return Err(Error::Validation(format!(
                "EAP-MD5 value must be {} bytes, value-size {} with {} bytes",
                MD5_VALUE_SIZE,
                self.value_size,
                self.value.len()
            )));
        }

        let mut buf = BytesMut::with_capacity(MD5_HEADER_LEN + MD5_VALUE_SIZE + self.name.len());
        buf.put_u8(EapType::Md5Challenge.to_u8());
        buf.put_u8(self.value_size);
        buf.put_slice(&self.value);
        buf.put_slice(&self.name);
        Ok(buf.to_vec())
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let required = MD5_HEADER_LEN + MD5_VALUE_SIZE;
        if data.len() < required {
            return Err(Error::too_short(required, data.len()));
        }
        if data[0] != EapType::Md5Challenge.to_u8() {
            return Err(Error::UnexpectedType {
                expected: EapType::Md5Challenge.to_u8(),
                actual: data[0],
            });
        }
        if data[1] as usize != MD5_VALUE_SIZE {
            return Err(Error::Decode(format!(
                "EAP-MD5 value-size must be {}, got {}",
                MD5_VALUE_SIZE, data[1]
            )));
        }

        Ok(EapMd5 {
            value_size: data[1],
            value: data[MD5_HEADER_LEN..required].to_vec(),
            name: data[required..].to_vec(),
        })
    }
}
