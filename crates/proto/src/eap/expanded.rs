//! EAP-Expanded type and the 3GPP EAP-5G method (TS 24.502 Section 9.3.2)
//!
//! ```text
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Type (254)    |               Vendor-Id (24 bits)             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          Vendor-Type                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                          Vendor data                          ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! EAP-5G uses vendor 10415 (3GPP) and vendor type 3. Its vendor data is one
//! of:
//!
//! ```text
//! 5G-Start:            [1, spare]
//! 5G-Stop:             [4, spare]
//! 5G-NAS (to UE):      [2, spare, NAS len16, NAS-PDU]
//! 5G-NAS (to gateway): [2, spare, AN len16, AN-parameters, NAS len16, NAS-PDU]
//! ```

use bytes::{Buf, BufMut, BytesMut};

use super::{EapMethod, EapType};
use crate::{Error, Result};

/// 3GPP IANA private enterprise number
pub const VENDOR_ID_3GPP: u32 = 10415;

/// Vendor type of EAP-5G
pub const VENDOR_TYPE_EAP5G: u32 = 3;

/// Largest vendor ID that fits the 24-bit field
pub const MAX_VENDOR_ID: u32 = 0x00FF_FFFF;

/// Type, Vendor-Id and Vendor-Type
const EXPANDED_HEADER_LEN: usize = 8;

/// EAP-5G message identifiers, AN-parameter types and values
pub mod eap5g {
    /// 5G-Start message
    pub const MESSAGE_START: u8 = 1;
    /// 5G-NAS message
    pub const MESSAGE_NAS: u8 = 2;
    /// 5G-Stop message
    pub const MESSAGE_STOP: u8 = 4;
    /// Spare octet value
    pub const SPARE: u8 = 0;

    /// AN-parameter: GUAMI
    pub const AN_PARAM_GUAMI: u8 = 1;
    /// AN-parameter: selected PLMN ID
    pub const AN_PARAM_PLMN_ID: u8 = 2;
    /// AN-parameter: requested NSSAI
    pub const AN_PARAM_NSSAI: u8 = 3;
    /// AN-parameter: establishment cause
    pub const AN_PARAM_ESTABLISHMENT_CAUSE: u8 = 4;

    /// GUAMI value length
    pub const AN_PARAM_GUAMI_LEN: usize = 6;
    /// PLMN ID value length
    pub const AN_PARAM_PLMN_ID_LEN: usize = 3;
    /// Establishment cause value length
    pub const AN_PARAM_ESTABLISHMENT_CAUSE_LEN: usize = 1;

    /// Establishment cause: emergency
    pub const CAUSE_EMERGENCY: u8 = 0;
    /// Establishment cause: high priority access
    pub const CAUSE_HIGH_PRIORITY_ACCESS: u8 = 1;
    /// Establishment cause: mo-Signalling
    pub const CAUSE_MO_SIGNALLING: u8 = 3;
    /// Establishment cause: mo-Data
    pub const CAUSE_MO_DATA: u8 = 4;
    /// Establishment cause: mps-PriorityAccess
    pub const CAUSE_MPS_PRIORITY_ACCESS: u8 = 8;
    /// Establishment cause: mcs-PriorityAccess
    pub const CAUSE_MCS_PRIORITY_ACCESS: u8 = 9;
}

/// EAP-Expanded type data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapExpanded {
    /// Vendor-Id (24 bits on the wire)
    pub vendor_id: u32,
    /// Vendor-Type
    pub vendor_type: u32,
    /// Opaque vendor data
    pub vendor_data: Vec<u8>,
}

impl EapExpanded {
    /// Create expanded type data
    pub fn new(vendor_id: u32, vendor_type: u32, vendor_data: impl Into<Vec<u8>>) -> Self {
        EapExpanded {
            vendor_id,
            vendor_type,
            vendor_data: vendor_data.into(),
        }
    }

    /// EAP-5G 5G-Start
    pub fn eap5g_start() -> Self {
        Self::eap5g(vec![eap5g::MESSAGE_START, eap5g::SPARE])
    }

    /// EAP-5G 5G-Stop
    pub fn eap5g_stop() -> Self {
        Self::eap5g(vec![eap5g::MESSAGE_STOP, eap5g::SPARE])
    }

    /// EAP-5G 5G-NAS carrying a NAS PDU towards the UE
    ///
    /// # Errors
    ///
    /// - `Validation` if `nas_pdu` is empty
    /// - `Overflow` if `nas_pdu` exceeds 65535 bytes
    pub fn eap5g_nas(nas_pdu: &[u8]) -> Result<Self> {
        let nas_len = nas_pdu_len(nas_pdu)?;

        let mut buf = BytesMut::with_capacity(4 + nas_pdu.len());
        buf.put_u8(eap5g::MESSAGE_NAS);
        buf.put_u8(eap5g::SPARE);
        buf.put_u16(nas_len);
        buf.put_slice(nas_pdu);

        Ok(Self::eap5g(buf.to_vec()))
    }

    /// EAP-5G 5G-NAS carrying AN-parameters and a NAS PDU towards the gateway
    ///
    /// # Errors
    ///
    /// - `Validation` if `nas_pdu` is empty or a parameter has a bad length
    /// - `Overflow` if the parameters or the PDU exceed their 16-bit length
    pub fn eap5g_nas_with_an_parameters(
        an_parameters: &[AnParameter],
        nas_pdu: &[u8],
    ) -> Result<Self> {
        let nas_len = nas_pdu_len(nas_pdu)?;

        let mut params = BytesMut::new();
        for param in an_parameters {
            param.encode_into(&mut params)?;
        }
        let an_len = u16::try_from(params.len())
            .map_err(|_| Error::overflow("AN-parameters length", 0xFFFF, params.len()))?;

        let mut buf = BytesMut::with_capacity(6 + params.len() + nas_pdu.len());
        buf.put_u8(eap5g::MESSAGE_NAS);
        buf.put_u8(eap5g::SPARE);
        buf.put_u16(an_len);
        buf.put_slice(&params);
        buf.put_u16(nas_len);
        buf.put_slice(nas_pdu);

        Ok(Self::eap5g(buf.to_vec()))
    }

    fn eap5g(vendor_data: Vec<u8>) -> Self {
        EapExpanded::new(VENDOR_ID_3GPP, VENDOR_TYPE_EAP5G, vendor_data)
    }

    /// Whether this is 3GPP EAP-5G
    pub fn is_eap5g(&self) -> bool {
        self.vendor_id == VENDOR_ID_3GPP && self.vendor_type == VENDOR_TYPE_EAP5G
    }
}

fn nas_pdu_len(nas_pdu: &[u8]) -> Result<u16> {
    if nas_pdu.is_empty() {
        return Err(Error::Validation("5G-NAS requires a NAS PDU".to_string()));
    }
    u16::try_from(nas_pdu.len())
        .map_err(|_| Error::overflow("NAS PDU length", 0xFFFF, nas_pdu.len()))
}

impl EapMethod for EapExpanded {
    fn eap_type(&self) -> EapType {
        EapType::Expanded
    }

    fn encode(&self) -> Result<Vec<u8>> {
        if self.vendor_id > MAX_VENDOR_ID {
            return Err(Error::overflow(
                "vendor ID",
                MAX_VENDOR_ID as usize,
                self.vendor_id as usize,
            ));
        }

        let mut buf = BytesMut::with_capacity(EXPANDED_HEADER_LEN + self.vendor_data.len());
        buf.put_u8(EapType::Expanded.to_u8());
        buf.put_slice(&self.vendor_id.to_be_bytes()[1..]);
        buf.put_u32(self.vendor_type);
        buf.put_slice(&self.vendor_data);
        Ok(buf.to_vec())
    }

    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < EXPANDED_HEADER_LEN {
            return Err(Error::too_short(EXPANDED_HEADER_LEN, data.len()));
        }
        if data[0] != EapType::Expanded.to_u8() {
            return Err(Error::UnexpectedType {
                expected: EapType::Expanded.to_u8(),
                actual: data[0],
            });
        }

        let vendor_id = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        let vendor_type = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);

        Ok(EapExpanded {
            vendor_id,
            vendor_type,
            vendor_data: data[EXPANDED_HEADER_LEN..].to_vec(),
        })
    }
}

/// AN-parameter TLV (type, length8, value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnParameter {
    /// Parameter type
    pub param_type: u8,
    /// Parameter value
    pub value: Vec<u8>,
}

impl AnParameter {
    /// Create a parameter, checking the fixed-length types
    ///
    /// # Errors
    ///
    /// - `Validation` if a GUAMI, PLMN ID or establishment cause value has
    ///   the wrong length
    /// - `Overflow` if the value exceeds 255 bytes
    pub fn new(param_type: u8, value: impl Into<Vec<u8>>) -> Result<Self> {
        let param = AnParameter {
            param_type,
            value: value.into(),
        };
        param.validate()?;
        Ok(param)
    }

    /// GUAMI parameter
    pub fn guami(guami: [u8; eap5g::AN_PARAM_GUAMI_LEN]) -> Self {
        AnParameter {
            param_type: eap5g::AN_PARAM_GUAMI,
            value: guami.to_vec(),
        }
    }

    /// Selected PLMN ID parameter
    pub fn plmn_id(plmn_id: [u8; eap5g::AN_PARAM_PLMN_ID_LEN]) -> Self {
        AnParameter {
            param_type: eap5g::AN_PARAM_PLMN_ID,
            value: plmn_id.to_vec(),
        }
    }

    /// Establishment cause parameter
    pub fn establishment_cause(cause: u8) -> Self {
        AnParameter {
            param_type: eap5g::AN_PARAM_ESTABLISHMENT_CAUSE,
            value: vec![cause],
        }
    }

    fn expected_len(&self) -> Option<usize> {
        match self.param_type {
            eap5g::AN_PARAM_GUAMI => Some(eap5g::AN_PARAM_GUAMI_LEN),
            eap5g::AN_PARAM_PLMN_ID => Some(eap5g::AN_PARAM_PLMN_ID_LEN),
            eap5g::AN_PARAM_ESTABLISHMENT_CAUSE => Some(eap5g::AN_PARAM_ESTABLISHMENT_CAUSE_LEN),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(expected) = self.expected_len() {
            if self.value.len() != expected {
                return Err(Error::Validation(format!(
                    "AN-parameter {} requires {} bytes, got {}",
                    self.param_type,
                    expected,
                    self.value.len()
                )));
            }
        }
        if self.value.len() > u8::MAX as usize {
            return Err(Error::overflow(
                "AN-parameter length",
                u8::MAX as usize,
                self.value.len(),
            ));
        }
        Ok(())
    }

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        self.validate()?;
        buf.put_u8(self.param_type);
        buf.put_u8(self.value.len() as u8);
        buf.put_slice(&self.value);
        Ok(())
    }

    /// Decode a packed AN-parameter list
    pub fn decode_list(data: &[u8]) -> Result<Vec<AnParameter>> {
        let mut buf = data;
        let mut params = Vec::new();

        while buf.has_remaining() {
            if buf.remaining() < 2 {
                return Err(Error::Decode(
                    "AN-parameter: truncated parameter header".to_string(),
                ));
            }
            let param_type = buf.get_u8();
            let len = buf.get_u8() as usize;
            if len > buf.remaining() {
                return Err(Error::Decode(format!(
                    "AN-parameter {}: length {} exceeds the {} remaining bytes",
                    param_type,
                    len,
                    buf.remaining()
                )));
            }

            let param = AnParameter {
                param_type,
                value: buf[..len].to_vec(),
            };
            buf.advance(len);

            if let Some(expected) = param.expected_len() {
                if len != expected {
                    return Err(Error::Decode(format!(
                        "AN-parameter {}: length {}, want {}",
                        param_type, len, expected
                    )));
                }
            }
            params.push(param);
        }

        Ok(params)
    }
}

/// Which side produced a 5G-NAS message
///
/// Only messages sent to the gateway carry AN-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eap5gDirection {
    /// Gateway to UE
    ToUe,
    /// UE to gateway
    ToGateway,
}

/// Parsed EAP-5G vendor data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eap5gMessage {
    /// 5G-Start
    Start,
    /// 5G-Stop
    Stop,
    /// 5G-NAS
    Nas {
        /// AN-parameters (always empty towards the UE)
        an_parameters: Vec<AnParameter>,
        /// NAS PDU
        nas_pdu: Vec<u8>,
    },
}

impl Eap5gMessage {
    /// Parse EAP-5G vendor data
    pub fn parse(vendor_data: &[u8], direction: Eap5gDirection) -> Result<Self> {
        if vendor_data.len() < 2 {
            return Err(Error::too_short(2, vendor_data.len()));
        }

        let mut buf = vendor_data;
        let message_id = buf.get_u8();
        let _spare = buf.get_u8();

        match message_id {
            eap5g::MESSAGE_START => Ok(Eap5gMessage::Start),
            eap5g::MESSAGE_STOP => Ok(Eap5gMessage::Stop),
            eap5g::MESSAGE_NAS => {
                let an_parameters = match direction {
                    Eap5gDirection::ToUe => Vec::new(),
                    Eap5gDirection::ToGateway => {
                        let params = read_len16_block(&mut buf, "AN-parameters")?;
                        AnParameter::decode_list(params)?
                    }
                };

                let nas_pdu = read_len16_block(&mut buf, "NAS PDU")?.to_vec();
                if buf.has_remaining() {
                    return Err(Error::Decode(format!(
                        "5G-NAS: {} bytes after the NAS PDU",
                        buf.remaining()
                    )));
                }

                Ok(Eap5gMessage::Nas {
                    an_parameters,
                    nas_pdu,
                })
            }
            other => Err(Error::Decode(format!(
                "unknown EAP-5G message ID {}",
                other
            ))),
        }
    }
}

fn read_len16_block<'a>(buf: &mut &'a [u8], field: &str) -> Result<&'a [u8]> {
    if buf.remaining() < 2 {
        return Err(Error::Decode(format!("5G-NAS: truncated {} length", field)));
    }
    let len = buf.get_u16() as usize;
    if len > buf.remaining() {
        return Err(Error::Decode(format!(
            "5G-NAS: {} length {} exceeds the {} remaining bytes",
            field,
            len,
            buf.remaining()
        )));
    }
    let slice: &'a [u8] = *buf;
    let (block, rest) = slice.split_at(len);
    *buf = rest;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_eap5g_start() {
        let start = EapExpanded::eap5g_start();
        assert!(start.is_eap5g());
        assert_eq!(start.vendor_data, vec![1, 0]);

        let bytes = start.encode().unwrap();
        assert_eq!(bytes, vec![254, 0x00, 0x28, 0xAF, 0, 0, 0, 3, 1, 0]);
        assert_eq!(
            Eap5gMessage::parse(&start.vendor_data, Eap5gDirection::ToUe).unwrap(),
            Eap5gMessage::Start
        );
    }

    #[test]
    fn test_eap5g_nas() {
        let pdu = [0x7E, 0x00, 0x41, 0x79];
        let nas = EapExpanded::eap5g_nas(&pdu).unwrap();
        assert_eq!(nas.vendor_data, vec![2, 0, 0, 4, 0x7E, 0x00, 0x41, 0x79]);

        let msg = Eap5gMessage::parse(&nas.vendor_data, Eap5gDirection::ToUe).unwrap();
        assert_eq!(
            msg,
            Eap5gMessage::Nas {
                an_parameters: Vec::new(),
                nas_pdu: pdu.to_vec()
            }
        );
    }

    #[test]
    fn test_eap5g_nas_limits() {
        let err = EapExpanded::eap5g_nas(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let max = vec![0xAA; 65535];
        let nas = EapExpanded::eap5g_nas(&max).unwrap();
        assert_eq!(&nas.vendor_data[..4], &[2, 0, 0xFF, 0xFF]);

        let err = EapExpanded::eap5g_nas(&vec![0u8; 65536]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_nas_with_an_parameters() {
        let params = vec![
            AnParameter::guami([0x02, 0xF8, 0x39, 0xCA, 0xFE, 0x00]),
            AnParameter::plmn_id([0x02, 0xF8, 0x39]),
            AnParameter::establishment_cause(eap5g::CAUSE_MO_SIGNALLING),
        ];
        let nas = EapExpanded::eap5g_nas_with_an_parameters(&params, &[0x7E, 0x00]).unwrap();

        // 8 + 5 + 3 bytes of AN-parameters
        assert_eq!(&nas.vendor_data[..4], &[2, 0, 0, 16]);

        let msg = Eap5gMessage::parse(&nas.vendor_data, Eap5gDirection::ToGateway).unwrap();
        assert_eq!(
            msg,
            Eap5gMessage::Nas {
                an_parameters: params,
                nas_pdu: vec![0x7E, 0x00]
            }
        );
    }

    #[test]
    fn test_an_parameter_lengths() {
        assert!(AnParameter::new(eap5g::AN_PARAM_GUAMI, vec![0u8; 5]).is_err());
        assert!(AnParameter::new(eap5g::AN_PARAM_PLMN_ID, vec![0u8; 3]).is_ok());
        assert!(AnParameter::new(eap5g::AN_PARAM_NSSAI, vec![0u8; 9]).is_ok());
        assert_eq!(
            AnParameter::new(eap5g::AN_PARAM_NSSAI, vec![0u8; 256])
                .unwrap_err()
                .kind(),
            ErrorKind::Overflow
        );

        // Establishment cause with two bytes
        let err = AnParameter::decode_list(&[4, 2, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(AnParameter::decode_list(&[1, 6, 0]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_lengths() {
        assert!(Eap5gMessage::parse(&[2], Eap5gDirection::ToUe).is_err());
        assert!(Eap5gMessage::parse(&[2, 0, 0], Eap5gDirection::ToUe).is_err());
        assert!(Eap5gMessage::parse(&[2, 0, 0, 9, 1], Eap5gDirection::ToUe).is_err());
        assert!(Eap5gMessage::parse(&[2, 0, 0, 1, 1, 1], Eap5gDirection::ToUe).is_err());
        assert!(Eap5gMessage::parse(&[2, 0, 0xFF, 0xFF], Eap5gDirection::ToGateway).is_err());
        assert!(Eap5gMessage::parse(&[9, 0], Eap5gDirection::ToUe).is_err());
        assert_eq!(
            Eap5gMessage::parse(&[4, 0], Eap5gDirection::ToGateway).unwrap(),
            Eap5gMessage::Stop
        );
    }

    #[test]
    fn test_vendor_id_overflow() {
        let expanded = EapExpanded::new(0x0100_0000, 1, vec![]);
        assert_eq!(expanded.encode().unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_decode_expanded() {
        let bytes = [254, 0x00, 0x28, 0xAF, 0, 0, 0, 3, 4, 0];
        let expanded = EapExpanded::decode(&bytes).unwrap();
        assert!(expanded.is_eap5g());
        assert_eq!(expanded.vendor_data, vec![4, 0]);

        assert!(EapExpanded::decode(&bytes[..7]).is_err());
        assert!(matches!(
            EapExpanded::decode(&[23, 0, 0, 0, 0, 0, 0, 0]),
            Err(Error::UnexpectedType { .. })
        ));
    }
}
