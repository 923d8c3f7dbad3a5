//! Ordered payload container and payload chain codec
//!
//! An [`IkePayloadContainer`] holds the payloads of one IKE message body (or
//! of the plaintext inside an SK payload) in wire order, together with each
//! payload's Critical bit. Builders append one payload each; composite
//! builders pass the new payload to a closure so the caller can add
//! proposals, selectors or attributes before it is appended.
//!
//! # Example
//!
//! ```
//! use nwu_proto::ikev2::constants::{dh, encr, PayloadType, ProtocolId, TransformType};
//! use nwu_proto::ikev2::IkePayloadContainer;
//!
//! let mut payloads = IkePayloadContainer::new();
//! payloads.build_security_association(|sa| {
//!     let proposal = sa.build_proposal(1, ProtocolId::Ike.to_u8(), &[]);
//!     let _ = proposal.build_transform(TransformType::Encr.to_u8(), encr::AES_CBC, Some(14), Some(256), &[]);
//!     let _ = proposal.build_transform(TransformType::Dh.to_u8(), dh::MODP_2048, None, None, &[]);
//! });
//! payloads.build_key_exchange(dh::MODP_2048, &[0u8; 256]);
//! payloads.build_nonce(&[7u8; 32]);
//!
//! let bytes = payloads.encode().unwrap();
//! let decoded = IkePayloadContainer::decode(PayloadType::SA, &bytes).unwrap();
//! assert_eq!(decoded, payloads);
//! ```

use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};

use super::configuration::CpPayload;
use super::constants::{vendor_notify, PayloadType, ProtocolId};
use super::notify::{DeletePayload, NotifyPayload, QosInfo};
use super::payload::{
    AuthPayload, CertPayload, CertReqPayload, IdPayload, IkePayload, KePayload, NoncePayload,
    PayloadHeader, SkPayload, VendorIdPayload,
};
use super::proposal::SaPayload;
use super::traffic_selector::TsPayload;
use crate::config::GatewayNotifyConfig;
use crate::eap::{Eap, EapCode, EapExpanded};
use crate::logging;
use crate::{Error, Result};

/// Payloads of one message, in wire order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IkePayloadContainer {
    payloads: Vec<IkePayload>,
    // Critical bit of each payload's generic header, indexed like `payloads`
    critical: Vec<bool>,
}

impl IkePayloadContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every payload
    pub fn reset(&mut self) {
        self.payloads.clear();
        self.critical.clear();
    }

    /// Number of payloads
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Whether the container is empty
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Payloads in wire order
    pub fn payloads(&self) -> &[IkePayload] {
        &self.payloads
    }

    /// Consume the container
    pub fn into_payloads(self) -> Vec<IkePayload> {
        self.payloads
    }

    /// Append a payload built elsewhere
    pub fn push(&mut self, payload: IkePayload) {
        self.append(payload, false);
    }

    /// Append a payload with the Critical bit set in its generic header
    pub fn push_critical(&mut self, payload: IkePayload) {
        self.append(payload, true);
    }

    /// Whether the payload at `index` carries the Critical bit
    pub fn is_critical(&self, index: usize) -> bool {
        self.critical.get(index).copied().unwrap_or(false)
    }

    fn append(&mut self, payload: IkePayload, critical: bool) {
        self.payloads.push(payload);
        self.critical.push(critical);
    }

    /// Type of the first payload, for the enclosing header's Next Payload
    pub fn first_payload_type(&self) -> PayloadType {
        self.payloads
            .first()
            .map_or(PayloadType::None, IkePayload::payload_type)
    }

    /// Append a Notify payload
    pub fn build_notification(
        &mut self,
        protocol_id: u8,
        notify_type: u16,
        spi: &[u8],
        data: &[u8],
    ) {
        self.push(IkePayload::N(NotifyPayload::new(
            protocol_id,
            notify_type,
            spi,
            data,
        )));
    }

    /// Append a Certificate payload
    pub fn build_certificate(&mut self, encoding: u8, data: &[u8]) {
        self.push(IkePayload::CERT(CertPayload {
            encoding,
            data: data.to_vec(),
        }));
    }

    /// Append a Certificate Request payload
    pub fn build_certificate_request(&mut self, encoding: u8, authority: &[u8]) {
        self.push(IkePayload::CERTREQ(CertReqPayload {
            encoding,
            authority: authority.to_vec(),
        }));
    }

    /// Append an Encrypted payload whose ciphertext starts with `next_payload`
    pub fn build_encrypted(&mut self, next_payload: PayloadType, data: &[u8]) {
        self.push(IkePayload::SK(SkPayload::new(next_payload, data.to_vec())));
    }

    /// Append a Key Exchange payload
    pub fn build_key_exchange(&mut self, dh_group: u16, key_data: &[u8]) {
        self.push(IkePayload::KE(KePayload::new(dh_group, key_data.to_vec())));
    }

    /// Append an IDi payload
    pub fn build_identification_initiator(&mut self, id_type: u8, data: &[u8]) {
        self.push(IkePayload::IDi(IdPayload::new(id_type, data.to_vec())));
    }

    /// Append an IDr payload
    pub fn build_identification_responder(&mut self, id_type: u8, data: &[u8]) {
        self.push(IkePayload::IDr(IdPayload::new(id_type, data.to_vec())));
    }

    /// Append an Authentication payload
    pub fn build_authentication(&mut self, auth_method: u8, auth_data: &[u8]) {
        self.push(IkePayload::AUTH(AuthPayload::new(auth_method, auth_data.to_vec())));
    }

    /// Append a Configuration payload
    ///
    /// `build` adds the attributes; its result is returned.
    pub fn build_configuration<R>(
        &mut self,
        cfg_type: u8,
        build: impl FnOnce(&mut CpPayload) -> R,
    ) -> R {
        let mut cp = CpPayload::new(cfg_type);
        let out = build(&mut cp);
        self.push(IkePayload::CP(cp));
        out
    }

    /// Append a Nonce payload
    pub fn build_nonce(&mut self, nonce: &[u8]) {
        self.push(IkePayload::Nonce(NoncePayload {
            nonce: nonce.to_vec(),
        }));
    }

    /// Append a Vendor ID payload
    pub fn build_vendor_id(&mut self, vendor_id: &[u8]) {
        self.push(IkePayload::V(VendorIdPayload {
            vendor_id: vendor_id.to_vec(),
        }));
    }

    /// Append a TSi payload; `build` adds the selectors
    pub fn build_traffic_selector_initiator<R>(
        &mut self,
        build: impl FnOnce(&mut TsPayload) -> R,
    ) -> R {
        let mut ts = TsPayload::default();
        let out = build(&mut ts);
        self.push(IkePayload::TSi(ts));
        out
    }

    /// Append a TSr payload; `build` adds the selectors
    pub fn build_traffic_selector_responder<R>(
        &mut self,
        build: impl FnOnce(&mut TsPayload) -> R,
    ) -> R {
        let mut ts = TsPayload::default();
        let out = build(&mut ts);
        self.push(IkePayload::TSr(ts));
        out
    }

    /// Append a Security Association payload
    ///
    /// `build` adds the proposals, typically through
    /// [`SaPayload::build_proposal`]; its result is returned.
    pub fn build_security_association<R>(
        &mut self,
        build: impl FnOnce(&mut SaPayload) -> R,
    ) -> R {
        let mut sa = SaPayload::default();
        let out = build(&mut sa);
        self.push(IkePayload::SA(sa));
        out
    }

    /// Append a Delete payload
    pub fn build_delete_payload(
        &mut self,
        protocol_id: u8,
        spi_size: u8,
        num_spi: u16,
        spis: &[u32],
    ) {
        self.push(IkePayload::D(DeletePayload::new(
            protocol_id,
            spi_size,
            num_spi,
            spis,
        )));
    }

    /// Append an EAP payload; `build` sets its type data
    pub fn build_eap<R>(
        &mut self,
        code: EapCode,
        identifier: u8,
        build: impl FnOnce(&mut Eap) -> R,
    ) -> R {
        let mut eap = Eap::new(code, identifier);
        let out = build(&mut eap);
        self.push(IkePayload::EAP(eap));
        out
    }

    /// Append an EAP-Success payload
    pub fn build_eap_success(&mut self, identifier: u8) {
        self.push(IkePayload::EAP(Eap::success(identifier)));
    }

    /// Append an EAP-Failure payload
    pub fn build_eap_failure(&mut self, identifier: u8) {
        self.push(IkePayload::EAP(Eap::failure(identifier)));
    }

    /// Append an EAP-Request/5G-Start payload
    pub fn build_eap5g_start(&mut self, identifier: u8) {
        self.push(IkePayload::EAP(Eap::with_type_data(
            EapCode::Request,
            identifier,
            EapExpanded::eap5g_start(),
        )));
    }

    /// Append an EAP-Request/5G-NAS payload
    ///
    /// # Errors
    ///
    /// Fails without appending if the PDU is empty or longer than 65535 bytes.
    pub fn build_eap5g_nas(&mut self, identifier: u8, nas_pdu: &[u8]) -> Result<()> {
        let expanded = EapExpanded::eap5g_nas(nas_pdu)?;
        self.push(IkePayload::EAP(Eap::with_type_data(
            EapCode::Request,
            identifier,
            expanded,
        )));
        Ok(())
    }

    /// Append a 5G_QOS_INFO notify
    ///
    /// # Errors
    ///
    /// Fails without appending if the QFI list or the body exceed 255 bytes.
    pub fn build_notify_5g_qos_info(
        &mut self,
        pdu_session_id: u8,
        qfi_list: &[u8],
        is_default: bool,
        dscp: Option<u8>,
    ) -> Result<()> {
        let body = QosInfo {
            pdu_session_id,
            qfi_list: qfi_list.to_vec(),
            is_default,
            dscp,
        }
        .encode()?;
        self.build_notification(
            ProtocolId::None.to_u8(),
            vendor_notify::QOS_INFO_5G,
            &[],
            &body,
        );
        Ok(())
    }

    /// Append a NAS_IP4_ADDRESS notify
    pub fn build_notify_nas_ip4_address(&mut self, addr: Ipv4Addr) {
        self.build_notification(
            ProtocolId::None.to_u8(),
            vendor_notify::NAS_IP4_ADDRESS,
            &[],
            &addr.octets(),
        );
    }

    /// Append an UP_IP4_ADDRESS notify
    pub fn build_notify_up_ip4_address(&mut self, addr: Ipv4Addr) {
        self.build_notification(
            ProtocolId::None.to_u8(),
            vendor_notify::UP_IP4_ADDRESS,
            &[],
            &addr.octets(),
        );
    }

    /// Append a NAS_TCP_PORT notify; port 0 appends nothing
    pub fn build_notify_nas_tcp_port(&mut self, port: u16) {
        if port == 0 {
            logging::log_notify_skipped(vendor_notify::NAS_TCP_PORT, "port is zero");
            return;
        }
        self.build_notification(
            ProtocolId::None.to_u8(),
            vendor_notify::NAS_TCP_PORT,
            &[],
            &port.to_be_bytes(),
        );
    }

    /// Append the configured gateway notifications
    ///
    /// Order: NAS_IP4_ADDRESS, UP_IP4_ADDRESS, NAS_TCP_PORT. Unset entries
    /// are skipped.
    pub fn build_gateway_notifications(&mut self, config: &GatewayNotifyConfig) -> Result<()> {
        config.validate()?;

        match config.nas_ip4_address {
            Some(addr) => self.build_notify_nas_ip4_address(addr),
            None => logging::log_notify_skipped(vendor_notify::NAS_IP4_ADDRESS, "not configured"),
        }
        match config.up_ip4_address {
            Some(addr) => self.build_notify_up_ip4_address(addr),
            None => logging::log_notify_skipped(vendor_notify::UP_IP4_ADDRESS, "not configured"),
        }
        match config.nas_tcp_port {
            Some(port) => self.build_notify_nas_tcp_port(port),
            None => logging::log_notify_skipped(vendor_notify::NAS_TCP_PORT, "not configured"),
        }
        Ok(())
    }

    /// Serialize every payload with its generic header
    ///
    /// Each header names the following payload, except an SK header which
    /// names the first payload inside its ciphertext.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();

        for (i, (payload, &critical)) in self.payloads.iter().zip(&self.critical).enumerate() {
            let next_payload = match payload {
                IkePayload::SK(sk) => sk.next_payload,
                _ => self
                    .payloads
                    .get(i + 1)
                    .map_or(PayloadType::None, IkePayload::payload_type),
            };

            let body = payload.to_payload_data()?;
            if body.len() > PayloadHeader::MAX_DATA_LEN {
                return Err(Error::overflow(
                    "payload length",
                    PayloadHeader::MAX_DATA_LEN,
                    body.len(),
                ));
            }

            let length = (PayloadHeader::SIZE + body.len()) as u16;
            let header = PayloadHeader::new(next_payload, critical, length);
            buf.put_slice(&header.to_bytes());
            buf.put_slice(&body);

            logging::log_payload_encoded(payload.payload_type().name(), header.length as usize);
        }

        Ok(buf.to_vec())
    }

    /// Parse a payload chain starting with a payload of type `first`
    ///
    /// The chain ends at Next Payload 0 or at an SK payload; every byte of
    /// `data` must be consumed.
    pub fn decode(first: PayloadType, data: &[u8]) -> Result<Self> {
        Self::decode_chain(first, data)
            .inspect_err(|e| logging::log_decode_failed("IKE payload chain", &e.to_string()))
    }

    fn decode_chain(first: PayloadType, data: &[u8]) -> Result<Self> {
        let mut container = IkePayloadContainer::new();
        let mut current = first;
        let mut offset = 0;

        while current != PayloadType::None {
            let header = PayloadHeader::from_bytes(&data[offset..])?;
            let end = offset + header.length as usize;
            if end > data.len() {
                return Err(Error::Decode(format!(
                    "{} payload length {} exceeds the {} remaining bytes",
                    current,
                    header.length,
                    data.len() - offset
                )));
            }

            let body = &data[offset + PayloadHeader::SIZE..end];
            let payload = IkePayload::from_payload_data(current, &header, body)?;
            logging::log_payload_decoded(current.name(), header.length as usize);

            container.append(payload, header.critical);
            offset = end;

            if current == PayloadType::SK {
                break;
            }
            current = header.next_payload;
        }

        if offset != data.len() {
            return Err(Error::Decode(format!(
                "{} bytes after the last payload",
                data.len() - offset
            )));
        }

        Ok(container)
    }
}

impl From<Vec<IkePayload>> for IkePayloadContainer {
    fn from(payloads: Vec<IkePayload>) -> Self {
        let critical = vec![false; payloads.len()];
        IkePayloadContainer { payloads, critical }
    }
}
