//! IKEv2 wire constants from RFC 7296 and 3GPP TS 24.502
//!
//! Closed registries that the codec dispatches on are enums; open registries
//! that are only carried as opaque numbers (algorithm IDs, notify codes,
//! configuration attributes) are plain constant tables.

use std::fmt;

/// IKE version 2 (major version = 2, minor version = 0)
pub const IKE_VERSION: u8 = 0x20;

/// Maximum IKE message size (64KB - 1)
pub const MAX_IKE_MESSAGE_SIZE: u32 = 65535;

/// IKE header size (28 bytes)
pub const IKE_HEADER_SIZE: usize = 28;

/// Exchange Types (RFC 7296 Section 3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExchangeType {
    /// IKE_SA_INIT exchange (34)
    IkeSaInit = 34,
    /// IKE_AUTH exchange (35)
    IkeAuth = 35,
    /// CREATE_CHILD_SA exchange (36)
    CreateChildSa = 36,
    /// INFORMATIONAL exchange (37)
    Informational = 37,
}

impl ExchangeType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            34 => Some(ExchangeType::IkeSaInit),
            35 => Some(ExchangeType::IkeAuth),
            36 => Some(ExchangeType::CreateChildSa),
            37 => Some(ExchangeType::Informational),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// IKE message flags (RFC 7296 Section 3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkeFlags(u8);

impl IkeFlags {
    /// Response flag (bit 5)
    pub const RESPONSE: u8 = 0x20;
    /// Version flag (bit 4)
    pub const VERSION: u8 = 0x10;
    /// Initiator flag (bit 3)
    pub const INITIATOR: u8 = 0x08;

    /// Create new flags
    pub fn new(value: u8) -> Self {
        IkeFlags(value & 0x38)
    }

    /// Create flags for request
    pub fn request(is_initiator: bool) -> Self {
        if is_initiator {
            IkeFlags(Self::INITIATOR)
        } else {
            IkeFlags(0)
        }
    }

    /// Create flags for response
    pub fn response(is_initiator: bool) -> Self {
        let mut flags = Self::RESPONSE;
        if is_initiator {
            flags |= Self::INITIATOR;
        }
        IkeFlags(flags)
    }

    /// Check if this is a response
    pub fn is_response(self) -> bool {
        (self.0 & Self::RESPONSE) != 0
    }

    /// Check if this is from initiator
    pub fn is_initiator(self) -> bool {
        (self.0 & Self::INITIATOR) != 0
    }

    /// Get raw value
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Payload Types (RFC 7296 Section 3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PayloadType {
    /// No next payload (0)
    None = 0,
    /// Security Association (33)
    SA = 33,
    /// Key Exchange (34)
    KE = 34,
    /// Identification - Initiator (35)
    IDi = 35,
    /// Identification - Responder (36)
    IDr = 36,
    /// Certificate (37)
    CERT = 37,
    /// Certificate Request (38)
    CERTREQ = 38,
    /// Authentication (39)
    AUTH = 39,
    /// Nonce (40)
    Nonce = 40,
    /// Notify (41)
    N = 41,
    /// Delete (42)
    D = 42,
    /// Vendor ID (43)
    V = 43,
    /// Traffic Selector - Initiator (44)
    TSi = 44,
    /// Traffic Selector - Responder (45)
    TSr = 45,
    /// Encrypted and Authenticated (46)
    SK = 46,
    /// Configuration (47)
    CP = 47,
    /// Extensible Authentication (48)
    EAP = 48,
}

impl PayloadType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PayloadType::None),
            33 => Some(PayloadType::SA),
            34 => Some(PayloadType::KE),
            35 => Some(PayloadType::IDi),
            36 => Some(PayloadType::IDr),
            37 => Some(PayloadType::CERT),
            38 => Some(PayloadType::CERTREQ),
            39 => Some(PayloadType::AUTH),
            40 => Some(PayloadType::Nonce),
            41 => Some(PayloadType::N),
            42 => Some(PayloadType::D),
            43 => Some(PayloadType::V),
            44 => Some(PayloadType::TSi),
            45 => Some(PayloadType::TSr),
            46 => Some(PayloadType::SK),
            47 => Some(PayloadType::CP),
            48 => Some(PayloadType::EAP),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            PayloadType::None => "NoNext",
            PayloadType::SA => "SA",
            PayloadType::KE => "KE",
            PayloadType::IDi => "IDi",
            PayloadType::IDr => "IDr",
            PayloadType::CERT => "CERT",
            PayloadType::CERTREQ => "CERTREQ",
            PayloadType::AUTH => "AUTH",
            PayloadType::Nonce => "Ni/Nr",
            PayloadType::N => "N",
            PayloadType::D => "D",
            PayloadType::V => "V",
            PayloadType::TSi => "TSi",
            PayloadType::TSr => "TSr",
            PayloadType::SK => "SK",
            PayloadType::CP => "CP",
            PayloadType::EAP => "EAP",
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transform Type (RFC 7296 Section 3.3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransformType {
    /// Encryption Algorithm (ENCR)
    Encr = 1,
    /// Pseudo-random Function (PRF)
    Prf = 2,
    /// Integrity Algorithm (INTEG)
    Integ = 3,
    /// Diffie-Hellman Group (D-H)
    Dh = 4,
    /// Extended Sequence Numbers (ESN)
    Esn = 5,
}

impl TransformType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(TransformType::Encr),
            2 => Some(TransformType::Prf),
            3 => Some(TransformType::Integ),
            4 => Some(TransformType::Dh),
            5 => Some(TransformType::Esn),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Transform attribute type carrying the key length (RFC 7296 Section 3.3.5)
pub const ATTRIBUTE_TYPE_KEY_LENGTH: u16 = 14;

/// Encryption algorithm transform IDs
pub mod encr {
    /// DES with 64-bit IV
    pub const DES_IV64: u16 = 1;
    /// DES
    pub const DES: u16 = 2;
    /// Triple DES
    pub const DES3: u16 = 3;
    /// RC5
    pub const RC5: u16 = 4;
    /// IDEA
    pub const IDEA: u16 = 5;
    /// CAST
    pub const CAST: u16 = 6;
    /// Blowfish
    pub const BLOWFISH: u16 = 7;
    /// Triple IDEA
    pub const IDEA3: u16 = 8;
    /// DES with 32-bit IV
    pub const DES_IV32: u16 = 9;
    /// NULL encryption
    pub const NULL: u16 = 11;
    /// AES-CBC
    pub const AES_CBC: u16 = 12;
    /// AES-CTR
    pub const AES_CTR: u16 = 13;
}

/// Pseudo-random function transform IDs
pub mod prf {
    /// HMAC-MD5
    pub const HMAC_MD5: u16 = 1;
    /// HMAC-SHA1
    pub const HMAC_SHA1: u16 = 2;
    /// HMAC-TIGER
    pub const HMAC_TIGER: u16 = 3;
    /// HMAC-SHA2-256
    pub const HMAC_SHA2_256: u16 = 5;
}

/// Integrity algorithm transform IDs
pub mod integ {
    /// None
    pub const NONE: u16 = 0;
    /// HMAC-MD5-96
    pub const HMAC_MD5_96: u16 = 1;
    /// HMAC-SHA1-96
    pub const HMAC_SHA1_96: u16 = 2;
    /// DES-MAC
    pub const DES_MAC: u16 = 3;
    /// KPDK-MD5
    pub const KPDK_MD5: u16 = 4;
    /// AES-XCBC-96
    pub const AES_XCBC_96: u16 = 5;
    /// HMAC-SHA2-256-128
    pub const HMAC_SHA2_256_128: u16 = 12;
}

/// Diffie-Hellman group transform IDs
pub mod dh {
    /// None
    pub const NONE: u16 = 0;
    /// 768-bit MODP
    pub const MODP_768: u16 = 1;
    /// 1024-bit MODP
    pub const MODP_1024: u16 = 2;
    /// 1536-bit MODP
    pub const MODP_1536: u16 = 5;
    /// 2048-bit MODP
    pub const MODP_2048: u16 = 14;
    /// 3072-bit MODP
    pub const MODP_3072: u16 = 15;
    /// 4096-bit MODP
    pub const MODP_4096: u16 = 16;
    /// 6144-bit MODP
    pub const MODP_6144: u16 = 17;
    /// 8192-bit MODP
    pub const MODP_8192: u16 = 18;
}

/// Extended sequence number transform IDs
pub mod esn {
    /// No extended sequence numbers
    pub const DISABLE: u16 = 0;
    /// Extended sequence numbers
    pub const ENABLE: u16 = 1;
}

/// Protocol ID for proposals, notifications and deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProtocolId {
    /// No protocol (notifications not bound to an SA)
    None = 0,
    /// IKE SA
    Ike = 1,
    /// AH (Authentication Header)
    Ah = 2,
    /// ESP (Encapsulating Security Payload)
    Esp = 3,
}

impl ProtocolId {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProtocolId::None),
            1 => Some(ProtocolId::Ike),
            2 => Some(ProtocolId::Ah),
            3 => Some(ProtocolId::Esp),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// ID Type for Identification Payload (RFC 7296 Section 3.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IdType {
    /// IPv4 address
    Ipv4Addr = 1,
    /// Fully-qualified domain name
    Fqdn = 2,
    /// RFC 822 email address
    Rfc822Addr = 3,
    /// IPv6 address
    Ipv6Addr = 5,
    /// ASN.1 DER encoded Distinguished Name
    DerAsn1Dn = 9,
    /// ASN.1 DER encoded GeneralName
    DerAsn1Gn = 10,
    /// Key ID
    KeyId = 11,
}

impl IdType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(IdType::Ipv4Addr),
            2 => Some(IdType::Fqdn),
            3 => Some(IdType::Rfc822Addr),
            5 => Some(IdType::Ipv6Addr),
            9 => Some(IdType::DerAsn1Dn),
            10 => Some(IdType::DerAsn1Gn),
            11 => Some(IdType::KeyId),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Authentication Method (RFC 7296 Section 3.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthMethod {
    /// RSA Digital Signature
    RsaSig = 1,
    /// Shared Key Message Integrity Code
    SharedKeyMic = 2,
    /// DSS Digital Signature
    DssSig = 3,
}

impl AuthMethod {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AuthMethod::RsaSig),
            2 => Some(AuthMethod::SharedKeyMic),
            3 => Some(AuthMethod::DssSig),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Certificate Encoding (RFC 7296 Section 3.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CertificateEncoding {
    /// PKCS #7 wrapped X.509 certificate
    Pkcs7WrappedX509 = 1,
    /// PGP certificate
    Pgp = 2,
    /// DNS signed key
    DnsSignedKey = 3,
    /// X.509 certificate - signature
    X509Signature = 4,
    /// Kerberos token
    KerberosToken = 6,
    /// Certificate revocation list
    Crl = 7,
    /// Authority revocation list
    Arl = 8,
    /// SPKI certificate
    Spki = 9,
    /// X.509 certificate - attribute
    X509Attribute = 10,
    /// Hash and URL of X.509 certificate
    HashAndUrlX509 = 12,
    /// Hash and URL of X.509 bundle
    HashAndUrlX509Bundle = 13,
}

impl CertificateEncoding {
    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Configuration payload type (RFC 7296 Section 3.15)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConfigurationType {
    /// CFG_REQUEST
    Request = 1,
    /// CFG_REPLY
    Reply = 2,
    /// CFG_SET
    Set = 3,
    /// CFG_ACK
    Ack = 4,
}

impl ConfigurationType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ConfigurationType::Request),
            2 => Some(ConfigurationType::Reply),
            3 => Some(ConfigurationType::Set),
            4 => Some(ConfigurationType::Ack),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Configuration attribute types (RFC 7296 Section 3.15.1, RFC 7651)
pub mod cfg_attr {
    /// INTERNAL_IP4_ADDRESS
    pub const INTERNAL_IP4_ADDRESS: u16 = 1;
    /// INTERNAL_IP4_NETMASK
    pub const INTERNAL_IP4_NETMASK: u16 = 2;
    /// INTERNAL_IP4_DNS
    pub const INTERNAL_IP4_DNS: u16 = 3;
    /// INTERNAL_IP4_NBNS
    pub const INTERNAL_IP4_NBNS: u16 = 4;
    /// INTERNAL_IP4_DHCP
    pub const INTERNAL_IP4_DHCP: u16 = 6;
    /// APPLICATION_VERSION
    pub const APPLICATION_VERSION: u16 = 7;
    /// INTERNAL_IP6_ADDRESS
    pub const INTERNAL_IP6_ADDRESS: u16 = 8;
    /// INTERNAL_IP6_DNS
    pub const INTERNAL_IP6_DNS: u16 = 10;
    /// INTERNAL_IP6_DHCP
    pub const INTERNAL_IP6_DHCP: u16 = 12;
    /// INTERNAL_IP4_SUBNET
    pub const INTERNAL_IP4_SUBNET: u16 = 13;
    /// SUPPORTED_ATTRIBUTES
    pub const SUPPORTED_ATTRIBUTES: u16 = 14;
    /// INTERNAL_IP6_SUBNET
    pub const INTERNAL_IP6_SUBNET: u16 = 15;
    /// P_CSCF_IP4_ADDRESS
    pub const P_CSCF_IP4_ADDRESS: u16 = 20;
    /// P_CSCF_IP6_ADDRESS
    pub const P_CSCF_IP6_ADDRESS: u16 = 21;
}

/// Traffic Selector Type (RFC 7296 Section 3.13.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrafficSelectorType {
    /// Range of IPv4 addresses
    Ipv4AddrRange = 7,
    /// Range of IPv6 addresses
    Ipv6AddrRange = 8,
}

impl TrafficSelectorType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            7 => Some(TrafficSelectorType::Ipv4AddrRange),
            8 => Some(TrafficSelectorType::Ipv6AddrRange),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Address width in bytes
    pub fn address_len(self) -> usize {
        match self {
            TrafficSelectorType::Ipv4AddrRange => 4,
            TrafficSelectorType::Ipv6AddrRange => 16,
        }
    }
}

/// IP protocol IDs used in individual traffic selectors
pub mod ip_protocol {
    /// Any protocol
    pub const ALL: u8 = 0;
    /// ICMP
    pub const ICMP: u8 = 1;
    /// TCP
    pub const TCP: u8 = 6;
    /// UDP
    pub const UDP: u8 = 17;
    /// GRE
    pub const GRE: u8 = 47;
}

/// Notify message types (RFC 7296 Section 3.10.1)
pub mod notify {
    /// UNSUPPORTED_CRITICAL_PAYLOAD
    pub const UNSUPPORTED_CRITICAL_PAYLOAD: u16 = 1;
    /// INVALID_IKE_SPI
    pub const INVALID_IKE_SPI: u16 = 4;
    /// INVALID_MAJOR_VERSION
    pub const INVALID_MAJOR_VERSION: u16 = 5;
    /// INVALID_SYNTAX
    pub const INVALID_SYNTAX: u16 = 7;
    /// INVALID_MESSAGE_ID
    pub const INVALID_MESSAGE_ID: u16 = 9;
    /// INVALID_SPI
    pub const INVALID_SPI: u16 = 11;
    /// NO_PROPOSAL_CHOSEN
    pub const NO_PROPOSAL_CHOSEN: u16 = 14;
    /// INVALID_KE_PAYLOAD
    pub const INVALID_KE_PAYLOAD: u16 = 17;
    /// AUTHENTICATION_FAILED
    pub const AUTHENTICATION_FAILED: u16 = 24;
    /// SINGLE_PAIR_REQUIRED
    pub const SINGLE_PAIR_REQUIRED: u16 = 34;
    /// NO_ADDITIONAL_SAS
    pub const NO_ADDITIONAL_SAS: u16 = 35;
    /// INTERNAL_ADDRESS_FAILURE
    pub const INTERNAL_ADDRESS_FAILURE: u16 = 36;
    /// FAILED_CP_REQUIRED
    pub const FAILED_CP_REQUIRED: u16 = 37;
    /// TS_UNACCEPTABLE
    pub const TS_UNACCEPTABLE: u16 = 38;
    /// INVALID_SELECTORS
    pub const INVALID_SELECTORS: u16 = 39;
    /// UNACCEPTABLE_ADDRESSES
    pub const UNACCEPTABLE_ADDRESSES: u16 = 40;
    /// UNEXPECTED_NAT_DETECTED
    pub const UNEXPECTED_NAT_DETECTED: u16 = 41;
    /// TEMPORARY_FAILURE
    pub const TEMPORARY_FAILURE: u16 = 43;
    /// CHILD_SA_NOT_FOUND
    pub const CHILD_SA_NOT_FOUND: u16 = 44;
    /// INITIAL_CONTACT
    pub const INITIAL_CONTACT: u16 = 16384;
    /// SET_WINDOW_SIZE
    pub const SET_WINDOW_SIZE: u16 = 16385;
    /// ADDITIONAL_TS_POSSIBLE
    pub const ADDITIONAL_TS_POSSIBLE: u16 = 16386;
    /// IPCOMP_SUPPORTED
    pub const IPCOMP_SUPPORTED: u16 = 16387;
    /// NAT_DETECTION_SOURCE_IP
    pub const NAT_DETECTION_SOURCE_IP: u16 = 16388;
    /// NAT_DETECTION_DESTINATION_IP
    pub const NAT_DETECTION_DESTINATION_IP: u16 = 16389;
    /// COOKIE
    pub const COOKIE: u16 = 16390;
    /// USE_TRANSPORT_MODE
    pub const USE_TRANSPORT_MODE: u16 = 16391;
    /// HTTP_CERT_LOOKUP_SUPPORTED
    pub const HTTP_CERT_LOOKUP_SUPPORTED: u16 = 16392;
    /// REKEY_SA
    pub const REKEY_SA: u16 = 16393;
    /// ESP_TFC_PADDING_NOT_SUPPORTED
    pub const ESP_TFC_PADDING_NOT_SUPPORTED: u16 = 16394;
    /// NON_FIRST_FRAGMENTS_ALSO
    pub const NON_FIRST_FRAGMENTS_ALSO: u16 = 16395;
    /// MOBIKE_SUPPORTED
    pub const MOBIKE_SUPPORTED: u16 = 16396;
    /// ADDITIONAL_IP4_ADDRESS
    pub const ADDITIONAL_IP4_ADDRESS: u16 = 16397;
    /// ADDITIONAL_IP6_ADDRESS
    pub const ADDITIONAL_IP6_ADDRESS: u16 = 16398;
    /// NO_ADDITIONAL_ADDRESSES
    pub const NO_ADDITIONAL_ADDRESSES: u16 = 16399;
    /// UPDATE_SA_ADDRESSES
    pub const UPDATE_SA_ADDRESSES: u16 = 16400;
    /// COOKIE2
    pub const COOKIE2: u16 = 16401;
    /// NO_NATS_ALLOWED
    pub const NO_NATS_ALLOWED: u16 = 16402;
    /// P_N1_MODE_CAPABILITY (3GPP)
    pub const P_N1_MODE_CAPABILITY: u16 = 51015;
}

/// 3GPP private notify message types (TS 24.502 Section 9.2)
pub mod vendor_notify {
    /// 5G_QOS_INFO
    pub const QOS_INFO_5G: u16 = 55501;
    /// NAS_IP4_ADDRESS
    pub const NAS_IP4_ADDRESS: u16 = 55502;
    /// UP_IP4_ADDRESS
    pub const UP_IP4_ADDRESS: u16 = 55504;
    /// NAS_TCP_PORT
    pub const NAS_TCP_PORT: u16 = 55506;

    /// 5G_QOS_INFO flag: DSCP value present
    pub const QOS_INFO_BIT_DSCPI: u8 = 0x01;
    /// 5G_QOS_INFO flag: default child SA
    pub const QOS_INFO_BIT_DCSI: u8 = 0x02;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_type_conversion() {
        assert_eq!(ExchangeType::from_u8(34), Some(ExchangeType::IkeSaInit));
        assert_eq!(ExchangeType::from_u8(37), Some(ExchangeType::Informational));
        assert_eq!(ExchangeType::from_u8(99), None);
        assert_eq!(ExchangeType::IkeAuth.to_u8(), 35);
    }

    #[test]
    fn test_ike_flags() {
        let flags = IkeFlags::request(true);
        assert!(!flags.is_response());
        assert!(flags.is_initiator());

        let flags = IkeFlags::response(true);
        assert!(flags.is_response());
        assert_eq!(flags.value(), IkeFlags::RESPONSE | IkeFlags::INITIATOR);

        // Reserved bits are masked off
        assert_eq!(IkeFlags::new(0xFF).value(), 0x38);
    }

    #[test]
    fn test_payload_type_conversion() {
        for value in 33..=48u8 {
            let pt = PayloadType::from_u8(value).unwrap();
            assert_eq!(pt.to_u8(), value);
        }
        assert_eq!(PayloadType::from_u8(0), Some(PayloadType::None));
        assert_eq!(PayloadType::from_u8(32), None);
        assert_eq!(PayloadType::from_u8(49), None);
        assert_eq!(PayloadType::Nonce.to_string(), "Ni/Nr");
    }

    #[test]
    fn test_traffic_selector_type() {
        assert_eq!(TrafficSelectorType::from_u8(7).unwrap().address_len(), 4);
        assert_eq!(TrafficSelectorType::from_u8(8).unwrap().address_len(), 16);
        assert_eq!(TrafficSelectorType::from_u8(9), None);
    }

    #[test]
    fn test_vendor_notify_constants() {
        assert_eq!(vendor_notify::QOS_INFO_5G, 55501);
        assert_eq!(vendor_notify::NAS_TCP_PORT, 55506);
        assert_eq!(vendor_notify::QOS_INFO_BIT_DCSI, 0x02);
        assert_eq!(dh::MODP_2048, 14);
        assert_eq!(dh::MODP_8192, 18);
    }
}
