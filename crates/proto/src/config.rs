//! Gateway notification configuration
//!
//! Addresses and ports the gateway advertises to the UE through 3GPP private
//! notify payloads once IKE_AUTH completes. Consumed by
//! [`IkePayloadContainer::build_gateway_notifications`](crate::ikev2::IkePayloadContainer::build_gateway_notifications).

use std::net::Ipv4Addr;

use crate::{Error, Result};

/// Vendor notify settings of one gateway
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GatewayNotifyConfig {
    /// Address the UE sends NAS signalling to (NAS_IP4_ADDRESS)
    pub nas_ip4_address: Option<Ipv4Addr>,

    /// User plane address (UP_IP4_ADDRESS)
    pub up_ip4_address: Option<Ipv4Addr>,

    /// TCP port of the NAS signalling connection (NAS_TCP_PORT)
    pub nas_tcp_port: Option<u16>,
}

impl GatewayNotifyConfig {
    /// Create builder for gateway notify configuration
    pub fn builder() -> GatewayNotifyConfigBuilder {
        GatewayNotifyConfigBuilder::new()
    }

    /// Validate configuration
    ///
    /// Each notify is independent, so any subset of the three may be set.
    pub fn validate(&self) -> Result<()> {
        if self.nas_tcp_port == Some(0) {
            return Err(Error::Validation("NAS TCP port cannot be 0".into()));
        }
        Ok(())
    }
}

/// Builder for GatewayNotifyConfig
#[derive(Default)]
pub struct GatewayNotifyConfigBuilder {
    nas_ip4_address: Option<Ipv4Addr>,
    up_ip4_address: Option<Ipv4Addr>,
    nas_tcp_port: Option<u16>,
}

impl GatewayNotifyConfigBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set NAS IPv4 address
    pub fn with_nas_ip4_address(mut self, addr: Ipv4Addr) -> Self {
        self.nas_ip4_address = Some(addr);
        self
    }

    /// Set user plane IPv4 address
    pub fn with_up_ip4_address(mut self, addr: Ipv4Addr) -> Self {
        self.up_ip4_address = Some(addr);
        self
    }

    /// Set NAS TCP port
    pub fn with_nas_tcp_port(mut self, port: u16) -> Self {
        self.nas_tcp_port = Some(port);
        self
    }

    /// Build GatewayNotifyConfig with validation
    pub fn build(self) -> Result<GatewayNotifyConfig> {
        let config = GatewayNotifyConfig {
            nas_ip4_address: self.nas_ip4_address,
            up_ip4_address: self.up_ip4_address,
            nas_tcp_port: self.nas_tcp_port,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_gateway_config_builder() {
        let config = GatewayNotifyConfig::builder()
            .with_nas_ip4_address(Ipv4Addr::new(10, 0, 0, 1))
            .with_up_ip4_address(Ipv4Addr::new(10, 0, 1, 1))
            .with_nas_tcp_port(20000)
            .build()
            .expect("Failed to build gateway config");

        assert_eq!(config.nas_ip4_address, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(config.up_ip4_address, Some(Ipv4Addr::new(10, 0, 1, 1)));
        assert_eq!(config.nas_tcp_port, Some(20000));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = GatewayNotifyConfig::builder().build().unwrap();
        assert_eq!(config, GatewayNotifyConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let result = GatewayNotifyConfig::builder()
            .with_nas_ip4_address(Ipv4Addr::new(10, 0, 0, 1))
            .with_nas_tcp_port(0)
            .build();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_port_without_address_is_valid() {
        let config = GatewayNotifyConfig::builder()
            .with_nas_tcp_port(20000)
            .build()
            .unwrap();
        assert_eq!(config.nas_tcp_port, Some(20000));
        assert!(config.nas_ip4_address.is_none());
    }
}
