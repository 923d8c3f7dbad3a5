//! Structured logging for payload encoding and decoding
//!
//! Provides structured, contextual logging using the `tracing` framework.
//! The library never installs a subscriber; applications and tests choose one.
//!
//! # Log Levels
//!
//! - **TRACE**: Per-payload encode/decode events and attribute updates
//! - **DEBUG**: Rejected wire input
//! - **WARN**: Inputs that were accepted but partially dropped
//!
//! # Example
//!
//! ```no_run
//! use nwu_proto::logging;
//!
//! tracing_subscriber::fmt()
//!     .with_env_filter("nwu_proto=trace")
//!     .init();
//!
//! logging::log_payload_encoded("SA", 48);
//! ```

use tracing::{debug, trace, warn};

/// Log a payload written to the wire
///
/// # Arguments
///
/// * `payload_type` - Payload type name (e.g., "SA", "EAP")
/// * `length` - Payload length including the generic header
pub fn log_payload_encoded(payload_type: &str, length: usize) {
    trace!(payload_type = payload_type, length = length, "IKE payload encoded");
}

/// Log a payload read from the wire
///
/// # Arguments
///
/// * `payload_type` - Payload type name
/// * `length` - Declared payload length including the generic header
pub fn log_payload_decoded(payload_type: &str, length: usize) {
    trace!(payload_type = payload_type, length = length, "IKE payload decoded");
}

/// Log rejected wire input
///
/// # Arguments
///
/// * `context` - Decoder that rejected the input (e.g., "EAP-AKA")
/// * `error` - Error message
pub fn log_decode_failed(context: &str, error: &str) {
    debug!(context = context, error = error, "Decode rejected input");
}

/// Log an EAP-AKA attribute stored by a setter
pub fn log_aka_attribute_set(attr_type: u8, length_units: u8) {
    trace!(
        attr_type = attr_type,
        length_units = length_units,
        "EAP-AKA attribute set"
    );
}

/// Log a MAC written into its reserved slot
///
/// # Arguments
///
/// * `offset` - Byte offset of the MAC value within the EAP message
/// * `mac` - MAC bytes that were written
pub fn log_mac_patched(offset: usize, mac: &[u8]) {
    trace!(offset = offset, mac = %hex::encode(mac), "EAP-AKA MAC patched");
}

/// Log a Transform dropped because its attribute had no value
pub fn log_transform_omitted(transform_type: u8, transform_id: u16, attr_type: u16) {
    warn!(
        transform_type = transform_type,
        transform_id = transform_id,
        attr_type = attr_type,
        "Transform omitted: attribute type given without a fixed or variable value"
    );
}

/// Log a vendor notification that was not built because its input was unset
pub fn log_notify_skipped(notify_type: u16, reason: &str) {
    trace!(notify_type = notify_type, reason = reason, "Vendor notify skipped");
}
