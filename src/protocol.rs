//! Service discovery protocol types.
//!
//! Discovery is a scatter-gather request on `$SRV.INFO.<service-name>`;
//! every running instance of the service replies with a JSON info record.
//! The shapes here mirror the NATS micro `INFO` response so the records
//! deserialize straight off the wire.

use serde::{Deserialize, Serialize};

/// Subject prefix for service info queries.
pub const SRV_INFO_PREFIX: &str = "$SRV.INFO";

/// Schema identifier carried in info responses.
pub const INFO_RESPONSE_TYPE: &str = "io.nats.micro.v1.info_response";

/// The subject a discovery query for `service_name` is published on.
pub fn info_subject(service_name: &str) -> String {
    format!("{SRV_INFO_PREFIX}.{service_name}")
}

/// One service instance's discovery record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Response schema identifier.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Service name.
    pub name: String,
    /// Unique instance id.
    pub id: String,
    /// Service version.
    pub version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Registered endpoints, in registration order.
    #[serde(default)]
    pub endpoints: Vec<EndpointInfo>,
}

/// One endpoint as reported by discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// Endpoint name.
    pub name: String,
    /// The subject the endpoint reports listening on.
    pub subject: String,
    /// Queue group the subscription belongs to.
    #[serde(default)]
    pub queue_group: String,
}
