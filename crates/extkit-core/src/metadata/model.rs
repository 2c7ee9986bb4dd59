//! Instance metadata document.

use serde::{Deserialize, Serialize};

use super::ResourceIdentity;

/// Returned by [`InstanceMetadata::ipv4_public_address`] when no address is known.
pub const UNKNOWN_IPV4: &str = "0.0.0.0";

/// The instance metadata document (`compute` and `network` sections).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceMetadata {
    pub compute: ComputeMetadata,
    pub network: NetworkMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputeMetadata {
    pub location: String,
    pub name: String,
    pub offer: String,
    pub os_type: String,
    pub placement_group_id: String,
    pub platform_fault_domain: String,
    pub platform_update_domain: String,
    pub publisher: String,
    pub resource_group_name: String,
    pub sku: String,
    pub subscription_id: String,
    /// Free-form; a string on older API versions, structured on newer ones.
    pub tags: serde_json::Value,
    pub version: String,
    pub vm_id: String,
    pub vm_size: String,
}

/// Network section. Interfaces are kept as raw JSON so one malformed entry
/// does not make the whole document unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkMetadata {
    #[serde(rename = "interface")]
    pub interfaces: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkInterface {
    pub ipv4: IpConfiguration,
    pub ipv6: IpConfiguration,
    pub mac_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpConfiguration {
    pub ip_address: Vec<IpAddressPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpAddressPair {
    pub private_ip_address: String,
    pub public_ip_address: String,
}

impl NetworkMetadata {
    /// Interfaces that decode cleanly; malformed entries are skipped.
    pub fn interfaces(&self) -> Vec<NetworkInterface> {
        self.interfaces
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }
}

impl InstanceMetadata {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn resource_identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(
            self.compute.subscription_id.clone(),
            self.compute.resource_group_name.clone(),
            self.compute.name.clone(),
        )
    }

    pub fn resource_id(&self) -> String {
        self.resource_identity().resource_id()
    }

    /// Public address of the first IPv4 configuration on the first
    /// interface, or [`UNKNOWN_IPV4`] if there is none or it is malformed.
    pub fn ipv4_public_address(&self) -> String {
        self.network
            .interfaces
            .first()
            .and_then(|v| serde_json::from_value::<NetworkInterface>(v.clone()).ok())
            .and_then(|iface| iface.ipv4.ip_address.into_iter().next())
            .map(|pair| pair.public_ip_address)
            .filter(|ip| !ip.is_empty())
            .unwrap_or_else(|| UNKNOWN_IPV4.to_string())
    }
}
