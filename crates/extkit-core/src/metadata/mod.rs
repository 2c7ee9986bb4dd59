//! Instance metadata: compute/network facts about the current VM.
//!
//! The document is fetched once via [`MetadataProvider`]; the derived
//! [`ResourceIdentity`] scopes outbound requests to this VM.

mod model;
mod provider;
mod resource;

pub use model::{
    ComputeMetadata, InstanceMetadata, IpAddressPair, IpConfiguration, NetworkInterface,
    NetworkMetadata, UNKNOWN_IPV4,
};
pub use provider::{MetadataProvider, METADATA_URL};
pub use resource::ResourceIdentity;
