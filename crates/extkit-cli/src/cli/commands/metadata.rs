//! `extkit metadata` – show instance metadata.

use anyhow::{Context, Result};
use extkit_core::config::ExtkitConfig;
use extkit_core::metadata::{InstanceMetadata, MetadataProvider};

use super::lookup_client;

pub fn run_metadata(cfg: &ExtkitConfig, json: bool) -> Result<()> {
    let metadata = MetadataProvider::new(lookup_client(cfg)?)
        .fetch()
        .context("fetching instance metadata")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("{}", summary(&metadata));
    }
    Ok(())
}

fn summary(m: &InstanceMetadata) -> String {
    format!(
        "{:<12} {}\n{:<12} {}\n{:<12} {}\n{:<12} {}",
        "location",
        m.compute.location,
        "name",
        m.compute.name,
        "resource id",
        m.resource_id(),
        "public ipv4",
        m.ipv4_public_address()
    )
}
