//! Google Compute Engine metadata document and its digest projection.
//!
//! The types here mirror the `computeMetadata/v1/?recursive=true` document
//! served by the GCE metadata server. Most fields are carried only so that a
//! decoded snapshot is lossless; the digest uses hostname, network interfaces
//! and the project's `ssh-keys` attribute.

use std::net::IpAddr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::digest::{Digest, MetadataDigest, NetworkInterface};
use crate::error::{DigestError, Result};
use crate::ssh_keys::parse_key_blob;

/// The v1 GCE metadata document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub instance: Instance,
    pub project: Project,
}

/// Instance section of the document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instance {
    pub id: u64,
    pub name: String,
    pub image: String,
    pub hostname: String,
    pub description: String,
    pub cpu_platform: String,
    pub machine_type: String,
    pub zone: String,
    pub maintenance_event: String,
    pub scheduling: Scheduling,
    pub virtual_clock: VirtualClock,
    pub network_interfaces: Vec<Interface>,
    pub disks: Vec<Disk>,
    /// Custom instance attributes (user data), in document order.
    pub attributes: IndexMap<String, String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scheduling {
    pub automatic_restart: String,
    pub on_host_maintenance: String,
    pub preemptible: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualClock {
    pub drift_token: String,
}

/// A network interface as reported by the metadata server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interface {
    /// Private address. Required for a digest.
    #[serde(deserialize_with = "empty_as_none")]
    pub ip: Option<IpAddr>,
    pub network: String,
    pub mac: String,
    /// Kept as reported; not validated.
    pub gateway: String,
    pub forwarded_ips: Vec<String>,
    pub access_configs: Vec<AccessConfig>,
}

/// A NAT / public IP mapping attached to an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(rename = "type")]
    pub kind: String,
    /// External address. Required for a digest.
    #[serde(deserialize_with = "empty_as_none")]
    pub external_ip: Option<IpAddr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Disk {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub device_name: String,
    pub mode: String,
}

/// Project section of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
    pub numeric_project_id: u64,
    pub attributes: ProjectAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectAttributes {
    /// Newline-separated `username:key` lines.
    #[serde(rename = "ssh-keys", alias = "sshKeys")]
    pub ssh_keys: String,
}

impl Metadata {
    /// Decode a metadata document from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(DigestError::from)
    }

    /// Custom instance attributes.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.instance.attributes
    }

    /// Zone name without the `projects/<n>/zones/` prefix.
    pub fn zone(&self) -> &str {
        last_segment(&self.instance.zone)
    }

    /// Machine type name without the `projects/<n>/machineTypes/` prefix.
    pub fn machine_type(&self) -> &str {
        last_segment(&self.instance.machine_type)
    }

    /// Project identifier.
    pub fn project_id(&self) -> &str {
        &self.project.project_id
    }
}

impl Digest for Metadata {
    fn digest(&self) -> Result<MetadataDigest> {
        let network_interfaces = self
            .instance
            .network_interfaces
            .iter()
            .enumerate()
            .map(|(idx, ifc)| ifc.normalize(idx))
            .collect::<Result<Vec<_>>>()?;

        let ssh_keys = parse_key_blob(&self.project.attributes.ssh_keys)?;

        debug!(
            hostname = %self.instance.hostname,
            interfaces = network_interfaces.len(),
            users = ssh_keys.len(),
            "digested gce metadata"
        );

        Ok(MetadataDigest {
            hostname: self.instance.hostname.clone(),
            ssh_keys,
            network_interfaces,
        })
    }
}

impl Interface {
    fn normalize(&self, idx: usize) -> Result<NetworkInterface> {
        let private_address = self.ip.ok_or_else(|| {
            DigestError::ShapeViolation(format!("instance.networkInterfaces[{idx}].ip"))
        })?;

        let public_addresses = self
            .access_configs
            .iter()
            .enumerate()
            .map(|(n, conf)| {
                conf.external_ip.ok_or_else(|| {
                    DigestError::ShapeViolation(format!(
                        "instance.networkInterfaces[{idx}].accessConfigs[{n}].externalIp"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NetworkInterface {
            network_name: self.network.clone(),
            private_address,
            public_addresses,
        })
    }
}

/// Decode an address, treating `null` and `""` as absent.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<IpAddr>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
