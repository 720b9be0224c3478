//! Provider-agnostic metadata digest.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ssh_keys::SshKeys;

/// The normalized subset of instance metadata that configuration logic needs.
///
/// A digest owns all of its data; it never borrows from the snapshot it was
/// produced from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDigest {
    /// Instance hostname, copied verbatim.
    pub hostname: String,

    /// Public keys per username, in order of first appearance.
    pub ssh_keys: SshKeys,

    /// Network interfaces in the provider's order.
    pub network_interfaces: Vec<NetworkInterface>,
}

/// A network interface with its private address and any public mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Name of the virtual network the interface is attached to.
    pub network_name: String,

    /// Address inside the virtual network.
    pub private_address: IpAddr,

    /// External addresses mapped to this interface. Empty when there are none.
    pub public_addresses: Vec<IpAddr>,
}

impl MetadataDigest {
    /// The first interface, which providers treat as primary.
    pub fn primary_interface(&self) -> Option<&NetworkInterface> {
        self.network_interfaces.first()
    }

    /// Keys registered for `user`, or an empty slice.
    pub fn keys_for(&self, user: &str) -> &[String] {
        self.ssh_keys.get(user).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Projection of a provider-specific snapshot onto a [`MetadataDigest`].
pub trait Digest {
    /// Extract the digest.
    ///
    /// Either returns a complete digest or fails without partial output.
    fn digest(&self) -> Result<MetadataDigest>;
}
