//! Normalize raw cloud instance metadata into a small, provider-agnostic digest.
//!
//! A metadata server hands out a large, provider-specific document. This crate
//! decodes such a document and projects it onto a [`MetadataDigest`]: the
//! hostname, the project's SSH public keys grouped by user, and the network
//! interfaces with their private and public addresses. Fetching the document
//! is left to the caller.
//!
//! # Example
//!
//! ```
//! use cloud_digest::{CloudProvider, DigestError};
//!
//! fn main() -> Result<(), DigestError> {
//!     let raw = br#"{
//!         "instance": {
//!             "hostname": "vm-1",
//!             "networkInterfaces": [{
//!                 "ip": "10.0.0.5",
//!                 "network": "default",
//!                 "accessConfigs": [{"type": "ONE_TO_ONE_NAT", "externalIp": "34.1.2.3"}]
//!             }]
//!         },
//!         "project": {"attributes": {"ssh-keys": "root:ssh-rsa AAA...\n"}}
//!     }"#;
//!
//!     let digest = CloudProvider::Gcp.digest_json(raw)?;
//!     assert_eq!(digest.hostname, "vm-1");
//!     assert_eq!(digest.keys_for("root"), ["ssh-rsa AAA..."]);
//!     Ok(())
//! }
//! ```
//!
//! # SSH key blob
//!
//! Keys arrive as newline-separated `username:key` lines. Empty lines are
//! ignored, everything after the first colon is key material, and a line
//! without any colon makes the whole digest fail with
//! [`DigestError::MalformedKeyLine`].

mod digest;
mod error;
mod provider;
pub mod providers;
mod source;
mod ssh_keys;

pub use digest::{Digest, MetadataDigest, NetworkInterface};
pub use error::{DigestError, Result};
pub use provider::CloudProvider;
pub use source::{load_snapshot, read_snapshot};
pub use ssh_keys::{parse_key_blob, parse_key_line, KeyLineError, SshKeys};
