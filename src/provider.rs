//! Cloud provider enumeration.

use std::fmt;
use std::str::FromStr;

use crate::digest::{Digest, MetadataDigest};
use crate::error::{DigestError, Result};
use crate::providers::gcp;

/// Providers whose metadata documents can be digested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CloudProvider {
    /// Google Compute Engine
    Gcp,
}

impl CloudProvider {
    /// Decode the provider's JSON metadata document and digest it.
    pub fn digest_json(self, data: &[u8]) -> Result<MetadataDigest> {
        match self {
            CloudProvider::Gcp => gcp::Metadata::from_slice(data)?.digest(),
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudProvider::Gcp => write!(f, "GCP"),
        }
    }
}

impl FromStr for CloudProvider {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gcp" | "gce" => Ok(CloudProvider::Gcp),
            _ => Err(DigestError::UnsupportedProvider(s.to_string())),
        }
    }
}
