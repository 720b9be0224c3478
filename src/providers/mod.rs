//! Provider-specific metadata documents.

pub mod gcp;
