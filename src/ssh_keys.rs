//! Parsing of the `username:key` SSH key blob stored in project attributes.

use indexmap::IndexMap;
use thiserror::Error;

use crate::error::{DigestError, Result};

/// Public keys grouped by username, in order of first appearance.
pub type SshKeys = IndexMap<String, Vec<String>>;

/// A key line had no `:` between username and key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing ':' separator")]
pub struct KeyLineError;

/// Split a single key line into `(username, key)`.
///
/// Only the first colon separates the two parts; the key material may
/// contain further colons (e.g. a trailing `user@host:comment`).
pub fn parse_key_line(line: &str) -> std::result::Result<(&str, &str), KeyLineError> {
    line.split_once(':').ok_or(KeyLineError)
}

/// Parse a newline-separated key blob and group the keys by username.
///
/// Empty lines are skipped. Any other line must parse with
/// [`parse_key_line`], otherwise the whole blob is rejected with
/// [`DigestError::MalformedKeyLine`].
pub fn parse_key_blob(blob: &str) -> Result<SshKeys> {
    let mut keys = SshKeys::new();

    for (idx, line) in blob.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }

        let (user, key) =
            parse_key_line(line).map_err(|_| DigestError::MalformedKeyLine { line: idx + 1 })?;

        keys.entry(user.to_string())
            .or_default()
            .push(key.to_string());
    }

    Ok(keys)
}
