//! Reading raw snapshot documents from files or streams.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{DigestError, Result};

/// Chunk size used when streaming a snapshot.
const CHUNK_SIZE: usize = 8192;

/// Read a whole snapshot with an optional size limit.
///
/// If `max_size` is `Some`, reading stops with [`DigestError::TooLarge`] as
/// soon as the input grows past the limit, so an oversized document is never
/// fully buffered.
pub fn read_snapshot<R: Read>(mut reader: R, max_size: Option<usize>) -> Result<Vec<u8>> {
    let Some(max_size) = max_size else {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        return Ok(body);
    };

    let mut body = Vec::with_capacity(max_size.min(CHUNK_SIZE));
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        // Check before copying to avoid growing past the limit
        let total = body.len().saturating_add(n);
        if total > max_size {
            return Err(DigestError::TooLarge(total, max_size));
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Ok(body)
}

/// Read a snapshot file with an optional size limit.
///
/// The file length is checked up front so oversized files are rejected
/// without reading them.
pub fn load_snapshot(path: &Path, max_size: Option<usize>) -> Result<Vec<u8>> {
    let file = File::open(path)?;

    if let Some(max_size) = max_size {
        let len = file.metadata()?.len();
        if len > max_size as u64 {
            return Err(DigestError::TooLarge(
                usize::try_from(len).unwrap_or(usize::MAX),
                max_size,
            ));
        }
    }

    let body = read_snapshot(file, max_size)?;
    debug!(path = %path.display(), bytes = body.len(), "loaded snapshot");
    Ok(body)
}
