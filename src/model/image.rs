//! Image attachment encoding.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fs;
use std::path::Path;

use super::client::ClientError;

/// Read a file and return its contents as standard base64.
///
/// The bytes are not inspected; any readable file is accepted.
pub fn encode_image_file(path: &Path) -> Result<String, ClientError> {
    let bytes = fs::read(path).map_err(|source| ClientError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(STANDARD.encode(bytes))
}
