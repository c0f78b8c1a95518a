//! Image payloads
//!
//! Images are not decoded; the raw bytes are base64-encoded for transport.

use crate::errors::IngestionError;
use analystforge_common::document::ImageContent;
use base64::Engine;
use std::path::Path;
use tracing::debug;

/// Read an image file and encode it as standard, padded base64
pub fn encode_image(path: &Path, media_type: &str) -> Result<ImageContent, IngestionError> {
    let bytes = std::fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

    debug!(bytes = bytes.len(), media_type, "Image encoded");

    Ok(ImageContent {
        media_type: media_type.to_string(),
        base64: encoded,
    })
}
