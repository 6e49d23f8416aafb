//! Inline image payloads.
//!
//! Background images travel through the editor as `data:` URLs: that is the form held in memory,
//! written to the blob tier, and embedded into rendered documents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{FlyerError, FlyerResult};

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type, e.g. `image/png`.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Build a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(mime.len() + 13 + bytes.len().div_ceil(3) * 4);
    out.push_str("data:");
    out.push_str(mime);
    out.push_str(";base64,");
    STANDARD.encode_string(bytes, &mut out);
    out
}

/// Decode a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> FlyerResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| FlyerError::validation("not a data: URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| FlyerError::validation("data: URL has no payload separator"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| FlyerError::validation("only base64 data: URLs are supported"))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| FlyerError::validation(format!("invalid base64 payload: {e}")))?;

    Ok(DataUrl {
        mime: if mime.is_empty() {
            "text/plain".to_string()
        } else {
            mime.to_string()
        },
        bytes,
    })
}

/// Detect the media type of encoded image bytes from their magic number.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Convert fetched or uploaded image bytes into an inline payload.
///
/// The sniffed type wins over `declared` (HTTP `Content-Type`, file extension guess); a payload
/// that is neither recognizably an image nor declared as one is rejected.
pub fn image_data_url(bytes: &[u8], declared: Option<&str>) -> FlyerResult<String> {
    if bytes.is_empty() {
        return Err(FlyerError::validation("image payload is empty"));
    }
    let declared = declared
        .map(|d| d.split(';').next().unwrap_or(d).trim())
        .filter(|d| d.starts_with("image/"));
    let mime = sniff_image_mime(bytes)
        .or(declared)
        .ok_or_else(|| FlyerError::validation("payload is not a recognized image"))?;
    Ok(encode_data_url(mime, bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
