//! Helpers for embedding images (logos, stamps, signatures) in receipts.
//
// Images travel inside receipts as data URLs so a receipt stays a single
// self-contained JSON document.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Encodes raw image bytes as a `data:` URL.
pub fn embed_image(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Reads an image file and embeds it, guessing the MIME type from the extension.
pub fn embed_image_file(path: &Path) -> Result<String, std::io::Error> {
    let bytes = std::fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(embed_image(&bytes, mime))
}

/// Decodes the payload of a base64 `data:` URL.
pub fn decode_image(data_url: &str) -> Option<Vec<u8>> {
    let (_, payload) = data_url.strip_prefix("data:")?.split_once(";base64,")?;
    BASE64.decode(payload).ok()
}
