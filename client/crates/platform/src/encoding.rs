//! Encoding Utilities

use base64::{Engine, engine::general_purpose};

/// MIME type of every still the client submits
pub const JPEG_MIME: &str = "image/jpeg";

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Build a `data:` URL for a JPEG still
///
/// The verifier splits on the first comma and base64-decodes the rest,
/// so the prefix must be exactly `data:image/jpeg;base64,`.
pub fn jpeg_data_url(jpeg: &[u8]) -> String {
    format!("data:{};base64,{}", JPEG_MIME, to_base64(jpeg))
}

/// Split a base64 `data:` URL into its MIME type and decoded payload
///
/// Returns `None` when the string is not a base64 data URL.
pub fn parse_data_url(url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = from_base64(payload).ok()?;
    Some((mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_data_url_prefix() {
        let url = jpeg_data_url(&[0xFF, 0xD8, 0xFF]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_parse_data_url() {
        let url = jpeg_data_url(b"still");
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, JPEG_MIME);
        assert_eq!(bytes, b"still");
    }

    #[test]
    fn test_parse_data_url_rejects_plain_strings() {
        assert!(parse_data_url("image/jpeg;base64,AAAA").is_none());
        assert!(parse_data_url("data:image/jpeg,AAAA").is_none());
        assert!(parse_data_url("data:image/jpeg;base64,!!!").is_none());
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(jpeg_data_url(&[]), "data:image/jpeg;base64,");
        let (_, bytes) = parse_data_url("data:image/jpeg;base64,").unwrap();
        assert!(bytes.is_empty());
    }
}
