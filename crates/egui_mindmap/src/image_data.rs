//! `data:` URLs stored in the `imageData` property of image nodes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ImageDataError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Lower case, e.g. `image/png`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:image/<kind>;base64,<payload>`.
///
/// Whitespace inside the payload is ignored. Parameters other than `base64`
/// (e.g. `charset`) may appear in any order after the mime type.
pub fn decode_data_url(url: &str) -> Result<DecodedImage, ImageDataError> {
    let (mime, is_base64, payload) = split(url).ok_or(ImageDataError::NotDataUrl)?;
    if !is_base64 {
        return Err(ImageDataError::NotBase64);
    }
    if !mime.starts_with("image/") {
        return Err(ImageDataError::NotImage(mime));
    }
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(cleaned)?;
    Ok(DecodedImage { mime, bytes })
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn split(url: &str) -> Option<(String, bool, &str)> {
    let rest = url.trim_start().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mut params = meta.split(';');
    let mime = params.next().unwrap_or("").trim().to_ascii_lowercase();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));
    Some((mime, is_base64, payload))
}

/// Mime type for an image file name, judged by its extension.
pub fn mime_for_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// File extensions [`mime_for_file_name`] knows, for file dialogs.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Texture cache key for the picture of `node_id`.
///
/// The key changes whenever the data URL does, so a replaced picture is never served
/// from a stale texture. The extension lets egui's loaders pick a decoder.
pub fn texture_uri(node_id: &str, data_url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    data_url.hash(&mut hasher);
    let ext = split(data_url)
        .and_then(|(mime, _, _)| mime.strip_prefix("image/").map(str::to_owned))
        .map_or_else(|| "bin".to_owned(), |kind| kind.replace("jpeg", "jpg"));
    format!("bytes://mindmap/{node_id}/{:016x}.{ext}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent png
    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn decodes_png_payload() {
        let img = decode_data_url(PIXEL).unwrap();
        assert_eq!(img.mime, "image/png");
        assert_eq!(&img.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn tolerates_case_params_and_line_breaks() {
        let url = "data:IMAGE/JPEG;name=shot.jpg;BASE64,/9j/\n4AAQ";
        let img = decode_data_url(url).unwrap();
        assert_eq!(img.mime, "image/jpeg");
        assert_eq!(img.bytes, vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]);
    }

    #[test]
    fn refuses_what_is_not_an_inline_picture() {
        assert!(matches!(
            decode_data_url("https://example.com/cat.png"),
            Err(ImageDataError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/svg+xml,<svg/>"),
            Err(ImageDataError::NotBase64)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain;base64,aGk="),
            Err(ImageDataError::NotImage(ref m)) if m == "text/plain"
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(ImageDataError::Base64(_))
        ));
    }

    #[test]
    fn encoded_url_decodes_to_same_bytes() {
        let bytes = [1_u8, 2, 3, 250];
        let url = encode_data_url("image/gif", &bytes);
        assert!(url.starts_with("data:image/gif;base64,"));
        assert_eq!(decode_data_url(&url).unwrap().bytes, bytes);
    }

    #[test]
    fn mime_from_file_extension() {
        assert_eq!(mime_for_file_name("Holiday.JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_file_name("diagram.png"), Some("image/png"));
        assert_eq!(mime_for_file_name("map.json"), None);
        assert_eq!(mime_for_file_name("README"), None);
    }

    #[test]
    fn texture_uri_follows_picture() {
        let a = texture_uri("node-1", PIXEL);
        assert!(a.starts_with("bytes://mindmap/node-1/"));
        assert!(a.ends_with(".png"));
        assert_eq!(a, texture_uri("node-1", PIXEL));
        assert_ne!(a, texture_uri("node-1", &encode_data_url("image/png", &[0])));
        assert!(texture_uri("n", "data:image/jpeg;base64,AA==").ends_with(".jpg"));
    }
}
