//! Turning uploaded image bytes into an inline part Gemini accepts.

use std::io::Cursor;

use base64::Engine;
use image::ImageFormat;

use crate::error::{AiError, Result};

/// A base64-encoded image ready to be sent as `inlineData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: &'static str,
    pub data: String,
}

/// Sniff, fully decode, and encode an image for upload.
///
/// PNG, JPEG and WebP are forwarded as-is. GIF, BMP and TIFF are decoded and
/// re-encoded as PNG. Anything else, or bytes that fail to decode, is an
/// [`AiError::Image`].
pub fn prepare_image(bytes: &[u8]) -> Result<InlineImage> {
    if bytes.is_empty() {
        return Err(AiError::Image("image payload is empty".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| AiError::Image(format!("unrecognized image format: {e}")))?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AiError::Image(format!("failed to decode {format:?} image: {e}")))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Ok(InlineImage {
            mime_type: format.to_mime_type(),
            data: encode(bytes),
        }),
        ImageFormat::Gif | ImageFormat::Bmp | ImageFormat::Tiff => {
            let mut png = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| AiError::Image(format!("failed to re-encode image as PNG: {e}")))?;
            Ok(InlineImage {
                mime_type: ImageFormat::Png.to_mime_type(),
                data: encode(&png),
            })
        }
        other => Err(AiError::Image(format!("unsupported image format: {other:?}"))),
    }
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
