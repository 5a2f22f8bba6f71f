use std::fs;
use std::path::Path;

use crate::error::{AnnotateError, Result};
use crate::ChipImage;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Basic magic header checker, returns the mime type. Ico files lack any
/// useful magic and svg is plain text, so those fall back to the extension.
pub fn sniff_mime(path: &Path, header: &[u8]) -> Option<&'static str> {
    const MAGIC: [(&[u8], &str); 7] = [
        (b"\x89PNG", "image/png"),
        (b"\xff\xd8", "image/jpeg"),
        (b"BM", "image/bmp"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"MM\x00\x2a", "image/tiff"),
        (b"II\x2a\x00", "image/tiff"),
    ];

    for (magic, mime) in MAGIC {
        if header.starts_with(magic) {
            return Some(mime);
        }
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ico") => Some("image/x-icon"),
        Some("svg") => Some("image/svg+xml"),
        _ => None,
    }
}

/// Pixel dimensions from a PNG payload's IHDR chunk.
pub fn png_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < 33 {
        return Err(AnnotateError::UnsupportedImage(
            "png payload too small to contain a header".to_string(),
        ));
    }

    if data[..8] != PNG_SIGNATURE {
        return Err(AnnotateError::UnsupportedImage(
            "payload is not a png file".to_string(),
        ));
    }

    if &data[12..16] != b"IHDR" {
        return Err(AnnotateError::UnsupportedImage(
            "png payload missing IHDR chunk".to_string(),
        ));
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);

    if width == 0 || height == 0 {
        return Err(AnnotateError::UnsupportedImage(
            "png image must have non-zero dimensions".to_string(),
        ));
    }

    Ok((width, height))
}

impl ChipImage {
    /// Read a chip photo just far enough to learn its pixel dimensions.
    /// Embedding the file into the output document stays the renderer's job.
    pub fn probe(path: impl AsRef<Path>) -> Result<ChipImage> {
        let path = path.as_ref();
        let data = fs::read(path)?;

        let mime = sniff_mime(path, &data).ok_or_else(|| {
            AnnotateError::UnsupportedImage(format!(
                "'{}' is not a recognized image format",
                path.display()
            ))
        })?;

        let (width, height) = match mime {
            "image/png" => png_dimensions(&data)?,
            other => {
                return Err(AnnotateError::UnsupportedImage(format!(
                    "cannot read dimensions from '{other}' images"
                )));
            }
        };

        Ok(ChipImage {
            width: width as f32,
            height: height as f32,
            path: Some(path.to_path_buf()),
        })
    }
}
