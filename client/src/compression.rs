//! Client-side re-encoding of large photos before upload
//!
//! Files at or under [`COMPRESSION_THRESHOLD`] pass through untouched. Larger
//! ones are decoded, downscaled so the longest edge fits [`MAX_EDGE`], and
//! re-encoded as JPEG with decreasing quality until they fit. Any failure
//! falls back to the original file.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::file::UploadFile;

/// Files larger than this are re-encoded
pub const COMPRESSION_THRESHOLD: u64 = 1024 * 1024;

/// Longest edge of a re-encoded image, in pixels
pub const MAX_EDGE: u32 = 1920;

const START_QUALITY: u8 = 90;
const MIN_QUALITY: u8 = 40;
const QUALITY_STEP: u8 = 10;

#[derive(Debug, Error)]
enum CompressionError {
    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),
    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Shrinks `file` if it is above the threshold, otherwise returns it as is
pub async fn compress(file: UploadFile) -> UploadFile {
    if file.size() <= COMPRESSION_THRESHOLD {
        return file;
    }

    let input = file.bytes.clone();
    let result = tokio::task::spawn_blocking(move || reencode(&input))
        .await
        .map_err(CompressionError::from)
        .and_then(|encoded| encoded);

    match result {
        Ok(encoded) if (encoded.len() as u64) < file.size() => {
            tracing::debug!(
                name = %file.name,
                before = file.size(),
                after = encoded.len(),
                "compressed image"
            );
            UploadFile::new(jpeg_name(&file.name), "image/jpeg", encoded)
        }
        Ok(_) => {
            tracing::debug!(name = %file.name, "re-encoding did not shrink image");
            file
        }
        Err(e) => {
            tracing::warn!(name = %file.name, error = %e, "compression failed, sending original");
            file
        }
    }
}

fn reencode(input: &[u8]) -> Result<Bytes, CompressionError> {
    let decoded = image::load_from_memory(input).map_err(CompressionError::Decode)?;
    let rgb = downscale(decoded).to_rgb8();

    let mut quality = START_QUALITY;
    loop {
        let mut buffer = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode_image(&rgb)
            .map_err(CompressionError::Encode)?;
        let encoded = buffer.into_inner();

        if encoded.len() as u64 <= COMPRESSION_THRESHOLD || quality <= MIN_QUALITY {
            return Ok(Bytes::from(encoded));
        }
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
    }
}

fn downscale(image: DynamicImage) -> DynamicImage {
    if image.width().max(image.height()) <= MAX_EDGE {
        return image;
    }
    // resize keeps the aspect ratio and fits within the given box
    image.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3)
}

fn jpeg_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map_or_else(|| name.to_string(), |s| s.to_string_lossy().into_owned());
    format!("{stem}.jpg")
}
