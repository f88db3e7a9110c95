//! Image loading, encoding and result handling.
//!
//! Uploaded photos are validated with the `image` crate and kept as base64
//! data URLs, the form they travel in. Edited results come back as base64 and
//! are always treated as PNG.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of saved results.
pub const DOWNLOAD_PREFIX: &str = "mandrake-studio";

/// Accepted upload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
    Webp,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Webp => "image/webp",
        }
    }

    fn from_format(format: ImageFormat) -> Result<Self> {
        match format {
            ImageFormat::Png => Ok(ImageMime::Png),
            ImageFormat::Jpeg => Ok(ImageMime::Jpeg),
            ImageFormat::WebP => Ok(ImageMime::Webp),
            other => Err(AppError::UnsupportedImage(format!("{:?}", other))),
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ImageMime::Png => ImageFormat::Png,
            ImageMime::Jpeg => ImageFormat::Jpeg,
            ImageMime::Webp => ImageFormat::WebP,
        }
    }
}

/// Static helpers for data URL handling.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Removes a leading `data:image/<png|jpeg|jpg|webp>;base64,` header.
    ///
    /// Input without such a header is returned unchanged.
    pub fn strip_data_url_header(data: &str) -> &str {
        for subtype in ["png", "jpeg", "jpg", "webp"] {
            let header = format!("data:image/{};base64,", subtype);
            if let Some(payload) = data.strip_prefix(header.as_str()) {
                return payload;
            }
        }
        data
    }

    /// Encodes raw bytes as a base64 data URL.
    pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, BASE64.encode(bytes))
    }
}

/// A validated photo ready to be sent for editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    mime: ImageMime,
    data_url: String,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Reads and validates a PNG, JPEG or WEBP file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "read source image");
        Self::from_bytes(&bytes)
    }

    /// Sniffs the format, decodes once to validate, and encodes as a data URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnsupportedImage`] for formats other than PNG, JPEG
    /// or WEBP, and [`AppError::ImageProcessing`] if the bytes don't decode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)
            .map_err(|e| AppError::UnsupportedImage(e.to_string()))?;
        let mime = ImageMime::from_format(format)?;

        let decoded = image::load_from_memory_with_format(bytes, mime.image_format())
            .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))?;

        Ok(Self {
            mime,
            data_url: ImageProcessor::encode_data_url(mime.as_str(), bytes),
            width: decoded.width(),
            height: decoded.height(),
        })
    }

    /// Accepts an already encoded data URL (or bare base64 payload).
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let payload = ImageProcessor::strip_data_url_header(data_url.trim());
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| AppError::image(format!("Invalid base64 payload: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The edited image returned by the remote editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditedImage {
    bytes: Vec<u8>,
}

impl EditedImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decodes an inline base64 payload as returned by the API.
    pub fn from_base64(data: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(ImageProcessor::strip_data_url_header(data))
            .map_err(|e| AppError::image(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Results are always labelled PNG, whatever was uploaded.
    pub fn to_data_url(&self) -> String {
        ImageProcessor::encode_data_url(ImageMime::Png.as_str(), &self.bytes)
    }

    /// `mandrake-studio-<unix millis>.png`
    pub fn download_name(at: DateTime<Utc>) -> String {
        format!("{}-{}.png", DOWNLOAD_PREFIX, at.timestamp_millis())
    }

    /// Writes the result into `dir` under a timestamped name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::download_name(Utc::now()));
        fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), size = self.bytes.len(), "saved edited image");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 3));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    #[test]
    fn strips_known_headers_only() {
        assert_eq!(ImageProcessor::strip_data_url_header("data:image/png;base64,AAA"), "AAA");
        assert_eq!(ImageProcessor::strip_data_url_header("data:image/jpg;base64,BBB"), "BBB");
        assert_eq!(ImageProcessor::strip_data_url_header("data:image/webp;base64,CCC"), "CCC");
        assert_eq!(ImageProcessor::strip_data_url_header("AAA"), "AAA");
        assert_eq!(
            ImageProcessor::strip_data_url_header("data:image/gif;base64,DDD"),
            "data:image/gif;base64,DDD"
        );
    }

    #[test]
    fn png_bytes_become_data_url() {
        let image = SourceImage::from_bytes(&encoded(ImageFormat::Png)).unwrap();
        assert_eq!(image.mime(), ImageMime::Png);
        assert_eq!(image.dimensions(), (4, 3));
        assert!(image.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn jpeg_is_accepted() {
        let image = SourceImage::from_bytes(&encoded(ImageFormat::Jpeg)).unwrap();
        assert_eq!(image.mime(), ImageMime::Jpeg);
    }

    #[test]
    fn data_url_round_trips_through_validation() {
        let original = SourceImage::from_bytes(&encoded(ImageFormat::Png)).unwrap();
        let again = SourceImage::from_data_url(original.data_url()).unwrap();
        assert_eq!(original, again);
    }

    #[test]
    fn rejects_non_images() {
        let err = SourceImage::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn download_name_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(EditedImage::download_name(at), "mandrake-studio-1700000000123.png");
    }

    #[test]
    fn edited_image_saves_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditedImage::from_base64(&BASE64.encode(b"png-bytes")).unwrap();
        assert!(result.to_data_url().starts_with("data:image/png;base64,"));

        let path = result.save_to(dir.path()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");
    }
}
