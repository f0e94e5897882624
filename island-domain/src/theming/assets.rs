//! Theme asset references.
//!
//! Themes point at images three ways:
//! - `preset:<name>`: a built-in preset the renderer supplies itself,
//! - `content://…` / `file://…`: external content opened through a
//!   [`ContentResolver`],
//! - anything else: a path relative to the theme's package directory.

use async_trait::async_trait;
use std::io;
use std::path::Path;

use super::errors::AssetResolutionError;
use super::package::resolve_within;

const PRESET_PREFIX: &str = "preset:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Preset(String),
    External(String),
    ThemeFile(String),
}

impl ResourceRef {
    pub fn parse(raw: &str) -> Result<Self, AssetResolutionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AssetResolutionError::Empty);
        }
        if let Some(name) = raw.strip_prefix(PRESET_PREFIX) {
            return Ok(ResourceRef::Preset(name.to_string()));
        }
        if raw.starts_with("content://") || raw.starts_with("file://") {
            return Ok(ResourceRef::External(raw.to_string()));
        }
        Ok(ResourceRef::ThemeFile(raw.to_string()))
    }
}

/// Opens external content references. Platform integrations supply their own.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn open(&self, uri: &str) -> io::Result<Vec<u8>>;
}

/// Resolves `file://` URIs from the local filesystem; other schemes are unsupported.
#[derive(Debug, Default, Clone)]
pub struct FileContentResolver;

#[async_trait]
impl ContentResolver for FileContentResolver {
    async fn open(&self, uri: &str) -> io::Result<Vec<u8>> {
        match uri.strip_prefix("file://") {
            Some(path) => tokio::fs::read(path).await,
            None => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("no content provider for '{}'", uri),
            )),
        }
    }
}

/// Checks that `bytes` decode as an image and hands them back.
pub(crate) fn verify_image(reference: &str, bytes: Vec<u8>) -> Result<Vec<u8>, AssetResolutionError> {
    image::load_from_memory(&bytes).map_err(|source| AssetResolutionError::Decode {
        reference: reference.to_string(),
        source,
    })?;
    Ok(bytes)
}

/// Reads a theme-relative file, refusing paths outside `package_dir`.
pub(crate) async fn read_theme_file(package_dir: &Path, relative: &str) -> Result<Vec<u8>, AssetResolutionError> {
    let path = resolve_within(package_dir, relative)
        .map_err(|_| AssetResolutionError::OutsideTheme(relative.to_string()))?;
    tokio::fs::read(&path).await.map_err(|source| AssetResolutionError::Read {
        reference: relative.to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{ImageBuffer, ImageOutputFormat, Rgba};
    use std::io::Cursor;

    /// A tiny valid PNG.
    pub fn png_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }
}
