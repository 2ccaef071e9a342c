//! Still-image inputs.
//!
//! An `ImageSource` is either a data URL (as produced by a browser canvas or
//! the synthetic capture backend) or encoded image bytes read from a local
//! file. Both render to the same data-URL text, which is what the metadata
//! shortcut inspects, and both decode to a `Frame`.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use crate::frame::Frame;

/// Largest file accepted by `ImageSource::from_path`.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:<mime>;base64,<payload>` text.
    DataUrl(String),
    /// Encoded image bytes, optionally with the name they were loaded from.
    Encoded { bytes: Vec<u8>, name: Option<String> },
}

impl ImageSource {
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self::DataUrl(url.into())
    }

    pub fn from_bytes(bytes: Vec<u8>, name: Option<String>) -> Self {
        Self::Encoded { bytes, name }
    }

    /// Read a local image file.
    ///
    /// Rejects files over `MAX_IMAGE_BYTES` and files that are not a
    /// recognized image format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata for {}", path.display()))?;
        if meta.len() > MAX_IMAGE_BYTES {
            return Err(anyhow!(
                "{} is {} bytes; maximum image size is {} bytes",
                path.display(),
                meta.len(),
                MAX_IMAGE_BYTES
            ));
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
        image::guess_format(&bytes)
            .map_err(|_| anyhow!("{} is not a recognized image file", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self::Encoded { bytes, name })
    }

    /// Encode a frame as a PNG data URL, the way a canvas snapshot would.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let png = frame.encode_png()?;
        Ok(Self::DataUrl(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(png)
        )))
    }

    /// File name the bytes came from, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::DataUrl(_) => None,
            Self::Encoded { name, .. } => name.as_deref(),
        }
    }

    /// Data-URL rendering of this image.
    pub fn to_data_url(&self) -> String {
        match self {
            Self::DataUrl(url) => url.clone(),
            Self::Encoded { bytes, .. } => {
                let mime = image::guess_format(bytes)
                    .map(|format| format.to_mime_type())
                    .unwrap_or(FALLBACK_MIME);
                format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
        }
    }

    /// Decode into an RGBA frame.
    pub fn decode(&self) -> Result<Frame> {
        match self {
            Self::DataUrl(url) => Frame::decode(&data_url_payload(url)?),
            Self::Encoded { bytes, .. } => Frame::decode(bytes),
        }
    }
}

/// Extract the payload bytes of a data URL.
fn data_url_payload(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URL has no payload separator"))?;
    if meta.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .context("decode base64 data URL payload")
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}
