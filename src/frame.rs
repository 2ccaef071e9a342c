//! Decoded pixel frames.
//!
//! `Frame` owns an RGBA8 buffer (stride 4) and is the only thing detector
//! backends ever see. Frames are created by decoding an `ImageSource` or by a
//! capture backend, analyzed once, and dropped.

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::detect::{ColorAnalysis, DetectorBackend};

/// Owned RGBA frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Wrap an RGBA buffer. Dimensions must be non-zero and match the buffer.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("frame must be at least 1x1, got {}x{}", width, height));
        }
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGBA bytes for {}x{}, received {}",
                expected_len,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A frame where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        Self::from_rgba(rgba.repeat(count), width, height)
    }

    /// Decode an encoded image (PNG, JPEG) into RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("decode image")?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(rgba.into_raw(), width, height)
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("encode png")?;
        Ok(bytes)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Run a backend on this frame.
    ///
    /// Backend errors are logged and reported as a zero-confidence analysis.
    pub fn analyze_with<B: DetectorBackend + ?Sized>(&self, backend: &mut B) -> ColorAnalysis {
        match backend.analyze(&self.data, self.width, self.height) {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("{}: analysis failed: {:#}", backend.name(), e);
                ColorAnalysis::none()
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::ColorHeuristicBackend;

    #[test]
    fn rejects_empty_and_mismatched_buffers() {
        assert!(Frame::from_rgba(vec![], 0, 0).is_err());
        assert!(Frame::from_rgba(vec![0u8; 15], 2, 2).is_err());
        assert!(Frame::from_rgba(vec![0u8; 16], 2, 2).is_ok());
    }

    #[test]
    fn png_round_trip_preserves_pixels() -> Result<()> {
        let frame = Frame::filled(4, 3, [255, 0, 0, 255])?;
        let decoded = Frame::decode(&frame.encode_png()?)?;
        assert_eq!(decoded, frame);
        assert_eq!(decoded.pixel_count(), 12);
        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Frame::decode(b"not an image").is_err());
    }

    #[test]
    fn analyze_with_runs_backend() -> Result<()> {
        let frame = Frame::filled(5, 5, [255, 0, 0, 255])?;
        let analysis = frame.analyze_with(&mut ColorHeuristicBackend::new());
        assert!(analysis.has_fire_colors);
        Ok(())
    }
}
