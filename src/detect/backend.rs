use anyhow::Result;

use crate::detect::result::ColorAnalysis;

/// Pixel analyzer trait.
///
/// Backends receive a decoded RGBA buffer (stride 4) and return a
/// `ColorAnalysis`. They must not retain the pixel slice beyond the call.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Analyze one RGBA frame.
    ///
    /// An error here is reported by the caller as a zero-confidence analysis,
    /// so backends may fail fast on malformed input.
    fn analyze(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<ColorAnalysis>;
}
