use anyhow::{anyhow, Result};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{ColorAnalysis, ColorStats};

const RED_WEIGHT: f64 = 1.5;
const ORANGE_WEIGHT: f64 = 1.2;
const BRIGHT_WEIGHT: f64 = 1.8;
const FIRE_WEIGHT: f64 = 0.8;
const CONFIDENCE_SCALE: f64 = 8.0;
const MAX_CONFIDENCE: f64 = 0.98;
const FIRE_COLOR_THRESHOLD: f64 = 0.04;

/// Fire-like color bands. A pixel belongs to the first band it matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorBand {
    DeepRed,
    OrangeYellow,
    BrightCenter,
    RedOrangeGradient,
}

fn classify(r: u8, g: u8, b: u8) -> Option<ColorBand> {
    if r > 200 && g < 100 && b < 100 {
        Some(ColorBand::DeepRed)
    } else if r > 200 && g > 120 && g < 180 && b < 120 {
        Some(ColorBand::OrangeYellow)
    } else if r > 220 && g > 170 && g < 220 && b < 150 {
        Some(ColorBand::BrightCenter)
    } else if r > 180 && g > 90 && g < 140 && b < 90 {
        Some(ColorBand::RedOrangeGradient)
    } else {
        None
    }
}

/// Per-pixel color threshold heuristic.
///
/// Single pass over the buffer; deterministic for identical input.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorHeuristicBackend;

impl ColorHeuristicBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DetectorBackend for ColorHeuristicBackend {
    fn name(&self) -> &'static str {
        "color-heuristic"
    }

    fn analyze(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<ColorAnalysis> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if expected_len == 0 {
            return Err(anyhow!("frame has no pixels"));
        }
        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGBA bytes, received {}",
                expected_len,
                pixels.len()
            ));
        }

        let mut red = 0u64;
        let mut orange = 0u64;
        let mut bright = 0u64;
        let mut fire = 0u64;

        for px in pixels.chunks_exact(4) {
            let Some(band) = classify(px[0], px[1], px[2]) else {
                continue;
            };
            fire += 1;
            match band {
                ColorBand::DeepRed => red += 1,
                ColorBand::OrangeYellow => orange += 1,
                ColorBand::BrightCenter => bright += 1,
                ColorBand::RedOrangeGradient => {}
            }
        }

        let total = (pixels.len() / 4) as f64;
        let mut stats = ColorStats {
            red: red as f64 / total,
            orange: orange as f64 / total,
            bright: bright as f64 / total,
            fire: fire as f64 / total,
            weighted: 0.0,
        };
        stats.weighted = stats.red * RED_WEIGHT
            + stats.orange * ORANGE_WEIGHT
            + stats.bright * BRIGHT_WEIGHT
            + stats.fire * FIRE_WEIGHT;

        let confidence = (stats.weighted * CONFIDENCE_SCALE).min(MAX_CONFIDENCE);

        log::debug!(
            "color stats: red={:.4} orange={:.4} bright={:.4} fire={:.4} weighted={:.4} confidence={:.4}",
            stats.red,
            stats.orange,
            stats.bright,
            stats.fire,
            stats.weighted,
            confidence
        );

        Ok(ColorAnalysis {
            has_fire_colors: stats.weighted > FIRE_COLOR_THRESHOLD,
            confidence: confidence as f32,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3], count: usize) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        pixels
    }

    #[test]
    fn bands_are_checked_in_order() {
        assert_eq!(classify(255, 0, 0), Some(ColorBand::DeepRed));
        assert_eq!(classify(230, 150, 60), Some(ColorBand::OrangeYellow));
        assert_eq!(classify(240, 200, 100), Some(ColorBand::BrightCenter));
        assert_eq!(classify(190, 110, 50), Some(ColorBand::RedOrangeGradient));
        // Matches both orange and gradient; orange wins.
        assert_eq!(classify(210, 130, 50), Some(ColorBand::OrangeYellow));
        assert_eq!(classify(40, 60, 120), None);
        // Boundaries are exclusive.
        assert_eq!(classify(200, 0, 0), None);
    }

    #[test]
    fn no_fire_pixels_yields_zero_confidence() {
        let mut backend = ColorHeuristicBackend::new();
        let pixels = solid([30, 90, 160], 64);
        let analysis = backend.analyze(&pixels, 8, 8).unwrap();
        assert!(!analysis.has_fire_colors);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.stats.weighted, 0.0);
    }

    #[test]
    fn all_deep_red_is_clamped() {
        let mut backend = ColorHeuristicBackend::new();
        let pixels = solid([255, 0, 0], 100);
        let analysis = backend.analyze(&pixels, 10, 10).unwrap();
        assert!(analysis.has_fire_colors);
        assert!(analysis.confidence <= 0.98);
        assert_eq!(analysis.confidence, 0.98);
        assert!((analysis.stats.weighted - 2.3).abs() < 1e-9);
    }

    #[test]
    fn gradient_pixels_only_count_toward_total() {
        let mut backend = ColorHeuristicBackend::new();
        // 1 gradient pixel out of 100: weighted = 0.01 * 0.8 = 0.008.
        let mut pixels = solid([0, 0, 0], 99);
        pixels.extend_from_slice(&[190, 110, 50, 255]);
        let analysis = backend.analyze(&pixels, 10, 10).unwrap();
        assert_eq!(analysis.stats.red, 0.0);
        assert!((analysis.stats.fire - 0.01).abs() < 1e-9);
        assert!(!analysis.has_fire_colors);
        assert!((analysis.confidence - 0.064).abs() < 1e-6);
    }

    #[test]
    fn decision_threshold_is_strict() {
        let mut backend = ColorHeuristicBackend::new();
        // 2 deep red pixels out of 100: weighted = 0.02 * 2.3 = 0.046 > 0.04.
        let mut pixels = solid([0, 0, 0], 98);
        pixels.extend(solid([255, 0, 0], 2));
        let analysis = backend.analyze(&pixels, 10, 10).unwrap();
        assert!(analysis.has_fire_colors);

        // 1 deep red pixel: weighted = 0.023.
        let mut pixels = solid([0, 0, 0], 99);
        pixels.extend(solid([255, 0, 0], 1));
        let analysis = backend.analyze(&pixels, 10, 10).unwrap();
        assert!(!analysis.has_fire_colors);
    }

    #[test]
    fn confidence_stays_in_range_for_band_mixtures() {
        let samples = [
            [255, 0, 0],
            [230, 150, 60],
            [240, 200, 100],
            [190, 110, 50],
        ];
        let mut backend = ColorHeuristicBackend::new();
        for counts in (0..6usize.pow(4)).map(|n| [n % 6, n / 6 % 6, n / 36 % 6, n / 216]) {
            for background in [0usize, 1, 9, 250] {
                let total = counts.iter().sum::<usize>() + background;
                if total == 0 {
                    continue;
                }
                let mut pixels = Vec::with_capacity(total * 4);
                for (rgb, count) in samples.iter().zip(counts) {
                    pixels.extend(solid(*rgb, count));
                }
                pixels.extend(solid([20, 40, 80], background));

                let analysis = backend.analyze(&pixels, total as u32, 1).unwrap();
                assert!(
                    (0.0..=0.98).contains(&analysis.confidence),
                    "counts={:?} background={} confidence={}",
                    counts,
                    background,
                    analysis.confidence
                );
                let fire = counts.iter().sum::<usize>() as f64 / total as f64;
                assert!((analysis.stats.fire - fire).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let mut backend = ColorHeuristicBackend::new();
        assert!(backend.analyze(&[0u8; 12], 2, 2).is_err());
        assert!(backend.analyze(&[], 0, 0).is_err());
    }
}
