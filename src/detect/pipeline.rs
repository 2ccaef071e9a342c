use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::detect::backend::DetectorBackend;
use crate::detect::backends::ColorHeuristicBackend;
use crate::detect::result::{
    ColorAnalysis, DetectionResult, LABEL_FIRE, LABEL_FLAMES, LABEL_NORMAL_SCENE, LABEL_NO_FIRE,
    LABEL_POTENTIAL_HAZARD, LABEL_SMOKE,
};
use crate::ingest::ImageSource;
use crate::model;

/// Artificial delay emulating a remote inference call.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// Probability that a "cnn" model reports a spurious low-confidence hit.
pub const FALSE_POSITIVE_RATE: f64 = 0.15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionSettings {
    /// Return canned fire results when the image text contains a demo keyword.
    pub metadata_shortcut: bool,
    pub simulated_latency: Duration,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            metadata_shortcut: true,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

/// True when `text` carries one of the demo keywords.
///
/// "fire" and "flame" are matched as written; "burn" in any case.
pub fn matches_demo_keywords(text: &str) -> bool {
    text.contains("fire") || text.contains("flame") || text.to_lowercase().contains("burn")
}

/// Detection orchestrator.
///
/// Runs, in order: the metadata shortcut, the pixel backend, the model-driven
/// random fallback, and finally the fixed normal-scene answer. Never fails and
/// never returns an empty list.
pub struct FireDetector<B: DetectorBackend = ColorHeuristicBackend> {
    backend: B,
    settings: DetectionSettings,
    rng: StdRng,
}

impl FireDetector<ColorHeuristicBackend> {
    pub fn new(settings: DetectionSettings) -> Self {
        Self::with_backend(ColorHeuristicBackend::new(), settings)
    }
}

impl<B: DetectorBackend> FireDetector<B> {
    pub fn with_backend(backend: B, settings: DetectionSettings) -> Self {
        Self {
            backend,
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a deterministic random stream for the fallback branch.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn detect(&mut self, image: &ImageSource, model_id: &str) -> Vec<DetectionResult> {
        if !self.settings.simulated_latency.is_zero() {
            std::thread::sleep(self.settings.simulated_latency);
        }

        if self.settings.metadata_shortcut && self.metadata_matches(image) {
            log::info!("fire detected in image based on metadata");
            return canned_fire_results();
        }

        let analysis = match image.decode() {
            Ok(frame) => frame.analyze_with(&mut self.backend),
            Err(e) => {
                log::warn!("image decode failed: {:#}", e);
                ColorAnalysis::none()
            }
        };
        log::debug!(
            "color analysis: has_fire_colors={} confidence={:.3}",
            analysis.has_fire_colors,
            analysis.confidence
        );

        if analysis.has_fire_colors {
            return fire_results(analysis.confidence);
        }

        if model::simulates_false_positives(model_id) {
            let draw: f64 = self.rng.gen();
            if draw < FALSE_POSITIVE_RATE {
                log::debug!("{}: simulated false positive (draw={:.3})", model_id, draw);
                return false_positive_results(draw as f32);
            }
        }

        normal_scene_results()
    }

    fn metadata_matches(&self, image: &ImageSource) -> bool {
        image.name().is_some_and(matches_demo_keywords)
            || matches_demo_keywords(&image.to_data_url())
    }
}

fn canned_fire_results() -> Vec<DetectionResult> {
    vec![
        DetectionResult::new(LABEL_FIRE, 0.89),
        DetectionResult::new(LABEL_SMOKE, 0.76),
        DetectionResult::new(LABEL_FLAMES, 0.82),
    ]
}

fn fire_results(confidence: f32) -> Vec<DetectionResult> {
    vec![
        DetectionResult::new(LABEL_FIRE, confidence),
        DetectionResult::new(LABEL_SMOKE, (confidence * 0.85).max(0.3)),
        DetectionResult::new(LABEL_POTENTIAL_HAZARD, (confidence + 0.1).min(0.95)),
    ]
}

fn false_positive_results(draw: f32) -> Vec<DetectionResult> {
    vec![
        DetectionResult::new(LABEL_FIRE, 0.4 + draw * 0.3),
        DetectionResult::new(LABEL_SMOKE, 0.3 + draw * 0.3),
    ]
}

fn normal_scene_results() -> Vec<DetectionResult> {
    vec![
        DetectionResult::new(LABEL_NO_FIRE, 0.95),
        DetectionResult::new(LABEL_NORMAL_SCENE, 0.97),
    ]
}
