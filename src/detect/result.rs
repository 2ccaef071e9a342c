use serde::{Deserialize, Serialize};

pub const LABEL_FIRE: &str = "Fire";
pub const LABEL_SMOKE: &str = "Smoke";
pub const LABEL_FLAMES: &str = "Flames";
pub const LABEL_POTENTIAL_HAZARD: &str = "Potential Hazard";
pub const LABEL_NO_FIRE: &str = "No fire detected";
pub const LABEL_NORMAL_SCENE: &str = "Normal scene";

/// One labeled outcome of a detection call.
///
/// Results are produced fresh per call and keep the order in which the
/// producing stage emitted them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Never populated by the color heuristic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl DetectionResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bbox: None,
        }
    }

    /// Case-insensitive substring match on the label.
    pub fn label_mentions(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Outcome of the color heuristic on a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorAnalysis {
    pub has_fire_colors: bool,
    /// Confidence in `[0, 0.98]`.
    pub confidence: f32,
    pub stats: ColorStats,
}

impl ColorAnalysis {
    /// Analysis reported when a frame cannot be decoded or analyzed.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-band fractions of fire-like pixels, kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorStats {
    pub red: f64,
    pub orange: f64,
    pub bright: f64,
    pub fire: f64,
    pub weighted: f64,
}
