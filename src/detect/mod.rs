mod backend;
mod backends;
mod pipeline;
mod result;

pub use backend::DetectorBackend;
pub use backends::ColorHeuristicBackend;
pub use pipeline::{
    matches_demo_keywords, DetectionSettings, FireDetector, DEFAULT_SIMULATED_LATENCY,
    FALSE_POSITIVE_RATE,
};
pub use result::{
    BoundingBox, ColorAnalysis, ColorStats, DetectionResult, LABEL_FIRE, LABEL_FLAMES,
    LABEL_NORMAL_SCENE, LABEL_NO_FIRE, LABEL_POTENTIAL_HAZARD, LABEL_SMOKE,
};
