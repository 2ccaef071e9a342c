//! Hazard summary of a detection result set, as shown next to the results.

use serde::Serialize;

use crate::detect::DetectionResult;

const HAZARD_TERMS: [&str; 4] = ["fire", "smoke", "flame", "hazard"];
const HAZARD_CONFIDENCE: f32 = 0.45;
const HIGH_CONFIDENCE: f32 = 0.65;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Clear,
    Elevated,
    High,
}

impl Severity {
    pub fn for_confidence(confidence: f32) -> Self {
        if confidence > HIGH_CONFIDENCE {
            Severity::High
        } else if confidence > HAZARD_CONFIDENCE {
            Severity::Elevated
        } else {
            Severity::Clear
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HazardSummary {
    pub hazard_detected: bool,
    /// Highest-confidence hazard-related result.
    pub strongest: Option<DetectionResult>,
    pub severity: Severity,
}

pub fn is_hazard_related(result: &DetectionResult) -> bool {
    HAZARD_TERMS.iter().any(|term| result.label_mentions(term))
}

impl HazardSummary {
    pub fn from_results(results: &[DetectionResult]) -> Self {
        let mut strongest: Option<&DetectionResult> = None;
        for result in results.iter().filter(|r| is_hazard_related(r)) {
            // Ties keep the earlier result.
            if strongest.map_or(true, |best| result.confidence > best.confidence) {
                strongest = Some(result);
            }
        }
        let hazard_detected = results
            .iter()
            .any(|r| is_hazard_related(r) && r.confidence > HAZARD_CONFIDENCE);
        let severity = strongest
            .map(|r| Severity::for_confidence(r.confidence))
            .unwrap_or(Severity::Clear);
        Self {
            hazard_detected,
            strongest: strongest.cloned(),
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrelated_labels_are_clear() {
        let summary = HazardSummary::from_results(&[
            DetectionResult::new("Normal scene", 0.97),
            DetectionResult::new("Fog", 0.8),
        ]);
        assert!(!summary.hazard_detected);
        assert_eq!(summary.strongest, None);
        assert_eq!(summary.severity, Severity::Clear);
    }

    #[test]
    fn normal_scene_label_matches_fire_term() {
        let summary = HazardSummary::from_results(&[
            DetectionResult::new("No fire detected", 0.95),
            DetectionResult::new("Normal scene", 0.97),
        ]);
        assert!(summary.hazard_detected);
        assert_eq!(
            summary.strongest.map(|r| r.label),
            Some("No fire detected".to_string())
        );
        assert_eq!(summary.severity, Severity::High);
    }

    #[test]
    fn picks_strongest_hazard() {
        let summary = HazardSummary::from_results(&[
            DetectionResult::new("Fire", 0.5),
            DetectionResult::new("Potential Hazard", 0.6),
            DetectionResult::new("Normal scene", 0.99),
        ]);
        assert!(summary.hazard_detected);
        assert_eq!(summary.strongest.map(|r| r.label), Some("Potential Hazard".into()));
        assert_eq!(summary.severity, Severity::Elevated);
    }

    #[test]
    fn severity_tiers_are_exclusive() {
        assert_eq!(Severity::for_confidence(0.66), Severity::High);
        assert_eq!(Severity::for_confidence(0.65), Severity::Elevated);
        assert_eq!(Severity::for_confidence(0.45), Severity::Clear);
    }
}
