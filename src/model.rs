//! Selectable model options.
//!
//! Model ids are cosmetic: no distinct inference path exists per model. The
//! orchestrator only checks the id for the "cnn" substring, and the capture
//! mode is derived from the "realtime" substring.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelMode {
    /// Analyze an uploaded still image.
    Uploaded,
    /// Analyze frames from a capture source once per tick.
    Realtime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub mode: ModelMode,
}

pub const DEFAULT_MODEL_ID: &str = "cnn-uploaded";

pub const MODEL_OPTIONS: [ModelOption; 4] = [
    ModelOption {
        id: "cnn-uploaded",
        name: "CNN (Uploaded Image)",
        mode: ModelMode::Uploaded,
    },
    ModelOption {
        id: "cnn-realtime",
        name: "CNN (Real-time Detection)",
        mode: ModelMode::Realtime,
    },
    ModelOption {
        id: "mobilenet-uploaded",
        name: "MobileNetV2 (Uploaded Image)",
        mode: ModelMode::Uploaded,
    },
    ModelOption {
        id: "mobilenet-realtime",
        name: "MobileNetV2 (Real-time Detection)",
        mode: ModelMode::Realtime,
    },
];

pub fn find_model(id: &str) -> Option<&'static ModelOption> {
    MODEL_OPTIONS.iter().find(|option| option.id == id)
}

pub fn mode_for(id: &str) -> ModelMode {
    if id.contains("realtime") {
        ModelMode::Realtime
    } else {
        ModelMode::Uploaded
    }
}

/// Whether the id selects the branch that occasionally reports false positives.
pub fn simulates_false_positives(id: &str) -> bool {
    id.contains("cnn")
}
