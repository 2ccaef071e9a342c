//! Firewatch
//!
//! A demonstration fire/smoke detector. There is no trained model behind it:
//! detection is a keyword shortcut for demo assets, a per-pixel color
//! heuristic, and a simulated false-positive branch for "cnn" model ids.
//!
//! # Pipeline
//!
//! 1. An `ImageSource` (data URL or file bytes) enters `FireDetector::detect`.
//! 2. The metadata shortcut may answer with canned fire results.
//! 3. Otherwise the image is decoded to a `Frame` and scanned by a
//!    `DetectorBackend` (the color heuristic).
//! 4. The result set goes to an `AlertDispatcher`, which notifies the
//!    registered contact when a fire or smoke result crosses its threshold.
//!
//! # Module Structure
//!
//! - `detect`: backends, results, and the orchestrator
//! - `frame`: decoded RGBA frames
//! - `ingest`: still-image sources and real-time capture sources
//! - `alert`: contact settings, threshold check, notifiers
//! - `monitor`: serialized real-time detection loop
//! - `summary`: hazard summary of a result set
//! - `model`: selectable model ids
//! - `config`: file + environment configuration
//! - `ui`: terminal presentation for the binaries

pub mod alert;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod model;
pub mod monitor;
pub mod summary;
pub mod ui;

pub use alert::{AlertConfig, AlertDispatcher, AlertOutcome, Notifier, StubNotifier};
pub use config::FirewatchConfig;
pub use detect::{
    ColorAnalysis, ColorHeuristicBackend, DetectionResult, DetectionSettings, DetectorBackend,
    FireDetector,
};
pub use frame::Frame;
pub use ingest::{CaptureConfig, CaptureSource, ImageSource};
pub use model::{ModelMode, ModelOption, MODEL_OPTIONS};
pub use monitor::{CycleReport, Monitor, MonitorStats};
pub use summary::{HazardSummary, Severity};
