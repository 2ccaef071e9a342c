//! Image ingestion.
//!
//! - `source`: still images (data URLs, local files) and their decoding
//! - `capture`: per-tick image producers for the real-time monitor
//!
//! Ingestion never writes images to disk and never fetches remote URLs.

pub mod capture;
pub mod source;

pub use capture::{CaptureConfig, CaptureSource, CaptureStats};
pub use source::{ImageSource, MAX_IMAGE_BYTES};
