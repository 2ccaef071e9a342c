use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::alert::{AlertConfig, DEFAULT_NOTIFY_LATENCY, DEFAULT_THRESHOLD_PERCENT};
use crate::detect::{DetectionSettings, DEFAULT_SIMULATED_LATENCY};
use crate::ingest::CaptureConfig;
use crate::model::{self, DEFAULT_MODEL_ID};
use crate::monitor::DEFAULT_TICK_INTERVAL;

const DEFAULT_CAPTURE_URL: &str = "stub://calm";
const DEFAULT_CAPTURE_WIDTH: u32 = 64;
const DEFAULT_CAPTURE_HEIGHT: u32 = 48;

#[derive(Debug, Deserialize, Default)]
struct FirewatchConfigFile {
    model_id: Option<String>,
    seed: Option<u64>,
    detection: Option<DetectionConfigFile>,
    alert: Option<AlertConfigFile>,
    capture: Option<CaptureConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectionConfigFile {
    metadata_shortcut: Option<bool>,
    latency_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertConfigFile {
    phone: Option<String>,
    threshold_percent: Option<u32>,
    latency_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    interval_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct FirewatchConfig {
    pub model_id: String,
    /// Seed for the random fallback; entropy when unset.
    pub seed: Option<u64>,
    pub detection: DetectionSettings,
    pub alert: AlertSettings,
    pub capture: CaptureConfig,
    pub interval: Duration,
}

/// Alert contact as configured, validated into an `AlertConfig` by `contact()`.
#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub phone: String,
    pub threshold_percent: u32,
    pub latency: Duration,
}

impl AlertSettings {
    /// Registered contact, or an unregistered default when no phone is set.
    pub fn contact(&self) -> Result<AlertConfig> {
        if self.phone.trim().is_empty() {
            return Ok(AlertConfig::default());
        }
        AlertConfig::new(&self.phone, self.threshold_percent)
    }
}

impl FirewatchConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FIREWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults only; no file, no environment.
    pub fn defaults() -> Self {
        Self::from_file(FirewatchConfigFile::default())
    }

    fn from_file(file: FirewatchConfigFile) -> Self {
        let model_id = file
            .model_id
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let detection = DetectionSettings {
            metadata_shortcut: file
                .detection
                .as_ref()
                .and_then(|d| d.metadata_shortcut)
                .unwrap_or(true),
            simulated_latency: file
                .detection
                .as_ref()
                .and_then(|d| d.latency_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SIMULATED_LATENCY),
        };
        let alert = AlertSettings {
            phone: file
                .alert
                .as_ref()
                .and_then(|a| a.phone.clone())
                .unwrap_or_default(),
            threshold_percent: file
                .alert
                .as_ref()
                .and_then(|a| a.threshold_percent)
                .unwrap_or(DEFAULT_THRESHOLD_PERCENT),
            latency: file
                .alert
                .as_ref()
                .and_then(|a| a.latency_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_NOTIFY_LATENCY),
        };
        let capture = CaptureConfig {
            url: file
                .capture
                .as_ref()
                .and_then(|c| c.url.clone())
                .unwrap_or_else(|| DEFAULT_CAPTURE_URL.to_string()),
            width: file
                .capture
                .as_ref()
                .and_then(|c| c.width)
                .unwrap_or(DEFAULT_CAPTURE_WIDTH),
            height: file
                .capture
                .as_ref()
                .and_then(|c| c.height)
                .unwrap_or(DEFAULT_CAPTURE_HEIGHT),
        };
        let interval = file
            .capture
            .and_then(|c| c.interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TICK_INTERVAL);
        Self {
            model_id,
            seed: file.seed,
            detection,
            alert,
            capture,
            interval,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(model_id) = std::env::var("FIREWATCH_MODEL") {
            if !model_id.trim().is_empty() {
                self.model_id = model_id.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var("FIREWATCH_SOURCE") {
            if !url.trim().is_empty() {
                self.capture.url = url;
            }
        }
        if let Ok(phone) = std::env::var("FIREWATCH_ALERT_PHONE") {
            if !phone.trim().is_empty() {
                self.alert.phone = phone;
            }
        }
        if let Ok(threshold) = std::env::var("FIREWATCH_ALERT_THRESHOLD") {
            self.alert.threshold_percent = threshold.trim().parse().map_err(|_| {
                anyhow!("FIREWATCH_ALERT_THRESHOLD must be an integer percentage")
            })?;
        }
        if let Ok(latency) = std::env::var("FIREWATCH_LATENCY_MS") {
            let millis: u64 = latency.trim().parse().map_err(|_| {
                anyhow!("FIREWATCH_LATENCY_MS must be an integer number of milliseconds")
            })?;
            self.detection.simulated_latency = Duration::from_millis(millis);
        }
        if let Ok(flag) = std::env::var("FIREWATCH_METADATA_SHORTCUT") {
            self.detection.metadata_shortcut = parse_flag(&flag).ok_or_else(|| {
                anyhow!("FIREWATCH_METADATA_SHORTCUT must be one of 1/0, true/false, on/off")
            })?;
        }
        if let Ok(interval) = std::env::var("FIREWATCH_INTERVAL_MS") {
            let millis: u64 = interval.trim().parse().map_err(|_| {
                anyhow!("FIREWATCH_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.interval = Duration::from_millis(millis);
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if model::find_model(&self.model_id).is_none() {
            let known: Vec<&str> = model::MODEL_OPTIONS.iter().map(|m| m.id).collect();
            return Err(anyhow!(
                "unknown model '{}'; expected one of {}",
                self.model_id,
                known.join(", ")
            ));
        }
        // Fails on a bad phone number or threshold.
        self.alert.contact()?;
        if self.interval.is_zero() {
            return Err(anyhow!("capture interval must be greater than zero"));
        }
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(anyhow!("capture width and height must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<FirewatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
