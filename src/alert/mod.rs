//! Alert dispatch.
//!
//! A caller holds an `AlertConfig` (the registered contact) and hands each
//! detection result set to an `AlertDispatcher`. The dispatcher decides
//! whether the results cross the contact's threshold and, if so, invokes a
//! `Notifier`. Notifier failures come back as `AlertOutcome::Failed`; they
//! never propagate into the detection flow.

mod notifier;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::detect::DetectionResult;

pub use notifier::{Notifier, StubNotifier, DEFAULT_NOTIFY_LATENCY};

/// Default threshold, in percent.
pub const DEFAULT_THRESHOLD_PERCENT: u32 = 70;

/// Shortest phone number accepted by `AlertConfig::new`.
pub const MIN_PHONE_LEN: usize = 10;

/// Registered alert contact.
///
/// Fields are private: a contact only changes through `save`, which validates
/// the phone number and threshold together.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertConfig {
    phone_number: String,
    threshold: f32,
}

impl Default for AlertConfig {
    /// No phone registered, default threshold.
    fn default() -> Self {
        Self {
            phone_number: String::new(),
            threshold: DEFAULT_THRESHOLD_PERCENT as f32 / 100.0,
        }
    }
}

impl AlertConfig {
    /// Build a contact from a phone number and a threshold percentage (1..=100).
    pub fn new(phone_number: &str, threshold_percent: u32) -> Result<Self> {
        if !(1..=100).contains(&threshold_percent) {
            return Err(anyhow!("threshold must be between 1 and 100"));
        }
        Self::from_fraction(phone_number, threshold_percent as f32 / 100.0)
    }

    /// Build a contact from a threshold in `(0, 1]`.
    pub fn from_fraction(phone_number: &str, threshold: f32) -> Result<Self> {
        let phone_number = phone_number.trim();
        if phone_number.chars().count() < MIN_PHONE_LEN {
            return Err(anyhow!(
                "phone number must have at least {} characters",
                MIN_PHONE_LEN
            ));
        }
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(anyhow!("threshold must be in (0, 1], got {}", threshold));
        }
        Ok(Self {
            phone_number: phone_number.to_string(),
            threshold,
        })
    }

    /// Replace the contact. On error the previous contact is kept.
    pub fn save(&mut self, phone_number: &str, threshold_percent: u32) -> Result<()> {
        *self = Self::new(phone_number, threshold_percent)?;
        Ok(())
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_registered(&self) -> bool {
        !self.phone_number.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// Nothing crossed the threshold, or no contact is registered.
    NotTriggered,
    Sent { message: String },
    Failed { message: String },
}

impl AlertOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// True when a result whose label mentions fire or smoke reaches the
/// contact's threshold and a phone number is registered.
///
/// The match is a plain substring test, so "No fire detected" qualifies too.
pub fn should_alert(results: &[DetectionResult], contact: &AlertConfig) -> bool {
    contact.is_registered()
        && results.iter().any(|result| {
            (result.label_mentions("fire") || result.label_mentions("smoke"))
                && result.confidence >= contact.threshold()
        })
}

pub struct AlertDispatcher<N: Notifier = StubNotifier> {
    notifier: N,
}

impl AlertDispatcher<StubNotifier> {
    pub fn stub() -> Self {
        Self::new(StubNotifier::default())
    }
}

impl<N: Notifier> AlertDispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn maybe_alert(
        &mut self,
        results: &[DetectionResult],
        contact: &AlertConfig,
    ) -> AlertOutcome {
        if !should_alert(results, contact) {
            return AlertOutcome::NotTriggered;
        }
        match self.notifier.send(contact.phone_number(), results) {
            Ok(message) => {
                log::info!("{}: {}", self.notifier.name(), message);
                AlertOutcome::Sent { message }
            }
            Err(e) => {
                log::warn!("{}: alert failed: {:#}", self.notifier.name(), e);
                AlertOutcome::Failed {
                    message: format!("Could not send the emergency alert: {}", e),
                }
            }
        }
    }
}
