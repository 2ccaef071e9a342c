use anyhow::Result;
use std::time::Duration;

use crate::detect::DetectionResult;

/// Simulated delivery delay of the stub notifier.
pub const DEFAULT_NOTIFY_LATENCY: Duration = Duration::from_millis(1500);

/// Alert delivery channel.
pub trait Notifier: Send {
    fn name(&self) -> &'static str;

    /// Deliver an alert and return a confirmation message.
    fn send(&mut self, phone_number: &str, results: &[DetectionResult]) -> Result<String>;
}

/// Notifier with no transport. Waits, logs, and reports success.
pub struct StubNotifier {
    latency: Duration,
    sent: u64,
}

impl StubNotifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency, sent: 0 }
    }

    /// Alerts "delivered" so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Default for StubNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_LATENCY)
    }
}

impl Notifier for StubNotifier {
    fn name(&self) -> &'static str {
        "stub-sms"
    }

    fn send(&mut self, phone_number: &str, results: &[DetectionResult]) -> Result<String> {
        log::info!(
            "would send SMS alert to {} with {} detection result(s)",
            phone_number,
            results.len()
        );
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.sent += 1;
        Ok(format!("Alert sent to {}", phone_number))
    }
}
