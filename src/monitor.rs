//! Real-time monitoring loop.
//!
//! Captures one image per tick, runs a detection cycle (detect, then alert),
//! and waits for the next tick. Cycles never overlap: ticks that elapse while
//! a cycle is still running are dropped and counted in
//! `MonitorStats::skipped_ticks`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::alert::{AlertConfig, AlertDispatcher, AlertOutcome, Notifier, StubNotifier};
use crate::detect::{ColorHeuristicBackend, DetectionResult, DetectorBackend, FireDetector};
use crate::ingest::CaptureSource;
use crate::summary::HazardSummary;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest single sleep while waiting for a tick, so a stop request is
/// noticed promptly.
const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub cycles: u64,
    pub skipped_ticks: u64,
    pub capture_errors: u64,
    pub hazards: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
}

/// Result of one detection cycle.
#[derive(Clone, Debug)]
pub struct CycleReport {
    pub results: Vec<DetectionResult>,
    pub summary: HazardSummary,
    pub alert: AlertOutcome,
}

pub struct Monitor<B: DetectorBackend = ColorHeuristicBackend, N: Notifier = StubNotifier> {
    source: CaptureSource,
    detector: FireDetector<B>,
    dispatcher: AlertDispatcher<N>,
    contact: AlertConfig,
    model_id: String,
    interval: Duration,
    stats: MonitorStats,
}

impl<B: DetectorBackend, N: Notifier> Monitor<B, N> {
    pub fn new(
        source: CaptureSource,
        detector: FireDetector<B>,
        dispatcher: AlertDispatcher<N>,
        contact: AlertConfig,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            detector,
            dispatcher,
            contact,
            model_id: model_id.into(),
            interval: DEFAULT_TICK_INTERVAL,
            stats: MonitorStats::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    /// Replace the alert contact between cycles.
    pub fn set_contact(&mut self, contact: AlertConfig) {
        self.contact = contact;
    }

    /// Run a single capture + detect + alert cycle.
    ///
    /// Capture errors are returned; detection and alerting never fail.
    pub fn run_cycle(&mut self) -> anyhow::Result<CycleReport> {
        let image = match self.source.next_image() {
            Ok(image) => image,
            Err(e) => {
                self.stats.capture_errors += 1;
                return Err(e);
            }
        };
        let results = self.detector.detect(&image, &self.model_id);
        let summary = HazardSummary::from_results(&results);
        if summary.hazard_detected {
            self.stats.hazards += 1;
        }
        let alert = self.dispatcher.maybe_alert(&results, &self.contact);
        match &alert {
            AlertOutcome::Sent { .. } => self.stats.alerts_sent += 1,
            AlertOutcome::Failed { message } => {
                log::warn!("{}", message);
                self.stats.alerts_failed += 1;
            }
            AlertOutcome::NotTriggered => {}
        }
        self.stats.cycles += 1;
        Ok(CycleReport {
            results,
            summary,
            alert,
        })
    }

    /// Tick until `stop` is set or `max_cycles` ticks have been attempted.
    ///
    /// A tick whose capture fails counts as an attempt but not as a completed
    /// cycle, so a source that keeps failing still lets the loop end.
    pub fn run(&mut self, stop: &AtomicBool, max_cycles: Option<u64>) -> MonitorStats {
        log::info!(
            "monitor running: model={} interval={}ms",
            self.model_id,
            self.interval.as_millis()
        );
        let mut next_tick = Instant::now();
        let mut attempts = 0u64;

        while !stop.load(Ordering::SeqCst) {
            if max_cycles.is_some_and(|max| attempts >= max) {
                break;
            }

            let now = Instant::now();
            if now < next_tick {
                std::thread::sleep((next_tick - now).min(STOP_POLL));
                continue;
            }

            attempts += 1;
            match self.run_cycle() {
                Ok(report) => {
                    if report.summary.hazard_detected {
                        log::warn!(
                            "hazard: {:?} ({:?})",
                            report.summary.strongest.as_ref().map(|r| &r.label),
                            report.summary.severity
                        );
                    }
                }
                Err(e) => log::warn!("capture failed: {:#}", e),
            }

            if self.interval.is_zero() {
                continue;
            }
            next_tick += self.interval;
            let now = Instant::now();
            let mut skipped = 0u64;
            while next_tick <= now {
                skipped += 1;
                next_tick += self.interval;
            }
            if skipped > 0 {
                log::debug!("cycle overran interval; skipped {} tick(s)", skipped);
                self.stats.skipped_ticks += skipped;
            }
        }

        log::info!("monitor stopped after {} cycle(s)", self.stats.cycles);
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DetectionSettings;
    use crate::ingest::CaptureConfig;

    fn monitor(scene: &str, latency: Duration) -> anyhow::Result<Monitor> {
        let mut source = CaptureSource::new(CaptureConfig {
            url: format!("stub://{}", scene),
            ..CaptureConfig::default()
        })?;
        source.connect()?;
        let detector = FireDetector::new(DetectionSettings {
            metadata_shortcut: false,
            simulated_latency: latency,
        });
        let dispatcher = AlertDispatcher::new(StubNotifier::new(Duration::ZERO));
        let contact = AlertConfig::new("5550100199", 70)?;
        Ok(Monitor::new(source, detector, dispatcher, contact, "mobilenet-realtime")
            .with_interval(Duration::ZERO))
    }

    #[test]
    fn fire_scene_alerts_every_cycle() -> anyhow::Result<()> {
        let mut monitor = monitor("fire", Duration::ZERO)?;
        let stats = monitor.run(&AtomicBool::new(false), Some(3));
        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.hazards, 3);
        assert_eq!(stats.alerts_sent, 3);
        Ok(())
    }

    #[test]
    fn calm_scene_reports_normal_results() -> anyhow::Result<()> {
        let mut monitor = monitor("calm", Duration::ZERO)?;
        let report = monitor.run_cycle()?;
        assert_eq!(report.results[0].label, "No fire detected");
        // "No fire detected" at 0.95 still crosses a 70% threshold.
        assert!(report.alert.is_sent());

        monitor.set_contact(AlertConfig::default());
        let report = monitor.run_cycle()?;
        assert_eq!(report.alert, AlertOutcome::NotTriggered);
        Ok(())
    }

    #[test]
    fn failed_captures_count_toward_max_cycles() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let frame = crate::frame::Frame::filled(4, 4, [255, 0, 0, 255])?;
        std::fs::write(dir.path().join("01_frame.png"), frame.encode_png()?)?;
        std::fs::write(dir.path().join("02_broken.png"), b"not a png")?;

        let mut source = CaptureSource::new(CaptureConfig {
            url: dir.path().display().to_string(),
            ..CaptureConfig::default()
        })?;
        source.connect()?;
        let detector = FireDetector::new(DetectionSettings {
            metadata_shortcut: false,
            simulated_latency: Duration::ZERO,
        });
        let mut monitor = Monitor::new(
            source,
            detector,
            AlertDispatcher::new(StubNotifier::new(Duration::ZERO)),
            AlertConfig::default(),
            "mobilenet-realtime",
        )
        .with_interval(Duration::ZERO);

        let stats = monitor.run(&AtomicBool::new(false), Some(4));
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.capture_errors, 2);
        Ok(())
    }

    #[test]
    fn stop_flag_ends_loop_before_first_cycle() -> anyhow::Result<()> {
        let mut monitor = monitor("fire", Duration::ZERO)?;
        let stats = monitor.run(&AtomicBool::new(true), None);
        assert_eq!(stats, MonitorStats::default());
        Ok(())
    }

    #[test]
    fn overrunning_cycles_skip_ticks() -> anyhow::Result<()> {
        let mut monitor =
            monitor("calm", Duration::from_millis(35))?.with_interval(Duration::from_millis(10));
        let stats = monitor.run(&AtomicBool::new(false), Some(2));
        assert_eq!(stats.cycles, 2);
        assert!(stats.skipped_ticks >= 6, "skipped={}", stats.skipped_ticks);
        Ok(())
    }
}
