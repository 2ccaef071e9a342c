use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::alert::AlertOutcome;
use crate::detect::DetectionResult;
use crate::summary::{is_hazard_related, HazardSummary, Severity};

const BAR_WIDTH: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool) -> Self {
        Self { mode, is_tty }
    }

    pub fn from_args(ui_flag: Option<&str>, is_tty: bool) -> Self {
        let mode = match ui_flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self::new(mode, is_tty)
    }

    fn pretty(&self) -> bool {
        self.is_tty && self.mode != UiMode::Plain
    }

    /// Spinner (or a plain status line) that reports elapsed time when dropped.
    pub fn stage(&self, name: &str) -> StageGuard {
        if self.pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }

    /// Render results, the hazard banner, and the alert outcome.
    pub fn render(
        &self,
        results: &[DetectionResult],
        summary: &HazardSummary,
        alert: &AlertOutcome,
    ) -> String {
        let mut out = String::from("Detection Results\n");
        for result in results {
            let marker = if is_hazard_related(result) { "!" } else { " " };
            out.push_str(&format!(
                "{} {:<18} {:>3}% {}\n",
                marker,
                result.label,
                (result.confidence * 100.0).round() as u32,
                confidence_bar(result.confidence)
            ));
        }
        if let (true, Some(strongest)) = (summary.hazard_detected, &summary.strongest) {
            out.push_str(&format!(
                "{} detected with {}% confidence ({})\n",
                strongest.label,
                (strongest.confidence * 100.0).round() as u32,
                severity_label(summary.severity)
            ));
        }
        match alert {
            AlertOutcome::Sent { message } => out.push_str(&format!("Alert Sent: {}\n", message)),
            AlertOutcome::Failed { message } => {
                out.push_str(&format!("Alert Failed: {}\n", message))
            }
            AlertOutcome::NotTriggered => {}
        }
        out
    }
}

fn confidence_bar(confidence: f32) -> String {
    let filled = ((confidence.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Elevated => "elevated",
        Severity::Clear => "clear",
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let message = format!("✔ {} ({})", self.name, format_duration(elapsed));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_hazards_and_alert() {
        let ui = Ui::from_args(Some("plain"), false);
        let results = vec![
            DetectionResult::new("Fire", 0.89),
            DetectionResult::new("Normal scene", 0.5),
        ];
        let summary = HazardSummary::from_results(&results);
        let alert = AlertOutcome::Sent {
            message: "Alert sent to 5550100199".into(),
        };
        let text = ui.render(&results, &summary, &alert);
        assert!(text.contains("! Fire"));
        assert!(text.contains(" 89% [##################..]"));
        assert!(text.contains("Fire detected with 89% confidence (high)"));
        assert!(text.contains("Alert Sent: Alert sent to 5550100199"));
    }

    #[test]
    fn durations_switch_units() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
