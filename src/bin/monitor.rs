//! monitor - real-time fire/smoke monitoring
//!
//! This tool:
//! 1. Connects a capture source (stub:// scene or a directory of images)
//! 2. Runs one detection cycle per tick, never two at once
//! 3. Dispatches alerts to the configured contact
//! 4. Stops on Ctrl-C (or after --max-cycles) and prints a summary

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use firewatch::{
    model, AlertDispatcher, CaptureSource, FireDetector, FirewatchConfig, Monitor, StubNotifier,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Capture source: stub://calm, stub://fire, stub://flicker, or a directory.
    #[arg(long, env = "FIREWATCH_SOURCE")]
    source: Option<String>,
    /// Model id; should be a realtime model.
    #[arg(long, env = "FIREWATCH_MODEL")]
    model: Option<String>,
    /// Tick interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,
    /// Phone number to alert.
    #[arg(long)]
    phone: Option<String>,
    /// Alert threshold in percent (1-100).
    #[arg(long)]
    threshold: Option<u32>,
    /// Seed for the simulated false-positive branch.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = FirewatchConfig::load()?;
    if let Some(source) = args.source {
        cfg.capture.url = source;
    }
    if let Some(model) = args.model {
        cfg.model_id = model;
    }
    if let Some(interval_ms) = args.interval_ms {
        cfg.interval = Duration::from_millis(interval_ms.max(1));
    }
    if let Some(phone) = args.phone {
        cfg.alert.phone = phone;
    }
    if let Some(threshold) = args.threshold {
        cfg.alert.threshold_percent = threshold;
    }
    let contact = cfg.alert.contact()?;

    if model::mode_for(&cfg.model_id) != model::ModelMode::Realtime {
        log::warn!(
            "model {} is an uploaded-image model; monitoring anyway",
            cfg.model_id
        );
    }

    let mut source = CaptureSource::new(cfg.capture.clone())?;
    source.connect()?;

    let mut detector = FireDetector::new(cfg.detection.clone());
    if let Some(seed) = args.seed.or(cfg.seed) {
        detector = detector.with_seed(seed);
    }
    let dispatcher = AlertDispatcher::new(StubNotifier::new(cfg.alert.latency));
    if !contact.is_registered() {
        log::info!("no alert phone configured; alerts disabled");
    }

    let mut monitor = Monitor::new(source, detector, dispatcher, contact, cfg.model_id.clone())
        .with_interval(cfg.interval);

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
    })?;

    let stats = monitor.run(&stop, args.max_cycles);

    println!("monitor summary:");
    println!("  cycles: {}", stats.cycles);
    println!("  skipped ticks: {}", stats.skipped_ticks);
    println!("  capture errors: {}", stats.capture_errors);
    println!("  hazard frames: {}", stats.hazards);
    println!("  alerts sent: {}", stats.alerts_sent);
    println!("  alerts failed: {}", stats.alerts_failed);
    Ok(())
}
