//! detect - analyze one image for fire or smoke
//!
//! Reads an image file (or a data URL), runs the detection pipeline, prints
//! the results with a hazard summary, and dispatches an alert when a phone
//! number is configured and the results cross its threshold.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use firewatch::{
    ui, AlertDispatcher, FireDetector, FirewatchConfig, HazardSummary, ImageSource, StubNotifier,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file to analyze.
    image: Option<PathBuf>,
    /// Analyze a data URL instead of a file.
    #[arg(long, conflicts_with = "image")]
    data_url: Option<String>,
    /// Model id (cnn-uploaded, cnn-realtime, mobilenet-uploaded, mobilenet-realtime).
    #[arg(long, env = "FIREWATCH_MODEL")]
    model: Option<String>,
    /// Phone number to alert.
    #[arg(long)]
    phone: Option<String>,
    /// Alert threshold in percent (1-100).
    #[arg(long)]
    threshold: Option<u32>,
    /// Seed for the simulated false-positive branch.
    #[arg(long)]
    seed: Option<u64>,
    /// Skip the simulated inference and delivery delays.
    #[arg(long)]
    no_delay: bool,
    /// Print results as JSON on stdout.
    #[arg(long)]
    json: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let ui = ui::Ui::from_args(Some(args.ui.as_str()), is_tty);

    let mut cfg = FirewatchConfig::load()?;
    if let Some(model) = args.model {
        cfg.model_id = model;
    }
    if let Some(phone) = args.phone {
        cfg.alert.phone = phone;
    }
    if let Some(threshold) = args.threshold {
        cfg.alert.threshold_percent = threshold;
    }
    if args.no_delay {
        cfg.detection.simulated_latency = Duration::ZERO;
        cfg.alert.latency = Duration::ZERO;
    }
    let contact = cfg.alert.contact()?;

    let image = match (&args.image, args.data_url) {
        (Some(path), None) => {
            let _stage = ui.stage("Load image");
            ImageSource::from_path(path)?
        }
        (None, Some(url)) => ImageSource::from_data_url(url),
        _ => return Err(anyhow!("pass an image path or --data-url")),
    };

    let mut detector = FireDetector::new(cfg.detection.clone());
    if let Some(seed) = args.seed.or(cfg.seed) {
        detector = detector.with_seed(seed);
    }
    let results = {
        let _stage = ui.stage("Analyze image");
        detector.detect(&image, &cfg.model_id)
    };
    let summary = HazardSummary::from_results(&results);

    let mut dispatcher = AlertDispatcher::new(StubNotifier::new(cfg.alert.latency));
    let alert = {
        let _stage = ui.stage("Check alert");
        dispatcher.maybe_alert(&results, &contact)
    };

    if args.json {
        let report = serde_json::json!({
            "model_id": cfg.model_id,
            "results": results,
            "summary": summary,
            "alert": alert,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ui.render(&results, &summary, &alert));
    }
    Ok(())
}
