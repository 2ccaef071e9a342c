use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use firewatch::config::FirewatchConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "FIREWATCH_CONFIG",
        "FIREWATCH_MODEL",
        "FIREWATCH_SOURCE",
        "FIREWATCH_ALERT_PHONE",
        "FIREWATCH_ALERT_THRESHOLD",
        "FIREWATCH_LATENCY_MS",
        "FIREWATCH_METADATA_SHORTCUT",
        "FIREWATCH_INTERVAL_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_json_config_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "model_id": "mobilenet-uploaded",
        "seed": 42,
        "detection": { "metadata_shortcut": false, "latency_ms": 0 },
        "alert": { "phone": "555-010-0199", "threshold_percent": 80, "latency_ms": 5 },
        "capture": { "url": "stub://flicker", "width": 32, "height": 24, "interval_ms": 250 }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("FIREWATCH_CONFIG", file.path());
    std::env::set_var("FIREWATCH_MODEL", "mobilenet-realtime");
    std::env::set_var("FIREWATCH_ALERT_THRESHOLD", "65");

    let cfg = FirewatchConfig::load().expect("load config");

    assert_eq!(cfg.model_id, "mobilenet-realtime");
    assert_eq!(cfg.seed, Some(42));
    assert!(!cfg.detection.metadata_shortcut);
    assert_eq!(cfg.detection.simulated_latency, Duration::ZERO);
    assert_eq!(cfg.alert.latency, Duration::from_millis(5));
    assert_eq!(cfg.capture.url, "stub://flicker");
    assert_eq!(cfg.capture.width, 32);
    assert_eq!(cfg.capture.height, 24);
    assert_eq!(cfg.interval, Duration::from_millis(250));

    let contact = cfg.alert.contact().expect("contact");
    assert_eq!(contact.phone_number(), "555-010-0199");
    assert_eq!(contact.threshold(), 0.65);

    clear_env();
}

#[test]
fn loads_toml_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("firewatch.toml");
    std::fs::write(
        &path,
        r#"
model_id = "cnn-realtime"

[capture]
url = "stub://fire"
"#,
    )
    .expect("write config");
    std::env::set_var("FIREWATCH_CONFIG", &path);
    std::env::set_var("FIREWATCH_METADATA_SHORTCUT", "off");

    let cfg = FirewatchConfig::load().expect("load config");
    assert_eq!(cfg.model_id, "cnn-realtime");
    assert_eq!(cfg.capture.url, "stub://fire");
    assert!(!cfg.detection.metadata_shortcut);
    assert!(!cfg.alert.contact().expect("contact").is_registered());

    clear_env();
}

#[test]
fn rejects_invalid_settings() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("FIREWATCH_MODEL", "resnet-uploaded");
    assert!(FirewatchConfig::load().is_err());
    clear_env();

    std::env::set_var("FIREWATCH_ALERT_PHONE", "12345");
    assert!(FirewatchConfig::load().is_err());
    clear_env();

    std::env::set_var("FIREWATCH_ALERT_PHONE", "5550100199");
    std::env::set_var("FIREWATCH_ALERT_THRESHOLD", "0");
    assert!(FirewatchConfig::load().is_err());
    clear_env();

    std::env::set_var("FIREWATCH_LATENCY_MS", "soon");
    assert!(FirewatchConfig::load().is_err());
    clear_env();

    std::env::set_var("FIREWATCH_INTERVAL_MS", "0");
    assert!(FirewatchConfig::load().is_err());
    clear_env();
}
