//! End-to-end bootstrap tests against real config files and log directories

use rotalog::constants::SETTINGS_PREFIX;
use rotalog::{ConfigLoader, Error, LogControl, LogInitializer};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

fn write_config(dir: &Path, log_dir: &Path, level: &str) -> PathBuf {
    let path = dir.join("conf/log.yml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        format!(
            "logrotate:\n  baseFilename: svc\n  logDir: {}\n  logLevel: {}\n  maxRemainCnt: 7\n  rotateDays: 1\n",
            log_dir.display(),
            level
        ),
    )
    .unwrap();
    path
}

fn today_file(log_dir: &Path, base: &str) -> PathBuf {
    log_dir.join(dated_file_name(log_dir, base))
}

/// Name of the newest dated file in `log_dir`
fn dated_file_name(log_dir: &Path, base: &str) -> String {
    let prefix = format!("{}-", base);
    let mut names: Vec<String> = fs::read_dir(log_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(&prefix) && n.ends_with(".log"))
        .collect();
    names.sort();
    names.pop().expect("no dated log file")
}

fn init(dir: &Path, control: &LogControl) -> rotalog::LogHandle {
    LogInitializer::new(ConfigLoader::in_dir(dir), control.clone())
        .with_lookup_prefix(SETTINGS_PREFIX)
        .watch(false)
        .init()
        .unwrap()
}

#[test]
fn test_every_severity_lands_in_one_file() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    write_config(dir.path(), &log_dir, "debug");

    let (control, subscriber) = LogControl::subscriber(false);
    let _handle = init(dir.path(), &control);

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("d line");
        tracing::info!("i line");
        tracing::warn!("w line");
        tracing::error!("e line");
        tracing::error!(severity = "fatal", "f line");
        tracing::error!(severity = "panic", "p line");
    });

    let content = fs::read_to_string(today_file(&log_dir, "svc")).unwrap();
    let line_of = |message: &str| {
        content
            .lines()
            .find(|l| l.contains(message))
            .unwrap_or_else(|| panic!("missing {:?} in {}", message, content))
    };

    assert!(line_of("d line").contains("DEBUG"));
    assert!(line_of("i line").contains("INFO"));
    assert!(line_of("w line").contains("WARN"));
    assert!(line_of("e line").contains("ERROR"));
    assert!(line_of("f line").contains("severity=\"fatal\""));
    assert!(line_of("p line").contains("severity=\"panic\""));
    assert!(!content.contains('\u{1b}'));
}

#[cfg(unix)]
#[test]
fn test_alias_points_at_dated_file() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    write_config(dir.path(), &log_dir, "info");

    let (control, subscriber) = LogControl::subscriber(false);
    let _handle = init(dir.path(), &control);
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("through the alias");
    });

    let dated = dated_file_name(&log_dir, "svc");
    assert_eq!(fs::read_link(log_dir.join("svc.log")).unwrap(), Path::new(&dated));
    assert!(fs::read_to_string(log_dir.join("svc.log"))
        .unwrap()
        .contains("through the alias"));

    // svc-YYYY-MM-DD.log
    assert_eq!(dated.len(), "svc-".len() + 10 + ".log".len());
}

#[test]
fn test_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let (control, _subscriber) = LogControl::subscriber(false);
    let result = LogInitializer::new(ConfigLoader::in_dir(dir.path()), control)
        .watch(false)
        .init();

    match result {
        Err(Error::ConfigNotFound(path)) => assert!(path.ends_with("conf/log.yml")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("init succeeded without a config file"),
    }
}

#[test]
fn test_threshold_follows_config() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    write_config(dir.path(), &log_dir, "warn");

    let (control, subscriber) = LogControl::subscriber(false);
    let _handle = init(dir.path(), &control);
    assert_eq!(control.level().unwrap(), LevelFilter::WARN);

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("below threshold");
        tracing::error!("above threshold");
    });

    let content = fs::read_to_string(today_file(&log_dir, "svc")).unwrap();
    assert!(!content.contains("below threshold"));
    assert!(content.contains("above threshold"));
}

#[test]
fn test_repeated_init_delivers_once() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    write_config(dir.path(), &log_dir, "info");

    let (control, subscriber) = LogControl::subscriber(false);
    let _first = init(dir.path(), &control);
    let _second = init(dir.path(), &control);

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("counted");
    });

    let content = fs::read_to_string(today_file(&log_dir, "svc")).unwrap();
    assert_eq!(content.matches("counted").count(), 1, "{}", content);
}

#[cfg(target_os = "linux")]
#[test]
fn test_watch_reconfigures_on_change() {
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    let path = write_config(dir.path(), &log_dir, "info");

    let (control, _subscriber) = LogControl::subscriber(false);
    let handle = LogInitializer::new(ConfigLoader::in_dir(dir.path()), control.clone())
        .with_lookup_prefix(SETTINGS_PREFIX)
        .init()
        .unwrap();
    assert!(handle.is_watching());

    fs::write(
        &path,
        format!(
            "logrotate:\n  baseFilename: svc\n  logDir: {}\n  logLevel: error\n",
            log_dir.display()
        ),
    )
    .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline && control.level().unwrap() != LevelFilter::ERROR {
        std::thread::sleep(Duration::from_millis(50));
    }

    assert_eq!(control.level().unwrap(), LevelFilter::ERROR);
    assert_eq!(handle.settings().log_level, "error");
    assert!(control.has_writer());
}
