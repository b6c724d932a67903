//! rotalog - Rotating file logging bootstrap
//!
//! Reads `conf/log.yml`, builds a date-rotated file writer and makes it the
//! file output of the global `tracing` subscriber.
//!
//! ```no_run
//! let _log = rotalog::init_or_exit();
//! tracing::info!("service started");
//! ```

mod initializer;
mod subscriber;

pub use initializer::{resolve_settings, LogHandle, LogInitializer};
pub use subscriber::install_global_subscriber;

pub use rotalog_config::{ConfigLoader, ConfigWatcher, SettingsView};
pub use rotalog_core::{constants, Error, LogRotationSettings, Result, Severity};
pub use rotalog_logs::{LogControl, RotatingFileWriter, RotationConfig};

/// Configure logging from `conf/log.yml` under the working directory.
///
/// Installs the global subscriber with stderr output (once per process),
/// sets its rotating file output and watches the config file. Keep the
/// returned handle alive to keep watching.
pub fn init() -> Result<LogHandle> {
    let control = install_global_subscriber(true)?;
    LogInitializer::from_working_dir(control)?.init()
}

/// [`init`], terminating the process if logging cannot be configured
pub fn init_or_exit() -> LogHandle {
    match init() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(severity = "fatal", "init log error: {}", e);
            std::process::exit(1);
        }
    }
}
