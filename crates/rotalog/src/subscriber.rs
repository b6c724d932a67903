//! Global `tracing` subscriber installation

use once_cell::sync::OnceCell;
use rotalog_core::{Error, Result};
use rotalog_logs::LogControl;
use tracing_subscriber::util::SubscriberInitExt;

static INSTALLED: OnceCell<(bool, LogControl)> = OnceCell::new();

/// Install the process-wide subscriber and return its control handle.
///
/// `console` echoes log lines to stderr. Only the first call installs
/// anything; later calls return the same handle, and fail if they ask for a
/// different `console` setting than the installed one. Also fails if another
/// global subscriber was set elsewhere.
pub fn install_global_subscriber(console: bool) -> Result<LogControl> {
    let (installed_console, control) = INSTALLED.get_or_try_init(|| {
        let (control, subscriber) = LogControl::subscriber(console);
        subscriber
            .try_init()
            .map_err(|e| Error::SubscriberInstall(e.to_string()))?;
        Ok::<_, Error>((console, control))
    })?;

    if *installed_console != console {
        return Err(Error::SubscriberInstall(format!(
            "already installed with console output {}",
            if *installed_console { "on" } else { "off" }
        )));
    }

    Ok(control.clone())
}
