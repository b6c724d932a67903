//! Log rotation bootstrap

use parking_lot::Mutex;
use rotalog_config::{apply_rotation_defaults, ConfigLoader, ConfigWatcher};
use rotalog_core::constants::{LOOKUP_PREFIX, SETTINGS_PREFIX};
use rotalog_core::{LogRotationSettings, Result};
use rotalog_logs::{LogControl, RotatingFileWriter, RotationConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Builds the rotating file output from the log config and installs it
/// through a [`LogControl`]
pub struct LogInitializer {
    loader: ConfigLoader,
    control: LogControl,
    lookup_prefix: String,
    watch: bool,
}

impl LogInitializer {
    /// Initializer reading settings under [`LOOKUP_PREFIX`] and watching the
    /// config file
    pub fn new(loader: ConfigLoader, control: LogControl) -> Self {
        Self {
            loader,
            control,
            lookup_prefix: LOOKUP_PREFIX.to_string(),
            watch: true,
        }
    }

    /// Initializer for `conf/log.yml` under the working directory
    pub fn from_working_dir(control: LogControl) -> Result<Self> {
        Ok(Self::new(ConfigLoader::from_working_dir()?, control))
    }

    /// Section the five settings are read from
    pub fn with_lookup_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.lookup_prefix = prefix.into();
        self
    }

    /// Whether to reconfigure when the config file changes
    pub fn watch(mut self, enabled: bool) -> Self {
        self.watch = enabled;
        self
    }

    /// Load and resolve the settings without touching the subscriber
    pub fn resolve_settings(&self) -> Result<LogRotationSettings> {
        resolve_settings(&self.loader, &self.lookup_prefix)
    }

    /// Load the config, build the rotating writer and make it the
    /// subscriber's file output.
    ///
    /// Runs again safely: a second run replaces the first one's output.
    pub fn init(self) -> Result<LogHandle> {
        let settings = self.resolve_settings()?;

        let shared = Arc::new(Shared {
            loader: self.loader,
            control: self.control,
            lookup_prefix: self.lookup_prefix,
            current: Mutex::new(settings.clone()),
        });
        shared.apply(&settings)?;

        info!(
            dir = %settings.log_dir.display(),
            base = %settings.base_filename,
            level = %settings.threshold(),
            rotate_days = settings.rotate_days,
            max_remain = settings.max_remain_count,
            "Log rotation configured"
        );

        let watcher = if self.watch {
            let reloader = Arc::clone(&shared);
            match shared.loader.watch(move |changed: &Path| {
                if let Err(e) = reloader.reload() {
                    error!(
                        "Failed to reload {}: {}. Keeping current configuration.",
                        changed.display(),
                        e
                    );
                }
            }) {
                Ok(watcher) => {
                    debug!("Reloading on changes to {}", watcher.path().display());
                    Some(watcher)
                }
                Err(e) => {
                    warn!("Failed to watch {}: {}", shared.loader.path().display(), e);
                    None
                }
            }
        } else {
            None
        };

        Ok(LogHandle { shared, watcher })
    }
}

/// Handle to configured logging.
///
/// Dropping it stops watching the config file; the file output stays set.
pub struct LogHandle {
    shared: Arc<Shared>,
    watcher: Option<ConfigWatcher>,
}

impl LogHandle {
    pub fn control(&self) -> &LogControl {
        &self.shared.control
    }

    /// Settings currently applied
    pub fn settings(&self) -> LogRotationSettings {
        self.shared.current.lock().clone()
    }

    pub fn config_path(&self) -> &Path {
        self.shared.loader.path()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.as_ref().is_some_and(ConfigWatcher::is_active)
    }

    pub fn stop_watching(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    /// Re-read the config and rebuild the file output if the settings
    /// changed. Returns whether anything was reapplied.
    pub fn reload(&self) -> Result<bool> {
        self.shared.reload()
    }
}

struct Shared {
    loader: ConfigLoader,
    control: LogControl,
    lookup_prefix: String,
    current: Mutex<LogRotationSettings>,
}

impl Shared {
    fn apply(&self, settings: &LogRotationSettings) -> Result<()> {
        let writer = RotatingFileWriter::new(RotationConfig::from_settings(settings))
            .map_err(|e| {
                error!("config local file system for logger error: {}", e);
                e
            })?;

        self.control.set_level(settings.threshold())?;

        if self.control.set_writer(writer)? {
            debug!("Replaced previous log file output");
        }

        Ok(())
    }

    fn reload(&self) -> Result<bool> {
        let settings = resolve_settings(&self.loader, &self.lookup_prefix)?;

        let mut current = self.current.lock();
        if *current == settings {
            debug!("Log settings unchanged");
            return Ok(false);
        }

        self.apply(&settings)?;
        info!(
            dir = %settings.log_dir.display(),
            base = %settings.base_filename,
            level = %settings.threshold(),
            "Log rotation reconfigured"
        );
        *current = settings;
        Ok(true)
    }
}

/// Load the config and read the rotation settings under `lookup_prefix`,
/// defaults filling the gaps
pub fn resolve_settings(loader: &ConfigLoader, lookup_prefix: &str) -> Result<LogRotationSettings> {
    let mut view = loader.load()?;
    apply_rotation_defaults(&mut view);

    if !lookup_prefix.eq_ignore_ascii_case(SETTINGS_PREFIX)
        && view.in_file(SETTINGS_PREFIX)
        && !view.in_file(lookup_prefix)
    {
        warn!(
            "Settings under `{}` in {} are ignored; values are read from `{}`",
            SETTINGS_PREFIX,
            view.path().display(),
            lookup_prefix
        );
    }

    Ok(view.rotation_settings(lookup_prefix))
}
