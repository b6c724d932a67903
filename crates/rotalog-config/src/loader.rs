//! Config file loading

use rotalog_core::constants::{self, DEFAULT_DEBOUNCE_MS};
use rotalog_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::settings::SettingsView;
use crate::watcher::ConfigWatcher;

/// Loads the log config file and watches it for changes
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `<dir>/conf/log.yml`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(constants::config_path_in(dir))
    }

    /// Loader for `conf/log.yml` under the current working directory
    pub fn from_working_dir() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::in_dir(&cwd))
    }

    /// Config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the config file
    pub fn load(&self) -> Result<SettingsView> {
        if !self.path.exists() {
            return Err(Error::ConfigNotFound(self.path.clone()));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let view = SettingsView::parse(&self.path, &content)?;

        debug!("Loaded log config from {}", self.path.display());
        Ok(view)
    }

    /// Watch the config file, calling `handler` with the changed path after
    /// each burst of changes
    pub fn watch<F>(&self, handler: F) -> Result<ConfigWatcher>
    where
        F: FnMut(&Path) + Send + 'static,
    {
        ConfigWatcher::start(
            self.path.clone(),
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            handler,
        )
    }
}
