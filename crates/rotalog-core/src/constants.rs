//! Constants and default values for rotalog

use std::path::{Path, PathBuf};

/// Directory holding the config file, relative to the working directory
pub const CONFIG_DIR: &str = "conf";

/// Config file name
pub const CONFIG_FILE: &str = "log.yml";

/// Section the defaults are registered under
pub const SETTINGS_PREFIX: &str = "logrotate";

/// Section the settings are looked up under by default.
///
/// Deployed configs have always been read through this key, so every value
/// in a `logrotate` section falls back to its default. Pass
/// [`SETTINGS_PREFIX`] explicitly to honour the file.
pub const LOOKUP_PREFIX: &str = "lograotate";

/// Setting keys, relative to the section prefix
pub const KEY_BASE_FILENAME: &str = "baseFilename";
pub const KEY_LOG_DIR: &str = "logDir";
pub const KEY_LOG_LEVEL: &str = "logLevel";
pub const KEY_MAX_REMAIN_COUNT: &str = "maxRemainCnt";
pub const KEY_ROTATE_DAYS: &str = "rotateDays";

/// Default base file name
pub const DEFAULT_BASE_FILENAME: &str = "app";

/// Default log directory
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default number of rotated files to keep
pub const DEFAULT_MAX_REMAIN_COUNT: u32 = 30;

/// Default rotation period in days
pub const DEFAULT_ROTATE_DAYS: u32 = 1;

/// Default debounce time for config change events in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Join a section prefix and a key into a dotted settings key
pub fn settings_key(prefix: &str, key: &str) -> String {
    format!("{}.{}", prefix, key)
}

/// Get the config file path below a base directory
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR).join(CONFIG_FILE)
}
