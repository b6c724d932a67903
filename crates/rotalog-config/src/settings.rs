//! Settings view over a loaded YAML config
//!
//! Keys are dotted paths (`logrotate.logDir`) matched case-insensitively
//! against nested mappings. Values missing from the file fall back to
//! registered defaults.

use rotalog_core::constants::*;
use rotalog_core::{Error, LogRotationSettings, Result};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory view of a loaded config file
#[derive(Debug, Clone)]
pub struct SettingsView {
    path: PathBuf,
    root: Mapping,
    defaults: HashMap<String, Value>,
}

impl SettingsView {
    /// Parse YAML content loaded from `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        let root = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::config(format!(
                    "Expected a mapping at the top of {}",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
            defaults: HashMap::new(),
        })
    }

    /// File this view was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a fallback value for a key
    pub fn set_default<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.defaults.insert(key.to_lowercase(), value.into());
    }

    /// Whether the key is present in the file or has a default
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether the key is present in the file itself
    pub fn in_file(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Raw value for a key, file first, then defaults
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.lookup(key)
            .or_else(|| self.defaults.get(&key.to_lowercase()))
    }

    /// String value for a key; scalars are stringified, anything else is empty
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Unsigned value for a key; negative, invalid or missing values are 0
    pub fn get_uint(&self, key: &str) -> u64 {
        match self.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_u64() {
                    v
                } else if let Some(v) = n.as_f64() {
                    if v.is_finite() && v > 0.0 {
                        v as u64
                    } else {
                        0
                    }
                } else {
                    0
                }
            }
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(Value::Bool(b)) => u64::from(*b),
            _ => 0,
        }
    }

    /// Read the five rotation settings under `prefix`
    pub fn rotation_settings(&self, prefix: &str) -> LogRotationSettings {
        LogRotationSettings::from_raw(
            self.get_string(&settings_key(prefix, KEY_BASE_FILENAME)),
            self.get_string(&settings_key(prefix, KEY_LOG_DIR)),
            self.get_string(&settings_key(prefix, KEY_LOG_LEVEL)),
            self.get_uint(&settings_key(prefix, KEY_ROTATE_DAYS)),
            self.get_uint(&settings_key(prefix, KEY_MAX_REMAIN_COUNT)),
        )
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut current = &self.root;
        let mut parts = key.split('.').peekable();

        while let Some(part) = parts.next() {
            let value = find_key(current, part)?;
            if parts.peek().is_none() {
                return match value {
                    Value::Null => None,
                    v => Some(v),
                };
            }
            current = value.as_mapping()?;
        }

        None
    }
}

/// Register the rotation defaults under the `logrotate` section
pub fn apply_rotation_defaults(view: &mut SettingsView) {
    view.set_default(&settings_key(SETTINGS_PREFIX, KEY_BASE_FILENAME), DEFAULT_BASE_FILENAME);
    view.set_default(&settings_key(SETTINGS_PREFIX, KEY_LOG_DIR), DEFAULT_LOG_DIR);
    view.set_default(&settings_key(SETTINGS_PREFIX, KEY_LOG_LEVEL), DEFAULT_LOG_LEVEL);
    view.set_default(
        &settings_key(SETTINGS_PREFIX, KEY_MAX_REMAIN_COUNT),
        DEFAULT_MAX_REMAIN_COUNT,
    );
    view.set_default(&settings_key(SETTINGS_PREFIX, KEY_ROTATE_DAYS), DEFAULT_ROTATE_DAYS);
}

fn find_key<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter().find_map(|(k, v)| {
        let matches = match k {
            Value::String(s) => s.eq_ignore_ascii_case(key),
            Value::Number(n) => n.to_string() == key,
            Value::Bool(b) => b.to_string() == key,
            _ => false,
        };
        matches.then_some(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(content: &str) -> SettingsView {
        SettingsView::parse(Path::new("conf/log.yml"), content).unwrap()
    }

    #[test]
    fn test_nested_lookup() {
        let view = view(
            r#"
logrotate:
  baseFilename: svc
  logDir: /var/log/svc
  maxRemainCnt: 7
"#,
        );

        assert_eq!(view.get_string("logrotate.baseFilename"), "svc");
        assert_eq!(view.get_string("logrotate.logDir"), "/var/log/svc");
        assert_eq!(view.get_uint("logrotate.maxRemainCnt"), 7);
        assert!(view.in_file("logrotate"));
        assert!(!view.in_file("logrotate.rotateDays"));
    }

    #[test]
    fn test_case_insensitive_keys() {
        let view = view("LogRotate:\n  BASEFILENAME: svc\n");
        assert_eq!(view.get_string("logrotate.baseFilename"), "svc");
    }

    #[test]
    fn test_missing_keys_are_zero_values() {
        let view = view("logrotate:\n  logDir: logs\n");
        assert_eq!(view.get_string("lograotate.logDir"), "");
        assert_eq!(view.get_uint("lograotate.rotateDays"), 0);
        assert!(!view.is_set("lograotate.logDir"));
    }

    #[test]
    fn test_defaults_only_fill_gaps() {
        let mut view = view("logrotate:\n  logLevel: debug\n");
        apply_rotation_defaults(&mut view);

        assert_eq!(view.get_string("logrotate.logLevel"), "debug");
        assert_eq!(view.get_string("logrotate.baseFilename"), "app");
        assert_eq!(view.get_uint("logrotate.maxRemainCnt"), 30);
        assert!(view.is_set("logrotate.rotateDays"));
        assert!(!view.in_file("logrotate.rotateDays"));
    }

    #[test]
    fn test_null_value_falls_back_to_default() {
        let mut view = view("logrotate:\n  logDir:\n");
        apply_rotation_defaults(&mut view);
        assert_eq!(view.get_string("logrotate.logDir"), "logs");
    }

    #[test]
    fn test_scalar_coercion() {
        let view = view(
            r#"
a:
  num: 12
  text: "5"
  neg: -3
  float: 2.9
  flag: true
  junk: abc
"#,
        );

        assert_eq!(view.get_string("a.num"), "12");
        assert_eq!(view.get_string("a.flag"), "true");
        assert_eq!(view.get_uint("a.text"), 5);
        assert_eq!(view.get_uint("a.neg"), 0);
        assert_eq!(view.get_uint("a.float"), 2);
        assert_eq!(view.get_uint("a.flag"), 1);
        assert_eq!(view.get_uint("a.junk"), 0);
        assert_eq!(view.get_string("a"), "");
    }

    #[test]
    fn test_empty_document() {
        let view = view("");
        assert!(!view.is_set("logrotate"));
    }

    #[test]
    fn test_non_mapping_document() {
        let err = SettingsView::parse(Path::new("conf/log.yml"), "- a\n- b\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SettingsView::parse(Path::new("conf/log.yml"), "logrotate: [\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_rotation_settings_under_prefix() {
        let mut view = view(
            r#"
logrotate:
  baseFilename: svc
  logDir: /var/log/svc
  logLevel: warn
  maxRemainCnt: 3
  rotateDays: 2
"#,
        );
        apply_rotation_defaults(&mut view);

        let settings = view.rotation_settings(SETTINGS_PREFIX);
        assert_eq!(settings.base_filename, "svc");
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/svc"));
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.max_remain_count, 3);
        assert_eq!(settings.rotate_days, 2);

        // The historical lookup key never matches the file
        let settings = view.rotation_settings(LOOKUP_PREFIX);
        assert_eq!(settings, LogRotationSettings::default());
    }
}
