//! Error types for rotalog

use std::path::PathBuf;

/// rotalog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Failed to create log writer: {0}")]
    WriterInit(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInstall(String),

    #[error("Failed to reload log layer: {0}")]
    Reload(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for rotalog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn writer<S: Into<String>>(msg: S) -> Self {
        Error::WriterInit(msg.into())
    }

    pub fn watch<S: Into<String>>(msg: S) -> Self {
        Error::Watch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConfigNotFound(PathBuf::from("/srv/conf/log.yml"));
        assert_eq!(err.to_string(), "Config file not found: /srv/conf/log.yml");

        let err = Error::writer("permission denied");
        assert_eq!(err.to_string(), "Failed to create log writer: permission denied");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err = Error::ConfigParse {
            path: PathBuf::from("conf/log.yml"),
            source: yaml_err,
        };
        assert!(err.to_string().starts_with("Failed to parse config file conf/log.yml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
