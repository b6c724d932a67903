//! Reloadable `tracing` layers for the rotation output and the threshold
//!
//! The subscriber is a registry with three layers: a [`LevelFilter`] that can
//! be swapped at runtime, a plain-text `fmt` layer writing to a
//! [`RotatingFileWriter`] (empty until one is set), and an optional stderr
//! layer. Fatal and panic have no `tracing` level; they are logged as error
//! events with a `severity` field:
//!
//! ```ignore
//! tracing::error!(severity = "fatal", "cannot continue");
//! ```

use rotalog_core::{Error, Result, Severity};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::writer::{MakeWriterExt, WithMaxLevel};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{fmt, reload, Registry};

use crate::writer::RotatingFileWriter;

type ThresholdLayer = reload::Layer<LevelFilter, Registry>;
type Thresholded = Layered<ThresholdLayer, Registry>;

/// Plain-text layer writing debug and above to a rotating file
pub type FileLayer =
    fmt::Layer<Thresholded, DefaultFields, Format, WithMaxLevel<RotatingFileWriter>>;

/// Handles to the threshold and the rotation output of a subscriber built by
/// [`LogControl::subscriber`].
///
/// Clones share the same subscriber. Once the subscriber is dropped every
/// operation fails with [`Error::Reload`].
#[derive(Clone)]
pub struct LogControl {
    threshold: reload::Handle<LevelFilter, Registry>,
    file: reload::Handle<Option<FileLayer>, Thresholded>,
}

impl LogControl {
    /// Build a subscriber at the info threshold with no rotation output.
    /// `console` adds a stderr layer, colored when stderr is a terminal.
    pub fn subscriber(console: bool) -> (Self, impl Subscriber + Send + Sync + 'static) {
        let (threshold, threshold_handle) = reload::Layer::new(Severity::Info.level_filter());
        let (file, file_handle) = reload::Layer::new(None::<FileLayer>);

        let console = console.then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
        });

        let subscriber = tracing_subscriber::registry()
            .with(threshold)
            .with(file)
            .with(console);

        let control = Self {
            threshold: threshold_handle,
            file: file_handle,
        };
        (control, subscriber)
    }

    /// Current threshold
    pub fn level(&self) -> Result<LevelFilter> {
        self.threshold.with_current(|filter| *filter).map_err(reload_error)
    }

    pub fn set_level(&self, severity: Severity) -> Result<()> {
        let filter = severity.level_filter();
        self.threshold
            .modify(|current| *current = filter)
            .map_err(reload_error)
    }

    /// Send events to `writer` instead of the current rotation output.
    /// Returns whether an output was replaced.
    pub fn set_writer(&self, writer: RotatingFileWriter) -> Result<bool> {
        let layer = file_layer(writer);
        let mut replaced = false;
        self.file
            .modify(|slot| replaced = slot.replace(layer).is_some())
            .map_err(reload_error)?;
        Ok(replaced)
    }

    /// Whether a rotation output is set
    pub fn has_writer(&self) -> bool {
        self.file.with_current(Option::is_some).unwrap_or(false)
    }
}

impl std::fmt::Debug for LogControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogControl")
            .field("level", &self.level().ok())
            .field("has_writer", &self.has_writer())
            .finish()
    }
}

fn file_layer(writer: RotatingFileWriter) -> FileLayer {
    fmt::layer()
        .with_writer(writer.with_max_level(Level::DEBUG))
        .with_ansi(false)
}

fn reload_error(e: reload::Error) -> Error {
    Error::Reload(e.to_string())
}
