//! Log writer with date-based rotation

use chrono::NaiveDate;
use parking_lot::Mutex;
use rotalog_core::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::fmt::MakeWriter;

use crate::rotation::{Clock, RotationConfig, SystemClock};

/// Writes log lines to `<dir>/<base>-<date>.log`, switching files when the
/// rotation period changes. `<dir>/<base>.log` always points at the current
/// file and only the newest `max_files` dated files are kept.
///
/// Each write is one formatted line: it is appended and flushed under the
/// writer's lock, so lines from concurrent threads never interleave. Must
/// not be written to from inside its own `tracing` events.
pub struct RotatingFileWriter {
    config: RotationConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<WriterState>,
}

struct WriterState {
    period: NaiveDate,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RotatingFileWriter {
    /// Create a new rotating writer on the local clock
    pub fn new(config: RotationConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RotationConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.base_filename.is_empty() {
            return Err(Error::writer("base file name is empty"));
        }

        fs::create_dir_all(&config.dir).map_err(|e| {
            Error::writer(format!(
                "failed to create log directory {}: {}",
                config.dir.display(),
                e
            ))
        })?;

        let period = config.period_start(clock.today());
        let state = open_period(&config, period).map_err(|e| {
            Error::writer(format!(
                "failed to open {}: {}",
                config.file_path(period).display(),
                e
            ))
        })?;

        if let Err(e) = update_link(&config.link_path(), &state.path) {
            warn!(
                "Failed to link {} to {}: {}",
                config.link_path().display(),
                state.path.display(),
                e
            );
        }

        match purge(&config, &state.path) {
            Ok(removed) if !removed.is_empty() => {
                debug!("Removed {} old log file(s)", removed.len());
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to purge old log files: {}", e),
        }

        debug!("Writing logs to {}", state.path.display());

        Ok(Self {
            config,
            clock,
            state: Mutex::new(state),
        })
    }

    /// Rotation configuration
    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }

    /// Switch files if the rotation period changed since the last write
    fn rotate_if_needed(&self, state: &mut WriterState) -> io::Result<()> {
        let period = self.config.period_start(self.clock.today());
        if period == state.period {
            return Ok(());
        }

        state.writer.flush()?;
        *state = open_period(&self.config, period)?;

        // Link and purge failures must not lose the line being written
        let _ = update_link(&self.config.link_path(), &state.path);
        let _ = purge(&self.config, &state.path);

        Ok(())
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        self.rotate_if_needed(&mut state)?;
        state.writer.write_all(buf)?;
        state.writer.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state.lock().writer.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = &'a RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        let _ = self.state.get_mut().writer.flush();
    }
}

fn open_period(config: &RotationConfig, period: NaiveDate) -> io::Result<WriterState> {
    let path = config.file_path(period);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Ok(WriterState {
        period,
        path,
        writer: BufWriter::new(file),
    })
}

/// Point the alias at `target` by swapping in a fresh link
fn update_link(link: &Path, target: &Path) -> io::Result<()> {
    let target_name = target
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"))?;
    let link_name = link
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "link has no file name"))?;

    let mut tmp_name = link_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = link.with_file_name(tmp_name);

    if fs::symlink_metadata(&tmp).is_ok() {
        fs::remove_file(&tmp)?;
    }

    symlink(Path::new(target_name), &tmp)?;
    fs::rename(&tmp, link)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "symlinks are not supported"))
}

/// Delete the oldest dated files beyond `max_files`, never touching `current`
fn purge(config: &RotationConfig, current: &Path) -> io::Result<Vec<PathBuf>> {
    if config.max_files == 0 {
        return Ok(Vec::new());
    }

    let Some(dir) = current.parent() else {
        return Ok(Vec::new());
    };
    let stem = Path::new(&config.base_filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pattern = glob::Pattern::new(&format!(
        "{}-[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9].log",
        glob::Pattern::escape(&stem)
    ))
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| pattern.matches(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .filter(|path| path.file_name() != current.file_name())
        .collect();

    // Dates sort lexicographically
    candidates.sort();

    // The current file counts towards the limit
    let keep = config.max_files.saturating_sub(1);
    let excess = candidates.len().saturating_sub(keep);

    let mut removed = Vec::with_capacity(excess);
    for path in candidates.into_iter().take(excess) {
        fs::remove_file(&path)?;
        removed.push(path);
    }

    Ok(removed)
}
