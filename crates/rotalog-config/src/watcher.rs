//! Config file watcher using notify

use crossbeam_channel::{Receiver, RecvTimeoutError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use rotalog_core::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn, Dispatch};

use crate::debounce::Debouncer;

/// Watches a single config file and calls a handler after each burst of
/// changes.
///
/// The parent directory is watched rather than the file, so replacing the
/// file by rename (as most editors do) is still seen. The handler runs on a
/// dedicated thread that logs through the subscriber current when the watch
/// was started. Dropping the watcher detaches the watch and lets that thread
/// finish.
pub struct ConfigWatcher {
    watcher: Option<RecommendedWatcher>,
    path: PathBuf,
    thread: Option<JoinHandle<()>>,
}

impl ConfigWatcher {
    /// Start watching `path`
    pub fn start<F>(path: PathBuf, debounce: Duration, handler: F) -> Result<Self>
    where
        F: FnMut(&Path) + Send + 'static,
    {
        let path = path.canonicalize().unwrap_or(path);

        let file_name = path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| Error::watch(format!("Not a file path: {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = crossbeam_channel::unbounded();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Err(e) = tx.send(res) {
                warn!("Failed to send watch event: {}", e);
            }
        })
        .map_err(|e| Error::watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::watch(format!("Failed to watch {}: {}", dir.display(), e)))?;

        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
        let thread = thread::Builder::new()
            .name("rotalog-config-watch".to_string())
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    dispatch_loop(rx, file_name, Debouncer::new(debounce), handler)
                })
            })?;

        info!("Watching config file: {}", path.display());

        Ok(Self {
            watcher: Some(watcher),
            path,
            thread: Some(thread),
        })
    }

    /// Watched config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the watch is still attached
    pub fn is_active(&self) -> bool {
        self.watcher.is_some()
    }

    /// Detach the watch and wait for the dispatch thread to finish
    pub fn stop(&mut self) {
        // Dropping the notify watcher drops the channel sender
        self.watcher.take();

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Config watch thread panicked");
            }
        }
    }
}

fn dispatch_loop<F>(
    rx: Receiver<notify::Result<Event>>,
    file_name: OsString,
    mut debouncer: Debouncer,
    mut handler: F,
) where
    F: FnMut(&Path),
{
    loop {
        let received = match debouncer.time_until_ready() {
            Some(wait) => rx.recv_timeout(wait),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Ok(event)) => {
                let paths = config_paths(event, &file_name);
                if !paths.is_empty() {
                    debug!("Config watch event on {:?}", paths);
                    debouncer.record(&paths);
                }
            }
            Ok(Err(e)) => warn!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for changed in debouncer.take_ready() {
            info!("config file: {} has been changed", changed.display());
            handler(&changed);
        }
    }

    debug!("Config watcher stopped");
}

/// Paths of an event that name the config file, if the event can change
/// its content
fn config_paths(event: Event, file_name: &OsStr) -> Vec<PathBuf> {
    if !matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_)
    ) {
        return Vec::new();
    }

    event
        .paths
        .into_iter()
        .filter(|p| p.file_name() == Some(file_name))
        .collect()
}
