//! File watching for live preview.
//!
//! Watches the directory holding the source file (editors often save by
//! rename, which a watch on the file itself would miss) and reports a
//! change once events have been quiet for the debounce window.
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounced change notifications for one file.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    target: PathBuf,
    debounce: Duration,
    last_event: Option<Instant>,
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the parent
    /// directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths arrive canonical, so compare against the canonical form.
        let path = path.as_ref();
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let root = watch_root_for(&target);

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        tracing::debug!(target = %target.display(), root = %root.display(), "watching file");

        Ok(Self {
            _watcher: watcher,
            events,
            target,
            debounce,
            last_event: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Drain pending events; true once a change has settled.
    pub fn take_change_ready(&mut self) -> bool {
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(event) if self.is_relevant(&event) => {
                    self.last_event = Some(Instant::now());
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "watch error");
                    crate::perf::log_event("watcher.error", err.to_string());
                }
            }
        }

        match self.last_event {
            Some(at) if at.elapsed() >= self.debounce => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let name = self.target.file_name();
        event
            .paths
            .iter()
            .any(|path| path == &self.target || (name.is_some() && path.file_name() == name))
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
