//! File watching for stylesheet hot-reload.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use crate::resolve::Style;
use crate::{Error, Result};

/// Event indicating a stylesheet file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetChangeEvent {
    /// Path to the changed file.
    pub path: PathBuf,
    /// Type of change.
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was written.
    Modified,
    /// File no longer exists.
    Removed,
}

/// Watches stylesheet files for changes.
///
/// # Example
///
/// ```ignore
/// let mut watcher = StylesheetWatcher::new()?;
/// watcher.watch("themes/app.css")?;
///
/// // In the main loop:
/// let changes = watcher.poll();
/// watcher.apply_changes(context.style_mut(), &changes)?;
/// ```
pub struct StylesheetWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<std::result::Result<Vec<DebouncedEvent>, notify::Error>>,
    watched_paths: HashSet<PathBuf>,
}

impl StylesheetWatcher {
    /// Create a watcher that debounces events over 100ms.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(Duration::from_millis(100), tx)
            .map_err(|e| Error::HotReload(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_paths: HashSet::new(),
        })
    }

    /// Start watching a stylesheet file.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_paths.contains(&path) {
            self.debouncer
                .watcher()
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|e| Error::HotReload(e.to_string()))?;

            tracing::info!("Watching stylesheet: {}", path.display());
            self.watched_paths.insert(path);
        }

        Ok(())
    }

    /// Watch every file a style has loaded.
    pub fn watch_style(&mut self, style: &Style) -> Result<()> {
        let paths: Vec<PathBuf> = style.filenames().map(Path::to_path_buf).collect();
        for path in paths {
            self.watch(path)?;
        }
        Ok(())
    }

    /// Stop watching a stylesheet file.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let Ok(path) = path.as_ref().canonicalize() else {
            // Already gone; the watch went with it.
            return Ok(());
        };

        if self.watched_paths.remove(&path) {
            if let Err(e) = self.debouncer.watcher().unwatch(&path) {
                tracing::debug!("Unwatching {}: {}", path.display(), e);
            }
            tracing::info!("Stopped watching stylesheet: {}", path.display());
        }

        Ok(())
    }

    /// Drain pending change events for watched files.
    ///
    /// Each path is reported at most once per call.
    pub fn poll(&mut self) -> Vec<StylesheetChangeEvent> {
        let mut changes = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any
                            || !self.watched_paths.contains(&event.path)
                        {
                            continue;
                        }

                        let kind = if event.path.exists() {
                            ChangeKind::Modified
                        } else {
                            ChangeKind::Removed
                        };
                        changes.push(StylesheetChangeEvent {
                            path: event.path,
                            kind,
                        });
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!("File watcher error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("File watcher disconnected");
                    break;
                }
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);

        changes
    }

    /// Reload `style` if any of `changes` happened.
    ///
    /// Every loaded stylesheet is re-read, so the new rules keep their load
    /// order. A removed file drops out of the style and its read failure is
    /// returned.
    pub fn apply_changes(&self, style: &mut Style, changes: &[StylesheetChangeEvent]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        for change in changes {
            match change.kind {
                ChangeKind::Modified => {
                    tracing::info!("Stylesheet changed: {}", change.path.display());
                }
                ChangeKind::Removed => {
                    tracing::warn!("Stylesheet removed: {}", change.path.display());
                }
            }
        }

        let result = style.reload();
        tracing::info!(
            "Reloaded {} stylesheet(s), {} selectors",
            style.filenames().count(),
            style.stylesheet().len()
        );
        result
    }

    /// Get the number of watched files.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// Get the watched paths.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        self.watched_paths.iter().map(|p| p.as_path())
    }
}
