//! Configuration file watcher for hot reload.
//!
//! # Design Decisions
//! - The parent directory is watched, so editors that save by replacing the
//!   file are still seen
//! - A single save emits several notify events; reload once they go quiet
//! - Command-line overrides are re-applied on every reload
//! - Listener and observability settings are read once at startup; edits to
//!   them are reported, not applied

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::config::loader::load_config_with;
use crate::config::overrides::ConfigOverrides;
use crate::config::schema::ForwarderConfig;

/// Quiet period after the last file event before the file is reloaded.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the config file and sends every valid, changed config.
pub struct ConfigWatcher {
    path: PathBuf,
    overrides: ConfigOverrides,
    current: ForwarderConfig,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<ForwarderConfig>,
}

impl ConfigWatcher {
    /// `current` is the config the server is running with. It already has
    /// `overrides` applied.
    pub fn new(
        path: &Path,
        overrides: ConfigOverrides,
        current: ForwarderConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ForwarderConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                overrides,
                current,
                debounce: RELOAD_DEBOUNCE,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching.
    ///
    /// Reloading stops when `shutdown` fires or the returned watcher is
    /// dropped, so the caller must keep it alive.
    pub fn run(
        self,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let file_name: Option<OsString> = self.path.file_name().map(OsString::from);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let changed = event.kind.is_modify() || event.kind.is_create();
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == file_name.as_deref());
                    if changed && ours {
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(watch_dir(&self.path), RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, "Config watcher started");

        tokio::spawn(self.reload_loop(event_rx, shutdown));
        Ok(watcher)
    }

    async fn reload_loop(
        mut self,
        mut events: mpsc::UnboundedReceiver<()>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                event = events.recv() => {
                    if event.is_none() {
                        break;
                    }
                    while let Ok(Some(())) =
                        tokio::time::timeout(self.debounce, events.recv()).await
                    {}

                    if let Some(config) = self.reload() {
                        if self.update_tx.send(config).is_err() {
                            break;
                        }
                    }
                }
            }
        }
        tracing::debug!(path = ?self.path, "Config watcher stopped");
    }

    /// Read the file again. `None` if it is invalid or unchanged.
    fn reload(&mut self) -> Option<ForwarderConfig> {
        let config = match load_config_with(&self.path, &self.overrides) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Failed to reload config, keeping current configuration"
                );
                return None;
            }
        };

        if config == self.current {
            tracing::debug!(path = ?self.path, "Config file unchanged");
            return None;
        }
        if config.listener != self.current.listener {
            tracing::warn!(
                bind_address = %config.listener.bind_address,
                "Listener changes take effect on restart"
            );
        }
        if config.observability != self.current.observability {
            tracing::warn!("Observability changes take effect on restart");
        }

        tracing::info!(path = ?self.path, "Config file reloaded");
        self.current = config.clone();
        Some(config)
    }
}

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
