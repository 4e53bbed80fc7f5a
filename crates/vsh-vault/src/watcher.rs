//! File system watcher driving the refresh loop.
//!
//! Uses the `notify` crate for cross-platform file system events. The
//! watch loop only needs to know "something in the vault changed", so
//! events are collapsed to a unit signal; hidden entries are filtered out
//! so writes to `.vsh/` (the settings, or an index kept there) do not
//! retrigger the very refresh that produced them.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use vsh_core::{Result, VshError};

/// Watches a vault directory and reports change signals.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<()>,
}

impl VaultWatcher {
    /// Start watching a vault directory.
    pub fn start(vault_root: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let root = vault_root.to_path_buf();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| {
                let Ok(event) = res else { return };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let relevant = event.paths.iter().any(|path| {
                    path.strip_prefix(&root)
                        .map(|rel| {
                            !rel.components()
                                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        })
                        .unwrap_or(false)
                });
                if relevant {
                    let _ = tx.send(());
                }
            },
        )
        .map_err(|e| VshError::Io(std::io::Error::other(e)))?;

        watcher
            .watch(vault_root, RecursiveMode::Recursive)
            .map_err(|e| VshError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait up to `timeout` for a change signal. Drains any queued signals
    /// before returning so one burst of edits reads as one change.
    pub fn changed_within(&self, timeout: Duration) -> bool {
        let changed = self.receiver.recv_timeout(timeout).is_ok();
        while self.receiver.try_recv().is_ok() {}
        changed
    }
}
