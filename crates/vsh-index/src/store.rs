//! The File Index Store: load, reconcile, persist.
//!
//! `refresh` rebuilds the whole index from scratch every cycle: baseline
//! from disk, one entry per live file (stored dates win over later live
//! observations, protection wins unconditionally), plus carried-forward
//! entries for paths that have gone missing. O(live files) per refresh,
//! which is fine at vault scale (tens of thousands of entries).

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use vsh_core::config::DEFAULT_INDEX_PATH;
use vsh_core::{Result, Settings};
use vsh_vault::Vault;

use crate::{codec, Index, IndexEntry};

/// Sink for user-facing notices (manual refresh start/success). The
/// library default is silent; interactive callers print.
pub trait Notifier {
    fn notify(&self, message: &str);
}

struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str) {}
}

static SILENT: Silent = Silent;

/// Owns the in-memory index and its durable CSV mirror inside the vault.
pub struct FileIndexStore<'a, V: Vault> {
    vault: &'a V,
    settings: &'a Settings,
    notifier: &'a dyn Notifier,
    index: Index,
}

impl<'a, V: Vault> FileIndexStore<'a, V> {
    pub fn new(vault: &'a V, settings: &'a Settings) -> Self {
        Self {
            vault,
            settings,
            notifier: &SILENT,
            index: Index::new(),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Read-only view of the in-memory index.
    #[must_use]
    pub fn snapshot(&self) -> &Index {
        &self.index
    }

    /// Load the index from its durable resource, creating the resource
    /// empty if missing. With indexing disabled or no path configured the
    /// in-memory index is simply empty.
    pub fn load(&mut self) -> Result<&Index> {
        let path = &self.settings.index_path;
        if path.is_empty() || !self.settings.index_enabled {
            self.index = Index::new();
            return Ok(&self.index);
        }
        if !self.vault.exists(path) {
            self.vault.write(path, "")?;
        }
        let raw = self.vault.read(path)?;
        self.index = if raw.trim().is_empty() {
            Index::new()
        } else {
            codec::decode(&raw)?
        };
        debug!(entries = self.index.len(), path = %path, "loaded file index");
        Ok(&self.index)
    }

    /// Reconcile the index against the live tree and persist it.
    ///
    /// `one_time_exec` marks a user-triggered run: it bypasses the
    /// enabled-flag guard, falls back to the default index path when none
    /// is configured, and emits start/success notices.
    pub fn refresh(&mut self, one_time_exec: bool) -> Result<()> {
        // Guard: the periodic timer must never write while the feature is
        // off. A user-triggered run is allowed through.
        if !self.settings.index_enabled && !one_time_exec {
            return Ok(());
        }

        let mut index_path = self.settings.index_path.clone();
        if index_path.is_empty() {
            if !one_time_exec {
                warn!("file index path not configured, cannot rebuild the index");
                return Ok(());
            }
            index_path = DEFAULT_INDEX_PATH.to_string();
        }

        if one_time_exec {
            self.notifier.notify("Updating file index");
        }

        let baseline = self.load()?.clone();
        let live_files = self.vault.files()?;
        let now = Local::now().naive_local();

        let mut next = Index::new();
        for file in &live_files {
            next.insert(
                file.path.clone(),
                reconcile_live(baseline.get(&file.path), &file.path, file.created),
            );
        }

        // Paths in the baseline but no longer live: carry the entry
        // forward, stamping the deletion date the first time only.
        let mut missing = 0usize;
        for (path, entry) in &baseline {
            if next.contains_key(path) {
                continue;
            }
            let mut entry = entry.clone();
            if entry.deleted.is_none() {
                entry.deleted = Some(now);
            }
            next.insert(path.clone(), entry);
            missing += 1;
        }

        self.vault.write(&index_path, &codec::encode(&next))?;
        info!(
            live = live_files.len(),
            missing,
            path = %index_path,
            "file index refreshed"
        );

        if one_time_exec {
            self.notifier.notify("Index file updated successfully");
        }

        // Normalize in-memory state to exactly what was serialized.
        self.load()?;
        Ok(())
    }
}

/// One live file against its baseline entry. The stored creation date wins
/// when it is earlier than the live observation, and unconditionally when
/// the entry is protected. A live path never carries a deletion date.
fn reconcile_live(
    baseline: Option<&IndexEntry>,
    path: &str,
    live_created: NaiveDateTime,
) -> IndexEntry {
    let mut created = live_created;
    let mut protected = false;
    if let Some(entry) = baseline {
        protected = entry.protected;
        if entry.protected || entry.created < created {
            created = entry.created;
        }
    }
    IndexEntry {
        path: path.to_string(),
        created,
        protected,
        deleted: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vsh_vault::MemVault;

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn settings() -> Settings {
        Settings {
            index_path: "index.csv".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn load_creates_missing_resource_empty() {
        let vault = MemVault::new();
        let settings = settings();
        let mut store = FileIndexStore::new(&vault, &settings);

        assert!(store.load().unwrap().is_empty());
        assert!(vault.exists("index.csv"));
    }

    #[test]
    fn load_with_indexing_disabled_is_empty() {
        let vault = MemVault::new();
        vault
            .write("index.csv", &format!("{}\n\"a.md\",05/01/24 10:00,FALSE,\n", codec::HEADER))
            .unwrap();
        let mut settings = settings();
        settings.index_enabled = false;

        let mut store = FileIndexStore::new(&vault, &settings);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn refresh_indexes_live_files() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        vault.put_file("Notes/b.md", dt(7, 9));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();

        let index = store.snapshot();
        assert_eq!(index.len(), 2);
        assert_eq!(index["a.md"].created, dt(5, 10));
        assert!(!index["a.md"].protected);
        assert_eq!(index["a.md"].deleted, None);
    }

    #[test]
    fn refresh_is_idempotent_without_tree_changes() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        vault.put_file("b.png", dt(7, 9));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        let first = vault.read("index.csv").unwrap();
        store.refresh(false).unwrap();
        let second = vault.read("index.csv").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn stored_earlier_date_wins_over_live() {
        let vault = MemVault::new();
        vault
            .write("index.csv", &format!("{}\n\"a.md\",01/01/24 08:00,FALSE,\n", codec::HEADER))
            .unwrap();
        // Live tree reports a later creation time (copied file, sync drift).
        vault.put_file("a.md", dt(9, 12));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        assert_eq!(store.snapshot()["a.md"].created, dt(1, 8));
    }

    #[test]
    fn live_earlier_date_replaces_stored_unprotected() {
        let vault = MemVault::new();
        vault
            .write("index.csv", &format!("{}\n\"a.md\",09/01/24 12:00,FALSE,\n", codec::HEADER))
            .unwrap();
        vault.put_file("a.md", dt(1, 8));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        assert_eq!(store.snapshot()["a.md"].created, dt(1, 8));
    }

    #[test]
    fn protected_entry_keeps_stored_date_unconditionally() {
        let vault = MemVault::new();
        vault
            .write("index.csv", &format!("{}\n\"a.md\",09/01/24 12:00,TRUE,\n", codec::HEADER))
            .unwrap();
        // Live date is earlier, which would normally win.
        vault.put_file("a.md", dt(1, 8));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        let entry = &store.snapshot()["a.md"];
        assert_eq!(entry.created, dt(9, 12));
        assert!(entry.protected);
    }

    #[test]
    fn missing_file_is_stamped_once_and_kept() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();

        vault.remove_file("a.md");
        store.refresh(false).unwrap();
        let stamped = store.snapshot()["a.md"].deleted.expect("deletion stamped");

        // Still absent on the next refresh: the stamp must not move.
        store.refresh(false).unwrap();
        assert_eq!(store.snapshot()["a.md"].deleted, Some(stamped));
        assert_eq!(store.snapshot()["a.md"].created, dt(5, 10));
    }

    #[test]
    fn reappearing_path_loses_its_deletion_date() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let settings = settings();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        vault.remove_file("a.md");
        store.refresh(false).unwrap();
        assert!(store.snapshot()["a.md"].deleted.is_some());

        vault.put_file("a.md", dt(20, 9));
        store.refresh(false).unwrap();
        let entry = &store.snapshot()["a.md"];
        assert_eq!(entry.deleted, None);
        // The old (earlier) stored date still wins for an unprotected entry.
        assert_eq!(entry.created, dt(5, 10));
    }

    #[test]
    fn periodic_refresh_with_indexing_disabled_is_a_no_op() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let mut settings = settings();
        settings.index_enabled = false;

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        assert!(!vault.exists("index.csv"));
    }

    #[test]
    fn one_time_refresh_falls_back_to_default_path() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let mut settings = settings();
        settings.index_path = String::new();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(true).unwrap();
        assert!(vault.exists(DEFAULT_INDEX_PATH));
    }

    #[test]
    fn periodic_refresh_without_path_writes_nothing() {
        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let mut settings = settings();
        settings.index_path = String::new();

        let mut store = FileIndexStore::new(&vault, &settings);
        store.refresh(false).unwrap();
        assert!(!vault.exists(DEFAULT_INDEX_PATH));
    }

    #[test]
    fn one_time_refresh_emits_notices() {
        use std::sync::Mutex;

        struct Capture(Mutex<Vec<String>>);
        impl Notifier for Capture {
            fn notify(&self, message: &str) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        let vault = MemVault::new();
        vault.put_file("a.md", dt(5, 10));
        let settings = settings();
        let capture = Capture(Mutex::new(Vec::new()));

        let mut store = FileIndexStore::new(&vault, &settings).with_notifier(&capture);
        store.refresh(true).unwrap();

        let messages = capture.0.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Updating"));
        assert!(messages[1].contains("successfully"));
    }
}
