//! In-memory vault for tests and headless callers.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDateTime;

use vsh_core::{Result, VshError};

use crate::{Vault, VaultFile};

/// A vault held entirely in memory. Timestamps are supplied by the caller,
/// which makes lifecycle scenarios (files appearing, disappearing, carrying
/// specific creation times) straightforward to script.
#[derive(Default)]
pub struct MemVault {
    files: Mutex<BTreeMap<String, VaultFile>>,
    resources: Mutex<BTreeMap<String, String>>,
}

impl MemVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a live file.
    pub fn put_file(&self, path: &str, created: NaiveDateTime) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), VaultFile::new(path, created));
    }

    /// Remove a live file, as if it had been deleted from the tree.
    pub fn remove_file(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }
}

impl Vault for MemVault {
    fn files(&self) -> Result<Vec<VaultFile>> {
        Ok(self.files.lock().unwrap().values().cloned().collect())
    }

    fn read(&self, path: &str) -> Result<String> {
        self.resources
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| VshError::Vault(format!("no such resource: {path}")))
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        self.resources
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resources.lock().unwrap().contains_key(path)
    }
}
