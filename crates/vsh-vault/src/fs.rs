//! Filesystem-backed vault.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::debug;
use walkdir::WalkDir;

use vsh_core::{Result, VshError};

use crate::{Vault, VaultFile};

/// A vault rooted at a directory on disk.
///
/// Hidden entries (any path component starting with `.`) are invisible,
/// so dotdirs like `.vsh` or `.git` never count as vault files.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Vault for FsVault {
    fn files(&self) -> Result<Vec<VaultFile>> {
        if !self.root.exists() {
            return Err(VshError::Vault(format!(
                "vault root does not exist: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| VshError::Vault(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            {
                continue;
            }
            let rel_str = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            files.push(VaultFile {
                path: rel_str,
                created: created_at(entry.path())?,
            });
        }
        debug!(count = files.len(), root = %self.root.display(), "enumerated vault files");
        Ok(files)
    }

    fn read(&self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(path))?)
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// Creation timestamp in local wall-clock time. Filesystems without birth
/// time fall back to the modification time.
fn created_at(path: &Path) -> Result<NaiveDateTime> {
    let meta = fs::metadata(path)?;
    let system_time = meta.created().or_else(|_| meta.modified())?;
    Ok(DateTime::<Local>::from(system_time).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_enumerates_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Notes/2024")).unwrap();
        fs::write(dir.path().join("Notes/2024/a.md"), "# a").unwrap();
        fs::write(dir.path().join("b.png"), "png").unwrap();

        let vault = FsVault::new(dir.path());
        let mut paths: Vec<_> = vault.files().unwrap().into_iter().map(|f| f.path).collect();
        paths.sort();
        assert_eq!(paths, vec!["Notes/2024/a.md", "b.png"]);
    }

    #[test]
    fn hidden_entries_are_invisible() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".vsh")).unwrap();
        fs::write(dir.path().join(".vsh/config.toml"), "").unwrap();
        fs::write(dir.path().join(".hidden.md"), "").unwrap();
        fs::write(dir.path().join("visible.md"), "").unwrap();

        let vault = FsVault::new(dir.path());
        let paths: Vec<_> = vault.files().unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["visible.md"]);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());

        assert!(!vault.exists("deep/nested/index.csv"));
        vault.write("deep/nested/index.csv", "header\n").unwrap();
        assert!(vault.exists("deep/nested/index.csv"));
        assert_eq!(vault.read("deep/nested/index.csv").unwrap(), "header\n");
    }

    #[test]
    fn missing_root_is_an_error() {
        let vault = FsVault::new("/definitely/not/a/real/vault/root");
        assert!(vault.files().is_err());
    }
}
