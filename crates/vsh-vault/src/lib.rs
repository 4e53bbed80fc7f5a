//! # vsh-vault
//!
//! The file-tree provider for vsh. The vault is the live source of truth:
//! it exposes every file's current path and creation timestamp, and
//! read/write access to text resources (the durable index lives inside the
//! vault as one such resource). History for deleted or since-modified
//! files is *not* the vault's job; that is what the file index is for.
//!
//! [`Vault`] is the interface the index and timeline layers program
//! against; [`FsVault`] is the production implementation and [`MemVault`]
//! an in-memory twin for tests.

use chrono::NaiveDateTime;

use vsh_core::Result;

mod fs;
mod mem;
pub mod watcher;

pub use fs::FsVault;
pub use mem::MemVault;

/// One live file: vault-relative `/`-separated path plus its currently
/// observed creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    pub path: String,
    pub created: NaiveDateTime,
}

impl VaultFile {
    pub fn new(path: &str, created: NaiveDateTime) -> Self {
        Self {
            path: path.to_string(),
            created,
        }
    }
}

/// The host file tree, at the interface the core needs: enumerate live
/// files, and read/create/overwrite a text resource at a path.
pub trait Vault {
    /// Every file currently present, in no particular order.
    fn files(&self) -> Result<Vec<VaultFile>>;

    /// Read the text resource at a vault-relative path.
    fn read(&self, path: &str) -> Result<String>;

    /// Create or overwrite the text resource at a vault-relative path.
    fn write(&self, path: &str, content: &str) -> Result<()>;

    /// Does a resource exist at this path?
    fn exists(&self, path: &str) -> bool;

    /// Scalar frontmatter field of the file at `path`, if it has one.
    /// Files without frontmatter (or that fail to read as text) yield
    /// `None`; metadata is best-effort by nature.
    fn metadata_field(&self, path: &str, field: &str) -> Option<String> {
        self.read(path)
            .ok()
            .and_then(|content| vsh_core::frontmatter::field(&content, field))
    }
}
