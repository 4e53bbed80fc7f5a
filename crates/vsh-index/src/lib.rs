//! # vsh-index
//!
//! The durable file index for vsh. The vault only exposes each file's
//! *current* metadata, so this crate keeps its own record of when every
//! path first appeared and when (if ever) it was first observed missing,
//! reconciled against the live tree on every refresh and mirrored to a
//! flat CSV resource inside the vault.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

pub mod codec;
mod store;

pub use store::{FileIndexStore, Notifier};

/// Lifecycle record for one path ever observed in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    /// Resolved creation date. Authoritative once `protected` is set.
    pub created: NaiveDateTime,
    /// A protected entry's `created` is never overwritten by later live
    /// observations, whatever the live timestamp says.
    pub protected: bool,
    /// Stamped the first time a refresh observes the path missing from the
    /// live tree; carried forward unchanged while the path stays absent.
    pub deleted: Option<NaiveDateTime>,
}

/// The in-memory index: path → lifecycle record, ordered by path so
/// serialization is deterministic.
pub type Index = BTreeMap<String, IndexEntry>;
