//! Settings for vsh, persisted as TOML under the vault's `.vsh/` directory.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::{next_category_id, Category};
use crate::error::{Result, VshError};

/// Relative location of the settings file under the vault root.
pub const CONFIG_REL_PATH: &str = ".vsh/config.toml";

/// Default location of the durable file index, relative to the vault root.
pub const DEFAULT_INDEX_PATH: &str = "file-index.csv";

/// Legend ordering by cumulative series total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrder {
    Ascending,
    #[default]
    Descending,
}

/// All configuration the core consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display date format for graph axis labels (chrono syntax).
    /// Independent of the index's fixed on-disk format.
    pub date_format: String,
    /// Whether the durable file index is maintained by periodic refreshes.
    pub index_enabled: bool,
    /// Vault-relative path of the index resource.
    pub index_path: String,
    /// Count deleted files back out of the series between their recorded
    /// creation and deletion. Only honoured while the index is enabled.
    pub deletion_accounting: bool,
    /// If set, the axis starts at this category's earliest date instead of
    /// the global minimum.
    pub anchor_category_id: Option<u32>,
    /// Frontmatter field holding a per-file creation-date override.
    pub override_field: Option<String>,
    /// chrono format used to parse the override field.
    pub override_format: Option<String>,
    pub legend_order: LegendOrder,
    /// Ordered category list. Order matters within the single-apply group.
    /// Kept last so the TOML array-of-tables serializes after the scalars.
    pub categories: Vec<Category>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%y".to_string(),
            index_enabled: true,
            index_path: DEFAULT_INDEX_PATH.to_string(),
            deletion_accounting: false,
            anchor_category_id: None,
            override_field: None,
            override_format: None,
            legend_order: LegendOrder::default(),
            categories: vec![
                Category::new(1, "Markdown", ":regex:.*\\.md$", "#5470c6", false),
                Category::new(2, "All", ":regex:.*$", "#91cc75", true),
            ],
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults; a present
    /// but malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| VshError::Config(e.to_string()))
    }

    /// Persist settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| VshError::Serialization(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Next free category id (`max + 1`).
    #[must_use]
    pub fn next_category_id(&self) -> u32 {
        next_category_id(&self.categories)
    }

    /// Deletion accounting requires the index; without it there is no
    /// deletion record to account from.
    #[must_use]
    pub fn deletion_accounting_active(&self) -> bool {
        self.deletion_accounting && self.index_enabled
    }
}
