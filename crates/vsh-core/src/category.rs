//! Category — a named file-classification rule.

use serde::{Deserialize, Serialize};

/// A named rule matching vault file paths.
///
/// Categories come in two resolution groups selected by `always_apply`:
/// single-apply categories are tested in list order and the first match
/// wins; always-apply categories are tested independently and any number
/// may match a given path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique id, stable across edits. Fresh ids are `max(existing) + 1`.
    pub id: u32,
    pub name: String,
    /// Pattern in the grammar of [`crate::pattern::matches`].
    pub pattern: String,
    /// Display color, passed through to the charting layer untouched.
    pub color: String,
    #[serde(default)]
    pub always_apply: bool,
}

impl Category {
    pub fn new(id: u32, name: &str, pattern: &str, color: &str, always_apply: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            pattern: pattern.to_string(),
            color: color.to_string(),
            always_apply,
        }
    }
}

/// Next free category id: `max(existing) + 1`, or 1 for an empty list.
#[must_use]
pub fn next_category_id(categories: &[Category]) -> u32 {
    categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_max_plus_one() {
        let cats = vec![
            Category::new(3, "Notes", "Notes/", "#8884d8", false),
            Category::new(7, "All", ":regex:.*", "#82ca9d", true),
            Category::new(5, "Daily", "Daily/", "#ffc658", false),
        ];
        assert_eq!(next_category_id(&cats), 8);
    }

    #[test]
    fn next_id_for_empty_list_is_one() {
        assert_eq!(next_category_id(&[]), 1);
    }

    #[test]
    fn always_apply_defaults_to_false_in_serde() {
        let toml = r##"
id = 1
name = "Notes"
pattern = "Notes/"
color = "#8884d8"
"##;
        let cat: Category = toml::from_str(toml).unwrap();
        assert!(!cat.always_apply);
    }
}
