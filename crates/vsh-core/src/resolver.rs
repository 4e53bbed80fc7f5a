//! Category resolution: which categories does a path belong to?
//!
//! Categories form two groups by `always_apply`. The single-apply group is
//! tested in list order and contributes at most one category (first match
//! wins). The always-apply group is tested independently and contributes
//! every matching category.

use crate::category::Category;
use crate::pattern;

/// Resolve the categories a path belongs to, preserving the input order
/// within each group (single-apply winners come first).
#[must_use]
pub fn resolve<'a>(categories: &'a [Category], path: &str) -> Vec<&'a Category> {
    let mut matched = Vec::new();

    if let Some(first) = categories
        .iter()
        .filter(|c| !c.always_apply)
        .find(|c| pattern::matches(&c.pattern, path))
    {
        matched.push(first);
    }

    matched.extend(
        categories
            .iter()
            .filter(|c| c.always_apply && pattern::matches(&c.pattern, path)),
    );

    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            Category::new(1, "Notes", ":regex:.*\\.md$", "#8884d8", false),
            Category::new(2, "Text", ":regex:.*\\.(md|txt)$", "#83a6ed", false),
            Category::new(3, "All", ":regex:.*$", "#82ca9d", true),
            Category::new(4, "Inbox", "Inbox/", "#ffc658", true),
        ]
    }

    #[test]
    fn single_apply_first_match_wins() {
        let cats = cats();
        let matched = resolve(&cats, "Notes/a.md");
        // "Text" also matches a.md but "Notes" comes first in the list.
        let names: Vec<_> = matched.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Notes", "All"]);
    }

    #[test]
    fn later_single_apply_wins_when_earlier_misses() {
        let cats = cats();
        let names: Vec<_> = resolve(&cats, "Misc/readme.txt")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Text", "All"]);
    }

    #[test]
    fn always_apply_categories_stack() {
        let cats = cats();
        let names: Vec<_> = resolve(&cats, "Inbox/todo.md")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Notes", "All", "Inbox"]);
    }

    #[test]
    fn unmatched_path_resolves_to_nothing() {
        let cats = vec![Category::new(1, "Notes", "Notes/", "#8884d8", false)];
        assert!(resolve(&cats, "Media/cover.png").is_empty());
    }

    #[test]
    fn only_always_apply_returns_every_match() {
        let mut cats = cats();
        for c in &mut cats {
            c.always_apply = true;
        }
        let matched = resolve(&cats, "Notes/a.md");
        assert_eq!(matched.len(), 3); // Notes, Text, All
    }
}
