//! YAML frontmatter field lookup.
//!
//! Vault files may carry `---` delimited YAML frontmatter. The timeline
//! engine only needs one scalar field out of it (the per-file creation-date
//! override), and most vault files carry no frontmatter at all, so lookup
//! is tolerant: no frontmatter, unparseable YAML, or a missing field all
//! yield `None`.

/// Split content into raw frontmatter YAML and body, if the content starts
/// with a `---` frontmatter block.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let after_open = content.strip_prefix("---")?;
    let after_open = after_open.trim_start_matches(['\r', '\n']);

    let close = after_open.find("\n---")?;
    let yaml = &after_open[..close];
    let body = &after_open[close + 4..];
    Some((yaml, body))
}

/// Look up one scalar frontmatter field by name, rendered as a string.
#[must_use]
pub fn field(content: &str, name: &str) -> Option<String> {
    let (yaml, _) = split_frontmatter(content)?;
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
    match doc.get(name)? {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
