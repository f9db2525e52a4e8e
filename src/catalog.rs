//! Catalog loading.
//!
//! The catalog is the only input: an ordered JSON array of items, fixed for
//! the whole session. Items are immutable once loaded; the deck only ever
//! moves a position over them.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A single reviewable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable unique identifier (shown on the card and in the export)
    pub id: String,
    /// Display label
    pub label: String,
    /// Longer text body, shown when the card is expanded
    #[serde(default)]
    pub body: String,
    /// Optional grouping tag, shown as the card eyebrow line
    #[serde(default)]
    pub section: Option<String>,
}

/// Load a catalog file. Duplicate ids are rejected: undo bookkeeping and the
/// exported document both key off them.
pub fn load(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog from {}", path.display()))?;

    let items: Vec<Item> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog from {}", path.display()))?;

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            bail!(
                "Duplicate item id {:?} in catalog {}",
                item.id,
                path.display()
            );
        }
    }

    tracing::info!("Loaded {} catalog items", items.len());
    Ok(items)
}

#[cfg(test)]
pub(crate) fn sample(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            id: format!("item-{i}"),
            label: format!("Item {i}"),
            body: format!("Body text for item {i}"),
            section: Some("General".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            {"id": "a1", "label": "First", "body": "Details", "section": "Alpha"},
            {"id": "b2", "label": "Second"}
        ]"#;
        let items: Vec<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a1");
        assert_eq!(items[0].section.as_deref(), Some("Alpha"));
        assert_eq!(items[1].body, "");
        assert!(items[1].section.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = std::env::temp_dir().join("swipedeck-test-catalog");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dup.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "label": "One"}, {"id": "x", "label": "Two"}]"#,
        )
        .unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Duplicate item id"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }
}
