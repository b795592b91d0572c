//! FILENAME: grid-render/src/style.rs
//! PURPOSE: Deduplicated storage of resolved cell attributes.
//! CONTEXT: Rendered cells don't carry their attributes; each cell stores an
//! index into the sheet's StyleRegistry, which holds every distinct
//! attribute set once.

use std::collections::HashMap;

use model::CellAttributes;
use serde::{Deserialize, Serialize};

/// Flyweight registry of cell attribute sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRegistry {
    /// Index 0 is always the empty attribute set.
    styles: Vec<CellAttributes>,
    #[serde(skip)]
    style_to_index: HashMap<CellAttributes, usize>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        let default_style = CellAttributes::default();
        let mut style_to_index = HashMap::new();
        style_to_index.insert(default_style.clone(), 0);

        StyleRegistry {
            styles: vec![default_style],
            style_to_index,
        }
    }

    /// Index of `style`, registering it if it is new.
    pub fn get_or_create(&mut self, style: &CellAttributes) -> usize {
        if let Some(&index) = self.style_to_index.get(style) {
            return index;
        }

        let index = self.styles.len();
        self.style_to_index.insert(style.clone(), index);
        self.styles.push(style.clone());
        log::trace!(target: "GRID", "registered style {}", index);
        index
    }

    /// Style at `index`, or the default style when out of bounds.
    pub fn get(&self, index: usize) -> &CellAttributes {
        self.styles.get(index).unwrap_or(&self.styles[0])
    }

    pub fn default_style(&self) -> &CellAttributes {
        &self.styles[0]
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether only the default style is registered.
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Rebuilds the reverse lookup after deserialization, restoring the
    /// default style when the saved list is empty.
    pub fn rebuild_index(&mut self) {
        if self.styles.is_empty() {
            self.styles.push(CellAttributes::default());
        }
        self.style_to_index.clear();
        for (index, style) in self.styles.iter().enumerate() {
            self.style_to_index.entry(style.clone()).or_insert(index);
        }
    }

    pub fn all_styles(&self) -> &[CellAttributes] {
        &self.styles
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Background, Color, TextStyle};

    #[test]
    fn test_default_style_is_index_zero() {
        let mut registry = StyleRegistry::new();
        assert_eq!(registry.get_or_create(&CellAttributes::default()), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identical_styles_share_an_index() {
        let mut registry = StyleRegistry::new();
        let bold = CellAttributes::new().with(TextStyle::new().with_bold(true));
        let red = CellAttributes::new().with(Background::color(Color::RED));

        let first = registry.get_or_create(&bold);
        let second = registry.get_or_create(&red);
        assert_eq!(registry.get_or_create(&bold), first);
        assert_ne!(first, second);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(second), &red);
        assert_eq!(registry.get(99), registry.default_style());
    }

    #[test]
    fn test_rebuild_index_after_deserialize() {
        let mut registry = StyleRegistry::new();
        let bold = CellAttributes::new().with(TextStyle::new().with_bold(true));
        let index = registry.get_or_create(&bold);

        let json = serde_json::to_string(&registry).unwrap();
        let mut restored: StyleRegistry = serde_json::from_str(&json).unwrap();
        restored.rebuild_index();

        assert_eq!(restored.get_or_create(&bold), index);
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_empty_saved_styles_restore_default() {
        let mut restored: StyleRegistry = serde_json::from_str(r#"{"styles":[]}"#).unwrap();
        restored.rebuild_index();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.get(0), &CellAttributes::default());
        assert_eq!(restored.get_or_create(&CellAttributes::default()), 0);
    }
}
