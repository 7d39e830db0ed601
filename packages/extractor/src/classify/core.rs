//! Style registry mapping authoring-template style tags to role families.

use std::collections::{HashMap, HashSet};

use super::types::StyleClass;

/// Registry mapping style tags to [`StyleClass`]es.
///
/// Lookups trim surrounding whitespace from the tag, since templates are
/// not consistent about it.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: HashMap<String, StyleClass>,
}

impl StyleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    /// Register a style tag.
    pub fn register(&mut self, style: impl Into<String>, class: StyleClass) {
        self.styles.insert(style.into().trim().to_string(), class);
    }

    /// Register several style tags for the same class.
    pub fn register_all(
        &mut self,
        styles: impl IntoIterator<Item = impl Into<String>>,
        class: StyleClass,
    ) {
        for style in styles {
            self.register(style, class);
        }
    }

    /// Look up the class of a style tag.
    #[must_use]
    pub fn lookup(&self, style: &str) -> Option<StyleClass> {
        self.styles.get(style.trim()).copied()
    }

    /// Check if a style tag is registered.
    #[must_use]
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.contains_key(style.trim())
    }

    /// Return set of all registered style tags.
    #[must_use]
    pub fn registered_styles(&self) -> HashSet<&str> {
        self.styles.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    #[test]
    fn test_registry_register_and_lookup() {
        let mut registry = StyleRegistry::new();
        registry.register("131文章大点", StyleClass::Heading(Level::One));

        assert_eq!(
            registry.lookup("131文章大点"),
            Some(StyleClass::Heading(Level::One))
        );
        assert_eq!(registry.lookup("missing"), None);
    }

    #[test]
    fn test_registry_trims_tags() {
        let mut registry = StyleRegistry::new();
        registry.register(" verses ", StyleClass::Citation);

        assert!(registry.has_style("verses"));
        assert_eq!(registry.lookup("verses  "), Some(StyleClass::Citation));
    }

    #[test]
    fn test_registry_register_all() {
        let mut registry = StyleRegistry::new();
        registry.register_all(["a", "b"], StyleClass::Body);

        assert_eq!(registry.registered_styles().len(), 2);
    }
}
