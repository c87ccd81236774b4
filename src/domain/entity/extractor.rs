//! Closed-vocabulary entity extractor

use std::collections::BTreeSet;

use crate::domain::vector::VectorMatch;

/// Places the extractor recognises
pub const KNOWN_PLACES: &[&str] = &["Hanoi", "Hoi An", "Ho Chi Minh", "Hue", "Da Nang", "Nha Trang"];

/// Returned when no known place appears in any match, so the graph lookup
/// always has an anchor
pub const DEFAULT_ANCHORS: &[&str] = &["Hanoi", "Hoi An"];

/// Finds known place names in search-result text.
///
/// Matching is a case-insensitive substring test against a fixed registry;
/// names outside the registry are never produced.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    registry: Vec<(String, String)>,
    defaults: BTreeSet<String>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::with_registry(KNOWN_PLACES, DEFAULT_ANCHORS)
    }

    pub fn with_registry(known: &[&str], defaults: &[&str]) -> Self {
        Self {
            registry: known
                .iter()
                .map(|name| (name.to_string(), name.to_lowercase()))
                .collect(),
            defaults: defaults.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Union of registry names found in any match
    pub fn extract(&self, matches: &[VectorMatch]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        for m in matches {
            let text = m.text.to_lowercase();
            for (name, needle) in &self.registry {
                if text.contains(needle.as_str()) {
                    found.insert(name.clone());
                }
            }
        }

        if found.is_empty() {
            return self.defaults.clone();
        }

        found
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
