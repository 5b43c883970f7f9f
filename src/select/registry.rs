// registry.rs - Selector registry for managing available feature selectors

use super::traits::FeatureSelector;
use super::{Chi2Selector, InfoGainSelector, JmiSelector, MannWhitneySelector, MrmrSelector};
use crate::error::{PrepError, Result};
use std::collections::HashMap;

/// Registry of selectors addressable by name
pub struct SelectorRegistry {
    selectors: HashMap<String, Box<dyn FeatureSelector>>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            selectors: HashMap::new(),
        };

        registry.register_selector(Box::new(Chi2Selector));
        registry.register_selector(Box::new(InfoGainSelector));
        registry.register_selector(Box::new(MannWhitneySelector));
        registry.register_selector(Box::new(MrmrSelector));
        registry.register_selector(Box::new(JmiSelector));

        registry
    }

    /// Register a selector under its own name
    pub fn register_selector(&mut self, selector: Box<dyn FeatureSelector>) {
        self.selectors.insert(selector.name().to_string(), selector);
    }

    pub fn get_selector(&self, name: &str) -> Option<&dyn FeatureSelector> {
        self.selectors.get(name).map(|s| s.as_ref())
    }

    /// Look up several selectors, failing on the first unknown name
    pub fn resolve(&self, names: &[String]) -> Result<Vec<&dyn FeatureSelector>> {
        names
            .iter()
            .map(|name| {
                self.get_selector(name).ok_or_else(|| {
                    PrepError::selection(format!(
                        "unknown selector '{}' (available: {})",
                        name,
                        self.get_selector_names().join(", ")
                    ))
                })
            })
            .collect()
    }

    pub fn has_selector(&self, name: &str) -> bool {
        self.selectors.contains_key(name)
    }

    /// (name, description) pairs sorted by name
    pub fn list_selectors(&self) -> Vec<(&str, &str)> {
        let mut list: Vec<(&str, &str)> = self
            .selectors
            .values()
            .map(|s| (s.name(), s.description()))
            .collect();
        list.sort();
        list
    }

    pub fn get_selector_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.selectors.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
