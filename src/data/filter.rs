// filter.rs - Column (field) selection by regex and list files

use regex::Regex;
use std::collections::HashSet;

/// Field selection rules; every configured rule must pass for a field to be kept
#[derive(Debug, Default, Clone)]
pub struct FieldFilter {
    pub include_regex: Option<Regex>,
    pub exclude_regex: Option<Regex>,
    pub include_set: Option<HashSet<String>>,
    pub exclude_set: Option<HashSet<String>>,
}

impl FieldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include_regex.is_none()
            && self.exclude_regex.is_none()
            && self.include_set.is_none()
            && self.exclude_set.is_none()
    }

    pub fn keeps(&self, field: &str) -> bool {
        if let Some(regex) = &self.include_regex {
            if !regex.is_match(field) {
                return false;
            }
        }

        if let Some(regex) = &self.exclude_regex {
            if regex.is_match(field) {
                return false;
            }
        }

        if let Some(set) = &self.include_set {
            if !set.contains(field) {
                return false;
            }
        }

        if let Some(set) = &self.exclude_set {
            if set.contains(field) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = FieldFilter::new();
        assert!(filter.is_empty());
        assert!(filter.keeps("f.21003.0.0"));
    }

    #[test]
    fn test_rules_combine() {
        let filter = FieldFilter {
            include_regex: Some(Regex::new(r"^f\.").unwrap()),
            exclude_regex: Some(Regex::new(r"\.2\.0$").unwrap()),
            include_set: None,
            exclude_set: Some(["f.31.0.0".to_string()].into_iter().collect()),
        };

        assert!(filter.keeps("f.21003.0.0"));
        assert!(!filter.keeps("age"));
        assert!(!filter.keeps("f.21003.2.0"));
        assert!(!filter.keeps("f.31.0.0"));
    }

    #[test]
    fn test_include_set() {
        let filter = FieldFilter {
            include_set: Some(["Sex".to_string(), "PHQ9_binary".to_string()].into_iter().collect()),
            ..FieldFilter::default()
        };
        assert!(filter.keeps("Sex"));
        assert!(!filter.keeps("rs12345"));
    }
}
