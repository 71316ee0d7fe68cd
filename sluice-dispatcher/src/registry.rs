//! Job template registry
//!
//! In-memory, mutable catalogue of job templates. Mutated by the admin
//! surface concurrently with reads from the dispatch loop, so all access is
//! serialized under a single lock and `list` returns a value snapshot.
//!
//! The registry is process-local; templates do not survive a restart.

use std::sync::{Arc, Mutex};

use sluice_core::domain::template::JobTemplate;
use thiserror::Error;

/// Errors reported inline to the admin surface
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Template is missing a required field
    #[error("invalid job template: {0}")]
    InvalidConfig(String),

    /// No template matches the requested pattern text
    #[error("no job template with pattern {0}")]
    NotFound(String),
}

/// Thread-safe catalogue of job templates, in insertion order
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: Arc<Mutex<Vec<JobTemplate>>>,
}

impl TemplateRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a template
    ///
    /// Fails with [`RegistryError::InvalidConfig`] when `name` or `image`
    /// is empty. `(name, pattern)` pairs are not required to be unique.
    pub fn add(&self, template: JobTemplate) -> Result<(), RegistryError> {
        if template.name.is_empty() || template.image.is_empty() {
            return Err(RegistryError::InvalidConfig(
                "name and image are required".to_string(),
            ));
        }

        let mut templates = self.templates.lock().unwrap();
        templates.push(template);
        Ok(())
    }

    /// Removes the first template whose pattern text equals `pattern`
    ///
    /// Comparison is string equality, not regex equivalence.
    pub fn remove(&self, pattern: &str) -> Result<(), RegistryError> {
        let mut templates = self.templates.lock().unwrap();
        match templates.iter().position(|t| t.pattern == pattern) {
            Some(idx) => {
                templates.remove(idx);
                Ok(())
            }
            None => Err(RegistryError::NotFound(pattern.to_string())),
        }
    }

    /// Snapshot of all templates, in insertion order
    pub fn list(&self) -> Vec<JobTemplate> {
        self.templates.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, pattern: &str, image: &str) -> JobTemplate {
        JobTemplate {
            name: name.to_string(),
            pattern: pattern.to_string(),
            image: image.to_string(),
            image_config: serde_json::Value::Null,
            request_cpu: String::new(),
            request_mem: String::new(),
            deadline: 0,
            service_account: String::new(),
        }
    }

    #[test]
    fn test_add_then_list_round_trip() {
        let registry = TemplateRegistry::new();
        registry.add(template("ix", "\\.tsv$", "img:1")).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "ix");
    }

    #[test]
    fn test_add_rejects_missing_name_or_image() {
        let registry = TemplateRegistry::new();

        let err = registry.add(template("", "\\.tsv$", "img:1")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidConfig(_)));

        let err = registry.add(template("ix", "\\.tsv$", "")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidConfig(_)));

        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_remove_deletes_first_matching_pattern() {
        let registry = TemplateRegistry::new();
        registry.add(template("first", "\\.tsv$", "img:1")).unwrap();
        registry.add(template("second", "\\.tsv$", "img:2")).unwrap();

        registry.remove("\\.tsv$").unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "second");
    }

    #[test]
    fn test_remove_unknown_pattern_is_not_found() {
        let registry = TemplateRegistry::new();
        registry.add(template("ix", "\\.tsv$", "img:1")).unwrap();

        let err = registry.remove("\\.bam$").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let registry = TemplateRegistry::new();
        registry.add(template("ix", "\\.tsv$", "img:1")).unwrap();

        let snapshot = registry.list();
        registry.remove("\\.tsv$").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(registry.list().is_empty());
    }
}
