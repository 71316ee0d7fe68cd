//! Object URI to template matching
//!
//! Walks a registry snapshot in insertion order and keeps the last template
//! whose pattern matches the URI, so templates added later override earlier
//! ones. Patterns that fail to compile are skipped, not removed.

use regex::Regex;
use sluice_core::domain::template::JobTemplate;
use tracing::warn;

/// Resolves an object URI to at most one job template
///
/// When multiple templates match, the last one in registry order wins.
pub fn resolve_template(uri: &str, templates: &[JobTemplate]) -> Option<JobTemplate> {
    let mut resolved = None;

    for template in templates {
        let pattern = match Regex::new(&template.pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(
                    "Skipping template '{}' with unparseable pattern '{}': {}",
                    template.name, template.pattern, e
                );
                continue;
            }
        };

        if pattern.is_match(uri) {
            resolved = Some(template.clone());
        }
    }

    resolved
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
    fn test_single_match_resolves() {
        let templates = vec![template("ix", "\\.tsv$", "img:1")];

        let resolved = resolve_template("s3://b/data.tsv", &templates).unwrap();
        assert_eq!(resolved.name, "ix");
    }

    #[test]
    fn test_no_match_resolves_nothing() {
        let templates = vec![template("ix", "\\.tsv$", "img:1")];

        assert!(resolve_template("s3://b/data.bin", &templates).is_none());
    }

    #[test]
    fn test_last_matching_template_wins() {
        let templates = vec![
            template("t1", "\\.tsv$", "img:1"),
            template("t2", "data\\..*", "img:2"),
        ];

        let resolved = resolve_template("s3://b/data.tsv", &templates).unwrap();
        assert_eq!(resolved.image, "img:2");
    }

    #[test]
    fn test_unparseable_pattern_is_skipped() {
        let templates = vec![
            template("broken", "([unclosed", "img:0"),
            template("ix", "\\.tsv$", "img:1"),
        ];

        let resolved = resolve_template("s3://b/data.tsv", &templates).unwrap();
        assert_eq!(resolved.name, "ix");
    }
}
