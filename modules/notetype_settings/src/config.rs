//! Configuration for the notetype settings module

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::domain::ServiceOptions;

/// Notetype settings configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory with one sub-directory per authored template family.
    /// Without it the catalog is empty.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// Merge generated copies into their family when a session opens
    #[serde(default)]
    pub convert_copies_on_open: bool,

    /// Failures listed in a batch summary before it is truncated
    #[serde(default = "default_max_report_entries")]
    pub max_report_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: None,
            convert_copies_on_open: false,
            max_report_entries: default_max_report_entries(),
        }
    }
}

impl Config {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid notetype settings configuration")
    }

    /// Read a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&yaml)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            convert_copies_on_open: self.convert_copies_on_open,
            max_report_entries: self.max_report_entries,
        }
    }
}

fn default_max_report_entries() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.templates_dir, None);
        assert!(!config.convert_copies_on_open);
        assert_eq!(config.max_report_entries, 10);
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_yaml(
            "templates_dir: /opt/notetypes\nconvert_copies_on_open: true\nmax_report_entries: 3\n",
        )
        .unwrap();

        assert_eq!(config.templates_dir, Some(PathBuf::from("/opt/notetypes")));
        assert_eq!(config.service_options().max_report_entries, 3);
        assert!(config.service_options().convert_copies_on_open);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(Config::from_yaml("template_dir: /opt\n").is_err());
    }
}
