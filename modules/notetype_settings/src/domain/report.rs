//! Aggregated per-setting failures of a batch

use std::fmt;

use super::codec::SettingParseError;
use crate::contract::{FailedSetting, NotetypeSettingsError};

#[derive(Debug, Clone, PartialEq)]
pub struct SettingFailure {
    pub notetype: String,
    pub setting: String,
    pub error: SettingParseError,
}

impl SettingFailure {
    pub fn new(notetype: impl Into<String>, error: SettingParseError) -> Self {
        Self {
            notetype: notetype.into(),
            setting: error.setting().to_string(),
            error,
        }
    }

    /// The failure as a contract error
    pub fn to_error(&self) -> NotetypeSettingsError {
        match &self.error {
            SettingParseError::NotFound { setting } => NotetypeSettingsError::SettingNotFound {
                setting: setting.clone(),
                notetype: self.notetype.clone(),
            },
            SettingParseError::InvalidEncoding { setting, details } => {
                NotetypeSettingsError::InvalidEncoding {
                    setting: setting.clone(),
                    notetype: self.notetype.clone(),
                    details: details.clone(),
                }
            }
            SettingParseError::InvalidValue { .. } => NotetypeSettingsError::Validation {
                message: self.error.to_string(),
            },
        }
    }
}

impl From<&SettingFailure> for FailedSetting {
    fn from(failure: &SettingFailure) -> Self {
        Self {
            notetype: failure.notetype.clone(),
            setting: failure.setting.clone(),
            message: failure.error.to_string(),
        }
    }
}

impl fmt::Display for SettingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.notetype, self.error)
    }
}

/// Failures collected while reading or applying settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureReport {
    failures: Vec<SettingFailure>,
}

impl FailureReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: SettingFailure) {
        self.failures.push(failure);
    }

    pub fn merge(&mut self, other: FailureReport) {
        self.failures.extend(other.failures);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[SettingFailure] {
        &self.failures
    }

    /// Human-readable summary listing at most `max_entries` failures
    pub fn summary(&self, max_entries: usize) -> String {
        let mut lines: Vec<String> = self
            .failures
            .iter()
            .take(max_entries)
            .map(|failure| format!("- {}", failure))
            .collect();
        if self.failures.len() > max_entries {
            lines.push(format!("... and {} more", self.failures.len() - max_entries));
        }
        format!(
            "{} setting(s) could not be processed:\n{}",
            self.failures.len(),
            lines.join("\n")
        )
    }

    /// Log the report once for a finished batch
    pub fn log(&self, batch: &str) {
        if !self.is_empty() {
            tracing::warn!(batch = batch, failures = self.len(), "{}", self);
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary(self.failures.len()))
    }
}

impl IntoIterator for FailureReport {
    type Item = SettingFailure;
    type IntoIter = std::vec::IntoIter<SettingFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(notetype: &str, setting: &str) -> SettingFailure {
        SettingFailure::new(
            notetype,
            SettingParseError::NotFound {
                setting: setting.to_string(),
            },
        )
    }

    #[test]
    fn test_summary_truncates() {
        let mut report = FailureReport::new();
        report.push(failure("A", "x"));
        report.push(failure("A", "y"));
        report.push(failure("B", "x"));

        let summary = report.summary(2);
        assert!(summary.starts_with("3 setting(s) could not be processed"));
        assert!(summary.contains("- A: could not find 'x'"));
        assert!(summary.contains("... and 1 more"));
        assert!(!summary.contains("B:"));
    }

    #[test]
    fn test_merge() {
        let mut first = FailureReport::new();
        first.push(failure("A", "x"));
        let mut second = FailureReport::new();
        second.push(failure("B", "y"));

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.failures()[1].setting, "y");
    }

    #[test]
    fn test_failure_maps_to_contract_error() {
        assert_eq!(
            failure("A", "x").to_error(),
            NotetypeSettingsError::SettingNotFound {
                setting: "x".into(),
                notetype: "A".into()
            }
        );

        let invalid = SettingFailure::new(
            "B",
            SettingParseError::InvalidEncoding {
                setting: "y".into(),
                details: "not a number".into(),
            },
        );
        let failed = FailedSetting::from(&invalid);
        assert_eq!(failed.notetype, "B");
        assert_eq!(failed.message, "'y': not a number");
        assert!(matches!(invalid.to_error(), NotetypeSettingsError::InvalidEncoding { .. }));
    }
}
