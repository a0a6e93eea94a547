//! Contract error types for notetype settings
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Notetype settings domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotetypeSettingsError {
    /// Notetype (family or copy) is not in the collection or catalog
    NotetypeNotFound {
        /// Notetype or family name
        name: String,
    },
    /// A setting's locator did not match where it was expected
    SettingNotFound {
        /// Setting name
        setting: String,
        /// Notetype name
        notetype: String,
    },
    /// The matched region does not parse to the declared type
    InvalidEncoding {
        /// Setting name
        setting: String,
        /// Notetype name
        notetype: String,
        /// Parse error details
        details: String,
    },
    /// Number of located regions differs from the number of templates
    StructuralMismatch {
        /// Setting name
        setting: String,
        /// Notetype name
        notetype: String,
        /// Number of card templates
        templates: usize,
        /// Number of located sections
        sections: usize,
    },
    /// An editing session is already open
    ConcurrentEditConflict {
        /// Identifier of the open session
        session_id: String,
    },
    /// Editing session does not exist (anymore)
    SessionNotFound {
        /// Session identifier
        session_id: String,
    },
    /// Validation error
    Validation {
        /// Validation error message
        message: String,
    },
    /// Internal error
    Internal,
}

impl std::fmt::Display for NotetypeSettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotetypeNotFound { name } => {
                write!(f, "notetype not found: {}", name)
            }
            Self::SettingNotFound { setting, notetype } => {
                write!(f, "setting '{}' not found in notetype '{}'", setting, notetype)
            }
            Self::InvalidEncoding {
                setting,
                notetype,
                details,
            } => {
                write!(
                    f,
                    "invalid value for '{}' in notetype '{}': {}",
                    setting, notetype, details
                )
            }
            Self::StructuralMismatch {
                setting,
                notetype,
                templates,
                sections,
            } => {
                write!(
                    f,
                    "notetype '{}' has {} templates but {} sections for '{}'",
                    notetype, templates, sections, setting
                )
            }
            Self::ConcurrentEditConflict { session_id } => {
                write!(f, "an editing session is already open: {}", session_id)
            }
            Self::SessionNotFound { session_id } => {
                write!(f, "editing session not found: {}", session_id)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for NotetypeSettingsError {}
