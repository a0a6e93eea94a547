//! Contract models for notetype settings
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};

/// A note type as stored by the host collection (a "template family" copy)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notetype {
    /// Host identifier, `0` for a notetype that was not added yet
    pub id: i64,
    /// Unique name (e.g. "ProjektAnkiCloze", "ProjektAnkiCloze-1dgs0")
    pub name: String,
    /// Card templates, at least one
    pub templates: Vec<CardTemplate>,
    /// Stylesheet shared by all templates
    pub css: String,
    /// Note fields in display order
    pub fields: Vec<NotetypeField>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
    /// Update sequence number, `-1` requests a full sync
    pub usn: i32,
}

/// One card template of a notetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: String,
    /// Front (question) template text
    pub front: String,
    /// Back (answer) template text
    pub back: String,
}

/// Note field descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotetypeField {
    pub name: String,
    /// Ordinal of the field contents inside existing notes
    pub ord: Option<u32>,
}

impl NotetypeField {
    pub fn new(name: impl Into<String>, ord: u32) -> Self {
        Self {
            name: name.into(),
            ord: Some(ord),
        }
    }
}

/// Which text blob of a notetype a setting lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingTarget {
    /// Front template of every card template
    Front,
    /// Back template of every card template
    Back,
    /// The shared stylesheet
    Style,
    /// Front and back template, both must carry the setting
    Both,
}

impl SettingTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Style => "style",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for SettingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of a notetype setting
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
    Integer(i64),
    Decimal(f64),
    List(Vec<String>),
}

impl SettingValue {
    /// Short name of the value shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{:?}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Decimal(value) => write!(f, "{}", value),
            Self::List(value) => write!(f, "[{}]", value.join(", ")),
        }
    }
}

/// Family overview shown in the configuration window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyStatus {
    /// Canonical family name
    pub name: String,
    /// Names of all copies of the family in the collection
    pub versions: Vec<String>,
    /// Version of the most basic copy, if it is in the collection
    pub installed_version: Option<String>,
    /// Version of the newest authored templates
    pub newest_version: Option<String>,
    /// Whether any copy is behind the newest authored version
    pub update_available: bool,
}

/// Display descriptor of a setting, with its current value when read from
/// an editing session
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    pub name: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub target: SettingTarget,
    /// Codec kind, e.g. "wrap_bool" or "number"
    pub kind: String,
    /// Allowed values of choice and user action settings
    pub options: Vec<String>,
    /// Display labels matching `options`
    pub option_labels: Vec<String>,
    /// Bounds and step of number settings
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub default: Option<SettingValue>,
    /// Field a field-derived setting belongs to
    pub configurable_field: Option<String>,
    pub value: Option<SettingValue>,
}

/// Settings shown under one heading
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSection {
    /// Section heading, `None` for settings without a section
    pub name: Option<String>,
    pub settings: Vec<SettingDescriptor>,
}

/// A setting that could not be read or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSetting {
    pub notetype: String,
    pub setting: String,
    pub message: String,
}

/// Outcome of a batch over several notetypes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Notetypes written by the batch
    pub notetypes: Vec<String>,
    /// Settings skipped by the batch
    pub failures: Vec<FailedSetting>,
    /// Human-readable summary of the failures, if any
    pub summary: Option<String>,
}

/// State of an editing session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: uuid::Uuid,
    pub family: Option<String>,
    /// Config store entries as `("{scope}.{setting}", value)`
    pub values: Vec<(String, SettingValue)>,
    /// Settings that could not be read when the session was opened
    pub failures: Vec<FailedSetting>,
    /// Live notetype of an attached editor, with the previewed values
    pub live: Option<Notetype>,
    pub opened_at: DateTime<Utc>,
}
