//! REST DTOs with serde derives for HTTP API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Value DTOs =====

/// Setting value; the JSON type selects the variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SettingValueDto {
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    List(Vec<String>),
}

// ===== Family DTOs =====

/// Family overview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamilyStatusDto {
    /// Canonical family name
    #[schema(example = "ProjektAnkiCloze")]
    pub name: String,

    /// Copies of the family in the collection, most basic first
    pub versions: Vec<String>,

    /// Version of the installed family
    pub installed_version: Option<String>,

    /// Version of the newest authored templates
    pub newest_version: Option<String>,

    /// Whether an update is available
    pub update_available: bool,
}

/// Family list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamiliesListResponse {
    pub items: Vec<FamilyStatusDto>,
    pub total: usize,
}

/// Names of the notetypes touched by an operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NamesResponse {
    pub names: Vec<String>,
}

// ===== Definition DTOs =====

/// Setting descriptor for the configuration UI
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingDescriptorDto {
    #[schema(example = "autoflip")]
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// "front", "back", "style" or "both"
    pub target: String,
    /// Codec kind, e.g. "wrap_bool"
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<SettingValueDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurable_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SettingValueDto>,
}

/// Settings under one heading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingSectionDto {
    pub name: Option<String>,
    pub settings: Vec<SettingDescriptorDto>,
}

/// Sectioned settings response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SectionsResponse {
    pub sections: Vec<SettingSectionDto>,
}

// ===== Notetype DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardTemplateDto {
    pub name: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotetypeFieldDto {
    pub name: String,
    #[serde(default)]
    pub ord: Option<u32>,
}

/// Notetype record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotetypeDto {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub templates: Vec<CardTemplateDto>,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub fields: Vec<NotetypeFieldDto>,
    #[serde(default = "chrono::Utc::now")]
    pub modified: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub usn: i32,
}

// ===== Batch DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FailedSettingDto {
    pub notetype: String,
    pub setting: String,
    pub message: String,
}

/// Outcome of a batch over several notetypes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchReportDto {
    /// Notetypes written by the batch
    pub notetypes: Vec<String>,
    pub failures: Vec<FailedSettingDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// ===== Session DTOs =====

/// Open session request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    /// Family to focus
    #[serde(default)]
    pub family: Option<String>,

    /// Uncommitted notetype of an open editor
    #[serde(default)]
    pub live: Option<NotetypeDto>,
}

/// Editing session response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    pub family: Option<String>,
    /// Values keyed by `"{scope}.{setting}"`
    pub values: BTreeMap<String, SettingValueDto>,
    #[serde(default)]
    pub failures: Vec<FailedSettingDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<NotetypeDto>,
    pub opened_at: chrono::DateTime<chrono::Utc>,
}

/// Values to set in one scope, keyed by setting name
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateValuesRequest {
    pub values: BTreeMap<String, SettingValueDto>,
}
