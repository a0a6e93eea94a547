//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules (e.g. the host's notetype
//! editor) use to configure template families.
//! NO HTTP - direct function calls for performance.

use super::{
    error::NotetypeSettingsError,
    model::{BatchReport, FamilyStatus, Notetype, SessionSnapshot, SettingSection, SettingValue},
};
use async_trait::async_trait;
use uuid::Uuid;

/// Notetype settings API for inter-module communication
#[async_trait]
pub trait NotetypeSettingsApi: Send + Sync {
    // ===== Families =====

    /// All authored families with their copies and update state
    async fn list_families(&self) -> Result<Vec<FamilyStatus>, NotetypeSettingsError>;

    /// Settings present on a family, grouped by section
    async fn family_definitions(
        &self,
        family: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError>;

    /// Settings shared by all families
    async fn general_definitions(&self) -> Result<Vec<SettingSection>, NotetypeSettingsError>;

    /// Add the newest authored version of a family to the collection
    async fn import_family(&self, family: &str) -> Result<Notetype, NotetypeSettingsError>;

    /// Replace all copies of a family with the newest authored version
    async fn reset_family(&self, family: &str) -> Result<Vec<String>, NotetypeSettingsError>;

    /// Reset every family
    async fn reset_all(&self) -> Result<Vec<String>, NotetypeSettingsError>;

    /// Upgrade outdated copies, keeping their settings
    async fn update_all(&self) -> Result<BatchReport, NotetypeSettingsError>;

    /// Merge generated copies into their families
    async fn convert_copies(&self) -> Result<Vec<String>, NotetypeSettingsError>;

    // ===== Editing sessions =====

    /// Open the editing session
    async fn open_session(
        &self,
        family: Option<String>,
        live: Option<Notetype>,
    ) -> Result<SessionSnapshot, NotetypeSettingsError>;

    /// Current state of a session
    async fn get_session(&self, id: Uuid) -> Result<SessionSnapshot, NotetypeSettingsError>;

    /// Settings of a family or of the "general" scope with the session's values
    async fn session_settings(
        &self,
        id: Uuid,
        scope: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError>;

    /// Change values of a session; keys are `"{scope}.{setting}"`
    async fn update_session_values(
        &self,
        id: Uuid,
        values: Vec<(String, SettingValue)>,
    ) -> Result<SessionSnapshot, NotetypeSettingsError>;

    /// Write the session's values to the collection
    async fn save_session(&self, id: Uuid) -> Result<BatchReport, NotetypeSettingsError>;

    /// Close a session without saving
    async fn close_session(&self, id: Uuid) -> Result<(), NotetypeSettingsError>;
}
