//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BatchReport, FamilyStatus, Notetype, NotetypeSettingsApi, NotetypeSettingsError,
    SessionSnapshot, SettingSection, SettingValue,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl NotetypeSettingsApi for NativeClient {
    async fn list_families(&self) -> Result<Vec<FamilyStatus>, NotetypeSettingsError> {
        self.service.family_status().await
    }

    async fn family_definitions(
        &self,
        family: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError> {
        self.service.definitions_for_family(family).await
    }

    async fn general_definitions(&self) -> Result<Vec<SettingSection>, NotetypeSettingsError> {
        Ok(self.service.general_definitions())
    }

    async fn import_family(&self, family: &str) -> Result<Notetype, NotetypeSettingsError> {
        self.service.import_family(family).await
    }

    async fn reset_family(&self, family: &str) -> Result<Vec<String>, NotetypeSettingsError> {
        self.service.reset_family(family).await
    }

    async fn reset_all(&self) -> Result<Vec<String>, NotetypeSettingsError> {
        self.service.reset_all().await
    }

    async fn update_all(&self) -> Result<BatchReport, NotetypeSettingsError> {
        self.service.update_all().await
    }

    async fn convert_copies(&self) -> Result<Vec<String>, NotetypeSettingsError> {
        self.service.convert_copies().await
    }

    async fn open_session(
        &self,
        family: Option<String>,
        live: Option<Notetype>,
    ) -> Result<SessionSnapshot, NotetypeSettingsError> {
        self.service.open_session(family, live).await
    }

    async fn get_session(&self, id: Uuid) -> Result<SessionSnapshot, NotetypeSettingsError> {
        self.service.session(id)
    }

    async fn session_settings(
        &self,
        id: Uuid,
        scope: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError> {
        self.service.session_settings(id, scope).await
    }

    async fn update_session_values(
        &self,
        id: Uuid,
        values: Vec<(String, SettingValue)>,
    ) -> Result<SessionSnapshot, NotetypeSettingsError> {
        update_values(&self.service, id, values)
    }

    async fn save_session(&self, id: Uuid) -> Result<BatchReport, NotetypeSettingsError> {
        self.service.save_session(id).await
    }

    async fn close_session(&self, id: Uuid) -> Result<(), NotetypeSettingsError> {
        self.service.close_session(id)
    }
}

/// Apply several edits in order; stops at the first rejected value
pub(crate) fn update_values(
    service: &Service,
    id: Uuid,
    values: Vec<(String, SettingValue)>,
) -> Result<SessionSnapshot, NotetypeSettingsError> {
    for (key, value) in values {
        service.update_session_value(id, &key, value)?;
    }
    service.session(id)
}
