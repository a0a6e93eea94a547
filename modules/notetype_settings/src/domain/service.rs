//! Domain service - business logic orchestration

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::codec::Codec;
use super::definitions::{
    group_by_section, order_configurable_fields, DefinitionError, DefinitionTable,
    SettingDefinition,
};
use super::events::{EventPublisher, NotetypeEvent};
use super::report::FailureReport;
use super::repository::{NotetypeRepository, TemplateCatalog};
use super::session::{EditingSession, SessionManager};
use super::settings;
use super::store::{ConfigStore, GENERAL_SCOPE};
use super::upgrade::{rehome_field_ords, upgrade};
use super::validation::{validate_key, validate_value};
use super::versions;
use crate::contract::{
    BatchReport, FailedSetting, FamilyStatus, Notetype, NotetypeSettingsError, SessionSnapshot,
    SettingDescriptor, SettingSection, SettingValue,
};

/// Tunables of the service
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Merge generated copies into their family before a session opens
    pub convert_copies_on_open: bool,
    /// Failures listed in a batch summary before it is truncated
    pub max_report_entries: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            convert_copies_on_open: false,
            max_report_entries: 10,
        }
    }
}

/// Domain service for notetype settings
pub struct Service {
    repo: Arc<dyn NotetypeRepository>,
    catalog: Arc<dyn TemplateCatalog>,
    definitions: DefinitionTable,
    event_publisher: Arc<dyn EventPublisher>,
    sessions: SessionManager,
    options: ServiceOptions,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repo: Arc<dyn NotetypeRepository>,
        catalog: Arc<dyn TemplateCatalog>,
        definitions: DefinitionTable,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repo,
            catalog,
            definitions,
            event_publisher,
            sessions: SessionManager::new(),
            options: ServiceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    // ===== Families =====

    /// Canonical names of all authored families
    pub fn family_names(&self) -> Vec<String> {
        self.catalog.family_names()
    }

    /// Names of all copies of a family in the collection, most basic first
    pub async fn versions_of(&self, family: &str) -> Result<Vec<String>, NotetypeSettingsError> {
        Ok(self
            .copies_of(family)
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// The copy whose settings represent the family
    pub async fn most_basic_version(
        &self,
        family: &str,
    ) -> Result<Option<String>, NotetypeSettingsError> {
        let names = self.versions_of(family).await?;
        Ok(versions::most_basic_version(names.iter().map(String::as_str)).map(str::to_string))
    }

    /// Overview of every family: copies, versions and pending updates
    pub async fn family_status(&self) -> Result<Vec<FamilyStatus>, NotetypeSettingsError> {
        let mut result = Vec::new();

        for family in self.family_names() {
            let newest = self.catalog.newest(&family);
            let mut copies = Vec::new();
            let mut installed_version = None;
            let mut update_available = false;

            for (index, (name, id)) in self.copies_of(&family).await?.into_iter().enumerate() {
                let notetype = self.load(id).await?;
                if index == 0 {
                    installed_version = versions::notetype_version(&notetype);
                }
                if let Some(newest) = &newest {
                    update_available |= versions::update_available(&notetype, newest);
                }
                copies.push(name);
            }

            result.push(FamilyStatus {
                newest_version: newest.as_ref().and_then(versions::notetype_version),
                name: family,
                versions: copies,
                installed_version,
                update_available,
            });
        }

        Ok(result)
    }

    // ===== Definitions =====

    /// Sectioned descriptors of every setting present on a family
    pub async fn definitions_for_family(
        &self,
        family: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError> {
        let notetype = match self.installed_model(family).await? {
            Some(notetype) => notetype,
            None => self.newest(family)?,
        };
        let definitions = self.family_definitions(&notetype)?;
        let field_order = self.definitions.configurable_fields(&notetype);

        Ok(sections(definitions, &field_order, None))
    }

    /// Descriptors of the settings shared by all families
    pub fn general_definitions(&self) -> Vec<SettingSection> {
        sections(self.definitions.general_definitions(), &[], None)
    }

    // ===== Reading and applying =====

    /// Read the settings of every family into a fresh config store.
    ///
    /// A `live` notetype stands in for the stored copy of its family. General
    /// values are reconciled from the stored most basic versions only, after
    /// all families were read.
    pub async fn read_settings(
        &self,
        live: Option<&Notetype>,
    ) -> Result<(ConfigStore, FailureReport), NotetypeSettingsError> {
        let families = self.family_names();
        let mut store = ConfigStore::new();
        let mut report = FailureReport::new();
        let mut stored_models = Vec::new();
        let mut read = 0usize;

        for family in &families {
            let live_model = live.filter(|live| {
                versions::base_family_name(&live.name, &families) == Some(family.as_str())
            });
            let stored = self.installed_model(family).await?;
            let Some(model) = live_model.cloned().or_else(|| stored.clone()) else {
                continue;
            };

            let definitions = self.family_definitions(&model)?;
            report.merge(settings::read_into_store(&model, family, &definitions, &mut store));
            read += 1;

            if let Some(stored) = stored {
                stored_models.push((family.clone(), stored));
            }
        }

        settings::reconcile_general(
            &self.definitions.general_definitions(),
            &stored_models,
            &mut store,
        );
        report.log("read settings");
        tracing::debug!(families = read, values = store.len(), "Read settings");

        Ok((store, report))
    }

    /// Apply the store to every copy of every family
    pub async fn apply_settings(
        &self,
        store: &ConfigStore,
    ) -> Result<BatchReport, NotetypeSettingsError> {
        let mut written = Vec::new();
        let mut report = FailureReport::new();

        for family in self.family_names() {
            self.apply_to_family(&family, store, &mut written, &mut report)
                .await?;
        }

        report.log("apply settings");
        tracing::info!(notetypes = written.len(), failures = report.len(), "Applied settings");
        Ok(self.batch_report(written, &report))
    }

    /// Apply the family's settings from the store to all of its copies
    pub async fn synchronize_copies(
        &self,
        family: &str,
        store: &ConfigStore,
    ) -> Result<BatchReport, NotetypeSettingsError> {
        if !self.family_names().iter().any(|name| name == family) {
            return Err(NotetypeSettingsError::NotetypeNotFound {
                name: family.to_string(),
            });
        }

        let mut written = Vec::new();
        let mut report = FailureReport::new();
        self.apply_to_family(family, store, &mut written, &mut report)
            .await?;

        report.log("synchronize copies");
        Ok(self.batch_report(written, &report))
    }

    /// Apply one setting of the store to an uncommitted notetype
    pub fn preview(
        &self,
        live: &Notetype,
        key: &str,
        store: &ConfigStore,
    ) -> Result<(Notetype, BatchReport), NotetypeSettingsError> {
        let (scope, setting) = validate_key(key)?;
        let families = self.family_names();
        let family = versions::base_family_name(&live.name, &families).ok_or_else(|| {
            NotetypeSettingsError::NotetypeNotFound {
                name: live.name.clone(),
            }
        })?;

        let mut scoped = store.clone();
        if scope == GENERAL_SCOPE {
            if let Some(value) = store.get(key) {
                scoped.set_setting(family, setting, value.clone());
            }
        }

        let definition = self.definition_for(Some(live), setting)?;
        let (updated, failures) = settings::preview(live, family, &definition, &scoped)?;
        Ok((updated, self.batch_report(vec![live.name.clone()], &failures)))
    }

    // ===== Versions =====

    /// Replace every copy of a family with the newest authored version
    pub async fn reset_family(&self, family: &str) -> Result<Vec<String>, NotetypeSettingsError> {
        let newest = self.newest(family)?;
        let mut names = Vec::new();

        for (name, id) in self.copies_of(family).await? {
            let old = self.load(id).await?;
            let upgraded = self.persist(upgrade(&old, &newest)).await?;
            self.publish(NotetypeEvent::upgraded(
                upgraded.id,
                &upgraded.name,
                versions::notetype_version(&old),
                versions::notetype_version(&upgraded),
            ))
            .await;
            names.push(name);
        }

        tracing::info!(family = family, notetypes = names.len(), "Reset family");
        Ok(names)
    }

    /// Reset every family that has authored templates
    pub async fn reset_all(&self) -> Result<Vec<String>, NotetypeSettingsError> {
        let mut names = Vec::new();
        for family in self.family_names() {
            names.extend(self.reset_family(&family).await?);
        }
        Ok(names)
    }

    /// Upgrade every copy that is behind the newest authored version and
    /// carry its settings over
    pub async fn update_all(&self) -> Result<BatchReport, NotetypeSettingsError> {
        let mut written = Vec::new();
        let mut report = FailureReport::new();

        for family in self.family_names() {
            let Some(newest) = self.catalog.newest(&family) else {
                continue;
            };

            for (name, id) in self.copies_of(&family).await? {
                let old = self.load(id).await?;
                if !versions::update_available(&old, &newest) {
                    continue;
                }

                let mut store = ConfigStore::new();
                let definitions = self.family_definitions(&old)?;
                report.merge(settings::read_into_store(&old, &family, &definitions, &mut store));

                let upgraded = upgrade(&old, &newest);
                let definitions = self.family_definitions(&upgraded)?;
                let (updated, failures) =
                    settings::apply(&upgraded, &family, &definitions, &store)?;
                report.merge(failures);

                let updated = self.persist(updated).await?;
                self.publish(NotetypeEvent::upgraded(
                    updated.id,
                    &updated.name,
                    versions::notetype_version(&old),
                    versions::notetype_version(&updated),
                ))
                .await;
                written.push(name);
            }
        }

        report.log("update notetypes");
        tracing::info!(notetypes = written.len(), "Updated notetypes");
        Ok(self.batch_report(written, &report))
    }

    /// Add the newest authored version of a family to the collection
    pub async fn import_family(&self, family: &str) -> Result<Notetype, NotetypeSettingsError> {
        let newest = self.newest(family)?;
        let existing = self
            .repo
            .find_by_name(family)
            .await
            .map_err(internal("find notetype"))?;
        if existing.is_some() {
            return Err(NotetypeSettingsError::Validation {
                message: format!("'{}' is already in the collection", family),
            });
        }

        let added = self
            .repo
            .add(&newest)
            .await
            .map_err(internal("add notetype"))?;
        tracing::info!(family = family, id = added.id, "Imported notetype");
        Ok(added)
    }

    // ===== Copies =====

    /// Generated copies (`"{family}-XXXXX"`) whose family is in the collection
    pub async fn extra_copies(&self) -> Result<Vec<String>, NotetypeSettingsError> {
        let families = self.family_names();
        let names: Vec<String> = self
            .repo
            .list_names_and_ids()
            .await
            .map_err(internal("list notetypes"))?
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        Ok(names
            .iter()
            .filter(|name| {
                versions::base_family_name(name, &families).is_some_and(|family| {
                    versions::is_copy_of(name, family) && names.iter().any(|other| other == family)
                })
            })
            .cloned()
            .collect())
    }

    /// Merge every generated copy into its family: the copy is made
    /// identical to the family, its notes are moved over and it is removed
    pub async fn convert_copies(&self) -> Result<Vec<String>, NotetypeSettingsError> {
        let mut removed = Vec::new();

        for family in self.family_names() {
            let Some(base) = self
                .repo
                .find_by_name(&family)
                .await
                .map_err(internal("find notetype"))?
            else {
                continue;
            };

            let copies: Vec<(String, i64)> = self
                .copies_of(&family)
                .await?
                .into_iter()
                .filter(|(name, _)| versions::is_copy_of(name, &family))
                .collect();
            if copies.is_empty() {
                continue;
            }

            let mut family_removed = Vec::new();
            let mut notes_moved = 0;
            for (name, id) in copies {
                let copy = self.load(id).await?;

                let mut converted = base.clone();
                converted.id = copy.id;
                converted.name = copy.name.clone();
                converted.fields = rehome_field_ords(&copy.fields, base.fields.clone());
                converted.modified = Utc::now();
                converted.usn = -1;
                self.persist(converted).await?;

                let note_ids = self
                    .repo
                    .note_ids(copy.id)
                    .await
                    .map_err(internal("list notes"))?;
                self.repo
                    .change_notetype(&note_ids, base.id)
                    .await
                    .map_err(internal("change notetype"))?;
                self.repo
                    .remove(copy.id)
                    .await
                    .map_err(internal("remove notetype"))?;

                tracing::debug!(copy = %name, notes = note_ids.len(), "Converted copy");
                notes_moved += note_ids.len();
                family_removed.push(name);
            }

            self.publish(NotetypeEvent::copies_converted(
                &family,
                family_removed.clone(),
                notes_moved,
            ))
            .await;
            removed.extend(family_removed);
        }

        if !removed.is_empty() {
            tracing::info!(copies = removed.len(), "Converted copies");
        }
        Ok(removed)
    }

    // ===== Editing sessions =====

    /// Open the editing session, optionally focused on a family and attached
    /// to the live notetype of an editor
    pub async fn open_session(
        &self,
        family: Option<String>,
        live: Option<Notetype>,
    ) -> Result<SessionSnapshot, NotetypeSettingsError> {
        self.sessions.ensure_closed()?;
        if let Some(family) = &family {
            if !self.family_names().contains(family) {
                return Err(NotetypeSettingsError::NotetypeNotFound {
                    name: family.clone(),
                });
            }
        }

        if self.options.convert_copies_on_open {
            self.convert_copies().await?;
        }

        let (store, report) = self.read_settings(live.as_ref()).await?;
        let session = self.sessions.open(family, live, store)?;
        tracing::info!(session_id = %session.id, "Opened editing session");

        Ok(snapshot(
            &session,
            report.failures().iter().map(FailedSetting::from).collect(),
        ))
    }

    pub fn session(&self, id: Uuid) -> Result<SessionSnapshot, NotetypeSettingsError> {
        Ok(snapshot(&self.sessions.get(id)?, Vec::new()))
    }

    /// Settings of one scope (a family or "general") with the session's values
    pub async fn session_settings(
        &self,
        id: Uuid,
        scope: &str,
    ) -> Result<Vec<SettingSection>, NotetypeSettingsError> {
        let session = self.sessions.get(id)?;
        if scope == GENERAL_SCOPE {
            return Ok(sections(
                self.definitions.general_definitions(),
                &[],
                Some((&session.store, GENERAL_SCOPE)),
            ));
        }

        let families = self.family_names();
        let live = session
            .live
            .clone()
            .filter(|live| versions::base_family_name(&live.name, &families) == Some(scope));
        let notetype = match live {
            Some(live) => live,
            None => self.installed_model(scope).await?.ok_or_else(|| {
                NotetypeSettingsError::NotetypeNotFound {
                    name: scope.to_string(),
                }
            })?,
        };

        let definitions = self.family_definitions(&notetype)?;
        let field_order = self.definitions.configurable_fields(&notetype);
        Ok(sections(
            definitions,
            &field_order,
            Some((&session.store, scope)),
        ))
    }

    /// Set one value in the session store. General values fan out to every
    /// family; an attached live notetype gets a preview of the change.
    pub fn update_session_value(
        &self,
        id: Uuid,
        key: &str,
        value: SettingValue,
    ) -> Result<SessionSnapshot, NotetypeSettingsError> {
        let (scope, setting) = validate_key(key)?;
        let families = self.family_names();
        let general = scope == GENERAL_SCOPE;
        if !general && !families.iter().any(|family| family == scope) {
            return Err(NotetypeSettingsError::NotetypeNotFound {
                name: scope.to_string(),
            });
        }

        let live = self.sessions.get(id)?.live;
        let definition = self.definition_for(live.as_ref(), setting)?;
        if general && !self.definitions.is_general(setting) {
            return Err(NotetypeSettingsError::Validation {
                message: format!("'{}' is not a general setting", setting),
            });
        }
        validate_value(&definition, &value)?;

        self.sessions.with_session(id, |session| {
            let mut store = session.store.clone();
            if general {
                store.set_general(setting, value, &families);
            } else {
                store.set(key, value);
            }

            let mut live = session.live.clone();
            if let Some(notetype) = &live {
                let family = versions::base_family_name(&notetype.name, &families).filter(|family| {
                    (general || *family == scope) && definition.is_present(notetype)
                });
                if let Some(family) = family {
                    let (updated, failures) =
                        settings::preview(notetype, family, &definition, &store)?;
                    if let Some(failure) = failures.failures().first() {
                        return Err(failure.to_error());
                    }
                    live = Some(updated);
                }
            }

            session.store = store;
            session.live = live;
            Ok(())
        })??;

        tracing::debug!(session_id = %id, key = key, "Updated session value");
        self.session(id)
    }

    /// Apply the session's store to the collection
    pub async fn save_session(&self, id: Uuid) -> Result<BatchReport, NotetypeSettingsError> {
        let store = self.sessions.get(id)?.store;
        let report = self.apply_settings(&store).await?;
        tracing::info!(session_id = %id, notetypes = report.notetypes.len(), "Saved editing session");
        Ok(report)
    }

    pub fn close_session(&self, id: Uuid) -> Result<(), NotetypeSettingsError> {
        self.sessions.close(id)?;
        tracing::info!(session_id = %id, "Closed editing session");
        Ok(())
    }

    // ===== Helper Methods =====

    /// Copies of a family in the collection, most basic first
    async fn copies_of(&self, family: &str) -> Result<Vec<(String, i64)>, NotetypeSettingsError> {
        let families = self.family_names();
        let mut copies: Vec<(String, i64)> = self
            .repo
            .list_names_and_ids()
            .await
            .map_err(internal("list notetypes"))?
            .into_iter()
            .filter(|(name, _)| {
                versions::is_version_of(name, family)
                    && versions::base_family_name(name, &families) == Some(family)
            })
            .collect();

        copies.sort_by(|(a, _), (b, _)| (a.len(), a).cmp(&(b.len(), b)));
        Ok(copies)
    }

    async fn installed_model(
        &self,
        family: &str,
    ) -> Result<Option<Notetype>, NotetypeSettingsError> {
        let Some(name) = self.most_basic_version(family).await? else {
            return Ok(None);
        };
        self.repo
            .find_by_name(&name)
            .await
            .map_err(internal("find notetype"))
    }

    async fn load(&self, id: i64) -> Result<Notetype, NotetypeSettingsError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(internal("find notetype"))?
            .ok_or_else(|| NotetypeSettingsError::NotetypeNotFound {
                name: id.to_string(),
            })
    }

    async fn persist(&self, notetype: Notetype) -> Result<Notetype, NotetypeSettingsError> {
        self.repo
            .update(&notetype)
            .await
            .map_err(internal("update notetype"))
    }

    fn newest(&self, family: &str) -> Result<Notetype, NotetypeSettingsError> {
        self.catalog
            .newest(family)
            .ok_or_else(|| NotetypeSettingsError::NotetypeNotFound {
                name: family.to_string(),
            })
    }

    fn family_definitions(
        &self,
        notetype: &Notetype,
    ) -> Result<Vec<Arc<SettingDefinition>>, NotetypeSettingsError> {
        self.definitions
            .definitions_for_template_family(notetype)
            .map_err(definition_error)
    }

    /// Field definition derived from `notetype`, else the table's definition
    fn definition_for(
        &self,
        notetype: Option<&Notetype>,
        setting: &str,
    ) -> Result<Arc<SettingDefinition>, NotetypeSettingsError> {
        if let Some(notetype) = notetype {
            let dynamic = self
                .definitions
                .dynamic_field_definitions(notetype)
                .map_err(definition_error)?;
            if let Some(definition) = dynamic.into_iter().find(|d| d.name == setting) {
                return Ok(Arc::new(definition));
            }
        }
        self.definitions
            .get(setting)
            .ok_or_else(|| NotetypeSettingsError::Validation {
                message: format!("unknown setting '{}'", setting),
            })
    }

    async fn apply_to_family(
        &self,
        family: &str,
        store: &ConfigStore,
        written: &mut Vec<String>,
        report: &mut FailureReport,
    ) -> Result<(), NotetypeSettingsError> {
        for (name, id) in self.copies_of(family).await? {
            let notetype = self.load(id).await?;
            let definitions = self.family_definitions(&notetype)?;
            let (mut updated, failures) = settings::apply(&notetype, family, &definitions, store)?;
            report.merge(failures.clone());

            if updated == notetype {
                continue;
            }
            updated.modified = Utc::now();
            updated.usn = -1;
            let updated = self.persist(updated).await?;
            self.publish(NotetypeEvent::settings_applied(
                updated.id,
                &updated.name,
                failures.len(),
            ))
            .await;
            written.push(name);
        }
        Ok(())
    }

    async fn publish(&self, event: NotetypeEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(error = %e, "Failed to publish notetype event");
        }
    }

    fn batch_report(&self, notetypes: Vec<String>, report: &FailureReport) -> BatchReport {
        BatchReport {
            notetypes,
            failures: report.failures().iter().map(FailedSetting::from).collect(),
            summary: (!report.is_empty()).then(|| report.summary(self.options.max_report_entries)),
        }
    }
}

fn internal(operation: &'static str) -> impl Fn(anyhow::Error) -> NotetypeSettingsError {
    move |error| {
        tracing::error!(operation = operation, error = %error, "Repository call failed");
        NotetypeSettingsError::Internal
    }
}

fn definition_error(error: DefinitionError) -> NotetypeSettingsError {
    tracing::error!(error = %error, "Invalid setting definition");
    NotetypeSettingsError::Internal
}

fn snapshot(session: &EditingSession, failures: Vec<FailedSetting>) -> SessionSnapshot {
    SessionSnapshot {
        id: session.id,
        family: session.family.clone(),
        values: session
            .store
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        failures,
        live: session.live.clone(),
        opened_at: session.opened_at,
    }
}

fn sections(
    definitions: Vec<Arc<SettingDefinition>>,
    field_order: &[String],
    values: Option<(&ConfigStore, &str)>,
) -> Vec<SettingSection> {
    let ordered = order_configurable_fields(definitions, field_order);
    group_by_section(&ordered)
        .into_iter()
        .map(|section| SettingSection {
            name: section.name,
            settings: section
                .definitions
                .iter()
                .map(|definition| {
                    let value = values
                        .and_then(|(store, scope)| store.get_setting(scope, &definition.name))
                        .cloned();
                    describe(definition, value)
                })
                .collect(),
        })
        .collect()
}

fn describe(definition: &SettingDefinition, value: Option<SettingValue>) -> SettingDescriptor {
    let (min, max, step) = match &definition.codec {
        Codec::Number { min, max, step, .. } => (Some(*min), Some(*max), Some(*step)),
        _ => (None, None, None),
    };

    SettingDescriptor {
        name: definition.name.clone(),
        label: definition.label.clone(),
        tooltip: definition.tooltip.clone(),
        target: definition.target,
        kind: definition.codec.kind().to_string(),
        options: definition.codec.options().map(<[String]>::to_vec).unwrap_or_default(),
        option_labels: definition.codec.labels().map(<[String]>::to_vec).unwrap_or_default(),
        min,
        max,
        step,
        default: definition.default.clone(),
        configurable_field: definition.configurable_field_name.clone(),
        value,
    }
}
