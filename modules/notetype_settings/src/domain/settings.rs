//! Reading and applying setting batches on notetypes
//!
//! Everything here is synchronous and works on clones. Per-setting failures
//! are collected into a [`FailureReport`]; a notetype whose templates do not
//! agree on where a setting lives is rejected as a whole.

use std::sync::Arc;

use super::codec::{self, SettingParseError};
use super::definitions::SettingDefinition;
use super::report::{FailureReport, SettingFailure};
use super::store::{ConfigStore, GENERAL_SCOPE};
use crate::contract::{Notetype, NotetypeSettingsError, SettingTarget, SettingValue};

/// Definitions that are present on every template of `notetype`
pub fn settings_present_on(
    definitions: &[Arc<SettingDefinition>],
    notetype: &Notetype,
) -> Vec<Arc<SettingDefinition>> {
    definitions
        .iter()
        .filter(|definition| definition.is_present(notetype))
        .cloned()
        .collect()
}

/// Apply every definition that has a value (from `store`, else its default).
///
/// Each definition is applied to all templates or not at all. Returns the
/// updated notetype together with the failures of individual settings.
pub fn apply(
    notetype: &Notetype,
    family: &str,
    definitions: &[Arc<SettingDefinition>],
    store: &ConfigStore,
) -> Result<(Notetype, FailureReport), NotetypeSettingsError> {
    let mut result = notetype.clone();
    let mut report = FailureReport::new();

    for definition in definitions {
        let Some(value) = store
            .get(&definition.key(family))
            .or(definition.default.as_ref())
        else {
            continue;
        };

        match apply_one(&result, definition, value) {
            Ok(updated) => result = updated,
            Err(ApplyError::Setting(error)) => {
                tracing::debug!(
                    notetype = %notetype.name,
                    setting = %definition.name,
                    error = %error,
                    "Skipping setting"
                );
                report.push(SettingFailure::new(&notetype.name, error));
            }
            Err(ApplyError::Structural(error)) => return Err(error),
        }
    }

    Ok((result, report))
}

/// Decode every present setting into `store` under the family's keys.
/// Settings that fail to decode are left out and reported.
pub fn read_into_store(
    notetype: &Notetype,
    family: &str,
    definitions: &[Arc<SettingDefinition>],
    store: &mut ConfigStore,
) -> FailureReport {
    let mut report = FailureReport::new();

    for definition in definitions {
        match read_value(notetype, definition) {
            Ok(value) => store.set(definition.key(family), value),
            Err(error) => report.push(SettingFailure::new(&notetype.name, error)),
        }
    }

    report
}

/// Current value of a setting, decoded from the first template
pub fn read_value(
    notetype: &Notetype,
    definition: &SettingDefinition,
) -> Result<SettingValue, SettingParseError> {
    let text = notetype
        .templates
        .first()
        .and_then(|template| {
            definition
                .texts_of(template, &notetype.css)
                .first()
                .copied()
        })
        .ok_or_else(|| SettingParseError::NotFound {
            setting: definition.name.clone(),
        })?;

    codec::decode(definition, text)
}

/// Install the general values: the default first, then the value every
/// family agrees on. Disagreement or a decode failure keeps the default.
pub fn reconcile_general(
    general_definitions: &[Arc<SettingDefinition>],
    models: &[(String, Notetype)],
    store: &mut ConfigStore,
) {
    for definition in general_definitions {
        let key = definition.key(GENERAL_SCOPE);
        if let Some(default) = &definition.default {
            store.set(key.clone(), default.clone());
        }

        let values: Result<Vec<SettingValue>, SettingParseError> = models
            .iter()
            .filter(|(_, model)| definition.is_present(model))
            .map(|(_, model)| read_value(model, definition))
            .collect();

        let Ok(values) = values else {
            continue;
        };
        let Some((first, rest)) = values.split_first() else {
            continue;
        };
        if rest.iter().all(|value| value == first) {
            store.set(key, first.clone());
        }
    }
}

/// Live update of a single setting on an uncommitted notetype
pub fn preview(
    notetype: &Notetype,
    family: &str,
    definition: &Arc<SettingDefinition>,
    store: &ConfigStore,
) -> Result<(Notetype, FailureReport), NotetypeSettingsError> {
    apply(notetype, family, std::slice::from_ref(definition), store)
}

enum ApplyError {
    Setting(SettingParseError),
    Structural(NotetypeSettingsError),
}

fn apply_one(
    notetype: &Notetype,
    definition: &SettingDefinition,
    value: &SettingValue,
) -> Result<Notetype, ApplyError> {
    let templates = notetype.templates.len();
    let sections = notetype
        .templates
        .iter()
        .filter(|template| {
            definition
                .texts_of(template, &notetype.css)
                .into_iter()
                .all(|text| codec::locate(definition, text).is_ok())
        })
        .count();

    if templates == 0 || (sections > 0 && sections != templates) {
        return Err(ApplyError::Structural(
            NotetypeSettingsError::StructuralMismatch {
                setting: definition.name.clone(),
                notetype: notetype.name.clone(),
                templates,
                sections,
            },
        ));
    }
    if sections == 0 {
        return Err(ApplyError::Setting(SettingParseError::NotFound {
            setting: definition.name.clone(),
        }));
    }

    let mut result = notetype.clone();
    match definition.target {
        SettingTarget::Style => {
            result.css = codec::encode(definition, &result.css, value).map_err(ApplyError::Setting)?;
        }
        SettingTarget::Front | SettingTarget::Back | SettingTarget::Both => {
            for template in &mut result.templates {
                if matches!(definition.target, SettingTarget::Front | SettingTarget::Both) {
                    template.front =
                        codec::encode(definition, &template.front, value).map_err(ApplyError::Setting)?;
                }
                if matches!(definition.target, SettingTarget::Back | SettingTarget::Both) {
                    template.back =
                        codec::encode(definition, &template.back, value).map_err(ApplyError::Setting)?;
                }
            }
        }
    }

    Ok(result)
}
