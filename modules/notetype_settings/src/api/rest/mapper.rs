//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

// ===== Value conversions =====

impl From<contract::SettingValue> for SettingValueDto {
    fn from(value: contract::SettingValue) -> Self {
        match value {
            contract::SettingValue::Bool(value) => Self::Bool(value),
            contract::SettingValue::Integer(value) => Self::Integer(value),
            contract::SettingValue::Decimal(value) => Self::Decimal(value),
            contract::SettingValue::Text(value) => Self::Text(value),
            contract::SettingValue::List(value) => Self::List(value),
        }
    }
}

impl From<SettingValueDto> for contract::SettingValue {
    fn from(value: SettingValueDto) -> Self {
        match value {
            SettingValueDto::Bool(value) => Self::Bool(value),
            SettingValueDto::Integer(value) => Self::Integer(value),
            SettingValueDto::Decimal(value) => Self::Decimal(value),
            SettingValueDto::Text(value) => Self::Text(value),
            SettingValueDto::List(value) => Self::List(value),
        }
    }
}

// ===== Family conversions =====

impl From<contract::FamilyStatus> for FamilyStatusDto {
    fn from(status: contract::FamilyStatus) -> Self {
        Self {
            name: status.name,
            versions: status.versions,
            installed_version: status.installed_version,
            newest_version: status.newest_version,
            update_available: status.update_available,
        }
    }
}

// ===== Definition conversions =====

impl From<contract::SettingDescriptor> for SettingDescriptorDto {
    fn from(descriptor: contract::SettingDescriptor) -> Self {
        Self {
            name: descriptor.name,
            label: descriptor.label,
            tooltip: descriptor.tooltip,
            target: descriptor.target.to_string(),
            kind: descriptor.kind,
            options: descriptor.options,
            option_labels: descriptor.option_labels,
            min: descriptor.min,
            max: descriptor.max,
            step: descriptor.step,
            default: descriptor.default.map(Into::into),
            configurable_field: descriptor.configurable_field,
            value: descriptor.value.map(Into::into),
        }
    }
}

impl From<contract::SettingSection> for SettingSectionDto {
    fn from(section: contract::SettingSection) -> Self {
        Self {
            name: section.name,
            settings: section.settings.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<contract::SettingSection>> for SectionsResponse {
    fn from(sections: Vec<contract::SettingSection>) -> Self {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
        }
    }
}

// ===== Notetype conversions =====

impl From<contract::Notetype> for NotetypeDto {
    fn from(notetype: contract::Notetype) -> Self {
        Self {
            id: notetype.id,
            name: notetype.name,
            templates: notetype
                .templates
                .into_iter()
                .map(|template| CardTemplateDto {
                    name: template.name,
                    front: template.front,
                    back: template.back,
                })
                .collect(),
            css: notetype.css,
            fields: notetype
                .fields
                .into_iter()
                .map(|field| NotetypeFieldDto {
                    name: field.name,
                    ord: field.ord,
                })
                .collect(),
            modified: notetype.modified,
            usn: notetype.usn,
        }
    }
}

impl From<NotetypeDto> for contract::Notetype {
    fn from(dto: NotetypeDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            templates: dto
                .templates
                .into_iter()
                .map(|template| contract::CardTemplate {
                    name: template.name,
                    front: template.front,
                    back: template.back,
                })
                .collect(),
            css: dto.css,
            fields: dto
                .fields
                .into_iter()
                .map(|field| contract::NotetypeField {
                    name: field.name,
                    ord: field.ord,
                })
                .collect(),
            modified: dto.modified,
            usn: dto.usn,
        }
    }
}

// ===== Batch conversions =====

impl From<contract::FailedSetting> for FailedSettingDto {
    fn from(failure: contract::FailedSetting) -> Self {
        Self {
            notetype: failure.notetype,
            setting: failure.setting,
            message: failure.message,
        }
    }
}

impl From<contract::BatchReport> for BatchReportDto {
    fn from(report: contract::BatchReport) -> Self {
        Self {
            notetypes: report.notetypes,
            failures: report.failures.into_iter().map(Into::into).collect(),
            summary: report.summary,
        }
    }
}

// ===== Session conversions =====

impl From<contract::SessionSnapshot> for SessionDto {
    fn from(session: contract::SessionSnapshot) -> Self {
        Self {
            id: session.id,
            family: session.family,
            values: session
                .values
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
            failures: session.failures.into_iter().map(Into::into).collect(),
            live: session.live.map(Into::into),
            opened_at: session.opened_at,
        }
    }
}
