//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use crate::contract::{CardTemplate, Notetype, NotetypeField};
use super::entity;

// ===== Notetype Conversions =====

impl TryFrom<entity::Model> for Notetype {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let templates: Vec<TemplateJson> = serde_json::from_value(entity.templates)?;
        let fields: Vec<FieldJson> = serde_json::from_value(entity.fields)?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            templates: templates.into_iter().map(Into::into).collect(),
            css: entity.css,
            fields: fields.into_iter().map(Into::into).collect(),
            modified: entity.modified,
            usn: entity.usn,
        })
    }
}

impl TryFrom<&Notetype> for entity::ActiveModel {
    type Error = anyhow::Error;

    /// Active model for a notetype; an id of `0` is left unset so the
    /// database assigns one
    fn try_from(model: &Notetype) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        let templates: Vec<TemplateJson> = model.templates.iter().map(Into::into).collect();
        let fields: Vec<FieldJson> = model.fields.iter().map(Into::into).collect();

        Ok(Self {
            id: if model.id == 0 { NotSet } else { Set(model.id) },
            name: Set(model.name.clone()),
            templates: Set(serde_json::to_value(templates)?),
            fields: Set(serde_json::to_value(fields)?),
            css: Set(model.css.clone()),
            modified: Set(model.modified),
            usn: Set(model.usn),
        })
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of a card template for database storage
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct TemplateJson {
    name: String,
    front: String,
    back: String,
}

impl From<TemplateJson> for CardTemplate {
    fn from(json: TemplateJson) -> Self {
        Self {
            name: json.name,
            front: json.front,
            back: json.back,
        }
    }
}

impl From<&CardTemplate> for TemplateJson {
    fn from(template: &CardTemplate) -> Self {
        Self {
            name: template.name.clone(),
            front: template.front.clone(),
            back: template.back.clone(),
        }
    }
}

/// JSON representation of a note field for database storage
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct FieldJson {
    name: String,
    #[serde(default)]
    ord: Option<u32>,
}

impl From<FieldJson> for NotetypeField {
    fn from(json: FieldJson) -> Self {
        Self {
            name: json.name,
            ord: json.ord,
        }
    }
}

impl From<&NotetypeField> for FieldJson {
    fn from(field: &NotetypeField) -> Self {
        Self {
            name: field.name.clone(),
            ord: field.ord,
        }
    }
}
