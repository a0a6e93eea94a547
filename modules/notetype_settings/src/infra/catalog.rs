//! Template catalog: the newest authored version of every family
//!
//! Authored families are shipped as one directory per family:
//!
//! ```text
//! <dir>/<Family>/Front Template.html
//! <dir>/<Family>/Back Template.html
//! <dir>/<Family>/Styling.css
//! <dir>/<Family>/<Family>.json      notetype record without template texts
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::contract::{CardTemplate, Notetype, NotetypeField};
use crate::domain::repository::TemplateCatalog;

const FRONT_FILE: &str = "Front Template.html";
const BACK_FILE: &str = "Back Template.html";
const STYLE_FILE: &str = "Styling.css";

/// Catalog holding authored notetypes in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    families: BTreeMap<String, Notetype>,
}

impl StaticCatalog {
    pub fn new(families: impl IntoIterator<Item = Notetype>) -> Self {
        Self {
            families: families
                .into_iter()
                .map(|mut notetype| {
                    notetype.id = 0;
                    (notetype.name.clone(), notetype)
                })
                .collect(),
        }
    }
}

impl TemplateCatalog for StaticCatalog {
    fn family_names(&self) -> Vec<String> {
        self.families.keys().cloned().collect()
    }

    fn newest(&self, family: &str) -> Option<Notetype> {
        self.families.get(family).cloned()
    }
}

/// Catalog read from a directory of authored families
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    inner: StaticCatalog,
}

impl DirectoryCatalog {
    /// Read every family directory below `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut families = Vec::new();

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read template directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            families.push(load_family(&path, name)?);
        }

        tracing::info!(
            families = families.len(),
            dir = %dir.display(),
            "Loaded template catalog"
        );
        Ok(Self {
            inner: StaticCatalog::new(families),
        })
    }
}

impl TemplateCatalog for DirectoryCatalog {
    fn family_names(&self) -> Vec<String> {
        self.inner.family_names()
    }

    fn newest(&self, family: &str) -> Option<Notetype> {
        self.inner.newest(family)
    }
}

/// Notetype record as exported from the host
#[derive(Debug, Deserialize)]
struct NotetypeJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "flds", default)]
    fields: Vec<FieldJson>,
    #[serde(rename = "tmpls", default)]
    templates: Vec<TemplateJson>,
    #[serde(rename = "mod", default)]
    modified: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FieldJson {
    name: String,
    #[serde(default)]
    ord: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TemplateJson {
    name: String,
    #[serde(rename = "qfmt", default)]
    front: String,
    #[serde(rename = "afmt", default)]
    back: String,
}

fn load_family(path: &Path, name: &str) -> Result<Notetype> {
    let read = |file: &str| {
        fs::read_to_string(path.join(file))
            .with_context(|| format!("Failed to read {} of family '{}'", file, name))
    };

    let record: NotetypeJson = serde_json::from_str(&read(&format!("{}.json", name))?)
        .with_context(|| format!("Invalid notetype record of family '{}'", name))?;

    let mut templates: Vec<CardTemplate> = record
        .templates
        .into_iter()
        .map(|template| CardTemplate {
            name: template.name,
            front: template.front,
            back: template.back,
        })
        .collect();
    if templates.is_empty() {
        templates.push(CardTemplate {
            name: "Card 1".to_string(),
            front: String::new(),
            back: String::new(),
        });
    }
    // The template files hold the texts of the first card template
    templates[0].front = read(FRONT_FILE)?;
    templates[0].back = read(BACK_FILE)?;

    tracing::debug!(family = name, templates = templates.len(), "Loaded family");
    Ok(Notetype {
        id: 0,
        name: record.name.unwrap_or_else(|| name.to_string()),
        templates,
        css: read(STYLE_FILE)?,
        fields: record
            .fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| NotetypeField {
                ord: field.ord.or(Some(index as u32)),
                name: field.name,
            })
            .collect(),
        modified: record
            .modified
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
            .unwrap_or_else(Utc::now),
        usn: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_family(dir: &Path, name: &str, json: &str) {
        let family = dir.join(name);
        fs::create_dir(&family).unwrap();
        fs::write(family.join(FRONT_FILE), "<!-- version 2 -->\n{{Text}}").unwrap();
        fs::write(family.join(BACK_FILE), "{{Extra}}").unwrap();
        fs::write(family.join(STYLE_FILE), ".card {}").unwrap();
        fs::write(family.join(format!("{}.json", name)), json).unwrap();
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_family(
            dir.path(),
            "Cloze",
            r#"{"name": "Cloze", "id": 0, "flds": [{"name": "Text", "ord": 0}, {"name": "Extra", "ord": 1}],
                "tmpls": [{"name": "Cloze", "qfmt": "", "afmt": "", "ord": 0}], "css": "", "mod": 1700000000}"#,
        );
        write_family(dir.path(), "Basic", r#"{"flds": [{"name": "Front"}]}"#);
        fs::write(dir.path().join("README.md"), "not a family").unwrap();

        let catalog = DirectoryCatalog::load(dir.path()).unwrap();

        assert_eq!(catalog.family_names(), vec!["Basic", "Cloze"]);
        let cloze = catalog.newest("Cloze").unwrap();
        assert_eq!(cloze.templates[0].name, "Cloze");
        assert_eq!(cloze.templates[0].back, "{{Extra}}");
        assert_eq!(cloze.css, ".card {}");
        assert_eq!(cloze.fields[1], NotetypeField::new("Extra", 1));

        let basic = catalog.newest("Basic").unwrap();
        assert_eq!(basic.templates[0].name, "Card 1");
        assert_eq!(basic.fields[0].ord, Some(0));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Broken")).unwrap();

        let err = DirectoryCatalog::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_static_catalog_resets_ids() {
        let notetype = Notetype {
            id: 5,
            name: "Cloze".to_string(),
            templates: Vec::new(),
            css: String::new(),
            fields: Vec::new(),
            modified: Utc::now(),
            usn: 0,
        };

        let catalog = StaticCatalog::new([notetype]);
        assert_eq!(catalog.newest("Cloze").unwrap().id, 0);
        assert!(catalog.newest("Basic").is_none());
    }
}
