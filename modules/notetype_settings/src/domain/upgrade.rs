//! Upgrading a notetype to the newest authored version of its family
//!
//! The notetype keeps its identity and name. Field ordinals are re-homed by
//! name, third-party modification blocks are re-appended and everything
//! below the managed-content end comment is carried over.

use chrono::Utc;

use crate::contract::{CardTemplate, Notetype, NotetypeField};

/// Field kept from the old notetype when the new version lacks it
pub const ANKIHUB_ID_FIELD: &str = "ankihub_id";

const MODIFICATIONS_BEGIN: &str = "<!-- BEGIN ANKIHUB MODFICATIONS -->";
const MODIFICATIONS_END: &str = "<!-- END ANKIHUB MODFICATIONS -->";

/// Content below this comment belongs to the user
pub const END_COMMENT: &str = "<!--\n\
ANKIHUB_END\n\
Text below this comment will not be modified by AnkiHub or AnKing add-ons.\n\
Do not edit or remove this comment if you want to protect the content below.\n\
-->";

/// `newest` with the identity, fields and user content of `old`
pub fn upgrade(old: &Notetype, newest: &Notetype) -> Notetype {
    let mut result = newest.clone();
    result.id = old.id;
    result.name = old.name.clone();
    result.modified = Utc::now();
    result.usn = -1;

    let keeps_id_field = result.fields.iter().any(|field| field.name == ANKIHUB_ID_FIELD);
    if !keeps_id_field {
        if let Some(field) = old.fields.iter().find(|field| field.name == ANKIHUB_ID_FIELD) {
            result.fields.push(field.clone());
        }
    }
    result.fields = rehome_field_ords(&old.fields, result.fields);

    for (old_template, new_template) in old.templates.iter().zip(result.templates.iter_mut()) {
        upgrade_template(old_template, new_template);
    }

    result
}

/// Give every field the ordinal of the old field with the same name. Fields
/// without a counterpart get the last ordinal; the host renumbers them.
pub fn rehome_field_ords(old: &[NotetypeField], new: Vec<NotetypeField>) -> Vec<NotetypeField> {
    let fallback = new.len().saturating_sub(1) as u32;
    new.into_iter()
        .map(|mut field| {
            field.ord = old
                .iter()
                .find(|old_field| old_field.name == field.name)
                .and_then(|old_field| old_field.ord)
                .or(Some(fallback));
            field
        })
        .collect()
}

fn upgrade_template(old: &CardTemplate, new: &mut CardTemplate) {
    new.front = carry_over(&old.front, &new.front);
    new.back = carry_over(&old.back, &new.back);
}

/// Re-append the modification block and the user content of `old` to `new`
fn carry_over(old: &str, new: &str) -> String {
    let (old_managed, old_user) = split_at_end_comment(old);
    let (new_managed, _) = split_at_end_comment(new);

    let mut result = new_managed.to_string();
    if let Some(block) = modification_block(old_managed) {
        result = format!("{}\n\n{}", trim_end(&result), block);
    }

    match old_user {
        Some(user) => format!("{}\n\n{}", trim_end(&result), user),
        None => format!("{}\n\n{}\n\n", trim_end(&result), END_COMMENT),
    }
}

/// Split before the end comment; the second part starts with the comment
fn split_at_end_comment(text: &str) -> (&str, Option<&str>) {
    match text.find(END_COMMENT) {
        Some(position) => (&text[..position], Some(&text[position..])),
        None => (text, None),
    }
}

/// First begin marker through the last end marker
fn modification_block(text: &str) -> Option<&str> {
    let start = text.find(MODIFICATIONS_BEGIN)?;
    let end = text.rfind(MODIFICATIONS_END)? + MODIFICATIONS_END.len();
    (end > start).then(|| &text[start..end])
}

fn trim_end(text: &str) -> &str {
    text.trim_end_matches(['\n', ' '])
}
