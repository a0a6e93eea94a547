//! Properties of the setting codecs on realistic templates

use notetype_settings::contract::{CardTemplate, Notetype, SettingTarget, SettingValue};
use notetype_settings::domain::codec::{decode, encode, Codec};
use notetype_settings::domain::settings::{apply, read_value};
use notetype_settings::domain::{ConfigStore, DefinitionTable, SettingDefinition};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

mod common;
use common::{back, full_notetype, notetype, CLOZE};

fn table() -> DefinitionTable {
    DefinitionTable::with_families([&notetype(0, CLOZE, "1", true)]).unwrap()
}

fn present_definitions() -> (DefinitionTable, Vec<Arc<SettingDefinition>>) {
    let table = table();
    let definitions = table
        .definitions_for_template_family(&notetype(1, CLOZE, "1", true))
        .unwrap();
    (table, definitions)
}

fn blob<'a>(template: &'a CardTemplate, css: &'a str, definition: &SettingDefinition) -> &'a str {
    definition.texts_of(template, css)[0]
}

#[test]
fn test_writing_the_read_value_changes_nothing() {
    let notetype = notetype(1, CLOZE, "1", true);
    let template = &notetype.templates[0];
    let (_, definitions) = present_definitions();
    assert!(definitions.len() > 10);

    for definition in &definitions {
        let text = blob(template, &notetype.css, definition);
        let value = decode(definition, text).unwrap();
        let written = encode(definition, text, &value).unwrap();
        assert_eq!(written, text, "{} rewrote its own value", definition.name);
    }
}

#[test]
fn test_encoding_one_setting_keeps_the_others() {
    let notetype = notetype(1, CLOZE, "1", true);
    let (table, definitions) = present_definitions();

    let edits = [
        ("autoflip", SettingValue::Bool(false)),
        ("timer_secs", SettingValue::Integer(42)),
        ("font_size", SettingValue::from("18px")),
        ("timer", SettingValue::Bool(false)),
        ("disable_hammer", SettingValue::Bool(true)),
        ("btn_shortcut_hammer", SettingValue::from("Alt+\"1\"")),
        ("autoreveal_lecture_notes", SettingValue::Bool(true)),
    ];

    for (name, value) in edits {
        let edited_definition = table.get(name).unwrap();
        let mut edited = notetype.clone();
        {
            let template = &mut edited.templates[0];
            match edited_definition.target {
                SettingTarget::Front => {
                    template.front = encode(&edited_definition, &template.front, &value).unwrap()
                }
                SettingTarget::Back => {
                    template.back = encode(&edited_definition, &template.back, &value).unwrap()
                }
                _ => edited.css = encode(&edited_definition, &edited.css, &value).unwrap(),
            }
        }

        assert_eq!(read_value(&edited, &edited_definition).unwrap(), value, "{}", name);
        for definition in definitions.iter().filter(|d| d.name != name) {
            assert_eq!(
                read_value(&edited, definition).unwrap(),
                read_value(&notetype, definition).unwrap(),
                "editing {} changed {}",
                name,
                definition.name
            );
        }
    }
}

#[test]
fn test_wrapping_is_idempotent() {
    let table = table();
    let disable = table.get("disable_hammer").unwrap();

    let once = encode(&disable, &back(true), &SettingValue::Bool(true)).unwrap();
    let twice = encode(&disable, &once, &SettingValue::Bool(true)).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once, back(false));

    let unwrapped = encode(&disable, &twice, &SettingValue::Bool(false)).unwrap();
    assert_eq!(unwrapped, back(true));
    assert_eq!(
        encode(&disable, &unwrapped, &SettingValue::Bool(false)).unwrap(),
        unwrapped
    );
}

#[test]
fn test_every_field_order_is_reachable() {
    let table = table();
    let order = table.get("field_order").unwrap();
    let original = back(true);
    let fields = ["Extra", "Hammer", "Lecture Notes"];

    let permutations = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for permutation in permutations {
        let requested: Vec<String> = permutation.iter().map(|i| fields[*i].to_string()).collect();
        let reordered = encode(&order, &original, &SettingValue::List(requested.clone())).unwrap();

        assert_eq!(
            decode(&order, &reordered).unwrap(),
            SettingValue::List(requested.clone())
        );
        assert_eq!(reordered.len(), original.len());

        // back to the authored order
        let restored = encode(
            &order,
            &reordered,
            &SettingValue::List(fields.iter().map(|f| f.to_string()).collect()),
        )
        .unwrap();
        assert_eq!(restored, original, "order {:?} did not restore", requested);
    }
}

#[test]
fn test_quotes_survive_a_round_trip() {
    let table = table();
    let shortcut = table.get("btn_shortcut_hammer").unwrap();
    let value = SettingValue::from("Shift+\"");

    let written = encode(&shortcut, &back(true), &value).unwrap();

    assert!(written.contains(r#""Hammer": "Shift+\"","#));
    assert_eq!(decode(&shortcut, &written).unwrap(), value);
}

fn read_all(notetype: &Notetype, definitions: &[Arc<SettingDefinition>]) -> BTreeMap<String, SettingValue> {
    definitions
        .iter()
        .map(|definition| {
            let value = read_value(notetype, definition)
                .unwrap_or_else(|e| panic!("{} is unreadable: {}", definition.name, e));
            (definition.name.clone(), value)
        })
        .collect()
}

fn texts(values: &[&str]) -> Vec<SettingValue> {
    values.iter().map(|value| SettingValue::from(*value)).collect()
}

/// Values every setting of a codec must accept
fn legal_values(definition: &SettingDefinition, current: &SettingValue) -> Vec<SettingValue> {
    match &definition.codec {
        Codec::LiteralBool | Codec::MarkerSwapBool { .. } | Codec::WrapBool { .. } => {
            vec![SettingValue::Bool(true), SettingValue::Bool(false)]
        }
        Codec::Text { .. } => texts(&["foo", "</div>", ""]),
        Codec::Shortcut => texts(&["Ctrl + C", "asdf", "", r"Ctrl+\", "\""]),
        Codec::Number { decimal: true, .. } => vec![SettingValue::Decimal(1.0), SettingValue::Decimal(404.0)],
        Codec::Number { decimal: false, .. } => {
            vec![SettingValue::Integer(0), SettingValue::Integer(1), SettingValue::Integer(404)]
        }
        Codec::Choice { options, .. } | Codec::UserAction { options, .. } => {
            options.iter().map(|option| SettingValue::from(option.as_str())).collect()
        }
        Codec::Color { .. } => texts(&["#D1CFCE", "black"]),
        Codec::FontFamily => texts(&["Arial Greek, Arial", "asdf", ""]),
        Codec::OrderedList(_) => {
            let mut names = current.as_list().unwrap().to_vec();
            names.sort();
            let mut reversed = names.clone();
            reversed.reverse();
            vec![SettingValue::List(names), SettingValue::List(reversed)]
        }
    }
}

#[test]
fn test_full_template_carries_every_builtin_setting() {
    let notetype = full_notetype(1, CLOZE);
    let table = DefinitionTable::with_families([&notetype]).unwrap();
    let present: BTreeSet<String> = table
        .definitions_for_template_family(&notetype)
        .unwrap()
        .iter()
        .map(|definition| definition.name.clone())
        .collect();

    for definition in DefinitionTable::builtin().unwrap().iter() {
        assert!(present.contains(&definition.name), "{} is missing", definition.name);
    }
    for name in ["disable_lecture_notes", "btn_shortcut_lecture_notes", "autoreveal_lecture_notes"] {
        assert!(present.contains(name), "{} is missing", name);
    }
}

#[test]
fn test_every_legal_value_reads_back_and_touches_nothing_else() {
    let notetype = full_notetype(1, CLOZE);
    let table = DefinitionTable::with_families([&notetype]).unwrap();
    let definitions = table.definitions_for_template_family(&notetype).unwrap();
    let names: Vec<String> = definitions.iter().map(|d| d.name.clone()).collect();
    let original = read_all(&notetype, &definitions);
    let mut rejected = BTreeSet::new();

    for definition in &definitions {
        for value in legal_values(definition, &original[&definition.name]) {
            let mut store = ConfigStore::new();
            store.set(definition.key(CLOZE), value.clone());
            let (updated, report) = apply(&notetype, CLOZE, &[Arc::clone(definition)], &store).unwrap();

            if !report.is_empty() {
                assert_eq!(updated, notetype, "{} = {:?} changed the notetype", definition.name, value);
                assert_eq!(value, SettingValue::from(""), "{} rejected {:?}", definition.name, value);
                rejected.insert(definition.name.clone());
                continue;
            }

            let still_present: Vec<String> = table
                .definitions_for_template_family(&updated)
                .unwrap()
                .iter()
                .map(|d| d.name.clone())
                .collect();
            assert_eq!(still_present, names, "{} = {:?} hid settings", definition.name, value);

            let mut expected = original.clone();
            expected.insert(definition.name.clone(), value.clone());
            assert_eq!(
                read_all(&updated, &definitions),
                expected,
                "{} = {:?}",
                definition.name,
                value
            );
        }
    }

    // locators that need at least one character
    let expected: BTreeSet<String> = ["max_card_width", "font_size", "font_size_extra", "font_size_table", "font_family"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(rejected, expected);
}

#[test]
fn test_backslash_shortcut_keeps_the_next_entry() {
    let table = table();
    let hammer = table.get("btn_shortcut_hammer").unwrap();
    let lecture_notes = table.get("btn_shortcut_lecture_notes").unwrap();
    let value = SettingValue::from(r"Ctrl+\");

    let written = encode(&hammer, &back(true), &value).unwrap();

    assert!(written.contains(r#""Hammer": "Ctrl+\\","#));
    assert_eq!(decode(&hammer, &written).unwrap(), value);
    assert_eq!(
        decode(&lecture_notes, &written).unwrap(),
        SettingValue::from("Ctrl+Shift+2")
    );
}
