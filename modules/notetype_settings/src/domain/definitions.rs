//! Setting definition table
//!
//! Static definitions for every setting the template families expose, plus
//! definitions derived from the configurable fields found in a family's back
//! template.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::codec::{unescape_quotes, Codec, ElementPattern};
use crate::contract::{CardTemplate, Notetype, SettingTarget, SettingValue};

/// Conditional field block, optionally commented out
pub const CONDITIONAL_FIELD_RE: &str = r"(?:<!-- ?)?\{\{#.+?\}\}[\w\W]+?\{\{/.+?\}\}(?: ?-->)?";
/// Marker that makes a conditional field configurable
pub const CONFIGURABLE_FIELD_HAS_TO_CONTAIN_RE: &str = r#"(class="hints"|id="extra")"#;
/// Field name from the structured attribute of newer templates
pub const FIELD_ATTRIBUTE_NAME_RE: &str = r#"data-field="([^"]+)""#;
/// Field name from the bare conditional tag
pub const CONFIGURABLE_FIELD_NAME_RE: &str = r"\{\{#(.+?)\}\}";
/// Content of a double-quoted string literal, escaped quotes included
pub const QUOT_STR_RE: &str = r#"(?:\\.|[^"\\])"#;
const DO_NOT_DELETE_RE: &str = r"/\*############ DO NOT DELETE #############\*/";

const BUTTON_SHORTCUTS_RE: &str = r"var+ ButtonShortcuts *= *\{([^}]*)\}";
const BUTTON_SHORTCUT_PAIR_RE: &str = r#""([^"]+)" *: *"((?:\\.|[^"\\])*)""#;

const SECTION_FIELDS: &str = "Fields";
const SECTION_HINT_BUTTONS: &str = "Hint buttons";
const SECTION_IMAGE_OCCLUSION: &str = "Image occlusion";
const SECTION_CLOZES: &str = "Clozes";
const SECTION_CLOZES_ADVANCED: &str = "Clozes (advanced)";
const SECTION_COUNTDOWN: &str = "Countdown";
const SECTION_LAYOUT: &str = "Layout";
const SECTION_TTS: &str = "Text to speech";
const SECTION_TAGS: &str = "Tags";
const SECTION_FONT: &str = "Font";
const SECTION_IMAGES: &str = "Images";
const SECTION_COLORS: &str = "Colors";
const SECTION_ADVANCED: &str = "Advanced";
const SECTION_USER_ACTIONS: &str = "Mobile user actions";

/// Hint buttons known to the templates, by id
pub const HINT_BUTTONS: [(&str, &str); 7] = [
    ("zusatz", "own notes and images"),
    ("hammer", "exam questions"),
    ("klinik", "clinic"),
    ("image", "image"),
    ("amboss", "AMBOSS"),
    ("thieme", "Thieme"),
    ("meditricks", "Meditricks"),
];

static USER_ACTIONS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut actions: Vec<String> = [
        "undefined",
        "window.revealNextCloze",
        "window.toggleAllCloze",
        "() => revealNextClozeOf('Wort')",
        "window.toggleNextButton",
        "() => (Array.from(document.getElementsByClassName('hintBtn')).forEach(e => toggleHintBtn(e.id)))",
        "window.toggleNext",
        "window.toggleAll",
        "window.showtags",
    ]
    .iter()
    .map(|action| action.to_string())
    .collect();
    actions.extend(
        HINT_BUTTONS
            .iter()
            .map(|(id, _)| format!("() => toggleHintBtn('hint-{}')", id)),
    );
    actions
});

static USER_ACTION_LABELS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut labels: Vec<String> = [
        "No action",
        "Reveal next cloze",
        "Toggle all clozes",
        "Reveal next word",
        "Reveal next button",
        "Reveal all buttons",
        "Reveal next image occlusion",
        "Toggle all image occlusions",
        "Show tags",
    ]
    .iter()
    .map(|label| label.to_string())
    .collect();
    labels.extend(HINT_BUTTONS.iter().map(|(_, name)| format!("Reveal {}", name)));
    labels
});

/// Settings editable from the cross-family "general" tab
pub const GENERAL_SETTINGS: &[&str] = &[
    "toggle_next_button",
    "toggle_all_buttons",
    "autoscroll_to_button",
    "tags_toggle_shortcut",
    "tags_container",
    "tags_container_mobile",
    "reveal_cloze_shortcut",
    "tags_num_levels_to_show_front",
    "tags_num_levels_to_show_back",
    "toggle_all_clozes_shortcut",
    "reveal_next_cloze_mode",
    "cloze_hider",
    "selective_one_by_one_front",
    "selective_one_by_one_back",
    "min_number_clozes_front",
    "min_number_clozes_back",
    "always_one_by_one_front",
    "always_one_by_one_back",
    "timer",
    "timer_secs",
    "timer_minutes",
    "autoflip",
    "max_card_width",
    "front_indenting",
    "back_indenting",
    "bionic_reading_front",
    "bionic_reading_back",
    "front_divi_format",
    "back_divi_format",
    "front_two_columns",
    "front_column_ratio",
    "back_two_columns",
    "back_column_ratio",
    "text_align",
    "button_align",
    "front_tts",
    "front_tts_speed",
    "back_tts",
    "back_tts_speed",
    "front_signal_tag",
    "back_signal_tag",
    "university_tag",
    "font_size",
    "font_size_extra",
    "font_size_table",
    "font_family",
    "image_height",
    "image_width",
    "text_color",
    "background_color",
    "cloze_color",
    "extra_text_color",
    "hint_text_color",
    "missed_text_color",
    "timer_text_color",
    "nm_text_color",
    "nm_background_color",
    "nm_cloze_color",
    "nm_extra_color",
    "nm_hint_color",
    "bold_text_color",
    "underlined_text_color",
    "italic_text_color",
    "image_occlusion_rect_color",
    "image_occlusion_border_color",
    "image_occlusion_active_rect_color",
    "image_occlusion_active_border_color",
    "custom_colors",
    "custom_styles",
    "user_action_1",
    "user_action_2",
    "user_action_3",
    "user_action_4",
    "user_action_5",
    "user_action_6",
    "user_action_7",
    "user_action_8",
];

/// Errors raised while building definitions
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("invalid pattern for setting '{setting}': {source}")]
    InvalidPattern {
        setting: String,
        #[source]
        source: regex::Error,
    },
}

/// Declarative description of one notetype setting
#[derive(Debug, Clone)]
pub struct SettingDefinition {
    pub name: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub target: SettingTarget,
    /// Locator; group 1 holds the value for value codecs
    pub pattern: Regex,
    pub codec: Codec,
    pub default: Option<SettingValue>,
    pub section: Option<String>,
    /// Configurable field this setting belongs to
    pub configurable_field_name: Option<String>,
}

impl SettingDefinition {
    pub fn builder(
        name: impl Into<String>,
        label: impl Into<String>,
        target: SettingTarget,
        pattern: impl Into<String>,
        codec: Codec,
    ) -> SettingDefinitionBuilder {
        SettingDefinitionBuilder {
            name: name.into(),
            label: label.into(),
            tooltip: None,
            target,
            pattern: pattern.into(),
            codec,
            default: None,
            section: None,
            configurable_field_name: None,
        }
    }

    /// Config store key of this setting for a family (or `general`)
    pub fn key(&self, scope: &str) -> String {
        format!("{}.{}", scope, self.name)
    }

    /// Texts of one template this setting lives in
    pub fn texts_of<'a>(&self, template: &'a CardTemplate, css: &'a str) -> Vec<&'a str> {
        match self.target {
            SettingTarget::Front => vec![template.front.as_str()],
            SettingTarget::Back => vec![template.back.as_str()],
            SettingTarget::Both => vec![template.front.as_str(), template.back.as_str()],
            SettingTarget::Style => vec![css],
        }
    }

    /// Whether the locator matches every relevant text of every template
    pub fn is_present(&self, notetype: &Notetype) -> bool {
        !notetype.templates.is_empty()
            && notetype.templates.iter().all(|template| {
                self.texts_of(template, &notetype.css)
                    .into_iter()
                    .all(|text| self.pattern.is_match(text))
            })
    }
}

pub struct SettingDefinitionBuilder {
    name: String,
    label: String,
    tooltip: Option<String>,
    target: SettingTarget,
    pattern: String,
    codec: Codec,
    default: Option<SettingValue>,
    section: Option<String>,
    configurable_field_name: Option<String>,
}

impl SettingDefinitionBuilder {
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn default(mut self, default: impl Into<SettingValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn configurable_field(mut self, field_name: impl Into<String>) -> Self {
        self.configurable_field_name = Some(field_name.into());
        self
    }

    pub fn build(self) -> Result<SettingDefinition, DefinitionError> {
        let pattern = compile(&self.name, &self.pattern)?;
        Ok(SettingDefinition {
            name: self.name,
            label: self.label,
            tooltip: self.tooltip,
            target: self.target,
            pattern,
            codec: self.codec,
            default: self.default,
            section: self.section,
            configurable_field_name: self.configurable_field_name,
        })
    }
}

fn compile(setting: &str, pattern: &str) -> Result<Regex, DefinitionError> {
    Regex::new(pattern).map_err(|source| DefinitionError::InvalidPattern {
        setting: setting.to_string(),
        source,
    })
}

/// Finds configurable fields and hint-button shortcuts in back templates
#[derive(Debug, Clone)]
pub struct FieldScanner {
    fields: ElementPattern,
    shortcut_table: Regex,
    shortcut_pair: Regex,
}

impl FieldScanner {
    pub fn new() -> Result<Self, DefinitionError> {
        Ok(Self {
            fields: field_element_pattern()?,
            shortcut_table: compile("button_shortcuts", BUTTON_SHORTCUTS_RE)?,
            shortcut_pair: compile("button_shortcuts", BUTTON_SHORTCUT_PAIR_RE)?,
        })
    }

    /// Configurable field names in document order
    pub fn configurable_fields(&self, back: &str) -> Vec<String> {
        match self.fields.elements(back) {
            Ok(elements) => elements.into_iter().map(|element| element.name).collect(),
            Err(details) => {
                tracing::warn!(details = %details, "Skipping unnamed configurable field");
                Vec::new()
            }
        }
    }

    /// The `ButtonShortcuts` table of a back template, button name to shortcut
    pub fn button_shortcuts(&self, back: &str) -> IndexMap<String, String> {
        let Some(table) = self.shortcut_table.captures(back).and_then(|c| c.get(1)) else {
            return IndexMap::new();
        };
        self.shortcut_pair
            .captures_iter(table.as_str())
            .filter_map(|pair| Some((pair.get(1)?.as_str().to_string(), unescape_quotes(pair.get(2)?.as_str()))))
            .collect()
    }
}

fn field_element_pattern() -> Result<ElementPattern, DefinitionError> {
    Ok(ElementPattern {
        element: compile("field_order", CONDITIONAL_FIELD_RE)?,
        must_contain: compile("field_order", CONFIGURABLE_FIELD_HAS_TO_CONTAIN_RE)?,
        name_patterns: vec![
            compile("field_order", FIELD_ATTRIBUTE_NAME_RE)?,
            compile("field_order", CONFIGURABLE_FIELD_NAME_RE)?,
        ],
    })
}

/// Settings synthesized for one configurable field
pub fn field_definitions(
    field_name: &str,
    default_shortcut: Option<&str>,
) -> Result<Vec<SettingDefinition>, DefinitionError> {
    let snake = field_name.to_lowercase().replace(' ', "_");
    let escaped = regex::escape(field_name);

    let mut result = vec![SettingDefinition::builder(
        format!("disable_{}", snake),
        format!("Disable field {}", field_name),
        SettingTarget::Back,
        format!(r"(<!--)?\{{\{{#{0}\}}\}}[\w\W]+?\{{\{{/{0}\}}\}}(-->)?", escaped),
        Codec::WrapBool {
            open: "<!--".to_string(),
            close: "-->".to_string(),
        },
    )
    .section(SECTION_FIELDS)
    .configurable_field(field_name)
    .default(false)
    .build()?];

    if let Some(shortcut) = default_shortcut {
        result.push(
            SettingDefinition::builder(
                format!("btn_shortcut_{}", snake),
                format!("{} shortcut", field_name),
                SettingTarget::Back,
                format!(
                    r#"var+ ButtonShortcuts *= *\{{[^}}]*?"{}" *: *"({}*?)""#,
                    escaped, QUOT_STR_RE
                ),
                Codec::Shortcut,
            )
            .section(SECTION_HINT_BUTTONS)
            .configurable_field(field_name)
            .default(shortcut)
            .build()?,
        );
        result.push(
            SettingDefinition::builder(
                format!("autoreveal_{}", snake),
                format!("Reveal field '{}' automatically", field_name),
                SettingTarget::Back,
                format!(r#"var+ ButtonAutoReveal *= *\{{[^}}]*?"{}" *: *(.+),\n"#, escaped),
                Codec::LiteralBool,
            )
            .section(SECTION_HINT_BUTTONS)
            .configurable_field(field_name)
            .default(false)
            .build()?,
        );
    }

    Ok(result)
}

/// Ordered table of setting definitions
#[derive(Debug, Clone)]
pub struct DefinitionTable {
    definitions: IndexMap<String, Arc<SettingDefinition>>,
    scanner: FieldScanner,
}

impl DefinitionTable {
    /// Static definitions only
    pub fn builtin() -> Result<Self, DefinitionError> {
        let definitions = builtin_definitions()?
            .into_iter()
            .map(|definition| (definition.name.clone(), Arc::new(definition)))
            .collect();
        Ok(Self {
            definitions,
            scanner: FieldScanner::new()?,
        })
    }

    /// Static definitions plus the field definitions of the given families
    pub fn with_families<'a>(
        families: impl IntoIterator<Item = &'a Notetype>,
    ) -> Result<Self, DefinitionError> {
        let mut table = Self::builtin()?;
        for family in families {
            for definition in table.dynamic_field_definitions(family)? {
                table
                    .definitions
                    .insert(definition.name.clone(), Arc::new(definition));
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Arc<SettingDefinition>> {
        self.definitions.get(name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SettingDefinition>> {
        self.definitions.values()
    }

    pub fn is_general(&self, name: &str) -> bool {
        GENERAL_SETTINGS.contains(&name)
    }

    /// Every definition present on `notetype`. Field definitions derived from
    /// `notetype` itself replace same-named ones of the table.
    pub fn definitions_for_template_family(
        &self,
        notetype: &Notetype,
    ) -> Result<Vec<Arc<SettingDefinition>>, DefinitionError> {
        let mut merged = self.definitions.clone();
        for definition in self.dynamic_field_definitions(notetype)? {
            merged.insert(definition.name.clone(), Arc::new(definition));
        }

        Ok(merged
            .into_values()
            .filter(|definition| definition.is_present(notetype))
            .collect())
    }

    pub fn general_definitions(&self) -> Vec<Arc<SettingDefinition>> {
        GENERAL_SETTINGS
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// Field definitions derived from the back templates of `notetype`
    pub fn dynamic_field_definitions(
        &self,
        notetype: &Notetype,
    ) -> Result<Vec<SettingDefinition>, DefinitionError> {
        let mut result: IndexMap<String, SettingDefinition> = IndexMap::new();

        for template in &notetype.templates {
            let shortcuts = self.scanner.button_shortcuts(&template.back);
            for field in self.scanner.configurable_fields(&template.back) {
                let shortcut = shortcuts.get(&field).map(String::as_str);
                for definition in field_definitions(&field, shortcut)? {
                    result.entry(definition.name.clone()).or_insert(definition);
                }
            }
        }

        Ok(result.into_values().collect())
    }

    /// Configurable field names of the first template, in authored order
    pub fn configurable_fields(&self, notetype: &Notetype) -> Vec<String> {
        notetype
            .templates
            .first()
            .map(|template| self.scanner.configurable_fields(&template.back))
            .unwrap_or_default()
    }
}

/// Definitions sharing a display section
#[derive(Debug, Clone)]
pub struct Section {
    pub name: Option<String>,
    pub definitions: Vec<Arc<SettingDefinition>>,
}

/// Group definitions by section: named sections sorted by name, then the
/// unsectioned definitions
pub fn group_by_section(definitions: &[Arc<SettingDefinition>]) -> Vec<Section> {
    let mut sections: BTreeMap<String, Vec<Arc<SettingDefinition>>> = BTreeMap::new();
    let mut other = Vec::new();

    for definition in definitions {
        match &definition.section {
            Some(section) => sections
                .entry(section.clone())
                .or_default()
                .push(Arc::clone(definition)),
            None => other.push(Arc::clone(definition)),
        }
    }

    let mut result: Vec<Section> = sections
        .into_iter()
        .map(|(name, definitions)| Section {
            name: Some(name),
            definitions,
        })
        .collect();
    if !other.is_empty() {
        result.push(Section {
            name: None,
            definitions: other,
        });
    }
    result
}

/// Move field definitions behind the others, ordered like `field_order`.
/// Fields missing from `field_order` come first among the field definitions.
pub fn order_configurable_fields(
    definitions: Vec<Arc<SettingDefinition>>,
    field_order: &[String],
) -> Vec<Arc<SettingDefinition>> {
    let (mut fields, mut result): (Vec<_>, Vec<_>) = definitions
        .into_iter()
        .partition(|definition| definition.configurable_field_name.is_some());

    fields.sort_by_key(|definition| {
        definition
            .configurable_field_name
            .as_ref()
            .and_then(|name| field_order.iter().position(|field| field == name))
            .map_or(-1, |position| position as i64)
    });

    result.extend(fields);
    result
}

fn bool_var(variable: &str) -> String {
    format!(r"var +{} += +(false|true)", variable)
}

fn string_var(variable: &str) -> String {
    format!(r#"var +{} += +"({}*?)""#, variable, QUOT_STR_RE)
}

fn number_var(variable: &str) -> String {
    format!(r"var +{} += +([^ /\n;]*)", variable)
}

fn decimal(min: f64, max: f64, step: f64) -> Codec {
    Codec::Number {
        decimal: true,
        min,
        max,
        step,
    }
}

fn bounded(min: f64, max: f64) -> Codec {
    Codec::Number {
        decimal: false,
        min,
        max,
        step: 1.0,
    }
}

fn choice(options: &[&str]) -> Codec {
    Codec::Choice {
        options: options.iter().map(|option| option.to_string()).collect(),
        labels: options.iter().map(|option| option.to_string()).collect(),
    }
}

fn marker_swap(pairs: &[(&str, &str)]) -> Codec {
    Codec::MarkerSwapBool {
        pairs: pairs
            .iter()
            .map(|(off, on)| (off.to_string(), on.to_string()))
            .collect(),
    }
}

fn color() -> Codec {
    Codec::Color {
        with_inherit_option: false,
    }
}

fn inherit_color() -> Codec {
    Codec::Color {
        with_inherit_option: true,
    }
}

fn css_var(name: &str) -> String {
    format!(r"--{}: (.+?);", name)
}

fn night_css_var(name: &str) -> String {
    format!(r"--{}: (.+?)( +!important)?;", name)
}

fn insertion_block(title: &str) -> String {
    format!(
        r"{0}\n/\*~~~~~~~~~{1}~~~~~~~~~\*/\n(((.|\n)*?))\n{0}",
        DO_NOT_DELETE_RE, title
    )
}

fn builtin_definitions() -> Result<Vec<SettingDefinition>, DefinitionError> {
    use SettingDefinition as D;
    use SettingTarget::{Back, Front, Style};

    let mut builders = vec![
        D::builder(
            "field_order",
            "Field order",
            Back,
            r"[\w\W]*",
            Codec::OrderedList(field_element_pattern()?),
        )
        .tooltip("Drag the fields into the order you want.")
        .section(SECTION_FIELDS),
        // hint buttons
        D::builder("toggle_next_button", "Reveal next button - shortcut", Back, string_var("ToggleNextButtonShortcut"), Codec::Shortcut)
            .section(SECTION_HINT_BUTTONS)
            .default("H"),
        D::builder("toggle_all_buttons", "Reveal all buttons - shortcut", Back, string_var("ToggleAllButtonsShortcut"), Codec::Shortcut)
            .section(SECTION_HINT_BUTTONS)
            .default("'"),
        D::builder("autoscroll_to_button", "Scroll to button automatically", Back, bool_var("ScrollToButton"), Codec::LiteralBool)
            .section(SECTION_HINT_BUTTONS)
            .default(true),
        D::builder("autoscroll_to_hint", "Scroll to hint automatically", Back, bool_var("ScrollToHint"), Codec::LiteralBool)
            .section(SECTION_HINT_BUTTONS)
            .default(true),
        // image occlusion
        D::builder("io_reveal_next_shortcut", "Reveal next image occlusion - shortcut", Back, string_var("RevealIncrementalShortcut"), Codec::Shortcut)
            .section(SECTION_IMAGE_OCCLUSION)
            .default("N"),
        D::builder("io_toggle_all_shortcut", "Toggle all image occlusions - shortcut", Back, string_var("ToggleAllOcclusionsShortcut"), Codec::Shortcut)
            .section(SECTION_IMAGE_OCCLUSION)
            .default(","),
        // clozes
        D::builder("reveal_cloze_shortcut", "Reveal cloze - shortcut", Back, string_var("revealNextShortcut"), Codec::Shortcut)
            .section(SECTION_CLOZES)
            .default("N"),
        D::builder("reveal_cloze_word_shortcut", "Reveal cloze word by word - shortcut", Back, string_var("revealNextWordShortcut"), Codec::Shortcut)
            .section(SECTION_CLOZES)
            .default("Shift+N"),
        D::builder("toggle_all_clozes_shortcut", "Toggle all clozes - shortcut", Back, string_var("toggleAllShortcut"), Codec::Shortcut)
            .section(SECTION_CLOZES)
            .default(","),
        D::builder("reveal_next_cloze_mode", "Reveal mode", Back, r#"var +revealNextClozeMode += +"([^"]*?)""#, choice(&["cloze", "word"]))
            .tooltip("cloze: reveal whole clozes\nword: reveal clozes word by word")
            .section(SECTION_CLOZES)
            .default("cloze"),
        D::builder("cloze_hider", "Cloze hider", Back, format!(r#"var +clozeHider +=[^"]+"({}*?)""#, QUOT_STR_RE), Codec::Text { quoted: true })
            .tooltip("Text that covers the cloze")
            .section(SECTION_CLOZES)
            .default("[___]"),
        D::builder("selective_one_by_one_front", "Selective one-by-one on the front", Front, bool_var("selectiveOneByOne"), Codec::LiteralBool)
            .section(SECTION_CLOZES_ADVANCED)
            .default(false),
        D::builder("selective_one_by_one_back", "Selective one-by-one on the back (must match the front)", Back, bool_var("selectiveOneByOne"), Codec::LiteralBool)
            .section(SECTION_CLOZES_ADVANCED)
            .default(false),
        D::builder("min_number_clozes_front", "Minimum clozes for one-by-one, front (0 means no limit)", Front, number_var("minNumberOfClozes"), Codec::integer())
            .section(SECTION_CLOZES_ADVANCED)
            .default(2i64),
        D::builder("min_number_clozes_back", "Minimum clozes for one-by-one, back (must match the front)", Back, number_var("minNumberOfClozes"), Codec::integer())
            .section(SECTION_CLOZES_ADVANCED)
            .default(2i64),
        D::builder("always_one_by_one_front", "Always one-by-one on the front", Front, bool_var("alwaysOneByOne"), Codec::LiteralBool)
            .section(SECTION_CLOZES_ADVANCED)
            .default(true),
        D::builder("always_one_by_one_back", "Always one-by-one on the back (must match the front)", Back, bool_var("alwaysOneByOne"), Codec::LiteralBool)
            .section(SECTION_CLOZES_ADVANCED)
            .default(false),
        // countdown
        D::builder("timer", "Countdown", Style, r"\.timer *\{[^}]*?display: (block|none);", marker_swap(&[("none", "block")]))
            .section(SECTION_COUNTDOWN)
            .default(true),
        D::builder("timer_secs", "Countdown duration (seconds)", Front, number_var("seconds"), Codec::integer())
            .section(SECTION_COUNTDOWN)
            .default(9i64),
        D::builder("timer_minutes", "Countdown duration (minutes)", Front, number_var("minutes"), Codec::integer())
            .section(SECTION_COUNTDOWN)
            .default(0i64),
        D::builder("autoflip", "Flip to the back automatically\n(not supported on mobile)", Front, bool_var("autoflip"), Codec::LiteralBool)
            .default(true),
        // layout
        D::builder("max_card_width", "Maximum card width", Style, css_var("max-card-width"), Codec::Text { quoted: false })
            .section(SECTION_LAYOUT)
            .default("900px"),
        D::builder("front_indenting", "Heuristic indentation on the front", Front, bool_var("indentation"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(true),
        D::builder("back_indenting", "Heuristic indentation on the back", Back, bool_var("indentation"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(true),
        D::builder("bionic_reading_front", "Bionic reading on the front", Front, bool_var("bionicReading"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("bionic_reading_back", "Bionic reading on the back", Back, bool_var("bionicReading"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("front_divi_format", "DIVI medication format on the front", Front, bool_var("formattingDIVI"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("back_divi_format", "DIVI medication format on the back", Back, bool_var("formattingDIVI"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("front_two_columns", "Two-column layout on the front", Front, bool_var("twoColumnLayout"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("front_column_ratio", "Column ratio on the front", Front, string_var("columnRatio"), Codec::Text { quoted: true })
            .section(SECTION_LAYOUT)
            .default("1fr 1.5fr"),
        D::builder("back_two_columns", "Two-column layout on the back", Back, bool_var("twoColumnLayout"), Codec::LiteralBool)
            .section(SECTION_LAYOUT)
            .default(false),
        D::builder("back_column_ratio", "Column ratio on the back", Back, string_var("columnRatio"), Codec::Text { quoted: true })
            .section(SECTION_LAYOUT)
            .default("1fr 1.5fr"),
        D::builder("text_align", "Default text alignment", Style, css_var("default-alignment"), choice(&["left", "center"]))
            .tooltip("left: align text left\ncenter: center text")
            .section(SECTION_LAYOUT)
            .default("left"),
        D::builder("button_align", "Default button alignment", Style, css_var("button-alignment"), choice(&["left", "center"]))
            .tooltip("left: align buttons left\ncenter: center buttons")
            .section(SECTION_LAYOUT)
            .default("center"),
        // text to speech
        D::builder("front_tts", "Front TTS", Front, r"(<!--|\{\{)tts.+?(-->|\}\})", marker_swap(&[("<!--", "{{"), ("-->", "}}")]))
            .section(SECTION_TTS)
            .default(false),
        D::builder("front_tts_speed", "Front TTS speed", Front, r"(?:<!--|\{\{)tts.*?speed=([\d\.]+).*?(?:-->|\}\})", decimal(0.1, 10.0, 0.1))
            .section(SECTION_TTS)
            .default(1.4),
        D::builder("back_tts", "Back TTS", Back, r"(<!--|\{\{)tts.+?(-->|\}\})", marker_swap(&[("<!--", "{{"), ("-->", "}}")]))
            .tooltip("When enabling this, the \"Reveal next button\" shortcut may need to be changed from \"H\"")
            .section(SECTION_TTS)
            .default(false),
        D::builder("back_tts_speed", "Back TTS speed", Back, r"(?:<!--|\{\{)tts.*?speed=([\d\.]+).*?(?:-->|\}\})", decimal(0.1, 10.0, 0.1))
            .section(SECTION_TTS)
            .default(1.4),
        // tags
        D::builder("front_signal_tag", "Tag that colors the front red", Front, string_var("tagID"), Codec::Text { quoted: true })
            .section(SECTION_TAGS)
            .default("XXXYYYZZZ"),
        D::builder("back_signal_tag", "Tag that colors the back red", Back, string_var("tagID"), Codec::Text { quoted: true })
            .section(SECTION_TAGS)
            .default("XXXYYYZZZ"),
        D::builder("university_tag", "University whose tags stay visible", Back, string_var("tagUniversity"), Codec::Text { quoted: true })
            .section(SECTION_TAGS)
            .default("XXXYYYZZZ"),
        D::builder("tags_container", "Tags container", Style, r"\n#tags-container *\{[^}]*?display: (block|none);", marker_swap(&[("none", "block")]))
            .section(SECTION_TAGS)
            .default(true),
        D::builder("tags_container_mobile", "Tags container (mobile)", Style, r"\.mobile +#tags-container *\{[^}]*?display: (block|none);", marker_swap(&[("none", "block")]))
            .section(SECTION_TAGS)
            .default(false),
        D::builder("tags_toggle_shortcut", "Show tags - shortcut", Back, string_var("toggleTagsShortcut"), Codec::Shortcut)
            .section(SECTION_TAGS)
            .default("C"),
        D::builder("tags_num_levels_to_show_front", "Tag levels shown on the front (0 means all)", Front, r"var +numTagLevelsToShow += +(\d+)", Codec::integer())
            .section(SECTION_TAGS)
            .default(0i64),
        D::builder("tags_num_levels_to_show_back", "Tag levels shown on the back (0 means all)", Back, r"var +numTagLevelsToShow += +(\d+)", Codec::integer())
            .section(SECTION_TAGS)
            .default(0i64),
        // font
        D::builder("font_size", "Font size", Style, css_var("font-size"), Codec::Text { quoted: false })
            .section(SECTION_FONT)
            .default("22px"),
        D::builder("font_size_extra", "Font size (extra and other fields)", Style, css_var("extra-font-size"), Codec::Text { quoted: false })
            .section(SECTION_FONT)
            .default("18px"),
        D::builder("font_size_table", "Font size (tables)", Style, css_var("table-font-size"), Codec::Text { quoted: false })
            .section(SECTION_FONT)
            .default("1em"),
        D::builder("font_family", "Font family", Style, r"\.card.*\n*kbd *\{[^}]*?font-family: (.+);", Codec::FontFamily)
            .section(SECTION_FONT)
            .default("Arial Greek, Arial"),
        // images
        D::builder("image_height", "Maximum image height (percent)", Style, r"\nimg *\{[^}]*?max-height: (.+)%;", bounded(0.0, 100.0))
            .section(SECTION_IMAGES)
            .default(100i64),
        D::builder("image_width", "Maximum image width (percent)", Style, r"\nimg *\{[^}]*?max-width: (.+)%;", bounded(0.0, 100.0))
            .section(SECTION_IMAGES)
            .default(85i64),
        // colors
        D::builder("text_color", "Default text color", Style, css_var("text"), color())
            .section(SECTION_COLORS)
            .default("#363638"),
        D::builder("background_color", "Background color", Style, css_var("bg"), color())
            .section(SECTION_COLORS)
            .default("#f8f8f8"),
        D::builder("cloze_color", "Cloze text color", Style, css_var("text-cloze"), color())
            .section(SECTION_COLORS)
            .default("IndianRed"),
        D::builder("extra_text_color", "Extra text color", Style, r"#extra *\{[^}]*?color: (.+?);", color())
            .section(SECTION_COLORS)
            .default("navy"),
        D::builder("hint_text_color", "Hint text color", Style, r"\.hints *\{[^}]*?color: (.+?);", color())
            .section(SECTION_COLORS)
            .default("#4297F9"),
        D::builder("missed_text_color", "Missed text color", Style, r"#missed *\{[^}]*?color: (.+?);", color())
            .section(SECTION_COLORS)
            .default("red"),
        D::builder("timer_text_color", "Countdown text color", Style, r"\.timer *\{[^}]*?color: (.+?);", color())
            .section(SECTION_COLORS)
            .default("transparent"),
        D::builder("nm_text_color", "Night mode text color", Style, night_css_var("nm-text"), color())
            .section(SECTION_COLORS)
            .default("#e9e9e9"),
        D::builder("nm_background_color", "Night mode background color", Style, night_css_var("nm-bg"), color())
            .section(SECTION_COLORS)
            .default("#363638"),
        D::builder("nm_cloze_color", "Night mode cloze text color", Style, r"\.night_mode *\{[^}]*?--text-cloze: (.+?)( +!important)?;", color())
            .section(SECTION_COLORS)
            .default("IndianRed"),
        D::builder("nm_extra_color", "Night mode extra text color", Style, r"\.night_mode #extra *\{[^}]*?color: (.+?)( +!important)?;", color())
            .section(SECTION_COLORS)
            .default("magenta"),
        D::builder("nm_hint_color", "Night mode hint text color", Style, r"\.night_mode \.hints *\{[^}]*?color: (.+?)( +!important)?;", color())
            .section(SECTION_COLORS)
            .default("cyan"),
        D::builder("bold_text_color", "Bold text color", Style, night_css_var("text-bold"), inherit_color())
            .tooltip("set to transparent for the normal text color")
            .section(SECTION_COLORS)
            .default("inherit"),
        D::builder("underlined_text_color", "Underlined text color", Style, night_css_var("text-underline"), inherit_color())
            .tooltip("set to transparent for the normal text color")
            .section(SECTION_COLORS)
            .default("inherit"),
        D::builder("italic_text_color", "Italic text color", Style, night_css_var("text-italics"), inherit_color())
            .tooltip("set to transparent for the normal text color")
            .section(SECTION_COLORS)
            .default("inherit"),
        D::builder("image_occlusion_rect_color", "Image occlusion fill color", Style, r"--rect-bg: +([^ ]*?);", color())
            .section(SECTION_COLORS)
            .default("moccasin"),
        D::builder("image_occlusion_border_color", "Image occlusion border color", Style, r"--rect-border: +([^ ]*?);", color())
            .section(SECTION_COLORS)
            .default("olive"),
        D::builder("image_occlusion_active_rect_color", "Image occlusion fill color (active)", Style, r"--active-rect-bg: +([^ ]*?);", color())
            .section(SECTION_COLORS)
            .default("salmon"),
        D::builder("image_occlusion_active_border_color", "Image occlusion border color (active)", Style, r"--active-rect-border: +([^ ]*?);", color())
            .section(SECTION_COLORS)
            .default("yellow"),
        // custom insertions
        D::builder("custom_colors", "Custom colors", Style, insertion_block("CUSTOM COLOR INSERTION"), Codec::Text { quoted: false })
            .tooltip("Colors that replace the default colors")
            .section(SECTION_ADVANCED)
            .default("\n"),
        D::builder("custom_styles", "Custom styles", Style, insertion_block("CUSTOM STYLE INSERTION"), Codec::Text { quoted: false })
            .tooltip("Styles that replace the default styles")
            .section(SECTION_ADVANCED)
            .default("\n"),
    ];

    builders.extend((1..=8).map(|slot| {
        D::builder(
            format!("user_action_{}", slot),
            format!("User action {}", slot),
            Back,
            format!(r"var +userJs{} += +([^/\n]*)", slot),
            Codec::UserAction {
                options: USER_ACTIONS.clone(),
                labels: USER_ACTION_LABELS.clone(),
            },
        )
        .section(SECTION_USER_ACTIONS)
        .default("undefined")
    }));

    builders
        .into_iter()
        .map(SettingDefinitionBuilder::build)
        .collect()
}
