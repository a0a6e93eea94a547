//! Setting codec: locate, decode and encode setting values inside template text
//!
//! Every definition carries a locator regex. `locate` finds its first match,
//! `decode` turns the matched region into a typed [`SettingValue`] and `encode`
//! splices a new value back in. Value codecs rewrite capture group 1 only;
//! marker swaps, wrappers and ordered lists rewrite the whole match. All bytes
//! outside the rewritten span are preserved.

use std::collections::HashSet;
use std::ops::Range;

use regex::{Match, Regex};
use thiserror::Error;

use super::definitions::SettingDefinition;
use super::reorder::{repair_order, reorder_spans, NamedSpan};
use crate::contract::SettingValue;

/// Value sentinel for user actions that hold custom code
pub const CUSTOM_USER_ACTION: &str = "custom";

/// Errors produced while reading or writing a single setting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingParseError {
    #[error("could not find '{setting}'")]
    NotFound { setting: String },

    #[error("'{setting}': {details}")]
    InvalidEncoding { setting: String, details: String },

    #[error("'{setting}': expected a {expected} value but got {found}")]
    InvalidValue {
        setting: String,
        expected: String,
        found: String,
    },
}

impl SettingParseError {
    pub fn setting(&self) -> &str {
        match self {
            Self::NotFound { setting }
            | Self::InvalidEncoding { setting, .. }
            | Self::InvalidValue { setting, .. } => setting,
        }
    }
}

/// How a setting value is stored in the matched text
#[derive(Debug, Clone)]
pub enum Codec {
    /// Capture group is the literal `true` or `false`
    LiteralBool,
    /// `(off, on)` keyword pairs, exactly one side present in the region
    MarkerSwapBool { pairs: Vec<(String, String)> },
    /// Region is wrapped by `open`/`close` when the value is true
    WrapBool { open: String, close: String },
    /// Free text; `quoted` values live in a double-quoted string literal
    Text { quoted: bool },
    /// Keyboard shortcut inside a double-quoted string literal
    Shortcut,
    Number {
        decimal: bool,
        min: f64,
        max: f64,
        step: f64,
    },
    Choice {
        options: Vec<String>,
        labels: Vec<String>,
    },
    /// Like `Choice`, but unknown code decodes to [`CUSTOM_USER_ACTION`]
    UserAction {
        options: Vec<String>,
        labels: Vec<String>,
    },
    Color { with_inherit_option: bool },
    FontFamily,
    OrderedList(ElementPattern),
}

impl Codec {
    /// Integer number codec with the usual editor bounds
    pub fn integer() -> Self {
        Self::Number {
            decimal: false,
            min: 0.0,
            max: 1000.0,
            step: 1.0,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::LiteralBool => "literal_bool",
            Self::MarkerSwapBool { .. } => "marker_swap_bool",
            Self::WrapBool { .. } => "wrap_bool",
            Self::Text { .. } => "text",
            Self::Shortcut => "shortcut",
            Self::Number { .. } => "number",
            Self::Choice { .. } => "choice",
            Self::UserAction { .. } => "user_action",
            Self::Color { .. } => "color",
            Self::FontFamily => "font_family",
            Self::OrderedList(_) => "ordered_list",
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(
            self,
            Self::LiteralBool | Self::MarkerSwapBool { .. } | Self::WrapBool { .. }
        )
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Choice { options, .. } | Self::UserAction { options, .. } => Some(options),
            _ => None,
        }
    }

    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Self::Choice { labels, .. } | Self::UserAction { labels, .. } => Some(labels),
            _ => None,
        }
    }
}

/// Selects and names the elements of an ordered region
#[derive(Debug, Clone)]
pub struct ElementPattern {
    pub element: Regex,
    /// Only elements matching this pattern take part in the ordering
    pub must_contain: Regex,
    /// Tried in order; group 1 of the first match is the element name
    pub name_patterns: Vec<Regex>,
}

impl ElementPattern {
    pub fn name_of(&self, element: &str) -> Option<String> {
        self.name_patterns.iter().find_map(|pattern| {
            pattern
                .captures(element)
                .and_then(|captures| captures.get(1))
                .map(|name| name.as_str().to_string())
        })
    }

    /// Named elements of `text` in document order. Later duplicates of a
    /// name are not part of the ordering.
    pub fn elements(&self, text: &str) -> Result<Vec<NamedSpan>, String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for element in self.element.find_iter(text) {
            if !self.must_contain.is_match(element.as_str()) {
                continue;
            }
            let name = self
                .name_of(element.as_str())
                .ok_or_else(|| format!("could not find name in {}", element.as_str()))?;
            if seen.insert(name.clone()) {
                result.push(NamedSpan::new(name, element.range()));
            }
        }

        Ok(result)
    }
}

/// The first match of a definition's locator
#[derive(Debug, Clone, Copy)]
pub struct Region<'t> {
    pub whole: Match<'t>,
    /// Capture group 1, if the locator has one and it participated
    pub value: Option<Match<'t>>,
}

impl<'t> Region<'t> {
    pub fn as_str(&self) -> &'t str {
        self.whole.as_str()
    }

    pub fn span(&self) -> Range<usize> {
        self.whole.range()
    }
}

pub fn locate<'t>(
    definition: &SettingDefinition,
    blob: &'t str,
) -> Result<Region<'t>, SettingParseError> {
    let not_found = || SettingParseError::NotFound {
        setting: definition.name.clone(),
    };
    let captures = definition.pattern.captures(blob).ok_or_else(not_found)?;
    let whole = captures.get(0).ok_or_else(not_found)?;
    Ok(Region {
        whole,
        value: captures.get(1),
    })
}

pub fn decode(definition: &SettingDefinition, blob: &str) -> Result<SettingValue, SettingParseError> {
    let region = locate(definition, blob)?;

    match &definition.codec {
        Codec::LiteralBool => match value_of(definition, &region)? {
            "true" => Ok(SettingValue::Bool(true)),
            "false" => Ok(SettingValue::Bool(false)),
            other => Err(invalid_encoding(
                definition,
                format!("expected 'true' or 'false' but got '{}'", other),
            )),
        },
        Codec::MarkerSwapBool { pairs } => {
            let section = region.as_str();
            let on = pairs.iter().all(|(_, on)| section.contains(on.as_str()));
            let off = pairs.iter().all(|(off, _)| section.contains(off.as_str()));
            if on == off {
                return Err(invalid_encoding(
                    definition,
                    format!("expected exactly one of {:?} in '{}'", pairs, section),
                ));
            }
            Ok(SettingValue::Bool(on))
        }
        Codec::WrapBool { open, close } => {
            Ok(SettingValue::Bool(is_wrapped(region.as_str(), open, close)))
        }
        Codec::Text { quoted: true } | Codec::Shortcut => {
            Ok(SettingValue::Text(unescape_quotes(value_of(definition, &region)?)))
        }
        Codec::Text { quoted: false } | Codec::Color { .. } | Codec::FontFamily => {
            Ok(SettingValue::Text(value_of(definition, &region)?.to_string()))
        }
        Codec::Number { decimal, .. } => parse_number(definition, *decimal, value_of(definition, &region)?),
        Codec::Choice { options, .. } => {
            let raw = value_of(definition, &region)?;
            if options.iter().any(|option| option == raw) {
                Ok(SettingValue::Text(raw.to_string()))
            } else {
                Err(invalid_encoding(
                    definition,
                    format!("expected one of {:?} but got '{}'", options, raw),
                ))
            }
        }
        Codec::UserAction { options, .. } => {
            let raw = value_of(definition, &region)?;
            if options.iter().any(|option| option == raw) {
                Ok(SettingValue::Text(raw.to_string()))
            } else {
                Ok(SettingValue::Text(CUSTOM_USER_ACTION.to_string()))
            }
        }
        Codec::OrderedList(pattern) => {
            let elements = pattern
                .elements(region.as_str())
                .map_err(|details| invalid_encoding(definition, details))?;
            Ok(SettingValue::List(
                elements.into_iter().map(|element| element.name).collect(),
            ))
        }
    }
}

/// Write `value` into `blob`.
///
/// The result is decoded again; a value that would not read back (for
/// example an empty text where the locator needs at least one character)
/// is rejected with [`SettingParseError::InvalidValue`] and `blob` stays as
/// it was.
pub fn encode(
    definition: &SettingDefinition,
    blob: &str,
    value: &SettingValue,
) -> Result<String, SettingParseError> {
    let encoded = splice_value(definition, blob, value)?;
    verify_read_back(definition, &encoded, value)?;
    Ok(encoded)
}

fn splice_value(
    definition: &SettingDefinition,
    blob: &str,
    value: &SettingValue,
) -> Result<String, SettingParseError> {
    let region = locate(definition, blob)?;

    match &definition.codec {
        Codec::LiteralBool => {
            let on = expect_bool(definition, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, if on { "true" } else { "false" }))
        }
        Codec::MarkerSwapBool { pairs } => {
            let on = expect_bool(definition, value)?;
            let mut section = region.as_str().to_string();
            for (off_marker, on_marker) in pairs {
                section = if on {
                    section.replace(off_marker.as_str(), on_marker)
                } else {
                    section.replace(on_marker.as_str(), off_marker)
                };
            }
            Ok(splice(blob, region.span(), &section))
        }
        Codec::WrapBool { open, close } => {
            let on = expect_bool(definition, value)?;
            let section = region.as_str();
            let replacement = match (on, is_wrapped(section, open, close)) {
                (true, false) => format!("{}{}{}", open, section, close),
                (false, true) => section[open.len()..section.len() - close.len()].to_string(),
                _ => return Ok(blob.to_string()),
            };
            Ok(splice(blob, region.span(), &replacement))
        }
        Codec::Text { quoted: true } | Codec::Shortcut => {
            let text = expect_text(definition, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, &escape_quotes(text)))
        }
        Codec::Text { quoted: false } | Codec::FontFamily => {
            let text = expect_text(definition, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, text))
        }
        Codec::Color { with_inherit_option } => {
            let text = expect_text(definition, value)?;
            let text = if *with_inherit_option && text == "transparent" {
                "inherit"
            } else {
                text
            };
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, text))
        }
        Codec::Number { decimal, .. } => {
            let formatted = format_number(definition, *decimal, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, &formatted))
        }
        Codec::Choice { options, .. } => {
            let text = expect_option(definition, options, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, text))
        }
        Codec::UserAction { options, .. } => {
            if value.as_text() == Some(CUSTOM_USER_ACTION) {
                return Ok(blob.to_string());
            }
            let text = expect_option(definition, options, value)?;
            let span = value_span(definition, &region)?;
            Ok(splice(blob, span, text))
        }
        Codec::OrderedList(pattern) => {
            let requested = value.as_list().ok_or_else(|| invalid_value(definition, "list", value))?;
            let section = region.as_str();
            let elements = pattern
                .elements(section)
                .map_err(|details| invalid_encoding(definition, details))?;
            let current: Vec<String> = elements.iter().map(|element| element.name.clone()).collect();
            let order = repair_order(&current, requested);
            Ok(splice(blob, region.span(), &reorder_spans(section, &elements, &order)))
        }
    }
}

/// The value `decode` must return after `value` was written. `None` when only
/// a successful decode is required.
fn expected_read_back(codec: &Codec, value: &SettingValue) -> Option<SettingValue> {
    match codec {
        Codec::Color {
            with_inherit_option: true,
        } if value.as_text() == Some("transparent") => Some(SettingValue::from("inherit")),
        Codec::UserAction { .. } if value.as_text() == Some(CUSTOM_USER_ACTION) => None,
        // integers may arrive as whole decimals, stale orders get repaired
        Codec::Number { .. } | Codec::OrderedList(_) => None,
        _ => Some(value.clone()),
    }
}

fn verify_read_back(
    definition: &SettingDefinition,
    encoded: &str,
    value: &SettingValue,
) -> Result<(), SettingParseError> {
    let rejected = |details: String| SettingParseError::InvalidValue {
        setting: definition.name.clone(),
        expected: "value that can be read back".to_string(),
        found: format!("'{}' ({})", value, details),
    };

    let decoded = decode(definition, encoded).map_err(|err| rejected(err.to_string()))?;
    match expected_read_back(&definition.codec, value) {
        Some(expected) if decoded != expected => Err(rejected(format!("reads back as '{}'", decoded))),
        _ => Ok(()),
    }
}

/// Format a decimal the way templates write them (`1.4`, `1.0`)
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn splice(blob: &str, span: Range<usize>, replacement: &str) -> String {
    let mut result = String::with_capacity(blob.len() + replacement.len());
    result.push_str(&blob[..span.start]);
    result.push_str(replacement);
    result.push_str(&blob[span.end..]);
    result
}

fn is_wrapped(section: &str, open: &str, close: &str) -> bool {
    section.len() >= open.len() + close.len() && section.starts_with(open) && section.ends_with(close)
}

/// Escape `text` for a double-quoted literal. A backslash is doubled when it
/// would otherwise pair with the next character (or the closing quote);
/// other escapes such as `\n` are written as they are.
fn escape_quotes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' if matches!(chars.peek().copied(), None | Some('\\') | Some('"')) => escaped.push_str("\\\\"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Inverse of [`escape_quotes`]: `\\` and `\"` lose their backslash
pub(crate) fn unescape_quotes(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next @ ('\\' | '"')) = chars.peek().copied() {
                unescaped.push(next);
                chars.next();
                continue;
            }
        }
        unescaped.push(c);
    }
    unescaped
}

fn value_of<'t>(definition: &SettingDefinition, region: &Region<'t>) -> Result<&'t str, SettingParseError> {
    region
        .value
        .map(|value| value.as_str())
        .ok_or_else(|| invalid_encoding(definition, format!("no value in '{}'", region.as_str())))
}

fn value_span(definition: &SettingDefinition, region: &Region<'_>) -> Result<Range<usize>, SettingParseError> {
    region
        .value
        .map(|value| value.range())
        .ok_or_else(|| invalid_encoding(definition, format!("no value in '{}'", region.as_str())))
}

fn parse_number(definition: &SettingDefinition, decimal: bool, raw: &str) -> Result<SettingValue, SettingParseError> {
    let trimmed = raw.trim();
    let parsed = if decimal {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(SettingValue::Decimal)
    } else {
        trimmed.parse::<i64>().ok().map(SettingValue::Integer)
    };

    parsed.ok_or_else(|| {
        invalid_encoding(
            definition,
            format!(
                "expected {} but found '{}'",
                if decimal { "decimal" } else { "integer" },
                raw
            ),
        )
    })
}

fn format_number(definition: &SettingDefinition, decimal: bool, value: &SettingValue) -> Result<String, SettingParseError> {
    match (decimal, value) {
        (false, SettingValue::Integer(number)) => Ok(number.to_string()),
        (false, SettingValue::Decimal(number)) if number.is_finite() && number.fract() == 0.0 => {
            Ok((*number as i64).to_string())
        }
        (true, SettingValue::Decimal(number)) if number.is_finite() => Ok(format_decimal(*number)),
        (true, SettingValue::Integer(number)) => Ok(format_decimal(*number as f64)),
        _ => Err(invalid_value(
            definition,
            if decimal { "decimal" } else { "integer" },
            value,
        )),
    }
}

fn expect_bool(definition: &SettingDefinition, value: &SettingValue) -> Result<bool, SettingParseError> {
    value.as_bool().ok_or_else(|| invalid_value(definition, "boolean", value))
}

fn expect_text<'v>(definition: &SettingDefinition, value: &'v SettingValue) -> Result<&'v str, SettingParseError> {
    value.as_text().ok_or_else(|| invalid_value(definition, "text", value))
}

fn expect_option<'v>(
    definition: &SettingDefinition,
    options: &[String],
    value: &'v SettingValue,
) -> Result<&'v str, SettingParseError> {
    let text = expect_text(definition, value)?;
    if options.iter().any(|option| option == text) {
        Ok(text)
    } else {
        Err(SettingParseError::InvalidValue {
            setting: definition.name.clone(),
            expected: format!("one of {:?}", options),
            found: format!("'{}'", text),
        })
    }
}

fn invalid_encoding(definition: &SettingDefinition, details: String) -> SettingParseError {
    SettingParseError::InvalidEncoding {
        setting: definition.name.clone(),
        details,
    }
}

fn invalid_value(definition: &SettingDefinition, expected: &str, found: &SettingValue) -> SettingParseError {
    SettingParseError::InvalidValue {
        setting: definition.name.clone(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SettingTarget;

    fn definition(pattern: &str, codec: Codec) -> SettingDefinition {
        SettingDefinition::builder("test_setting", "Test", SettingTarget::Back, pattern, codec)
            .build()
            .unwrap()
    }

    fn field_order() -> SettingDefinition {
        let pattern = ElementPattern {
            element: Regex::new(r"\[[^\]]*\]").unwrap(),
            must_contain: Regex::new("#").unwrap(),
            name_patterns: vec![
                Regex::new(r#"name="([^"]+)""#).unwrap(),
                Regex::new(r"\[(\w+)").unwrap(),
            ],
        };
        definition(r"[\w\W]*", Codec::OrderedList(pattern))
    }

    #[test]
    fn test_literal_bool_toggle() {
        let def = definition(r"var +ScrollToHint += +(false|true)", Codec::LiteralBool);
        let blob = "<script>\nvar ScrollToHint = true\nvar Other = true\n</script>";

        let encoded = encode(&def, blob, &SettingValue::Bool(false)).unwrap();

        assert_eq!(encoded, "<script>\nvar ScrollToHint = false\nvar Other = true\n</script>");
        assert_eq!(decode(&def, &encoded).unwrap(), SettingValue::Bool(false));
    }

    #[test]
    fn test_literal_bool_rejects_other_literals() {
        let def = definition(r"var +flag += +(\w+)", Codec::LiteralBool);
        let err = decode(&def, "var flag = yes").unwrap_err();
        assert!(matches!(err, SettingParseError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_locate_missing_is_not_found() {
        let def = definition(r"var +missing += +(false|true)", Codec::LiteralBool);
        let err = decode(&def, "var other = true").unwrap_err();
        assert_eq!(
            err,
            SettingParseError::NotFound {
                setting: "test_setting".to_string()
            }
        );
    }

    #[test]
    fn test_marker_swap_requires_exactly_one_side() {
        let def = definition(
            r"(<!--|\{\{)tts.+?(-->|\}\})",
            Codec::MarkerSwapBool {
                pairs: vec![("<!--".into(), "{{".into()), ("-->".into(), "}}".into())],
            },
        );

        assert_eq!(decode(&def, "a {{tts en_US:Front}} b").unwrap(), SettingValue::Bool(true));
        assert_eq!(decode(&def, "a <!--tts en_US:Front--> b").unwrap(), SettingValue::Bool(false));
        assert!(decode(&def, "a <!--tts en_US:Front}} b").is_err());

        let encoded = encode(&def, "a {{tts en_US:Front}} b", &SettingValue::Bool(false)).unwrap();
        assert_eq!(encoded, "a <!--tts en_US:Front--> b");
    }

    #[test]
    fn test_wrap_bool_strips_exactly_the_wrapper() {
        let def = definition(
            r"(<!--)?\{\{#Hint\}\}[\w\W]+?\{\{/Hint\}\}(-->)?",
            Codec::WrapBool {
                open: "<!--".into(),
                close: "-->".into(),
            },
        );
        let blob = "before\n<!--{{#Hint}}<div class=\"hints\">x</div>{{/Hint}}-->\nafter";

        assert_eq!(decode(&def, blob).unwrap(), SettingValue::Bool(true));
        let stripped = encode(&def, blob, &SettingValue::Bool(false)).unwrap();
        assert_eq!(stripped, "before\n{{#Hint}}<div class=\"hints\">x</div>{{/Hint}}\nafter");

        let once = encode(&def, &stripped, &SettingValue::Bool(true)).unwrap();
        let twice = encode(&def, &once, &SettingValue::Bool(true)).unwrap();
        assert_eq!(once, blob);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_text_escapes_quotes() {
        let def = definition(r#"var +clozeHider += +"((?:\\.|[^"\\])*?)""#, Codec::Text { quoted: true });
        let blob = r#"var clozeHider = "[___]";"#;

        let encoded = encode(&def, blob, &SettingValue::from(r#"say "hi""#)).unwrap();
        assert_eq!(encoded, r#"var clozeHider = "say \"hi\"";"#);
        assert_eq!(decode(&def, &encoded).unwrap(), SettingValue::from(r#"say "hi""#));
    }

    #[test]
    fn test_text_escapes_backslashes() {
        let def = definition(
            r#"var +ToggleNextButtonShortcut += +"((?:\\.|[^"\\])*?)""#,
            Codec::Shortcut,
        );
        let blob = "var ToggleNextButtonShortcut = \"H\"\nvar ToggleAllButtonsShortcut = \"'\"\n";

        for shortcut in [r"Ctrl+\", r"\\", r#"\""#, r"a\nb"] {
            let encoded = encode(&def, blob, &SettingValue::from(shortcut)).unwrap();
            assert_eq!(decode(&def, &encoded).unwrap(), SettingValue::from(shortcut));
            assert!(encoded.ends_with("\nvar ToggleAllButtonsShortcut = \"'\"\n"));
        }

        let encoded = encode(&def, blob, &SettingValue::from(r"Ctrl+\")).unwrap();
        assert_eq!(encoded.lines().next(), Some(r#"var ToggleNextButtonShortcut = "Ctrl+\\""#));
    }

    #[test]
    fn test_text_keeps_other_escapes_as_written() {
        let def = definition(r#"var +clozeHider += +"((?:\\.|[^"\\])*?)""#, Codec::Text { quoted: true });
        let blob = r#"var clozeHider = "a\tb";"#;

        let value = decode(&def, blob).unwrap();
        assert_eq!(value, SettingValue::from(r"a\tb"));
        assert_eq!(encode(&def, blob, &value).unwrap(), blob);
    }

    #[test]
    fn test_encode_rejects_value_that_does_not_read_back() {
        let def = definition(r"--font-size: (.+?);", Codec::Text { quoted: false });
        let blob = "--font-size: 22px;\n--other: 1;";

        let err = encode(&def, blob, &SettingValue::from("")).unwrap_err();
        assert!(matches!(err, SettingParseError::InvalidValue { .. }));
        assert_eq!(err.setting(), "test_setting");

        let err = encode(&def, blob, &SettingValue::from("a;b")).unwrap_err();
        assert!(matches!(err, SettingParseError::InvalidValue { .. }));

        assert_eq!(
            encode(&def, blob, &SettingValue::from("1rem")).unwrap(),
            "--font-size: 1rem;\n--other: 1;"
        );
    }

    #[test]
    fn test_encode_rejects_number_outside_locator() {
        let def = definition(r"var +numTagLevelsToShow += +(\d+)", Codec::integer());
        let err = encode(&def, "var numTagLevelsToShow = 0", &SettingValue::Integer(-1)).unwrap_err();
        assert!(matches!(err, SettingParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_number_integer_and_decimal() {
        let int_def = definition(r"var +seconds += +([^ /\n;]*)", Codec::integer());
        assert_eq!(decode(&int_def, "var seconds = 9;").unwrap(), SettingValue::Integer(9));
        assert!(decode(&int_def, "var seconds = nine;").is_err());
        assert_eq!(
            encode(&int_def, "var seconds = 9;", &SettingValue::Integer(-3)).unwrap(),
            "var seconds = -3;"
        );

        let decimal_def = definition(
            r"(?:<!--|\{\{)tts.*?speed=([\d\.]+).*?(?:-->|\}\})",
            Codec::Number {
                decimal: true,
                min: 0.1,
                max: 10.0,
                step: 0.1,
            },
        );
        let blob = "{{tts de_DE speed=1.4:Front}}";
        assert_eq!(decode(&decimal_def, blob).unwrap(), SettingValue::Decimal(1.4));
        assert_eq!(
            encode(&decimal_def, blob, &SettingValue::Decimal(2.0)).unwrap(),
            "{{tts de_DE speed=2.0:Front}}"
        );
    }

    #[test]
    fn test_number_rejects_wrong_shape() {
        let def = definition(r"var +seconds += +([^ /\n;]*)", Codec::integer());
        let err = encode(&def, "var seconds = 9;", &SettingValue::Decimal(1.5)).unwrap_err();
        assert!(matches!(err, SettingParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_choice_membership() {
        let def = definition(
            r#"var +mode += +"([^"]*?)""#,
            Codec::Choice {
                options: vec!["cloze".into(), "word".into()],
                labels: vec![],
            },
        );
        assert_eq!(decode(&def, r#"var mode = "word""#).unwrap(), SettingValue::from("word"));
        assert!(decode(&def, r#"var mode = "line""#).is_err());
        assert!(encode(&def, r#"var mode = "word""#, &SettingValue::from("line")).is_err());
    }

    #[test]
    fn test_user_action_custom_is_preserved() {
        let def = definition(
            r"var +userJs1 += +([^/\n]*)",
            Codec::UserAction {
                options: vec!["undefined".into(), "window.toggleAll".into()],
                labels: vec![],
            },
        );
        let blob = "var userJs1 = () => myOwnThing()\n";

        assert_eq!(decode(&def, blob).unwrap(), SettingValue::from(CUSTOM_USER_ACTION));
        assert_eq!(encode(&def, blob, &SettingValue::from(CUSTOM_USER_ACTION)).unwrap(), blob);
        assert_eq!(
            encode(&def, blob, &SettingValue::from("window.toggleAll")).unwrap(),
            "var userJs1 = window.toggleAll\n"
        );
    }

    #[test]
    fn test_color_inherit_option() {
        let def = definition(
            r"--text-bold: (.+?)( +!important)?;",
            Codec::Color {
                with_inherit_option: true,
            },
        );
        let encoded = encode(&def, "--text-bold: red;", &SettingValue::from("transparent")).unwrap();
        assert_eq!(encoded, "--text-bold: inherit;");
    }

    #[test]
    fn test_ordered_list_decode_and_reorder() {
        let def = field_order();
        let blob = "<[A #]>\n<[Bbbbbbbbbbbb #]>\n<[skip]>\n<[C #]>";

        assert_eq!(
            decode(&def, blob).unwrap(),
            SettingValue::List(vec!["A".into(), "Bbbbbbbbbbbb".into(), "C".into()])
        );

        let requested = SettingValue::List(vec!["C".into(), "A".into()]);
        let encoded = encode(&def, blob, &requested).unwrap();
        assert_eq!(encoded, "<[C #]>\n<[A #]>\n<[skip]>\n<[Bbbbbbbbbbbb #]>");
    }

    #[test]
    fn test_ordered_list_prefers_primary_name() {
        let def = field_order();
        let blob = r#"[Old name="New" #][Other #]"#;
        assert_eq!(
            decode(&def, blob).unwrap(),
            SettingValue::List(vec!["New".into(), "Other".into()])
        );
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1.0), "1.0");
        assert_eq!(format_decimal(1.4), "1.4");
        assert_eq!(format_decimal(0.25), "0.25");
    }
}
