//! Validation of edited setting values and session keys

use crate::contract::{NotetypeSettingsError, SettingValue};
use crate::domain::codec::{Codec, CUSTOM_USER_ACTION};
use crate::domain::definitions::SettingDefinition;
use crate::domain::store::ConfigStore;

/// Validate a config store key (`"{scope}.{setting}"`) and return its parts
pub fn validate_key(key: &str) -> Result<(&str, &str), NotetypeSettingsError> {
    ConfigStore::split_key(key).ok_or_else(|| NotetypeSettingsError::Validation {
        message: format!("'{}' is not a valid setting key, expected '<scope>.<setting>'", key),
    })
}

/// Check an edited value against the shape and bounds of its definition.
///
/// Integral decimals are accepted for integer settings and integers for
/// decimal settings; the codec writes them in the declared format.
pub fn validate_value(
    definition: &SettingDefinition,
    value: &SettingValue,
) -> Result<(), NotetypeSettingsError> {
    let mismatch = |expected: &str| NotetypeSettingsError::Validation {
        message: format!(
            "'{}' expects a {} value, got {}",
            definition.name,
            expected,
            value.kind()
        ),
    };

    match &definition.codec {
        Codec::LiteralBool | Codec::MarkerSwapBool { .. } | Codec::WrapBool { .. } => {
            value.as_bool().map(|_| ()).ok_or_else(|| mismatch("boolean"))
        }
        Codec::Text { .. } | Codec::Shortcut | Codec::Color { .. } | Codec::FontFamily => {
            value.as_text().map(|_| ()).ok_or_else(|| mismatch("text"))
        }
        Codec::Number {
            decimal, min, max, ..
        } => {
            let number = match (decimal, value) {
                (_, SettingValue::Integer(number)) => *number as f64,
                (true, SettingValue::Decimal(number)) => *number,
                (false, SettingValue::Decimal(number)) if number.fract() == 0.0 => *number,
                _ => return Err(mismatch(if *decimal { "decimal" } else { "integer" })),
            };
            if !number.is_finite() || number < *min || number > *max {
                return Err(NotetypeSettingsError::Validation {
                    message: format!(
                        "'{}' must be between {} and {}, got {}",
                        definition.name, min, max, number
                    ),
                });
            }
            Ok(())
        }
        Codec::Choice { options, .. } => validate_option(definition, options, value, false),
        Codec::UserAction { options, .. } => validate_option(definition, options, value, true),
        Codec::OrderedList(_) => value.as_list().map(|_| ()).ok_or_else(|| mismatch("list")),
    }
}

fn validate_option(
    definition: &SettingDefinition,
    options: &[String],
    value: &SettingValue,
    allow_custom: bool,
) -> Result<(), NotetypeSettingsError> {
    let text = value.as_text().ok_or_else(|| NotetypeSettingsError::Validation {
        message: format!("'{}' expects one of {:?}", definition.name, options),
    })?;

    if options.iter().any(|option| option == text) || (allow_custom && text == CUSTOM_USER_ACTION) {
        return Ok(());
    }

    Err(NotetypeSettingsError::Validation {
        message: format!(
            "'{}' is not a valid option for '{}'",
            text, definition.name
        ),
    })
}
