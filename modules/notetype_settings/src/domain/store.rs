//! Ephemeral config store for an editing session

use indexmap::IndexMap;

use crate::contract::SettingValue;

/// Scope of the cross-family settings
pub const GENERAL_SCOPE: &str = "general";

/// Ordered map of `"{scope}.{setting}"` keys to values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    values: IndexMap<String, SettingValue>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(scope: &str, setting: &str) -> String {
        format!("{}.{}", scope, setting)
    }

    /// Split a key into scope and setting name. Setting names never contain
    /// dots, family names may.
    pub fn split_key(key: &str) -> Option<(&str, &str)> {
        key.rsplit_once('.')
            .filter(|(scope, setting)| !scope.is_empty() && !setting.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn get_setting(&self, scope: &str, setting: &str) -> Option<&SettingValue> {
        self.values.get(&Self::key(scope, setting))
    }

    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    pub fn set_setting(&mut self, scope: &str, setting: &str, value: SettingValue) {
        self.set(Self::key(scope, setting), value);
    }

    /// Set a general setting and fan it out to every family, whether or not
    /// the family has the setting.
    pub fn set_general<'a>(
        &mut self,
        setting: &str,
        value: SettingValue,
        families: impl IntoIterator<Item = &'a String>,
    ) {
        for family in families {
            self.set_setting(family, setting, value.clone());
        }
        self.set_setting(GENERAL_SCOPE, setting, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key_uses_last_dot() {
        assert_eq!(
            ConfigStore::split_key("Family v1.2.font_size"),
            Some(("Family v1.2", "font_size"))
        );
        assert_eq!(ConfigStore::split_key("font_size"), None);
        assert_eq!(ConfigStore::split_key(".font_size"), None);
    }

    #[test]
    fn test_set_general_fans_out() {
        let families = vec!["A".to_string(), "B".to_string()];
        let mut store = ConfigStore::new();
        store.set_general("autoflip", SettingValue::Bool(false), &families);

        assert_eq!(store.get("general.autoflip"), Some(&SettingValue::Bool(false)));
        assert_eq!(store.get("A.autoflip"), Some(&SettingValue::Bool(false)));
        assert_eq!(store.get("B.autoflip"), Some(&SettingValue::Bool(false)));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut store = ConfigStore::new();
        store.set("a.x", SettingValue::Integer(1));
        store.set("a.y", SettingValue::Integer(2));
        store.set("a.x", SettingValue::Integer(3));

        let keys: Vec<_> = store.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["a.x", "a.y"]);
        assert_eq!(store.get("a.x"), Some(&SettingValue::Integer(3)));
    }
}
