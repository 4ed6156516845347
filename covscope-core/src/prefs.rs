//! Persisted viewer preferences.
//!
//! Preferences are string-valued keys behind [`PreferenceStore`]. Reading one
//! never fails from the caller's point of view: a missing key, a store error,
//! or a value outside the key's vocabulary all mean "use the default".

use std::collections::HashMap;

use crate::state::ThemeMode;
use crate::tree::SortMode;

pub const THEME_KEY: &str = "theme";
pub const SYNTAX_KEY: &str = "syntax";
pub const SORT_MODE_KEY: &str = "sort-mode";

/// Synchronous, last-write-wins key-value storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`. Implementations log and swallow failures.
    fn set(&mut self, key: &str, value: &str);
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// Process-local store; nothing survives the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

pub fn syntax_as_pref(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn syntax_from_pref(value: &str) -> Option<bool> {
    match value {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// Reads `key` and parses it, ignoring values `parse` rejects.
fn read<T>(store: &dyn PreferenceStore, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = store.get(key)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        tracing::debug!(key, value = %raw, "ignoring invalid preference");
    }
    parsed
}

pub fn read_theme(store: &dyn PreferenceStore) -> Option<ThemeMode> {
    read(store, THEME_KEY, ThemeMode::from_pref)
}

pub fn read_syntax(store: &dyn PreferenceStore) -> Option<bool> {
    read(store, SYNTAX_KEY, syntax_from_pref)
}

pub fn read_sort_mode(store: &dyn PreferenceStore) -> Option<SortMode> {
    read(store, SORT_MODE_KEY, SortMode::from_pref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_values_read_as_absent() {
        let store = MemoryPreferences::default()
            .with(THEME_KEY, "solarized")
            .with(SYNTAX_KEY, "off")
            .with(SORT_MODE_KEY, "");
        assert_eq!(read_theme(&store), None);
        assert_eq!(read_syntax(&store), Some(false));
        assert_eq!(read_sort_mode(&store), None);
    }

    #[test]
    fn boxed_store_forwards() {
        let mut store: Box<dyn PreferenceStore> = Box::new(MemoryPreferences::default());
        store.set(THEME_KEY, "light");
        assert_eq!(read_theme(&store), Some(ThemeMode::Light));
    }
}
