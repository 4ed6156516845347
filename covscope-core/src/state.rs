use std::collections::HashSet;

use crate::prefs::{self, PreferenceStore};
use crate::tree::{NodePath, SortMode};
use crate::types::FileId;

/// Colour scheme of the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_pref(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn from_pref(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Starting values before persisted preferences are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDefaults {
    pub theme: ThemeMode,
    pub syntax_enabled: bool,
    pub sort_mode: SortMode,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            syntax_enabled: true,
            sort_mode: SortMode::ByName,
        }
    }
}

/// Session state owned by the view controller.
///
/// Never persisted as a whole; only `theme`, `syntax_enabled` and `sort_mode`
/// are written back individually through a [`PreferenceStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub current_file: Option<FileId>,
    /// Tree filter query as last applied (not as last typed).
    pub file_query: String,
    /// Content search query as last applied.
    pub content_query: String,
    pub sort_mode: SortMode,
    pub syntax_enabled: bool,
    pub theme: ThemeMode,
    pub expanded: HashSet<NodePath>,
}

impl ViewState {
    /// Builds the initial state: `defaults` overridden by any valid stored preference.
    pub fn load(defaults: ViewDefaults, store: &dyn PreferenceStore, expanded: HashSet<NodePath>) -> Self {
        Self {
            current_file: None,
            file_query: String::new(),
            content_query: String::new(),
            sort_mode: prefs::read_sort_mode(store).unwrap_or(defaults.sort_mode),
            syntax_enabled: prefs::read_syntax(store).unwrap_or(defaults.syntax_enabled),
            theme: prefs::read_theme(store).unwrap_or(defaults.theme),
            expanded,
        }
    }

    /// Flips the expand state of `path`. Returns the new state.
    pub fn toggle_dir(&mut self, path: NodePath) -> bool {
        if self.expanded.remove(&path) {
            false
        } else {
            self.expanded.insert(path);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;

    #[test]
    fn stored_preferences_override_defaults() {
        let store = MemoryPreferences::default()
            .with(prefs::THEME_KEY, "light")
            .with(prefs::SORT_MODE_KEY, "coverage");
        let state = ViewState::load(ViewDefaults::default(), &store, HashSet::new());
        assert_eq!(state.theme, ThemeMode::Light);
        assert_eq!(state.sort_mode, SortMode::ByCoverage);
        assert!(state.syntax_enabled);
    }

    #[test]
    fn invalid_preference_falls_back_to_default() {
        let store = MemoryPreferences::default().with(prefs::SYNTAX_KEY, "maybe");
        let defaults = ViewDefaults { syntax_enabled: false, ..ViewDefaults::default() };
        let state = ViewState::load(defaults, &store, HashSet::new());
        assert!(!state.syntax_enabled);
    }

    #[test]
    fn toggle_dir_flips_membership() {
        let mut state = ViewState::load(ViewDefaults::default(), &MemoryPreferences::default(), HashSet::new());
        let src = NodePath::root().child("src");
        assert!(state.toggle_dir(src.clone()));
        assert!(state.expanded.contains(&src));
        assert!(!state.toggle_dir(src.clone()));
        assert!(state.expanded.is_empty());
    }
}
