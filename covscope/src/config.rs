//! User configuration for covscope.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/covscope/config.toml`. Every
//! error here is soft: it is logged and the built-in defaults are used.

use std::path::{Path, PathBuf};

use covscope_core::state::{ThemeMode, ViewDefaults};
use covscope_core::tree::SortMode;
use covscope_core::types::ReportConfig;
use serde::Deserialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `dark` or `light`.
    pub theme: Option<String>,
    pub syntax: Option<bool>,
    /// `name` or `coverage`.
    pub sort: Option<String>,
    pub prefs_path: Option<PathBuf>,
}

impl Config {
    /// Loads the config file, or the empty config if it is absent or broken.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config");
                return Self::default();
            }
        };
        Self::parse(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "config parse error");
            Self::default()
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Starting view values before persisted preferences are applied.
    ///
    /// The report may only switch syntax colouring off, and so may
    /// `--no-syntax`.
    pub fn view_defaults(&self, report: &ReportConfig, no_syntax: bool) -> ViewDefaults {
        let builtin = ViewDefaults::default();
        let theme = match self.theme.as_deref() {
            Some(v) => ThemeMode::from_pref(v).unwrap_or_else(|| {
                tracing::warn!(value = v, "unknown theme in config");
                builtin.theme
            }),
            None => builtin.theme,
        };
        let sort_mode = match self.sort.as_deref() {
            Some(v) => SortMode::from_pref(v).unwrap_or_else(|| {
                tracing::warn!(value = v, "unknown sort in config");
                builtin.sort_mode
            }),
            None => builtin.sort_mode,
        };
        let syntax_enabled =
            self.syntax.unwrap_or(builtin.syntax_enabled) && report.syntax_enabled && !no_syntax;
        ViewDefaults { theme, syntax_enabled, sort_mode }
    }
}

/// `$XDG_CONFIG_HOME/covscope/config.toml`, falling back to
/// `~/.config/covscope/config.toml`.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("config.toml")
}

/// `$XDG_STATE_HOME/covscope`, falling back to `~/.local/state/covscope`.
/// Holds the preferences database and the log file.
pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    let base = std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(home_fallback)))
        .unwrap_or_else(|| PathBuf::from(home_fallback));
    base.join("covscope")
}
