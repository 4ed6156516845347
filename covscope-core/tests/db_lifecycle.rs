//! Integration test for the SQLite preference store.
//!
//! Exercises: open_db, migrate, SqlitePreferences get/set and persistence
//! across connections.

use covscope_core::db::{self, SqlitePreferences};
use covscope_core::prefs::{self, PreferenceStore};
use covscope_core::state::ThemeMode;
use covscope_core::tree::SortMode;

#[test]
fn full_preference_lifecycle() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("prefs.db");

    {
        let conn = db::open_db(&path).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1, "schema_version should be 1");

        let journal: String = conn
            .query_row("PRAGMA journal_mode", [], |r| r.get(0))
            .unwrap();
        assert_eq!(journal, "wal", "journal_mode should be wal");

        let pk_type: String = conn
            .query_row(
                "SELECT type FROM pragma_table_info('preferences') WHERE name = 'key'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(pk_type, "TEXT", "preferences.key should be TEXT");
    }

    let mut store = SqlitePreferences::open(&path).unwrap();
    assert_eq!(store.get(prefs::THEME_KEY), None, "fresh store is empty");

    store.set(prefs::THEME_KEY, "light");
    store.set(prefs::SORT_MODE_KEY, "coverage");
    store.set(prefs::SYNTAX_KEY, "on");
    // Last write wins.
    store.set(prefs::SYNTAX_KEY, "off");

    assert_eq!(prefs::read_theme(&store), Some(ThemeMode::Light));
    assert_eq!(prefs::read_sort_mode(&store), Some(SortMode::ByCoverage));
    assert_eq!(prefs::read_syntax(&store), Some(false));
    drop(store);

    // Values persist across connections.
    let reopened = SqlitePreferences::open(&path).unwrap();
    assert_eq!(reopened.get(prefs::THEME_KEY).as_deref(), Some("light"));
    assert_eq!(reopened.get(prefs::SYNTAX_KEY).as_deref(), Some("off"));
}

#[test]
fn migration_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("twice.db");

    drop(db::open_db(&path).unwrap());
    let conn = db::open_db(&path).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1, "second open must not re-run the v1 migration");
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state").join("covscope").join("prefs.db");

    let mut store = SqlitePreferences::open(&path).unwrap();
    store.set(prefs::THEME_KEY, "dark");
    assert!(path.exists());
}
