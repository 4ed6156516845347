use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension};

use crate::prefs::PreferenceStore;

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// `busy_timeout` is set via the `Connection` method (not a PRAGMA string) so
/// the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub fn open_db(path: &Path) -> rusqlite::Result<Connection> {
    let mut db = Connection::open(path)?;

    db.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    db.busy_timeout(Duration::from_secs(5))?;

    crate::schema::migrate(&mut db)?;
    Ok(db)
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Preferences persisted in a SQLite file, one row per key.
pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    /// Opens the preference database at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `CovscopeError::Sqlite` if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> crate::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = open_db(path)?;
        tracing::debug!(path = %path.display(), "opened preference store");
        Ok(Self { conn })
    }

    fn try_get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                rusqlite::params![key],
                |r| r.get(0),
            )
            .optional()
    }

    fn try_set(&mut self, key: &str, value: &str) -> rusqlite::Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value,
                           updated_at = excluded.updated_at",
            rusqlite::params![key, value, now_secs()],
        )?;
        tx.commit()
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.try_set(key, value) {
            tracing::warn!(key, value, error = %e, "failed to write preference");
        }
    }
}
