use rusqlite::{params, Connection};

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: u32 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS apps (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL UNIQUE,
            description   TEXT NOT NULL,
            category      TEXT NOT NULL,
            status        TEXT NOT NULL,
            live_url      TEXT,
            github_url    TEXT,
            analytics_url TEXT,
            image_url     TEXT,
            tags          TEXT NOT NULL,
            socials       TEXT NOT NULL,
            traffic       INTEGER,
            created_at    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_apps_created ON apps(created_at);
        CREATE INDEX IF NOT EXISTS idx_apps_category ON apps(category);

        CREATE TABLE IF NOT EXISTS config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Stamp or check the schema version. A database written by a newer
/// version of this code is refused rather than silently misread.
pub fn migrate(conn: &Connection) -> Result<()> {
    let current: Option<String> = conn
        .query_row(
            "SELECT value FROM config WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .ok();

    let version = current.and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
    if version > SCHEMA_VERSION {
        return Err(Error::SchemaTooNew {
            db: version,
            code: SCHEMA_VERSION,
        });
    }

    if version < SCHEMA_VERSION {
        conn.execute(
            "INSERT INTO config (key, value) VALUES ('schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![SCHEMA_VERSION.to_string()],
        )?;
    }
    Ok(())
}
