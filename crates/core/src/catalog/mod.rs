pub mod parser;
pub mod schema;
pub mod source;

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::domain::*;
use crate::error::{Error, Result};

pub use source::{
    load_apps_or_empty, open_catalog, CatalogSource, JsonCatalog, SqliteCatalog, StaticCatalog,
    TextCatalog,
};

const APP_COLUMNS: &str = "id, name, description, category, status, live_url, github_url, \
                           analytics_url, image_url, tags, socials, traffic, created_at";

/// SQLite-backed catalog of apps.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open or create a catalog at the given path with WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory catalog (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    // ── Apps ─────────────────────────────────────────────────────────

    /// Insert or update an app keyed by name. Returns the row id.
    pub fn upsert_app(&self, app: &App) -> Result<i64> {
        upsert_with(&self.conn, app)
    }

    /// Upsert multiple apps in a single transaction.
    pub fn upsert_apps_batch(&mut self, apps: &[App]) -> Result<Vec<i64>> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(apps.len());
        for app in apps {
            ids.push(upsert_with(&tx, app)?);
        }
        tx.commit()?;
        Ok(ids)
    }

    /// All apps, newest first.
    pub fn list_apps(&self) -> Result<Vec<App>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APP_COLUMNS} FROM apps ORDER BY created_at DESC, id DESC"
        ))?;
        let apps = stmt
            .query_map([], app_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    pub fn get_app(&self, name: &str) -> Result<App> {
        self.conn
            .query_row(
                &format!("SELECT {APP_COLUMNS} FROM apps WHERE name = ?1"),
                params![name],
                app_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::AppNotFound(name.to_string()))
    }

    pub fn remove_app(&self, name: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM apps WHERE name = ?1", params![name])?;
        if removed == 0 {
            return Err(Error::AppNotFound(name.to_string()));
        }
        Ok(())
    }

    pub fn count_apps(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ── Config ───────────────────────────────────────────────────

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .ok();
        Ok(value)
    }
}

fn upsert_with(conn: &Connection, app: &App) -> Result<i64> {
    let tags = serde_json::to_string(&app.tags)?;
    let socials = serde_json::to_string(&app.socials)?;
    let created_at = if app.created_at == 0 {
        chrono::Utc::now().timestamp()
    } else {
        app.created_at
    };

    let existing_id: Option<i64> = conn
        .query_row(
            "SELECT id FROM apps WHERE name = ?1",
            params![app.name],
            |row| row.get(0),
        )
        .ok();

    if let Some(id) = existing_id {
        conn.execute(
            "UPDATE apps SET description=?1, category=?2, status=?3, live_url=?4, github_url=?5,
             analytics_url=?6, image_url=?7, tags=?8, socials=?9, traffic=?10
             WHERE id=?11",
            params![
                app.description,
                app.category,
                app.status.as_str(),
                app.live_url,
                app.github_url,
                app.analytics_url,
                app.image_url,
                tags,
                socials,
                app.traffic,
                id,
            ],
        )?;
        Ok(id)
    } else {
        conn.execute(
            "INSERT INTO apps (name, description, category, status, live_url, github_url,
             analytics_url, image_url, tags, socials, traffic, created_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                app.name,
                app.description,
                app.category,
                app.status.as_str(),
                app.live_url,
                app.github_url,
                app.analytics_url,
                app.image_url,
                tags,
                socials,
                app.traffic,
                created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn app_from_row(row: &Row<'_>) -> rusqlite::Result<App> {
    let status: String = row.get(4)?;
    let tags: String = row.get(9)?;
    let socials: String = row.get(10)?;
    Ok(App {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        status: status.parse().unwrap_or_default(),
        live_url: row.get(5)?,
        github_url: row.get(6)?,
        analytics_url: row.get(7)?,
        image_url: row.get(8)?,
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        socials: serde_json::from_str(&socials).unwrap_or_default(),
        traffic: row.get(11)?,
        created_at: row.get(12)?,
        ..Default::default()
    })
}
