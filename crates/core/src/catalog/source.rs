use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::parser::parse_apps_text;
use super::Catalog;
use crate::domain::App;
use crate::error::{Error, Result};

/// Anything that can produce the list of cataloged apps.
pub trait CatalogSource {
    fn load_apps(&self) -> Result<Vec<App>>;

    /// Short label for log lines.
    fn describe(&self) -> String;
}

/// A JSON array of apps on disk.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalog {
    fn load_apps(&self) -> Result<Vec<App>> {
        if !self.path.exists() {
            return Err(Error::CatalogNotFound(self.path.clone()));
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// The numbered plain-text app list.
pub struct TextCatalog {
    path: PathBuf,
}

impl TextCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for TextCatalog {
    fn load_apps(&self) -> Result<Vec<App>> {
        if !self.path.exists() {
            return Err(Error::CatalogNotFound(self.path.clone()));
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(parse_apps_text(&contents))
    }

    fn describe(&self) -> String {
        format!("text:{}", self.path.display())
    }
}

/// Reads through a SQLite catalog file. The database is opened per load so
/// the source itself holds no connection.
pub struct SqliteCatalog {
    path: PathBuf,
}

impl SqliteCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for SqliteCatalog {
    fn load_apps(&self) -> Result<Vec<App>> {
        if !self.path.exists() {
            return Err(Error::CatalogNotFound(self.path.clone()));
        }
        Catalog::open(&self.path)?.list_apps()
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

/// A fixed list, for callers that already hold the apps.
pub struct StaticCatalog(pub Vec<App>);

impl CatalogSource for StaticCatalog {
    fn load_apps(&self) -> Result<Vec<App>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("static:{} apps", self.0.len())
    }
}

/// Pick a source by file extension.
pub fn open_catalog(path: &Path) -> Result<Box<dyn CatalogSource>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => Ok(Box::new(JsonCatalog::new(path))),
        "txt" => Ok(Box::new(TextCatalog::new(path))),
        "db" | "sqlite" | "sqlite3" => Ok(Box::new(SqliteCatalog::new(path))),
        _ => Err(Error::UnsupportedCatalog(path.to_path_buf())),
    }
}

/// Load apps, treating any failure as an empty catalog. The failure is
/// logged so a broken catalog is never silent.
pub fn load_apps_or_empty(source: &dyn CatalogSource) -> Vec<App> {
    match source.load_apps() {
        Ok(apps) => apps,
        Err(e) => {
            warn!(source = %source.describe(), error = %e, "failed to load catalog, continuing with no apps");
            Vec::new()
        }
    }
}
