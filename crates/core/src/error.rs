use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings parse error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("asset root is not a directory: {}", .0.display())]
    AssetRootNotDirectory(PathBuf),

    #[error("catalog file does not exist: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("unsupported catalog format (expected .json, .txt or .db): {}", .0.display())]
    UnsupportedCatalog(PathBuf),

    #[error("app not found: {0}")]
    AppNotFound(String),

    #[error("catalog schema version {db} is newer than supported version {code}")]
    SchemaTooNew { db: u32, code: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
