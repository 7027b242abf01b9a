//! Run configuration.
//!
//! Values come from a priority chain: explicit overrides (CLI flags), then
//! `folio.toml`, then the built-in defaults below.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::resolve::orphan::DEFAULT_SIMILARITY_THRESHOLD;
use crate::resolve::placeholder::DEFAULT_SCREENSHOT_QUOTA;

pub const SETTINGS_FILE: &str = "folio.toml";
pub const DEFAULT_ASSET_ROOT: &str = "public";
pub const DEFAULT_MAPPING_PATH: &str = "src/data/assets-map.json";
pub const DEFAULT_REPORT_PATH: &str = "logs/missing-assets-report.json";
pub const DEFAULT_CATALOG_PATH: &str = "data/apps.json";
pub const DEFAULT_OWNED_DIR: &str = "apps";
pub const DEFAULT_ARCHIVE_DIR: &str = "_archive";

/// Everything the resolver needs to know for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub asset_root: PathBuf,
    /// Directory under the root holding one subdirectory per entity.
    pub owned_dir: String,
    /// Directory under the root receiving unclaimed images.
    pub archive_dir: String,
    pub mapping_path: PathBuf,
    pub report_path: PathBuf,
    pub screenshot_quota: usize,
    pub similarity_threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            owned_dir: DEFAULT_OWNED_DIR.to_string(),
            archive_dir: DEFAULT_ARCHIVE_DIR.to_string(),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            screenshot_quota: DEFAULT_SCREENSHOT_QUOTA,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl ResolverConfig {
    /// Defaults, with outputs placed beside the given root.
    pub fn with_root(root: &Path) -> Self {
        let base = root.parent().unwrap_or(Path::new("."));
        Self {
            asset_root: root.to_path_buf(),
            mapping_path: base.join(DEFAULT_MAPPING_PATH),
            report_path: base.join(DEFAULT_REPORT_PATH),
            ..Self::default()
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.asset_root.join(&self.archive_dir)
    }
}

// ── Settings file ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathSettings {
    pub asset_root: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverSettings {
    pub owned_dir: Option<String>,
    pub archive_dir: Option<String>,
    pub screenshot_quota: Option<usize>,
    pub similarity_threshold: Option<f64>,
}

/// Contents of `folio.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub resolver: ResolverSettings,
    /// App name to asset-map key, consulted before any name variation.
    pub aliases: BTreeMap<String, String>,
}

/// Path overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub asset_root: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Like [`Settings::load`], but a missing file yields defaults.
    /// A file that exists and fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn resolver_config(&self, overrides: &PathOverrides) -> ResolverConfig {
        let defaults = ResolverConfig::default();
        ResolverConfig {
            asset_root: pick(&overrides.asset_root, &self.paths.asset_root, defaults.asset_root),
            mapping_path: pick(&overrides.mapping, &self.paths.mapping, defaults.mapping_path),
            report_path: pick(&overrides.report, &self.paths.report, defaults.report_path),
            owned_dir: self.resolver.owned_dir.clone().unwrap_or(defaults.owned_dir),
            archive_dir: self
                .resolver
                .archive_dir
                .clone()
                .unwrap_or(defaults.archive_dir),
            screenshot_quota: self
                .resolver
                .screenshot_quota
                .unwrap_or(defaults.screenshot_quota),
            similarity_threshold: self
                .resolver
                .similarity_threshold
                .unwrap_or(defaults.similarity_threshold),
        }
    }

    pub fn catalog_path(&self, overrides: &PathOverrides) -> PathBuf {
        pick(
            &overrides.catalog,
            &self.paths.catalog,
            PathBuf::from(DEFAULT_CATALOG_PATH),
        )
    }
}

fn pick(cli: &Option<PathBuf>, file: &Option<PathBuf>, default: PathBuf) -> PathBuf {
    cli.clone().or_else(|| file.clone()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Settings::default().resolver_config(&PathOverrides::default());
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.asset_root, PathBuf::from("public"));
        assert_eq!(config.archive_path(), PathBuf::from("public/_archive"));
    }

    #[test]
    fn test_parse_full_settings() {
        let settings: Settings = toml::from_str(
            r#"
            [paths]
            asset_root = "static"
            catalog = "data/apps.db"

            [resolver]
            screenshot_quota = 5
            similarity_threshold = 0.75

            [aliases]
            "FinEdge Pro" = "finedge"
            "#,
        )
        .unwrap();

        let config = settings.resolver_config(&PathOverrides::default());
        assert_eq!(config.asset_root, PathBuf::from("static"));
        assert_eq!(config.screenshot_quota, 5);
        assert_eq!(config.similarity_threshold, 0.75);
        assert_eq!(config.owned_dir, "apps");
        assert_eq!(
            settings.catalog_path(&PathOverrides::default()),
            PathBuf::from("data/apps.db")
        );
        assert_eq!(settings.aliases["FinEdge Pro"], "finedge");
    }

    #[test]
    fn test_cli_overrides_win() {
        let settings: Settings = toml::from_str("[paths]\nasset_root = \"static\"\n").unwrap();
        let overrides = PathOverrides {
            asset_root: Some(PathBuf::from("cli-root")),
            ..Default::default()
        };
        let config = settings.resolver_config(&overrides);
        assert_eq!(config.asset_root, PathBuf::from("cli-root"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&tmp.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(SETTINGS_FILE);
        fs::write(&path, "[resolver]\nscreenshot_quota = \"many\"\n").unwrap();
        assert!(Settings::load_or_default(&path).is_err());
    }

    #[test]
    fn test_with_root_places_outputs_beside_root() {
        let config = ResolverConfig::with_root(Path::new("/site/public"));
        assert_eq!(config.mapping_path, PathBuf::from("/site/src/data/assets-map.json"));
        assert_eq!(
            config.report_path,
            PathBuf::from("/site/logs/missing-assets-report.json")
        );
    }
}
