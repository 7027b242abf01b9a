use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{AssetMap, MissingAssetsReport};
use crate::error::Result;

/// Write `value` as pretty JSON, creating parent directories and replacing
/// whatever was there before.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a mapping file written by a previous run.
pub fn read_asset_map(path: &Path) -> Result<AssetMap> {
    read_json(path)
}

/// Load a missing-assets report written by a previous run.
pub fn read_report(path: &Path) -> Result<MissingAssetsReport> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetRecord, MissingEntry};

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("src/data/assets-map.json");

        let mut map = AssetMap::new();
        map.insert(
            "old".to_string(),
            AssetRecord {
                logo: Some("/old.png".into()),
                ..Default::default()
            },
        );
        write_json(&path, &map).unwrap();

        let mut map = AssetMap::new();
        map.insert(
            "new".to_string(),
            AssetRecord {
                screenshots: vec!["/s.png".into()],
                ..Default::default()
            },
        );
        write_json(&path, &map).unwrap();

        let read = read_asset_map(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert!(read.contains_key("new"));
    }

    #[test]
    fn test_report_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs/missing-assets-report.json");
        let mut report = MissingAssetsReport::new();
        report.insert(
            "gadget".to_string(),
            MissingEntry {
                used: None,
                reason: Some("Incomplete asset set".into()),
            },
        );
        write_json(&path, &report).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({ "gadget": { "reason": "Incomplete asset set" } })
        );
        assert_eq!(read_report(&path).unwrap(), report);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_asset_map(&tmp.path().join("nope.json")).is_err());
    }
}
