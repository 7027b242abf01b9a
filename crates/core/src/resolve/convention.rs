use std::path::Path;

use crate::domain::{AssetRecord, AssetRole};
use crate::error::Result;
use crate::scanner::{self, ImageFile};

/// Ordinal given to screenshots without a parseable number; sorts last.
pub const SCREENSHOT_SENTINEL: u32 = 999;

/// Strict role for a file inside an entity directory, by its lowercased stem.
pub fn classify_stem(stem: &str) -> Option<AssetRole> {
    match stem {
        "logo" => Some(AssetRole::Logo),
        "cover" => Some(AssetRole::Cover),
        s if s.starts_with("screenshot-") || s.contains("screenshot") => {
            Some(AssetRole::Screenshot)
        }
        _ => None,
    }
}

/// Looser role check for files found outside an entity directory.
/// `acme-logo.png` is a logo here, but not under [`classify_stem`].
pub fn classify_file_name(image: &ImageFile) -> Option<AssetRole> {
    let name = image.file_name_lower();
    let stem = image.stem_lower();
    if stem == "logo" || name.contains("logo") {
        Some(AssetRole::Logo)
    } else if stem == "cover" || name.contains("cover") {
        Some(AssetRole::Cover)
    } else if stem.starts_with("screenshot-") || name.contains("screenshot") {
        Some(AssetRole::Screenshot)
    } else {
        None
    }
}

/// Number following `screenshot` (an optional `-` allowed), or the sentinel.
pub fn screenshot_ordinal(stem: &str) -> u32 {
    let lower = stem.to_lowercase();
    let Some(pos) = lower.find("screenshot") else {
        return SCREENSHOT_SENTINEL;
    };
    let rest = &lower[pos + "screenshot".len()..];
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(SCREENSHOT_SENTINEL)
}

/// Result of classifying one entity directory.
#[derive(Debug, Default)]
pub struct DirectoryAssets {
    pub record: AssetRecord,
    /// Images in the directory that matched no convention. They stay where
    /// they are and are never offered to other entities.
    pub unrecognized: Vec<ImageFile>,
}

/// Classify a set of images that belong to one entity.
///
/// The first `logo.*` and `cover.*` win. Screenshots are sorted by ordinal
/// with ties kept in input order. If no cover was found, the first
/// screenshot becomes the cover.
pub fn classify_images(images: Vec<ImageFile>) -> DirectoryAssets {
    let mut out = DirectoryAssets::default();
    let mut screenshots: Vec<(u32, String)> = Vec::new();

    for image in images {
        let stem = image.stem_lower();
        match classify_stem(&stem) {
            Some(AssetRole::Logo) if out.record.logo.is_none() => {
                out.record.logo = Some(image.web_path)
            }
            Some(AssetRole::Cover) if out.record.cover.is_none() => {
                out.record.cover = Some(image.web_path)
            }
            Some(AssetRole::Screenshot) => {
                screenshots.push((screenshot_ordinal(&stem), image.web_path));
            }
            // includes a second logo.* or cover.*
            _ => out.unrecognized.push(image),
        }
    }

    screenshots.sort_by_key(|(ordinal, _)| *ordinal);
    out.record.screenshots = screenshots.into_iter().map(|(_, path)| path).collect();
    out.record.apply_cover_fallback();
    out
}

/// Scan one entity directory and classify its images.
pub fn map_entity_dir(root: &Path, dir: &Path) -> Result<DirectoryAssets> {
    let images = scanner::list_images(root, dir)?;
    Ok(classify_images(images))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn img(path: &str) -> ImageFile {
        ImageFile::new(Path::new("/root"), PathBuf::from(format!("/root{path}")))
    }

    // ── classify_stem ───────────────────────────────────────────

    #[test]
    fn test_classify_stem_exact_names() {
        assert_eq!(classify_stem("logo"), Some(AssetRole::Logo));
        assert_eq!(classify_stem("cover"), Some(AssetRole::Cover));
        assert_eq!(classify_stem("screenshot-1"), Some(AssetRole::Screenshot));
        assert_eq!(classify_stem("screenshot3"), Some(AssetRole::Screenshot));
        assert_eq!(classify_stem("home_screenshot"), Some(AssetRole::Screenshot));
    }

    #[test]
    fn test_classify_stem_is_strict_for_logo_and_cover() {
        assert_eq!(classify_stem("acme-logo"), None);
        assert_eq!(classify_stem("cover-art"), None);
        assert_eq!(classify_stem("banner"), None);
    }

    #[test]
    fn test_classify_file_name_is_loose() {
        assert_eq!(classify_file_name(&img("/x/acme-logo.png")), Some(AssetRole::Logo));
        assert_eq!(classify_file_name(&img("/x/acme_cover.jpg")), Some(AssetRole::Cover));
        assert_eq!(
            classify_file_name(&img("/x/acme-screenshot.webp")),
            Some(AssetRole::Screenshot)
        );
        assert_eq!(classify_file_name(&img("/x/acme.png")), None);
    }

    // ── screenshot_ordinal ──────────────────────────────────────

    #[test]
    fn test_screenshot_ordinal_parses_suffix() {
        assert_eq!(screenshot_ordinal("screenshot-1"), 1);
        assert_eq!(screenshot_ordinal("screenshot10"), 10);
        assert_eq!(screenshot_ordinal("Screenshot-02"), 2);
    }

    #[test]
    fn test_screenshot_ordinal_sentinel() {
        assert_eq!(screenshot_ordinal("screenshot"), SCREENSHOT_SENTINEL);
        assert_eq!(screenshot_ordinal("screenshot-final"), SCREENSHOT_SENTINEL);
        assert_eq!(screenshot_ordinal("home"), SCREENSHOT_SENTINEL);
    }

    // ── classify_images ─────────────────────────────────────────

    #[test]
    fn test_screenshots_sort_numerically() {
        let out = classify_images(vec![
            img("/apps/w/screenshot-10.png"),
            img("/apps/w/screenshot-2.png"),
            img("/apps/w/screenshot-1.png"),
        ]);
        assert_eq!(
            out.record.screenshots,
            vec![
                "/apps/w/screenshot-1.png",
                "/apps/w/screenshot-2.png",
                "/apps/w/screenshot-10.png",
            ]
        );
    }

    #[test]
    fn test_unnumbered_screenshots_sort_last_in_input_order() {
        let out = classify_images(vec![
            img("/apps/w/screenshot-b.png"),
            img("/apps/w/screenshot-a.png"),
            img("/apps/w/screenshot-3.png"),
        ]);
        assert_eq!(
            out.record.screenshots,
            vec![
                "/apps/w/screenshot-3.png",
                "/apps/w/screenshot-b.png",
                "/apps/w/screenshot-a.png",
            ]
        );
    }

    #[test]
    fn test_cover_falls_back_to_first_screenshot() {
        let out = classify_images(vec![
            img("/apps/w/screenshot-2.png"),
            img("/apps/w/screenshot-1.png"),
        ]);
        assert_eq!(out.record.cover.as_deref(), Some("/apps/w/screenshot-1.png"));
        assert_eq!(out.record.cover.as_ref(), out.record.screenshots.first());
    }

    #[test]
    fn test_explicit_cover_wins() {
        let out = classify_images(vec![
            img("/apps/w/cover.png"),
            img("/apps/w/screenshot-1.png"),
        ]);
        assert_eq!(out.record.cover.as_deref(), Some("/apps/w/cover.png"));
    }

    #[test]
    fn test_unmatched_images_are_unrecognized() {
        let out = classify_images(vec![img("/apps/w/banner.png"), img("/apps/w/logo.svg")]);
        assert_eq!(out.record.logo.as_deref(), Some("/apps/w/logo.svg"));
        assert_eq!(out.unrecognized.len(), 1);
        assert_eq!(out.unrecognized[0].web_path, "/apps/w/banner.png");
    }

    #[test]
    fn test_second_logo_is_unrecognized() {
        let out = classify_images(vec![img("/apps/w/logo.jpg"), img("/apps/w/logo.png")]);
        assert_eq!(out.record.logo.as_deref(), Some("/apps/w/logo.jpg"));
        assert_eq!(out.unrecognized.len(), 1);
        assert_eq!(out.unrecognized[0].web_path, "/apps/w/logo.png");
    }

    #[test]
    fn test_empty_directory_yields_empty_record() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("apps/empty");
        std::fs::create_dir_all(&dir).unwrap();
        let out = map_entity_dir(tmp.path(), &dir).unwrap();
        assert!(out.record.is_empty());
        assert!(out.unrecognized.is_empty());
    }
}
