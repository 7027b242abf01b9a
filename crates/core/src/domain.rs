use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a cataloged app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppStatus {
    Live,
    Finalizing,
    #[default]
    #[serde(rename = "In Development")]
    InDevelopment,
}

impl AppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStatus::Live => "Live",
            AppStatus::Finalizing => "Finalizing",
            AppStatus::InDevelopment => "In Development",
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(AppStatus::Live),
            "finalizing" => Ok(AppStatus::Finalizing),
            "in development" | "in-development" | "development" => Ok(AppStatus::InDevelopment),
            other => Err(format!("unknown app status: {other}")),
        }
    }
}

/// Contact details attached to an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Socials {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.location.is_none()
    }
}

/// One cataloged project. Only `name` is required when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: AppStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Socials::is_empty")]
    pub socials: Socials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<u32>,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

impl App {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// The part an image plays for an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    Logo,
    Cover,
    Screenshot,
}

impl AssetRole {
    pub const ALL: [AssetRole; 3] = [AssetRole::Logo, AssetRole::Cover, AssetRole::Screenshot];

    /// Lowercase keyword used when matching filenames to this role.
    pub fn keyword(&self) -> &'static str {
        match self {
            AssetRole::Logo => "logo",
            AssetRole::Cover => "cover",
            AssetRole::Screenshot => "screenshot",
        }
    }
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Resolved images for one entity, as root-relative web paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

impl AssetRecord {
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.cover.is_none() && self.screenshots.is_empty()
    }

    /// Logo, cover and at least one screenshot are all present.
    pub fn is_complete(&self) -> bool {
        self.logo.is_some() && self.cover.is_some() && !self.screenshots.is_empty()
    }

    /// Cover falls back to the first screenshot.
    pub fn effective_cover(&self) -> Option<&str> {
        self.cover
            .as_deref()
            .or_else(|| self.screenshots.first().map(String::as_str))
    }

    pub fn apply_cover_fallback(&mut self) {
        if self.cover.is_none() {
            self.cover = self.screenshots.first().cloned();
        }
    }

    /// Every web path referenced by this record, cover deduplicated.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for p in self
            .logo
            .iter()
            .chain(self.cover.iter())
            .chain(self.screenshots.iter())
        {
            if !paths.contains(&p.as_str()) {
                paths.push(p);
            }
        }
        paths
    }
}

/// Entity name → resolved assets. Ordered so the written file is stable.
pub type AssetMap = BTreeMap<String, AssetRecord>;

pub const REASON_NO_ASSETS: &str = "No assets found in mapping";
pub const REASON_INCOMPLETE: &str = "Incomplete asset set";
pub const REASON_PLACEHOLDER: &str = "Auto-assigned placeholder(s)";

/// Why an entity lacks a complete asset set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub type MissingAssetsReport = BTreeMap<String, MissingEntry>;
