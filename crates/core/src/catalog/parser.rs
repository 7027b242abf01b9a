//! Parser for the numbered plain-text app list used to seed the catalog.
//!
//! ```text
//! 1. Name: "Widget"
//! Description: A small tool
//! Category: "Productivity"
//! Current Status: Live in production
//! Tags: "rust", "cli"
//! Social Handles: Email: hi@widget.dev, Location: Lagos
//! ```

use tracing::warn;

use crate::analytics::seed_hash;
use crate::domain::{App, AppStatus, Socials};

const QUOTES: &[char] = &['"', '\u{201c}', '\u{201d}'];

/// Parse every numbered section of `text` into an app. Sections without a
/// name, description and category are skipped.
pub fn parse_apps_text(text: &str) -> Vec<App> {
    split_sections(text)
        .into_iter()
        .filter_map(|section| {
            let app = parse_section(&section);
            if app.is_none() {
                let first = section.first().map(String::as_str).unwrap_or_default();
                warn!(section = %first, "skipping app section with missing required fields");
            }
            app
        })
        .collect()
}

fn is_section_start(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn split_sections(text: &str) -> Vec<Vec<String>> {
    let mut sections: Vec<Vec<String>> = Vec::new();
    for line in text.lines() {
        if is_section_start(line) {
            sections.push(Vec::new());
        }
        if let Some(current) = sections.last_mut() {
            current.push(line.trim().to_string());
        }
    }
    sections
}

fn strip_quotes(s: &str) -> String {
    s.replace(QUOTES, "").trim().to_string()
}

fn parse_status(text: &str) -> AppStatus {
    if text.contains("Production") || text.contains("Live") {
        AppStatus::Live
    } else if text.contains("Finalizing") {
        AppStatus::Finalizing
    } else {
        AppStatus::InDevelopment
    }
}

/// Value following `key` up to the next comma.
fn social_field(line: &str, key: &str) -> Option<String> {
    let start = line.find(key)? + key.len();
    let value = line[start..].split(',').next()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_section(lines: &[String]) -> Option<App> {
    let mut app = App::default();

    for (i, raw) in lines.iter().enumerate() {
        let line = if i == 0 {
            // "3. Name: Foo" carries a field on the header line
            let digits = raw.chars().take_while(|c| c.is_ascii_digit()).count();
            raw[digits + 1..].trim()
        } else {
            raw.as_str()
        };

        if let Some(rest) = line.strip_prefix("Name:") {
            app.name = strip_quotes(rest);
        } else if let Some(rest) = line.strip_prefix("Description:") {
            app.description = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Category:") {
            app.category = strip_quotes(rest);
        } else if let Some(rest) = line
            .strip_prefix("Current Status:")
            .or_else(|| line.strip_prefix("Status:"))
        {
            app.status = parse_status(rest);
        } else if let Some(rest) = line.strip_prefix("Live URL:") {
            app.live_url = non_empty(rest);
        } else if let Some(rest) = line.strip_prefix("GitHub Repo:") {
            app.github_url = non_empty(rest);
        } else if let Some(rest) = line.strip_prefix("Tags:") {
            app.tags = rest
                .split(',')
                .map(strip_quotes)
                .filter(|t| !t.is_empty())
                .collect();
        } else if let Some(rest) = line.strip_prefix("Social Handles:") {
            app.socials = Socials {
                email: social_field(rest, "Email:"),
                phone: social_field(rest, "Phone:"),
                location: social_field(rest, "Location:"),
            };
        }
    }

    if app.name.is_empty() || app.description.is_empty() || app.category.is_empty() {
        return None;
    }
    app.traffic = Some(100 + seed_hash(&app.name) % 1000);
    Some(app)
}
