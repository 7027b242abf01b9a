use std::collections::BTreeSet;

use crate::domain::{App, AppStatus};

/// Criteria for narrowing an app list. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppFilter {
    /// Case-insensitive substring of the name, description or any tag.
    pub query: String,
    pub status: Option<AppStatus>,
    pub category: Option<String>,
}

impl AppFilter {
    pub fn matches(&self, app: &App) -> bool {
        if let Some(status) = self.status {
            if app.status != status {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &app.category != category {
                return false;
            }
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        app.name.to_lowercase().contains(&query)
            || app.description.to_lowercase().contains(&query)
            || app.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    pub fn apply<'a>(&self, apps: &'a [App]) -> Vec<&'a App> {
        apps.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Distinct categories, sorted.
pub fn categories(apps: &[App]) -> Vec<String> {
    apps.iter()
        .map(|a| a.category.clone())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
