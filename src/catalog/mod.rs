pub mod json;
pub mod sample;

pub use json::JsonCatalog;
pub use sample::SampleCatalog;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::schedule::ScheduledCleanup;
use crate::utils::parse_leading_int;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub name: String,
    pub package_name: String,
    pub icon: String,
    pub size: String,
    pub last_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<String>,
}

impl App {
    pub fn running(&self) -> bool {
        self.is_running.unwrap_or(false)
    }

    /// Cache size in whole megabytes; missing or unreadable sizes count as 0.
    pub fn cache_mb(&self) -> u64 {
        self.cache_size
            .as_deref()
            .and_then(parse_leading_int)
            .unwrap_or(0)
    }
}

/// Source of the reference data the dashboard works over.
pub trait DataProvider {
    fn name(&self) -> &str;
    fn list_applications(&self) -> Vec<App>;
    fn list_scheduled_cleanups(&self) -> Vec<ScheduledCleanup>;
}

/// Read-only snapshot of a provider, taken once per session.
#[derive(Debug, Clone)]
pub struct Catalog {
    apps: Vec<App>,
    schedules: Vec<ScheduledCleanup>,
}

impl Catalog {
    pub fn new(apps: Vec<App>, schedules: Vec<ScheduledCleanup>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for app in &apps {
            if !ids.insert(app.id.as_str()) {
                return Err(CatalogError::DuplicateApp(app.id.clone()));
            }
        }
        Ok(Self { apps, schedules })
    }

    pub fn from_provider(provider: &dyn DataProvider) -> Result<Self, CatalogError> {
        let catalog = Self::new(
            provider.list_applications(),
            provider.list_scheduled_cleanups(),
        )?;
        info!(
            source = provider.name(),
            apps = catalog.apps.len(),
            schedules = catalog.schedules.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// The configured JSON catalog if any, the built-in sample otherwise.
    /// An explicit `path` overrides the config.
    pub fn load(config: &CatalogConfig, path: Option<&Path>) -> Result<Self, CatalogError> {
        match path.or(config.path.as_deref()) {
            Some(path) => Self::from_provider(&JsonCatalog::open(path)?),
            None => Self::from_provider(&SampleCatalog),
        }
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn seed_schedules(&self) -> &[ScheduledCleanup] {
        &self.schedules
    }

    pub fn find(&self, id: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.id == id)
    }

    pub fn running(&self) -> impl Iterator<Item = &App> {
        self.apps.iter().filter(|a| a.running())
    }

    pub fn with_cache(&self) -> impl Iterator<Item = &App> {
        self.apps.iter().filter(|a| a.cache_mb() > 0)
    }

    pub fn total_cache_mb(&self) -> u64 {
        self.with_cache().map(|a| a.cache_mb()).sum()
    }
}

#[cfg(test)]
pub(crate) fn sample_app(id: &str, name: &str, running: bool, cache: Option<&str>) -> App {
    App {
        id: id.to_string(),
        name: name.to_string(),
        package_name: format!("com.example.{}", id),
        icon: "📱".to_string(),
        size: "100 MB".to_string(),
        last_used: "just now".to_string(),
        is_running: Some(running),
        cache_size: cache.map(|c| c.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_mb_parsing() {
        assert_eq!(sample_app("1", "A", true, Some("45 MB")).cache_mb(), 45);
        assert_eq!(sample_app("2", "B", true, Some("junk")).cache_mb(), 0);
        assert_eq!(sample_app("3", "C", true, None).cache_mb(), 0);
    }

    #[test]
    fn test_running_defaults_to_false() {
        let mut app = sample_app("1", "A", true, None);
        app.is_running = None;
        assert!(!app.running());
    }

    #[test]
    fn test_catalog_filters() {
        let catalog = Catalog::new(
            vec![
                sample_app("a", "A", true, Some("45 MB")),
                sample_app("b", "B", false, Some("200 MB")),
                sample_app("c", "C", true, Some("0 MB")),
            ],
            Vec::new(),
        )
        .unwrap();

        let running: Vec<_> = catalog.running().map(|a| a.id.as_str()).collect();
        assert_eq!(running, vec!["a", "c"]);
        let cached: Vec<_> = catalog.with_cache().map(|a| a.id.as_str()).collect();
        assert_eq!(cached, vec!["a", "b"]);
        assert_eq!(catalog.total_cache_mb(), 245);
        assert_eq!(catalog.find("b").map(|a| a.name.as_str()), Some("B"));
        assert!(catalog.find("zzz").is_none());
    }

    #[test]
    fn test_duplicate_app_ids_rejected() {
        let result = Catalog::new(
            vec![sample_app("a", "A", true, None), sample_app("a", "A2", false, None)],
            Vec::new(),
        );
        assert!(matches!(result, Err(CatalogError::DuplicateApp(id)) if id == "a"));
    }

    #[test]
    fn test_load_defaults_to_sample() {
        let catalog = Catalog::load(&CatalogConfig::default(), None).unwrap();
        assert_eq!(catalog.apps().len(), 8);
        assert_eq!(catalog.seed_schedules().len(), 3);
    }
}
