use crate::catalog::{App, DataProvider};
use crate::error::CatalogError;
use crate::schedule::ScheduledCleanup;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub schedules: Vec<ScheduledCleanup>,
}

/// Catalog read from a JSON file shaped like
/// `{"apps": [...], "schedules": [...]}`.
pub struct JsonCatalog {
    name: String,
    data: CatalogFile,
}

impl JsonCatalog {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            name: path.display().to_string(),
            data,
        })
    }
}

impl DataProvider for JsonCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_applications(&self) -> Vec<App> {
        self.data.apps.clone()
    }

    fn list_scheduled_cleanups(&self) -> Vec<ScheduledCleanup> {
        self.data.schedules.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::CatalogConfig;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "apps": [
            {"id": "A", "name": "Alpha", "packageName": "com.alpha", "icon": "A",
             "size": "10 MB", "lastUsed": "now", "isRunning": true, "cacheSize": "45 MB"},
            {"id": "B", "name": "Beta", "packageName": "com.beta", "icon": "B",
             "size": "20 MB", "lastUsed": "1 day ago", "cacheSize": "200 MB"}
        ],
        "schedules": [
            {"id": "s1", "name": "Weekend", "type": "apps", "schedule": "08:00",
             "enabled": false, "selectedApps": ["A"], "days": ["sat", "sun"]}
        ]
    }"#;

    #[test]
    fn test_open_json_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let provider = JsonCatalog::open(file.path()).unwrap();
        let apps = provider.list_applications();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].package_name, "com.alpha");
        assert!(!apps[1].running());
        assert_eq!(provider.list_scheduled_cleanups()[0].days.len(), 2);
    }

    #[test]
    fn test_path_overrides_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = Catalog::load(&CatalogConfig::default(), Some(file.path())).unwrap();
        assert_eq!(catalog.apps().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonCatalog::open(&dir.path().join("absent.json")).err().unwrap();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = JsonCatalog::open(file.path()).err().unwrap();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
