use crate::catalog::App;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Kill,
    Cache,
}

impl OperationKind {
    pub fn id_prefix(self) -> &'static str {
        match self {
            OperationKind::Kill => "kill",
            OperationKind::Cache => "cache",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Kill => "Kill",
            OperationKind::Cache => "Clear cache",
        }
    }

    /// Display-only shell line shown next to an entry. Never executed.
    pub fn command_for(self, package_name: &str) -> String {
        match self {
            OperationKind::Kill => format!("adb shell am force-stop {}", package_name),
            OperationKind::Cache => format!("adb shell pm clear {}", package_name),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id_prefix())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kill" => Ok(OperationKind::Kill),
            "cache" | "cache-clear" | "clear-cache" => Ok(OperationKind::Cache),
            other => Err(format!("unknown operation kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl QueueStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueStatus::Completed | QueueStatus::Failed)
    }

    pub fn icon(self) -> &'static str {
        match self {
            QueueStatus::Pending => "⏳",
            QueueStatus::Processing => "🔄",
            QueueStatus::Completed => "✅",
            QueueStatus::Failed => "❌",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Completed => "completed",
            QueueStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
    pub kind: OperationKind,
    pub status: QueueStatus,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl QueueEntry {
    /// Builds a pending entry whose id is `<kind>-<app id>-<stamp>-<index>`.
    pub fn for_app(app: &App, kind: OperationKind, stamp: i64, index: usize) -> Self {
        Self {
            id: format!("{}-{}-{}-{}", kind.id_prefix(), app.id, stamp, index),
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            kind,
            status: QueueStatus::Pending,
            command: kind.command_for(&app.package_name),
            failure: None,
        }
    }
}

/// Stamp part of an id shaped `<kind>-<app id>-<stamp>-<index>`.
pub fn id_stamp(id: &str) -> Option<i64> {
    let mut parts = id.rsplitn(3, '-');
    parts.next()?.parse::<usize>().ok()?;
    let stamp = parts.next()?.parse().ok()?;
    parts.next()?;
    Some(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_app;

    #[test]
    fn test_entry_for_app() {
        let app = sample_app("4", "YouTube", true, Some("234 MB"));
        let entry = QueueEntry::for_app(&app, OperationKind::Cache, 1700000000000, 2);

        assert_eq!(entry.id, "cache-4-1700000000000-2");
        assert_eq!(entry.app_name, "YouTube");
        assert_eq!(entry.status, QueueStatus::Pending);
        assert_eq!(entry.command, "adb shell pm clear com.example.4");
    }

    #[test]
    fn test_id_stamp() {
        assert_eq!(id_stamp("cache-4-1700000000000-2"), Some(1700000000000));
        assert_eq!(id_stamp("kill-com-app-7-0"), Some(7));
        assert_eq!(id_stamp("e0"), None);
        assert_eq!(id_stamp("kill-a-b-0"), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("KILL".parse::<OperationKind>(), Ok(OperationKind::Kill));
        assert_eq!("cache-clear".parse::<OperationKind>(), Ok(OperationKind::Cache));
        assert!("reboot".parse::<OperationKind>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!QueueStatus::Pending.is_terminal());
        assert!(!QueueStatus::Processing.is_terminal());
        assert!(QueueStatus::Completed.is_terminal());
        assert!(QueueStatus::Failed.is_terminal());
    }
}
