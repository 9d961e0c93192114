use crate::queue::QueueStatus;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue entry id already used: {0}")]
    DuplicateId(String),
    #[error("queue entry id predates evicted entries: {0}")]
    StaleId(String),
    #[error("unknown queue entry: {0}")]
    UnknownEntry(String),
    #[error("entry {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: QueueStatus,
        to: QueueStatus,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule name is required")]
    MissingName,
    #[error("schedule time is required")]
    MissingTime,
    #[error("pick at least one day of the week")]
    NoDays,
    #[error("enable killing apps, clearing cache, or both")]
    NoAction,
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate app id in catalog: {0}")]
    DuplicateApp(String),
}
