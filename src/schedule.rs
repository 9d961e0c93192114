use crate::error::ScheduleError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| lower == d.token() || lower == d.full_name())
            .ok_or_else(|| ScheduleError::UnknownWeekday(s.to_string()))
    }
}

pub fn format_days(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| d.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Cache,
    Apps,
    Both,
}

impl ScheduleKind {
    pub fn from_actions(kill: bool, clear_cache: bool) -> Option<Self> {
        match (kill, clear_cache) {
            (true, true) => Some(ScheduleKind::Both),
            (true, false) => Some(ScheduleKind::Apps),
            (false, true) => Some(ScheduleKind::Cache),
            (false, false) => None,
        }
    }

    pub fn kills(self) -> bool {
        matches!(self, ScheduleKind::Apps | ScheduleKind::Both)
    }

    pub fn clears_cache(self) -> bool {
        matches!(self, ScheduleKind::Cache | ScheduleKind::Both)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScheduleKind::Cache => "Cache",
            ScheduleKind::Apps => "Kill apps",
            ScheduleKind::Both => "Kill + cache",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ScheduleKind::Cache => "🧹",
            ScheduleKind::Apps => "⏹",
            ScheduleKind::Both => "⚡",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScheduleKind::Cache => "cache",
            ScheduleKind::Apps => "apps",
            ScheduleKind::Both => "both",
        };
        write!(f, "{}", name)
    }
}

/// A declarative recurring cleanup. Nothing fires it; `schedule` is a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCleanup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub schedule: String,
    pub enabled: bool,
    #[serde(default)]
    pub selected_apps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Weekday>,
}

/// Input of the schedule creation form. `kill` and `cache` are `Some` when
/// the action is switched on, holding the apps picked for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub name: String,
    pub time: String,
    /// Picked days in the order they were picked.
    pub days: Vec<Weekday>,
    pub kill: Option<Vec<String>>,
    pub cache: Option<Vec<String>>,
}

impl ScheduleDraft {
    pub fn toggle_day(&mut self, day: Weekday) {
        match self.days.iter().position(|d| *d == day) {
            Some(pos) => {
                self.days.remove(pos);
            }
            None => self.days.push(day),
        }
    }

    pub fn set_kill(&mut self, enabled: bool) {
        self.kill = enabled.then(Vec::new);
    }

    pub fn set_cache(&mut self, enabled: bool) {
        self.cache = enabled.then(Vec::new);
    }

    pub fn validate(&self) -> Result<ScheduleKind, ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::MissingName);
        }
        if self.time.trim().is_empty() {
            return Err(ScheduleError::MissingTime);
        }
        if self.days.is_empty() {
            return Err(ScheduleError::NoDays);
        }
        ScheduleKind::from_actions(self.kill.is_some(), self.cache.is_some())
            .ok_or(ScheduleError::NoAction)
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    fn unique_days(&self) -> Vec<Weekday> {
        let mut seen = HashSet::new();
        self.days.iter().copied().filter(|d| seen.insert(*d)).collect()
    }

    /// Kill apps followed by cache apps, first occurrence wins.
    fn merged_apps(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.kill
            .iter()
            .flatten()
            .chain(self.cache.iter().flatten())
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

pub struct ScheduleStore {
    schedules: Vec<ScheduledCleanup>,
}

impl ScheduleStore {
    pub fn new(seed: Vec<ScheduledCleanup>) -> Self {
        Self { schedules: seed }
    }

    pub fn create(&mut self, draft: ScheduleDraft) -> Result<&ScheduledCleanup, ScheduleError> {
        let kind = draft.validate()?;
        let schedule = ScheduledCleanup {
            id: self.next_id(),
            name: draft.name.trim().to_string(),
            kind,
            schedule: draft.time.trim().to_string(),
            enabled: true,
            selected_apps: draft.merged_apps(),
            days: draft.unique_days(),
        };
        info!(id = %schedule.id, name = %schedule.name, %kind, "created schedule");

        self.schedules.push(schedule);
        Ok(&self.schedules[self.schedules.len() - 1])
    }

    /// Flips `enabled`. Returns false when no schedule has this id.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.schedules.iter_mut().find(|s| s.id == id) {
            Some(schedule) => {
                schedule.enabled = !schedule.enabled;
                info!(id, enabled = schedule.enabled, "toggled schedule");
                true
            }
            None => false,
        }
    }

    pub fn list(&self) -> &[ScheduledCleanup] {
        &self.schedules
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledCleanup> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.schedules.iter().filter(|s| s.enabled).count()
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    fn next_id(&self) -> String {
        let base = format!("schedule-{}", Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }
}
