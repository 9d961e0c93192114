use crate::catalog::{App, Catalog};
use crate::error::QueueError;
use crate::queue::{OperationKind, QueueEntry, TaskQueue};
use crate::schedule::ScheduleKind;
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Kill,
    Cache,
    QuickClean,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Kill => "Kill apps",
            Screen::Cache => "Clear cache",
            Screen::QuickClean => "Quick clean",
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    /// Position in the catalog; commits are built in this order.
    rank: usize,
    app: App,
}

/// Transient multi-select over one screen's candidate apps.
///
/// The candidate list is a snapshot of the catalog taken at construction,
/// in display order. Ids outside it are ignored everywhere.
#[derive(Debug, Clone)]
pub struct SelectionController {
    screen: Screen,
    candidates: Vec<Candidate>,
    selected: HashSet<String>,
    plan: ScheduleKind,
}

impl SelectionController {
    fn with_candidates<'a>(screen: Screen, apps: impl Iterator<Item = (usize, &'a App)>) -> Self {
        Self {
            screen,
            candidates: apps
                .map(|(rank, app)| Candidate {
                    rank,
                    app: app.clone(),
                })
                .collect(),
            selected: HashSet::new(),
            plan: ScheduleKind::Both,
        }
    }

    /// Running apps, catalog order.
    pub fn kill(catalog: &Catalog) -> Self {
        Self::with_candidates(
            Screen::Kill,
            catalog.apps().iter().enumerate().filter(|(_, a)| a.running()),
        )
    }

    /// Apps holding cache, largest first.
    pub fn cache(catalog: &Catalog) -> Self {
        let mut controller = Self::with_candidates(
            Screen::Cache,
            catalog.apps().iter().enumerate().filter(|(_, a)| a.cache_mb() > 0),
        );
        controller
            .candidates
            .sort_by(|a, b| b.app.cache_mb().cmp(&a.app.cache_mb()).then(a.rank.cmp(&b.rank)));
        controller
    }

    pub fn quick_clean(catalog: &Catalog) -> Self {
        Self::with_candidates(Screen::QuickClean, catalog.apps().iter().enumerate())
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn candidates(&self) -> impl Iterator<Item = &App> {
        self.candidates.iter().map(|c| &c.app)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidate_at(&self, index: usize) -> Option<&App> {
        self.candidates.get(index).map(|c| &c.app)
    }

    fn is_candidate(&self, id: &str) -> bool {
        self.candidates.iter().any(|c| c.app.id == id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.is_candidate(id) {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.candidates.iter().map(|c| c.app.id.clone()).collect();
    }

    /// Replaces the selection with the candidates whose cache size in MB
    /// satisfies `pred`.
    pub fn select_by_threshold(&mut self, pred: impl Fn(u64) -> bool) {
        self.selected = self
            .candidates
            .iter()
            .filter(|c| pred(c.app.cache_mb()))
            .map(|c| c.app.id.clone())
            .collect();
    }

    pub fn select_high_cache(&mut self, threshold_mb: u64) {
        self.select_by_threshold(|mb| mb > threshold_mb);
    }

    pub fn select_ids<S: AsRef<str>>(&mut self, ids: &[S]) {
        self.selected.clear();
        for id in ids {
            if self.is_candidate(id.as_ref()) {
                self.selected.insert(id.as_ref().to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn can_commit(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in catalog order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected_apps().map(|a| a.id.clone()).collect()
    }

    pub fn selected_cache_mb(&self) -> u64 {
        self.selected_apps().map(|a| a.cache_mb()).sum()
    }

    /// Which operations a quick-clean commit submits. Ignored elsewhere.
    pub fn set_plan(&mut self, plan: ScheduleKind) {
        self.plan = plan;
    }

    /// Selected apps in catalog order.
    fn selected_apps(&self) -> impl Iterator<Item = &App> {
        let mut picked: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| self.selected.contains(&c.app.id))
            .collect();
        picked.sort_by_key(|c| c.rank);
        picked.into_iter().map(|c| &c.app)
    }

    fn operations(&self) -> Vec<(&App, OperationKind)> {
        match self.screen {
            Screen::Kill => self.selected_apps().map(|a| (a, OperationKind::Kill)).collect(),
            Screen::Cache => self.selected_apps().map(|a| (a, OperationKind::Cache)).collect(),
            Screen::QuickClean => {
                let mut ops = Vec::new();
                if self.plan.kills() {
                    ops.extend(
                        self.selected_apps()
                            .filter(|a| a.running())
                            .map(|a| (a, OperationKind::Kill)),
                    );
                }
                if self.plan.clears_cache() {
                    ops.extend(
                        self.selected_apps()
                            .filter(|a| a.cache_mb() > 0)
                            .map(|a| (a, OperationKind::Cache)),
                    );
                }
                ops
            }
        }
    }

    /// Submits the selection as one batch and clears it. Returns the new
    /// entry ids; an empty selection leaves the queue untouched.
    pub fn commit(&mut self, queue: &mut TaskQueue, now: Duration) -> Result<Vec<String>, QueueError> {
        if self.selected.is_empty() {
            return Ok(Vec::new());
        }

        let stamp = queue.issue_stamp();
        let entries: Vec<QueueEntry> = self
            .operations()
            .into_iter()
            .enumerate()
            .map(|(index, (app, kind))| QueueEntry::for_app(app, kind, stamp, index))
            .collect();
        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();

        queue.submit(entries, now)?;
        info!(screen = self.screen.title(), count = ids.len(), "committed selection");
        self.selected.clear();
        Ok(ids)
    }
}
