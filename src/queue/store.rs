use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::queue::timeline::Timeline;
use crate::queue::types::{id_stamp, OperationKind, QueueEntry, QueueStatus};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_FINISHED: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueTimings {
    /// Gap between the start of consecutive entries in one batch.
    pub stage_delay: Duration,
    /// Time an entry spends in `processing`.
    pub processing: Duration,
}

impl Default for QueueTimings {
    fn default() -> Self {
        Self {
            stage_delay: Duration::from_millis(1000),
            processing: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub entry_id: String,
    pub from: QueueStatus,
    pub to: QueueStatus,
    pub at: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueProgress {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_settled(&self) -> bool {
        self.pending == 0 && self.processing == 0
    }
}

#[derive(Debug, Clone)]
struct Step {
    entry_id: String,
    from: QueueStatus,
    to: QueueStatus,
}

/// Ordered store of submitted operations plus the timers that move them
/// through `pending -> processing -> completed`.
///
/// Time is passed in by the caller as an offset from the session start, so
/// whoever drives the store (the TUI frame loop or [`super::QueueDriver`])
/// decides when transitions become visible.
pub struct TaskQueue {
    entries: Vec<QueueEntry>,
    /// Ids of the retained entries.
    live_ids: HashSet<String>,
    /// Newest stamp among evicted entries. Stamped ids at or below it are
    /// refused, so evicted ids stay unusable without being remembered.
    evicted_stamp: Option<i64>,
    timeline: Timeline<Step>,
    timings: QueueTimings,
    max_finished: usize,
    last_stamp: i64,
}

impl TaskQueue {
    pub fn new(timings: QueueTimings, max_finished: usize) -> Self {
        Self {
            entries: Vec::new(),
            live_ids: HashSet::new(),
            evicted_stamp: None,
            timeline: Timeline::new(),
            timings,
            max_finished: max_finished.max(1),
            last_stamp: 0,
        }
    }

    pub fn from_config(config: &QueueConfig) -> Self {
        Self::new(
            QueueTimings {
                stage_delay: Duration::from_millis(config.stage_delay_ms),
                processing: Duration::from_millis(config.processing_ms),
            },
            config.max_finished_entries,
        )
    }

    /// Millisecond stamp for entry ids, strictly increasing per store.
    pub fn issue_stamp(&mut self) -> i64 {
        let floor = self.last_stamp.max(self.evicted_stamp.unwrap_or(0));
        let stamp = Utc::now().timestamp_millis().max(floor + 1);
        self.last_stamp = stamp;
        stamp
    }

    /// Appends a batch and schedules its lifecycle. Entry `i` of the batch
    /// turns `processing` at `now + i * stage_delay` and `completed`
    /// `processing` later. The whole batch is rejected if any id is still
    /// held or carries a stamp no newer than an evicted entry's.
    pub fn submit(&mut self, entries: Vec<QueueEntry>, now: Duration) -> Result<(), QueueError> {
        let mut batch_ids = HashSet::new();
        for entry in &entries {
            if self.live_ids.contains(&entry.id) || !batch_ids.insert(entry.id.as_str()) {
                warn!(id = %entry.id, "rejected batch with duplicate entry id");
                return Err(QueueError::DuplicateId(entry.id.clone()));
            }
            if let (Some(stamp), Some(floor)) = (id_stamp(&entry.id), self.evicted_stamp) {
                if stamp <= floor {
                    warn!(id = %entry.id, "rejected batch with stale entry id");
                    return Err(QueueError::StaleId(entry.id.clone()));
                }
            }
        }

        let count = entries.len();
        for (index, mut entry) in entries.into_iter().enumerate() {
            let start = now + self.timings.stage_delay.saturating_mul(index as u32);
            self.timeline.schedule(
                start,
                Step {
                    entry_id: entry.id.clone(),
                    from: QueueStatus::Pending,
                    to: QueueStatus::Processing,
                },
            );
            self.timeline.schedule(
                start + self.timings.processing,
                Step {
                    entry_id: entry.id.clone(),
                    from: QueueStatus::Processing,
                    to: QueueStatus::Completed,
                },
            );

            entry.status = QueueStatus::Pending;
            entry.failure = None;
            self.live_ids.insert(entry.id.clone());
            self.entries.push(entry);
        }

        if count > 0 {
            info!(count, at_ms = now.as_millis() as u64, "queued batch");
        }
        Ok(())
    }

    /// Applies every transition due at or before `now`, earliest first.
    pub fn advance(&mut self, now: Duration) -> Vec<Transition> {
        let mut applied = Vec::new();

        while let Some((at, step)) = self.timeline.pop_due(now) {
            let Some(entry) = self.entries.iter_mut().find(|e| e.id == step.entry_id) else {
                continue;
            };
            if entry.status != step.from {
                continue;
            }
            entry.status = step.to;
            debug!(id = %entry.id, from = %step.from, to = %step.to, "entry transition");
            applied.push(Transition {
                entry_id: step.entry_id,
                from: step.from,
                to: step.to,
                at,
            });
        }

        if !applied.is_empty() {
            self.evict_finished();
        }
        applied
    }

    /// Marks an in-flight entry failed and drops its outstanding timers.
    pub fn fail(
        &mut self,
        id: &str,
        reason: impl Into<String>,
        now: Duration,
    ) -> Result<Transition, QueueError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| QueueError::UnknownEntry(id.to_string()))?;

        if entry.status.is_terminal() {
            return Err(QueueError::InvalidTransition {
                id: id.to_string(),
                from: entry.status,
                to: QueueStatus::Failed,
            });
        }

        let from = entry.status;
        let reason = reason.into();
        entry.status = QueueStatus::Failed;
        warn!(id, %reason, "entry failed");
        entry.failure = Some(reason);

        self.timeline.retain(|step| step.entry_id != id);
        self.evict_finished();

        Ok(Transition {
            entry_id: id.to_string(),
            from,
            to: QueueStatus::Failed,
            at: now,
        })
    }

    pub fn cancel(&mut self, id: &str, now: Duration) -> Result<Transition, QueueError> {
        self.fail(id, "cancelled", now)
    }

    /// Insertion-ordered view, optionally restricted to one kind.
    pub fn query(&self, kind: Option<OperationKind>) -> Vec<&QueueEntry> {
        self.entries
            .iter()
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .collect()
    }

    pub fn progress(&self, kind: Option<OperationKind>) -> QueueProgress {
        let mut progress = QueueProgress::default();
        for entry in self.query(kind) {
            progress.total += 1;
            match entry.status {
                QueueStatus::Pending => progress.pending += 1,
                QueueStatus::Processing => progress.processing += 1,
                QueueStatus::Completed => progress.completed += 1,
                QueueStatus::Failed => progress.failed += 1,
            }
        }
        progress
    }

    pub fn get(&self, id: &str) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_due()
    }

    /// True when no timer is outstanding.
    pub fn is_idle(&self) -> bool {
        self.timeline.is_empty()
    }

    fn evict_finished(&mut self) {
        let finished = self.entries.iter().filter(|e| e.status.is_terminal()).count();
        let mut excess = finished.saturating_sub(self.max_finished);
        if excess == 0 {
            return;
        }

        debug!(count = excess, "evicting finished entries");
        let mut evicted = Vec::with_capacity(excess);
        self.entries.retain(|e| {
            if excess > 0 && e.status.is_terminal() {
                excess -= 1;
                evicted.push(e.id.clone());
                false
            } else {
                true
            }
        });

        for id in evicted {
            if let Some(stamp) = id_stamp(&id) {
                self.evicted_stamp = Some(self.evicted_stamp.map_or(stamp, |s| s.max(stamp)));
            }
            self.live_ids.remove(&id);
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(QueueTimings::default(), DEFAULT_MAX_FINISHED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn entry(id: &str, kind: OperationKind) -> QueueEntry {
        QueueEntry {
            id: id.to_string(),
            app_id: id.to_string(),
            app_name: id.to_uppercase(),
            kind,
            status: QueueStatus::Pending,
            command: kind.command_for("com.example"),
            failure: None,
        }
    }

    fn status(queue: &TaskQueue, id: &str) -> QueueStatus {
        queue.get(id).map(|e| e.status).unwrap()
    }

    #[test]
    fn test_two_kill_batch_timings() {
        let mut queue = TaskQueue::default();
        queue
            .submit(
                vec![entry("x", OperationKind::Kill), entry("y", OperationKind::Kill)],
                ms(0),
            )
            .unwrap();

        assert_eq!(status(&queue, "x"), QueueStatus::Pending);
        assert_eq!(status(&queue, "y"), QueueStatus::Pending);

        queue.advance(ms(0));
        assert_eq!(status(&queue, "x"), QueueStatus::Processing);
        assert_eq!(status(&queue, "y"), QueueStatus::Pending);

        queue.advance(ms(999));
        assert_eq!(status(&queue, "y"), QueueStatus::Pending);

        queue.advance(ms(1000));
        assert_eq!(status(&queue, "x"), QueueStatus::Processing);
        assert_eq!(status(&queue, "y"), QueueStatus::Processing);

        queue.advance(ms(2000));
        assert_eq!(status(&queue, "x"), QueueStatus::Completed);
        assert_eq!(status(&queue, "y"), QueueStatus::Processing);

        queue.advance(ms(2999));
        assert_eq!(status(&queue, "y"), QueueStatus::Processing);

        queue.advance(ms(3000));
        assert_eq!(status(&queue, "y"), QueueStatus::Completed);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut queue = TaskQueue::default();
        queue.submit(vec![entry("a", OperationKind::Cache)], ms(0)).unwrap();

        queue.advance(ms(2000));
        assert_eq!(status(&queue, "a"), QueueStatus::Completed);

        assert!(queue.advance(ms(60_000)).is_empty());
        assert_eq!(status(&queue, "a"), QueueStatus::Completed);
    }

    #[test]
    fn test_never_completes_without_processing() {
        let mut queue = TaskQueue::default();
        let batch: Vec<_> = (0..5)
            .map(|i| entry(&format!("e{}", i), OperationKind::Kill))
            .collect();
        queue.submit(batch, ms(0)).unwrap();

        // Jumping far ahead still goes through processing first.
        let transitions = queue.advance(ms(100_000));
        for i in 0..5 {
            let id = format!("e{}", i);
            let steps: Vec<_> = transitions
                .iter()
                .filter(|t| t.entry_id == id)
                .map(|t| (t.from, t.to))
                .collect();
            assert_eq!(
                steps,
                vec![
                    (QueueStatus::Pending, QueueStatus::Processing),
                    (QueueStatus::Processing, QueueStatus::Completed),
                ]
            );
        }
    }

    #[test]
    fn test_transition_times_follow_index() {
        let mut queue = TaskQueue::default();
        let batch: Vec<_> = (0..3)
            .map(|i| entry(&format!("e{}", i), OperationKind::Kill))
            .collect();
        queue.submit(batch, ms(500)).unwrap();

        let transitions = queue.advance(ms(10_000));
        let at = |id: &str, to: QueueStatus| {
            transitions
                .iter()
                .find(|t| t.entry_id == id && t.to == to)
                .map(|t| t.at)
                .unwrap()
        };

        for i in 0..3u64 {
            let id = format!("e{}", i);
            assert_eq!(at(&id, QueueStatus::Processing), ms(500 + i * 1000));
            assert_eq!(at(&id, QueueStatus::Completed), ms(500 + i * 1000 + 2000));
        }
    }

    #[test]
    fn test_batches_index_independently() {
        let mut queue = TaskQueue::default();
        let first: Vec<_> = (0..3)
            .map(|i| entry(&format!("a{}", i), OperationKind::Kill))
            .collect();
        queue.submit(first, ms(0)).unwrap();
        queue
            .submit(vec![entry("b0", OperationKind::Cache)], ms(500))
            .unwrap();

        queue.advance(ms(2500));
        // The later batch's first entry finishes before the earlier batch's third.
        assert_eq!(status(&queue, "b0"), QueueStatus::Completed);
        assert_eq!(status(&queue, "a2"), QueueStatus::Processing);
    }

    #[test]
    fn test_query_filters_by_kind_in_order() {
        let mut queue = TaskQueue::default();
        queue
            .submit(
                vec![
                    entry("k1", OperationKind::Kill),
                    entry("c1", OperationKind::Cache),
                    entry("k2", OperationKind::Kill),
                ],
                ms(0),
            )
            .unwrap();

        let kills: Vec<_> = queue
            .query(Some(OperationKind::Kill))
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(kills, vec!["k1", "k2"]);
        assert_eq!(queue.query(None).len(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut queue = TaskQueue::default();
        queue.submit(vec![entry("a", OperationKind::Kill)], ms(0)).unwrap();

        let err = queue
            .submit(vec![entry("a", OperationKind::Kill)], ms(10))
            .unwrap_err();
        assert_eq!(err, QueueError::DuplicateId("a".into()));
        assert_eq!(queue.len(), 1);

        let err = queue
            .submit(
                vec![entry("b", OperationKind::Kill), entry("b", OperationKind::Kill)],
                ms(10),
            )
            .unwrap_err();
        assert_eq!(err, QueueError::DuplicateId("b".into()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut queue = TaskQueue::default();
        queue.submit(Vec::new(), ms(0)).unwrap();
        assert!(queue.is_empty());
        assert!(queue.is_idle());
    }

    #[test]
    fn test_fail_from_processing_stops_timers() {
        let mut queue = TaskQueue::default();
        queue.submit(vec![entry("a", OperationKind::Kill)], ms(0)).unwrap();
        queue.advance(ms(100));

        let transition = queue.fail("a", "device offline", ms(150)).unwrap();
        assert_eq!(transition.from, QueueStatus::Processing);
        assert_eq!(transition.to, QueueStatus::Failed);

        queue.advance(ms(10_000));
        let entry = queue.get("a").unwrap();
        assert_eq!(entry.status, QueueStatus::Failed);
        assert_eq!(entry.failure.as_deref(), Some("device offline"));
        assert!(queue.is_idle());
    }

    #[test]
    fn test_fail_rejects_terminal_and_unknown() {
        let mut queue = TaskQueue::default();
        queue.submit(vec![entry("a", OperationKind::Kill)], ms(0)).unwrap();
        queue.advance(ms(5000));

        assert!(matches!(
            queue.fail("a", "late", ms(5000)),
            Err(QueueError::InvalidTransition {
                from: QueueStatus::Completed,
                ..
            })
        ));
        assert_eq!(
            queue.cancel("missing", ms(5000)),
            Err(QueueError::UnknownEntry("missing".into()))
        );
    }

    #[test]
    fn test_cancel_pending_entry() {
        let mut queue = TaskQueue::default();
        queue
            .submit(
                vec![entry("a", OperationKind::Kill), entry("b", OperationKind::Kill)],
                ms(0),
            )
            .unwrap();

        queue.cancel("b", ms(0)).unwrap();
        queue.advance(ms(10_000));

        assert_eq!(status(&queue, "a"), QueueStatus::Completed);
        assert_eq!(status(&queue, "b"), QueueStatus::Failed);
        assert_eq!(queue.get("b").unwrap().failure.as_deref(), Some("cancelled"));
    }

    #[test]
    fn test_progress_counts() {
        let mut queue = TaskQueue::default();
        queue
            .submit(
                vec![
                    entry("a", OperationKind::Cache),
                    entry("b", OperationKind::Cache),
                    entry("k", OperationKind::Kill),
                ],
                ms(0),
            )
            .unwrap();
        queue.advance(ms(2000));

        let cache = queue.progress(Some(OperationKind::Cache));
        assert_eq!(cache.total, 2);
        assert_eq!(cache.completed, 1);
        assert_eq!(cache.processing, 1);
        assert!((cache.ratio() - 0.5).abs() < f64::EPSILON);
        assert!(!cache.is_settled());

        assert_eq!(QueueProgress::default().ratio(), 0.0);
    }

    #[test]
    fn test_finished_entries_are_evicted_oldest_first() {
        let mut queue = TaskQueue::new(QueueTimings::default(), 2);
        let batch: Vec<_> = (0..4)
            .map(|i| entry(&format!("e{}", i), OperationKind::Kill))
            .collect();
        queue.submit(batch, ms(0)).unwrap();

        queue.advance(ms(3000));
        // e0 and e1 completed, e2 and e3 still in flight.
        assert_eq!(queue.len(), 4);

        queue.advance(ms(10_000));
        let ids: Vec<_> = queue.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e3"]);
        assert_eq!(queue.live_ids.len(), 2);
    }

    #[test]
    fn test_evicted_stamped_ids_stay_unusable() {
        let mut queue = TaskQueue::new(QueueTimings::default(), 1);
        queue
            .submit(
                vec![
                    entry("kill-a-100-0", OperationKind::Kill),
                    entry("kill-b-100-1", OperationKind::Kill),
                ],
                ms(0),
            )
            .unwrap();
        queue.advance(ms(10_000));
        assert_eq!(queue.len(), 1);

        assert_eq!(
            queue.submit(vec![entry("kill-a-100-0", OperationKind::Kill)], ms(10_000)),
            Err(QueueError::StaleId("kill-a-100-0".into()))
        );
        assert_eq!(
            queue.submit(vec![entry("kill-b-100-1", OperationKind::Kill)], ms(10_000)),
            Err(QueueError::DuplicateId("kill-b-100-1".into()))
        );
        queue
            .submit(vec![entry("kill-a-101-0", OperationKind::Kill)], ms(10_000))
            .unwrap();

        // A far-future evicted stamp still leaves room for issued ones.
        queue.evicted_stamp = Some(i64::MAX - 1);
        assert_eq!(queue.issue_stamp(), i64::MAX);
    }

    #[test]
    fn test_reserved_ids_bounded_by_retention() {
        let mut queue = TaskQueue::new(QueueTimings::default(), 2);
        for i in 0..1000 {
            let stamp = queue.issue_stamp();
            let id = format!("kill-{}-{}-0", i, stamp);
            queue.submit(vec![entry(&id, OperationKind::Kill)], ms(0)).unwrap();
        }
        queue.advance(ms(10_000));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.live_ids.len(), 2);
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let mut queue = TaskQueue::default();
        let a = queue.issue_stamp();
        let b = queue.issue_stamp();
        let c = queue.issue_stamp();
        assert!(a < b && b < c);
    }
}
