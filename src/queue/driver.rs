use crate::queue::store::{TaskQueue, Transition};
use crate::queue::timeline::SessionClock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub type SharedQueue = Arc<Mutex<TaskQueue>>;

const EVENT_CAPACITY: usize = 256;

/// Background task that advances a shared [`TaskQueue`] in real time.
///
/// The task sleeps until the queue's next deadline. Callers that change the
/// queue through [`QueueDriver::queue`] wake it with [`QueueDriver::notify`].
pub struct QueueDriver {
    queue: SharedQueue,
    clock: SessionClock,
    wake: Arc<Notify>,
    events: broadcast::Sender<Transition>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl QueueDriver {
    pub fn spawn(queue: SharedQueue, clock: SessionClock) -> Self {
        let wake = Arc::new(Notify::new());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run(
            Arc::clone(&queue),
            clock,
            Arc::clone(&wake),
            events.clone(),
            cancel.clone(),
        ));

        Self {
            queue,
            clock,
            wake,
            events,
            cancel,
            handle: Some(handle),
        }
    }

    /// Wakes the driver after the queue was changed directly.
    pub fn notify(&self) {
        self.wake.notify_one();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.events.subscribe()
    }

    pub fn queue(&self) -> &SharedQueue {
        &self.queue
    }

    pub fn clock(&self) -> SessionClock {
        self.clock
    }

    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for QueueDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    queue: SharedQueue,
    clock: SessionClock,
    wake: Arc<Notify>,
    events: broadcast::Sender<Transition>,
    cancel: CancellationToken,
) {
    loop {
        let next = {
            let mut queue = queue.lock().await;
            for transition in queue.advance(clock.now()) {
                let _ = events.send(transition);
            }
            queue.next_deadline()
        };
        let wait = next.map(|deadline| deadline.saturating_sub(clock.now()));

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = wake.notified() => {}
            _ = sleep_for(wait) => {}
        }
    }
    debug!("queue driver stopped");
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{OperationKind, QueueEntry, QueueStatus};

    fn entry(id: &str) -> QueueEntry {
        QueueEntry {
            id: id.to_string(),
            app_id: id.to_string(),
            app_name: id.to_string(),
            kind: OperationKind::Kill,
            status: QueueStatus::Pending,
            command: OperationKind::Kill.command_for("com.example"),
            failure: None,
        }
    }

    async fn submit(driver: &QueueDriver, entries: Vec<QueueEntry>) {
        driver
            .queue()
            .lock()
            .await
            .submit(entries, driver.clock().now())
            .unwrap();
        driver.notify();
    }

    async fn status(queue: &SharedQueue, id: &str) -> QueueStatus {
        queue.lock().await.get(id).map(|e| e.status).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_follows_batch_schedule() {
        let queue = Arc::new(Mutex::new(TaskQueue::default()));
        let driver = QueueDriver::spawn(Arc::clone(&queue), SessionClock::start());

        submit(&driver, vec![entry("x"), entry("y")]).await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(status(&queue, "x").await, QueueStatus::Processing);
        assert_eq!(status(&queue, "y").await, QueueStatus::Pending);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(status(&queue, "y").await, QueueStatus::Processing);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(status(&queue, "x").await, QueueStatus::Completed);
        assert_eq!(status(&queue, "y").await, QueueStatus::Processing);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(status(&queue, "y").await, QueueStatus::Completed);

        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_broadcasts_transitions() {
        let queue = Arc::new(Mutex::new(TaskQueue::default()));
        let driver = QueueDriver::spawn(Arc::clone(&queue), SessionClock::start());
        let mut events = driver.subscribe();

        submit(&driver, vec![entry("a")]).await;

        let first = events.recv().await.unwrap();
        assert_eq!(first.to, QueueStatus::Processing);
        let second = events.recv().await.unwrap();
        assert_eq!(second.to, QueueStatus::Completed);
        assert_eq!(second.at, Duration::from_millis(2000));

        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_does_not_wait_for_lifecycle() {
        let queue = Arc::new(Mutex::new(TaskQueue::default()));
        let driver = QueueDriver::spawn(Arc::clone(&queue), SessionClock::start());
        let clock = driver.clock();

        let before = clock.now();
        submit(&driver, vec![entry("a"), entry("b"), entry("c")]).await;
        assert_eq!(clock.now(), before);

        driver.shutdown().await;
    }
}
