//! Real-time tick delivery on tokio.
//!
//! Each scheduled tick is a spawned task running a `tokio::time::interval`
//! that sends its [`TickHandle`] down an unbounded channel. The owner of the
//! timer reads the channel and feeds handles into `tick()`. Cancelling aborts
//! the task; a handle already sitting in the channel is discarded by the
//! countdown because it no longer matches the pending one.

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::timer::{TickHandle, TickScheduler};

pub type TickReceiver = mpsc::UnboundedReceiver<TickHandle>;

#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    tx: mpsc::UnboundedSender<TickHandle>,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Create a scheduler spawning onto `runtime` and the receiving end of
    /// its tick channel.
    pub fn new(runtime: Handle) -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, rx)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_every(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let tx = self.tx.clone();
        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        debug!(handle = handle.id(), period_ms = period.as_millis() as u64, "tick task spawned");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!(handle = handle.id(), "tick task aborted");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_ticks_every_period() {
        let (mut scheduler, mut rx) = TokioScheduler::new(Handle::current());
        let handle = scheduler.schedule_every(Duration::from_secs(1));

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(handle));
        }
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_delivery() {
        let (mut scheduler, mut rx) = TokioScheduler::new(Handle::current());
        let handle = scheduler.schedule_every(Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(handle));

        scheduler.cancel(handle);
        // Let the aborted task wind down before draining.
        tokio::task::yield_now().await;
        while rx.try_recv().is_ok() {}

        let next = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(next.is_err(), "tick delivered after cancel");
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_all_tasks() {
        let (mut scheduler, mut rx) = TokioScheduler::new(Handle::current());
        scheduler.schedule_every(Duration::from_secs(1));
        scheduler.schedule_every(Duration::from_secs(1));
        drop(scheduler);
        tokio::task::yield_now().await;
        while rx.try_recv().is_ok() {}

        // Every sender is gone once the tasks are aborted.
        let next = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(matches!(next, Ok(None)));
    }
}
