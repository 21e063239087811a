//! FIFO crawl frontier shared by the worker pool
//!
//! This module handles:
//! - Queueing admitted URLs in discovery order
//! - Blocking dequeue for idle workers
//! - Tracking unfinished work so the driver can wait for a drained frontier
//! - Delivering one stop signal per worker at shutdown
//!
//! Admission (dedup and page budget) is decided by the crawl state, not here.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::{Notify, Semaphore};
use url::Url;

/// One unit of work handed to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontierItem {
    /// A URL to process
    Url(Url),
    /// Shutdown sentinel; a worker that receives it exits
    Stop,
}

/// Unbounded FIFO queue with join semantics
///
/// Every pushed item counts as unfinished until the consumer calls
/// [`Frontier::task_done`] (usually through a [`TaskGuard`]).
/// [`Frontier::join`] resolves once the count reaches zero.
#[derive(Debug)]
pub struct Frontier {
    queue: Mutex<VecDeque<FrontierItem>>,
    /// One permit per queued item
    available: Semaphore,
    unfinished: AtomicUsize,
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Semaphore::new(0),
            unfinished: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Appends an item to the back of the queue
    pub fn push(&self, item: FrontierItem) {
        self.unfinished.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
        self.available.add_permits(1);
    }

    /// Removes the front item, waiting while the queue is empty
    pub async fn pop(&self) -> FrontierItem {
        match self.available.acquire().await {
            Ok(permit) => permit.forget(),
            // The semaphore is never closed; treat it as shutdown anyway
            Err(_) => return FrontierItem::Stop,
        }

        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(FrontierItem::Stop)
    }

    /// Marks one previously popped item as finished
    pub fn task_done(&self) {
        let previous = self.unfinished.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Waits until every pushed item has been marked finished
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            if self.unfinished.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Number of items waiting in the queue
    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items pushed but not yet finished (queued plus in flight)
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::SeqCst)
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

/// Calls [`Frontier::task_done`] when dropped
///
/// Holding one for the lifetime of an item's processing keeps the count
/// right even if processing panics.
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
}

impl<'a> TaskGuard<'a> {
    pub fn new(frontier: &'a Frontier) -> Self {
        Self { frontier }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.task_done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn url(s: &str) -> FrontierItem {
        FrontierItem::Url(Url::parse(s).unwrap())
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let frontier = Frontier::new();
        frontier.push(url("http://a.com/1"));
        frontier.push(url("http://a.com/2"));
        frontier.push(FrontierItem::Stop);

        assert_eq!(frontier.pop().await, url("http://a.com/1"));
        assert_eq!(frontier.pop().await, url("http://a.com/2"));
        assert_eq!(frontier.pop().await, FrontierItem::Stop);
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_join_on_empty_returns_immediately() {
        let frontier = Frontier::new();
        tokio::time::timeout(Duration::from_secs(1), frontier.join())
            .await
            .expect("join should not block");
    }

    #[tokio::test]
    async fn test_join_waits_for_task_done() {
        let frontier = Arc::new(Frontier::new());
        frontier.push(url("http://a.com/"));

        let item = frontier.pop().await;
        assert!(matches!(item, FrontierItem::Url(_)));
        assert_eq!(frontier.unfinished(), 1);

        let blocked = tokio::time::timeout(Duration::from_millis(50), frontier.join()).await;
        assert!(blocked.is_err());

        let worker = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move {
                let _guard = TaskGuard::new(&frontier);
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };

        tokio::time::timeout(Duration::from_secs(1), frontier.join())
            .await
            .expect("join should resolve after task_done");
        worker.await.unwrap();
        assert_eq!(frontier.unfinished(), 0);
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let frontier = Arc::new(Frontier::new());
        let consumer = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.push(url("http://late.com/"));

        let item = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item, url("http://late.com/"));
    }

    #[tokio::test]
    async fn test_each_worker_gets_one_stop() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let item = frontier.pop().await;
                frontier.task_done();
                item
            }));
        }

        for _ in 0..4 {
            frontier.push(FrontierItem::Stop);
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), FrontierItem::Stop);
        }
        frontier.join().await;
    }
}
