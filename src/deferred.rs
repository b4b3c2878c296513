//! Post-response work queue.
//!
//! Handlers enqueue tasks that must not sit on the response path, a single
//! worker drains them against the store. Task failures stay on the worker's
//! log channel and never reach the request that queued them.
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::store::ContentStore;

#[derive(Debug)]
pub enum DeferredTask {
    /// Write an already-computed view count for a pitch.
    WriteViews { pitch_id: String, views: u64 },
}

#[derive(Clone)]
pub struct DeferredQueue {
    sender: UnboundedSender<DeferredTask>,
}

impl DeferredQueue {
    pub fn enqueue(&self, task: DeferredTask) {
        if self.sender.send(task).is_err() {
            warn!("Deferred worker is gone, dropping task");
        }
    }
}

pub struct DeferredRunner {
    receiver: UnboundedReceiver<DeferredTask>,
    store: Arc<dyn ContentStore>,
}

pub fn channel(store: Arc<dyn ContentStore>) -> (DeferredQueue, DeferredRunner) {
    let (sender, receiver) = mpsc::unbounded_channel();

    (
        DeferredQueue { sender },
        DeferredRunner { receiver, store },
    )
}

impl DeferredRunner {
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            self.execute(task).await;
        }
    }

    /// Process one queued task if any, without blocking. Lets tests drive
    /// the deferred phase deterministically.
    pub async fn tick(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.execute(task).await;
                true
            }
            Err(_) => false,
        }
    }

    async fn execute(&self, task: DeferredTask) {
        match task {
            DeferredTask::WriteViews { pitch_id, views } => {
                match self.store.patch(&pitch_id).set_views(views).commit().await {
                    Ok(()) => debug!("Wrote {views} views for {pitch_id}"),
                    Err(error) => warn!("Deferred view write for {pitch_id} failed: {error}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        memory::MemoryStore,
        store::{PitchRecord, ReadMode},
    };

    fn record(id: &str, views: u64) -> PitchRecord {
        PitchRecord {
            id: id.to_string(),
            author_id: "ada".to_string(),
            title: "Acme".to_string(),
            description: "A reusable rocket for regional deliveries".to_string(),
            category: "Tech".to_string(),
            link: "https://x.com".to_string(),
            pitch_body: "Rockets, but affordable".to_string(),
            views,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn worker_applies_queued_writes_in_order() {
        let store = Arc::new(MemoryStore::new());
        store.create_pitch(&record("acme", 0)).await.unwrap();

        let (queue, mut runner) = channel(store.clone());
        queue.enqueue(DeferredTask::WriteViews {
            pitch_id: "acme".to_string(),
            views: 1,
        });
        queue.enqueue(DeferredTask::WriteViews {
            pitch_id: "acme".to_string(),
            views: 2,
        });

        assert!(runner.tick().await);
        assert!(runner.tick().await);
        assert!(!runner.tick().await);

        let stored = store
            .fetch_pitch("acme", ReadMode::BypassCache)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.views, 2);
    }

    #[tokio::test]
    async fn failed_write_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        let (queue, mut runner) = channel(store);

        queue.enqueue(DeferredTask::WriteViews {
            pitch_id: "ghost".to_string(),
            views: 1,
        });

        // The task runs, the missing-document error stays in the worker.
        assert!(runner.tick().await);
        assert!(!runner.tick().await);
    }
}
