//! Profile event queue.
//!
//! In-process [`EventTrigger`] that records notifications in a FIFO queue for a
//! downstream consumer to drain.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use metrics::gauge;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{EventTrigger, RepoError};
use crate::domain::entities::{Category, Profile};

use super::lock::mutex_lock;

const SOURCE: &str = "infra::events";
const METRIC_QUEUE_LEN: &str = "techmentor_event_queue_len";

/// Monotonic epoch for ordering events within this process.
pub type Epoch = u64;

#[derive(Debug, Clone)]
pub struct QueuedEvent {
    /// Unique identifier for idempotent delivery.
    pub id: Uuid,
    pub epoch: Epoch,
    pub event: ProfileEvent,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEvent {
    ProfileUpdated(Profile),
    NewCategory(Category),
}

impl ProfileEvent {
    fn label(&self) -> &'static str {
        match self {
            ProfileEvent::ProfileUpdated(_) => "profile_updated",
            ProfileEvent::NewCategory(_) => "new_category",
        }
    }
}

pub struct QueueEventTrigger {
    queue: Mutex<VecDeque<QueuedEvent>>,
    epoch_counter: AtomicU64,
}

impl QueueEventTrigger {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
        }
    }

    fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn publish(&self, event: ProfileEvent) {
        let queued = QueuedEvent {
            id: Uuid::new_v4(),
            epoch: self.next_epoch(),
            event,
            timestamp: OffsetDateTime::now_utc(),
        };

        info!(
            event_id = %queued.id,
            event_epoch = queued.epoch,
            event_kind = queued.event.label(),
            "Profile event enqueued"
        );

        let mut queue = mutex_lock(&self.queue, SOURCE, "publish");
        queue.push_back(queued);
        gauge!(METRIC_QUEUE_LEN).set(queue.len() as f64);
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<QueuedEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        let drained = queue.drain(..count).collect();
        gauge!(METRIC_QUEUE_LEN).set(queue.len() as f64);
        drained
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
        gauge!(METRIC_QUEUE_LEN).set(0.0);
    }
}

impl Default for QueueEventTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventTrigger for QueueEventTrigger {
    async fn profile_updated(&self, profile: &Profile) -> Result<(), RepoError> {
        self.publish(ProfileEvent::ProfileUpdated(profile.clone()));
        Ok(())
    }

    async fn new_category(&self, category: &Category) -> Result<(), RepoError> {
        self.publish(ProfileEvent::NewCategory(category.clone()));
        Ok(())
    }
}
