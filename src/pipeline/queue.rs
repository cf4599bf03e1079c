//! Per-lane job queue with supersession.
//!
//! A job for a `(target_index, kind)` pair that is still waiting in the queue is replaced in place
//! by a newer job for the same pair instead of queuing a duplicate. When the queue is full, the
//! configured [`OverflowPolicy`] applies.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::error::EnrichError;
use crate::types::{EnrichmentJob, InternalIndex, JobKind, ResultId, TaskLane};

/// What to do when a lane queue is at capacity and nothing can be superseded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Drop the oldest waiting job to make room.
    #[default]
    DropOldest,
    /// Refuse the new job with [`EnrichError::QueueSaturated`].
    Reject,
}

/// A job that left the queue without running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Displaced {
    pub target_index: InternalIndex,
    pub kind: JobKind,
    pub result_id: ResultId,
}

impl Displaced {
    fn of(job: &EnrichmentJob) -> Self {
        Self {
            target_index: job.target_index,
            kind: job.kind,
            result_id: job.result_id,
        }
    }
}

/// Outcome of pushing a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Appended; a worker needs to be told.
    Queued,
    /// Replaced a waiting job for the same pair; no new work.
    Superseded(Displaced),
    /// Appended after dropping the oldest waiting job.
    DroppedOldest(Displaced),
}

#[derive(Default)]
struct Slots {
    waiting: VecDeque<EnrichmentJob>,
    /// Popped but not yet finished.
    running: HashSet<ResultId>,
}

pub struct JobQueue {
    lane: TaskLane,
    cap: usize,
    policy: OverflowPolicy,
    slots: Mutex<Slots>,
}

impl JobQueue {
    pub fn new(lane: TaskLane, cap: usize, policy: OverflowPolicy) -> Self {
        Self {
            lane,
            cap: cap.max(1),
            policy,
            slots: Mutex::new(Slots::default()),
        }
    }

    pub fn lane(&self) -> TaskLane {
        self.lane
    }

    pub fn push(&self, job: EnrichmentJob) -> Result<PushOutcome, EnrichError> {
        let mut slots = self.slots.lock().unwrap();
        let jobs = &mut slots.waiting;
        if let Some(waiting) = jobs
            .iter_mut()
            .find(|j| j.target_index == job.target_index && j.kind == job.kind)
        {
            let displaced = Displaced::of(waiting);
            *waiting = job;
            return Ok(PushOutcome::Superseded(displaced));
        }
        if jobs.len() < self.cap {
            jobs.push_back(job);
            return Ok(PushOutcome::Queued);
        }
        match self.policy {
            OverflowPolicy::Reject => Err(EnrichError::QueueSaturated(self.lane)),
            OverflowPolicy::DropOldest => {
                let dropped = jobs.pop_front().map(|j| Displaced::of(&j));
                jobs.push_back(job);
                match dropped {
                    Some(d) => Ok(PushOutcome::DroppedOldest(d)),
                    None => Ok(PushOutcome::Queued),
                }
            }
        }
    }

    /// Next job to run, oldest first. It counts as live until [`JobQueue::finish`].
    pub fn pop(&self) -> Option<EnrichmentJob> {
        let mut slots = self.slots.lock().unwrap();
        let job = slots.waiting.pop_front()?;
        slots.running.insert(job.result_id);
        Some(job)
    }

    /// The popped job `id` is done, with or without a result.
    pub fn finish(&self, id: ResultId) {
        self.slots.lock().unwrap().running.remove(&id);
    }

    /// True while job `id` is waiting or running.
    pub fn is_live(&self, id: ResultId) -> bool {
        let slots = self.slots.lock().unwrap();
        slots.running.contains(&id) || slots.waiting.iter().any(|j| j.result_id == id)
    }

    /// Jobs waiting to be picked up.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
