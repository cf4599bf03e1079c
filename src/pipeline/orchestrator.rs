use anyhow::Result;
use crossbeam_channel::{Sender, unbounded};
use log::debug;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::channel::ResultPoster;
use super::queue::{Displaced, JobQueue, OverflowPolicy, PushOutcome};
use super::stats::{PoolStats, PoolStatsSnapshot, report_pool_stats};
use super::workers::spawn_lane_workers;
use crate::error::EnrichError;
use crate::opts::PoolConfig;
use crate::service::MetadataService;
use crate::types::{EnrichmentJob, ResultId, TaskLane};

/// Outcome of a submission. `displaced` is a waiting job that will no longer run: either an older
/// job for the same pair that was superseded, or the oldest job of a full lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub result_id: ResultId,
    pub displaced: Option<Displaced>,
}

/// Anything that accepts enrichment jobs. [`WorkerPool`] is the real one.
pub trait JobSink {
    /// Queue `job`. Never blocks the caller.
    fn submit(&self, job: EnrichmentJob) -> Result<SubmitOutcome, EnrichError>;

    /// False once the job has finished, whether or not it produced a result. A sink that can't
    /// tell reports every job as live.
    fn is_live(&self, _result_id: ResultId) -> bool {
        true
    }
}

struct LaneHandle {
    lane: TaskLane,
    queue: Arc<JobQueue>,
    ready_tx: Option<Sender<()>>,
}

/// Bounded worker threads per lane, each lane pulling from its own superseding queue.
pub struct WorkerPool {
    lanes: Vec<LaneHandle>,
    handles: Vec<JoinHandle<()>>,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Start all lanes with the default overflow policy (drop oldest).
    pub fn start(
        service: Arc<dyn MetadataService>,
        poster: ResultPoster,
        config: &PoolConfig,
    ) -> Self {
        Self::start_with_policy(service, poster, config, OverflowPolicy::default())
    }

    pub fn start_with_policy(
        service: Arc<dyn MetadataService>,
        poster: ResultPoster,
        config: &PoolConfig,
        policy: OverflowPolicy,
    ) -> Self {
        let stats = Arc::new(PoolStats::default());
        let mut lanes = Vec::with_capacity(TaskLane::ALL.len());
        let mut handles = Vec::new();

        for lane in TaskLane::ALL {
            let lane_config = config.lane(lane);
            let queue = Arc::new(JobQueue::new(lane, lane_config.queue_cap, policy));
            let (ready_tx, ready_rx) = unbounded::<()>();
            handles.extend(spawn_lane_workers(
                ready_rx,
                &queue,
                &service,
                &poster,
                &stats,
                lane_config.threads,
            ));
            debug!(
                "{} lane: {} threads, queue cap {}",
                lane, lane_config.threads, lane_config.queue_cap
            );
            lanes.push(LaneHandle {
                lane,
                queue,
                ready_tx: Some(ready_tx),
            });
        }

        Self {
            lanes,
            handles,
            stats,
        }
    }

    fn lane(&self, lane: TaskLane) -> &LaneHandle {
        // Lanes are created in TaskLane::ALL order.
        let slot = TaskLane::ALL.iter().position(|&l| l == lane).unwrap_or(0);
        &self.lanes[slot]
    }

    /// True when no job is queued or running.
    pub fn is_idle(&self) -> bool {
        self.stats.outstanding() == 0
    }

    /// Jobs waiting (not yet picked up) in `lane`.
    pub fn queued(&self, lane: TaskLane) -> usize {
        self.lane(lane).queue.len()
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Close all lanes and wait for workers. Jobs already queued still run.
    pub fn shutdown(mut self) -> Result<PoolStatsSnapshot> {
        self.close_lanes();
        for h in std::mem::take(&mut self.handles) {
            h.join()
                .map_err(|_| anyhow::anyhow!("enrichment worker panicked"))?;
        }
        let stats = self.stats.snapshot();
        report_pool_stats(&stats);
        Ok(stats)
    }

    fn close_lanes(&mut self) {
        // Dropping the last sender closes the channel so workers exit.
        for lane in &mut self.lanes {
            lane.ready_tx.take();
        }
    }
}

impl JobSink for WorkerPool {
    fn submit(&self, job: EnrichmentJob) -> Result<SubmitOutcome, EnrichError> {
        let handle = self.lane(job.kind.lane());
        let ready_tx = handle.ready_tx.as_ref().ok_or(EnrichError::PoolClosed)?;
        let result_id = job.result_id;

        let displaced = match handle.queue.push(job)? {
            PushOutcome::Queued => {
                self.stats.record_queued();
                if ready_tx.send(()).is_err() {
                    return Err(EnrichError::PoolClosed);
                }
                None
            }
            PushOutcome::Superseded(d) => {
                self.stats.record_superseded();
                Some(d)
            }
            PushOutcome::DroppedOldest(d) => {
                debug!(
                    "{} queue full; dropped job {:?} for #{}",
                    handle.lane, d.result_id, d.target_index
                );
                self.stats.record_dropped();
                Some(d)
            }
        };
        Ok(SubmitOutcome {
            result_id,
            displaced,
        })
    }

    fn is_live(&self, result_id: ResultId) -> bool {
        self.lanes.iter().any(|l| l.queue.is_live(result_id))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Workers detach and exit on their own once the queues run dry.
        self.close_lanes();
    }
}
