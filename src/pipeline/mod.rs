//! Background side of enrichment: lane queues, worker threads, result handoff.

pub mod channel;
pub mod orchestrator;
pub mod queue;
pub mod stats;
pub mod workers;

pub use channel::{ResultChannel, ResultPoster, WakeNotifier};
pub use orchestrator::{JobSink, SubmitOutcome, WorkerPool};
pub use queue::{Displaced, JobQueue, OverflowPolicy, PushOutcome};
pub use stats::{PoolStats, PoolStatsSnapshot, report_pool_stats};
pub use workers::{execute_job, spawn_lane_workers};
