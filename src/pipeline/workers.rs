use chrono::Local;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::channel::ResultPoster;
use super::queue::JobQueue;
use super::stats::PoolStats;
use crate::error::LookupError;
use crate::opts::InfoTipType;
use crate::service::MetadataService;
use crate::service::format::{column_text, join_info_tip, modified_info_tip};
use crate::types::{ColumnType, EnrichResult, EnrichmentJob, JobKind, Payload};

/// Single lane worker: wait for a ready token, pop a job, run it, post the result.
/// A failed lookup is logged and produces nothing.
fn lane_worker_loop(
    ready_rx: Receiver<()>,
    queue: Arc<JobQueue>,
    service: Arc<dyn MetadataService>,
    poster: ResultPoster,
    stats: Arc<PoolStats>,
) {
    while ready_rx.recv().is_ok() {
        let Some(job) = queue.pop() else {
            continue;
        };
        match execute_job(service.as_ref(), &job) {
            Ok(result) => {
                stats.record_completed();
                poster.post(result);
            }
            Err(e) => {
                stats.record_failed();
                log::debug!(
                    "{} lookup for #{} ({:?}) failed: {}",
                    queue.lane(),
                    job.target_index,
                    job.kind,
                    e
                );
            }
        }
        queue.finish(job.result_id);
        stats.finish_one();
    }
}

/// Spawn `num_threads` workers for one lane. They exit once every ready sender is dropped and the
/// remaining tokens are consumed.
pub fn spawn_lane_workers(
    ready_rx: Receiver<()>,
    queue: &Arc<JobQueue>,
    service: &Arc<dyn MetadataService>,
    poster: &ResultPoster,
    stats: &Arc<PoolStats>,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_threads.max(1))
        .map(|_| {
            let ready_rx = ready_rx.clone();
            let queue = Arc::clone(queue);
            let service = Arc::clone(service);
            let poster = poster.clone();
            let stats = Arc::clone(stats);
            thread::spawn(move || lane_worker_loop(ready_rx, queue, service, poster, stats))
        })
        .collect()
}

/// Run one job against the service using only the job's own snapshot data.
pub fn execute_job(
    service: &dyn MetadataService,
    job: &EnrichmentJob,
) -> Result<EnrichResult, LookupError> {
    let identity = &job.item.identity;
    let payload = match job.kind {
        JobKind::Icon => Payload::Icon(service.fetch_icon(identity)?),
        JobKind::Thumbnail => {
            Payload::Thumbnail(service.fetch_thumbnail(identity, job.config.thumbnail_size)?)
        }
        JobKind::Column(column) => Payload::ColumnText(column_value(service, job, column)?),
        JobKind::InfoTip => {
            let tip = info_tip(service, job)?;
            Payload::InfoTip(join_info_tip(job.existing_text.as_deref(), tip))
        }
    };
    Ok(EnrichResult {
        result_id: job.result_id,
        kind: job.kind,
        target_index: job.target_index,
        generation: job.generation,
        identity: identity.clone(),
        payload,
    })
}

fn column_value(
    service: &dyn MetadataService,
    job: &EnrichmentJob,
    column: ColumnType,
) -> Result<String, LookupError> {
    if column == ColumnType::Type {
        return service.fetch_column_value(&job.item.identity, column);
    }
    column_text(&job.item, column, &job.config, &Local::now()).ok_or_else(|| {
        LookupError::Unsupported {
            what: column.header(),
            path: job.item.parsing_path.clone(),
        }
    })
}

fn info_tip(service: &dyn MetadataService, job: &EnrichmentJob) -> Result<String, LookupError> {
    match job.config.info_tip_type {
        InfoTipType::System => service.fetch_info_tip(&job.item.identity),
        InfoTipType::ModifiedDate => modified_info_tip(&job.item, &job.config, &Local::now())
            .ok_or_else(|| LookupError::Unsupported {
                what: "modification time",
                path: job.item.parsing_path.clone(),
            }),
    }
}
