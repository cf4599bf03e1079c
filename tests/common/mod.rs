#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shellview::pipeline::{JobQueue, JobSink, OverflowPolicy, PushOutcome, SubmitOutcome};
use shellview::{
    ColumnType, EnrichError, EnrichResult, EnrichmentJob, IconPayload, Item, ItemAttributes,
    ItemIdentity, LookupError, MetadataService, Payload, ResultId, TaskLane, Thumbnail, ViewSink,
};

pub fn file(path: &str) -> Item {
    Item::new(path, ItemAttributes::empty(), 100, None)
}

pub fn dir(path: &str) -> Item {
    Item::new(path, ItemAttributes::DIRECTORY, 0, None)
}

pub fn thumb(side: u32) -> Thumbnail {
    Thumbnail {
        width: side,
        height: side,
        rgba: Arc::from(vec![0u8; (side * side * 4) as usize]),
    }
}

/// Result a worker would post for `job`.
pub fn result_for(job: &EnrichmentJob, payload: Payload) -> EnrichResult {
    EnrichResult {
        result_id: job.result_id,
        kind: job.kind,
        target_index: job.target_index,
        generation: job.generation,
        identity: job.item.identity.clone(),
        payload,
    }
}

/// View that remembers every write.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub icons: HashMap<usize, IconPayload>,
    pub thumbnails: HashMap<usize, Thumbnail>,
    pub columns: HashMap<(usize, ColumnType), String>,
    pub info_tips: HashMap<usize, String>,
    pub writes: usize,
}

impl ViewSink for RecordingView {
    fn apply_icon(&mut self, row: usize, icon: &IconPayload) {
        self.icons.insert(row, *icon);
        self.writes += 1;
    }

    fn apply_thumbnail(&mut self, row: usize, thumbnail: &Thumbnail) {
        self.thumbnails.insert(row, thumbnail.clone());
        self.writes += 1;
    }

    fn apply_column_text(&mut self, row: usize, column: ColumnType, text: &str) {
        self.columns.insert((row, column), text.to_string());
        self.writes += 1;
    }

    fn apply_info_tip(&mut self, row: usize, text: &str) {
        self.info_tips.insert(row, text.to_string());
        self.writes += 1;
    }
}

/// Sink that keeps jobs for the test to complete by hand, in any order.
#[derive(Default)]
pub struct RecordingSink {
    pub jobs: RefCell<Vec<EnrichmentJob>>,
}

impl RecordingSink {
    pub fn last(&self) -> EnrichmentJob {
        self.jobs.borrow().last().cloned().expect("no job submitted")
    }

    pub fn count(&self) -> usize {
        self.jobs.borrow().len()
    }
}

impl JobSink for RecordingSink {
    fn submit(&self, job: EnrichmentJob) -> Result<SubmitOutcome, EnrichError> {
        let result_id = job.result_id;
        self.jobs.borrow_mut().push(job);
        Ok(SubmitOutcome {
            result_id,
            displaced: None,
        })
    }
}

/// Sink backed by one real lane queue, never drained by workers.
pub struct QueueSink {
    pub queue: JobQueue,
}

impl QueueSink {
    pub fn new(cap: usize, policy: OverflowPolicy) -> Self {
        Self {
            queue: JobQueue::new(TaskLane::Icon, cap, policy),
        }
    }
}

impl JobSink for QueueSink {
    fn submit(&self, job: EnrichmentJob) -> Result<SubmitOutcome, EnrichError> {
        let result_id = job.result_id;
        let displaced = match self.queue.push(job)? {
            PushOutcome::Queued => None,
            PushOutcome::Superseded(d) | PushOutcome::DroppedOldest(d) => Some(d),
        };
        Ok(SubmitOutcome {
            result_id,
            displaced,
        })
    }

    fn is_live(&self, result_id: ResultId) -> bool {
        self.queue.is_live(result_id)
    }
}

/// Service answering from the path alone. Paths containing "broken" fail every lookup.
#[derive(Default)]
pub struct FakeService {
    pub calls: AtomicUsize,
}

impl FakeService {
    fn check(&self, identity: &ItemIdentity) -> Result<(), LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if identity.to_string().contains("broken") {
            return Err(LookupError::Unsupported {
                what: "fake",
                path: identity.as_path().to_path_buf(),
            });
        }
        Ok(())
    }
}

impl MetadataService for FakeService {
    fn fetch_icon(&self, identity: &ItemIdentity) -> Result<IconPayload, LookupError> {
        self.check(identity)?;
        Ok(IconPayload::plain(identity.to_string().len() as u32))
    }

    fn fetch_thumbnail(
        &self,
        identity: &ItemIdentity,
        size: u32,
    ) -> Result<Thumbnail, LookupError> {
        self.check(identity)?;
        Ok(thumb(size))
    }

    fn fetch_column_value(
        &self,
        identity: &ItemIdentity,
        column: ColumnType,
    ) -> Result<String, LookupError> {
        self.check(identity)?;
        Ok(format!("{} of {}", column.header(), identity))
    }

    fn fetch_info_tip(&self, identity: &ItemIdentity) -> Result<String, LookupError> {
        self.check(identity)?;
        Ok(format!("tip for {identity}"))
    }
}
