//! Decides whether a completed result still applies.
//!
//! A result is stale when its generation is not the current one, when its target index no longer
//! resolves, or when a newer job for the same `(index, kind)` pair was submitted after it. Recency
//! is submission order (result id), not completion order.

use std::collections::HashMap;

use crate::registry::ItemRegistry;
use crate::types::{EnrichResult, Generation, InternalIndex, JobKind, ResultId};

/// Why a result was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaleReason {
    /// Submitted before the view was reset.
    Generation,
    /// Target index was removed.
    Retired,
    /// A newer job for the same pair exists, or the pair was invalidated.
    Superseded,
}

#[derive(Debug, Default)]
pub struct StaleResultFilter {
    latest: HashMap<(InternalIndex, JobKind), ResultId>,
}

impl StaleResultFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `result_id` as the newest job for the pair. Older ids never replace newer ones.
    pub fn record_submission(&mut self, index: InternalIndex, kind: JobKind, result_id: ResultId) {
        self.latest
            .entry((index, kind))
            .and_modify(|id| *id = (*id).max(result_id))
            .or_insert(result_id);
    }

    pub fn latest(&self, index: InternalIndex, kind: JobKind) -> Option<ResultId> {
        self.latest.get(&(index, kind)).copied()
    }

    pub fn is_latest(&self, index: InternalIndex, kind: JobKind, result_id: ResultId) -> bool {
        self.latest(index, kind) == Some(result_id)
    }

    pub fn staleness(
        &self,
        result: &EnrichResult,
        current: Generation,
        registry: &ItemRegistry,
    ) -> Option<StaleReason> {
        if result.generation != current {
            return Some(StaleReason::Generation);
        }
        if !registry.contains(result.target_index) {
            return Some(StaleReason::Retired);
        }
        if !self.is_latest(result.target_index, result.kind, result.result_id) {
            return Some(StaleReason::Superseded);
        }
        None
    }

    pub fn is_stale(
        &self,
        result: &EnrichResult,
        current: Generation,
        registry: &ItemRegistry,
    ) -> bool {
        self.staleness(result, current, registry).is_some()
    }

    /// Drop every pair of `index`. Anything still in flight for it becomes stale.
    pub fn forget_index(&mut self, index: InternalIndex) {
        self.latest.retain(|(i, _), _| *i != index);
    }

    /// Drop every pair whose kind matches.
    pub fn forget_kinds<F>(&mut self, mut matches: F)
    where
        F: FnMut(JobKind) -> bool,
    {
        self.latest.retain(|(_, kind), _| !matches(*kind));
    }

    pub fn clear(&mut self) {
        self.latest.clear();
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}
