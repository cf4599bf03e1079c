use std::collections::HashMap;

use crate::types::{InternalIndex, JobKind, ResultId};

/// Progress of one `(row item, kind)` pair.
///
/// `Unknown -> Requested -> Applied | Discarded`. A pair goes back to `Unknown` when the item
/// changes, and a `Discarded` pair is requested again on the next paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowState {
    #[default]
    Unknown,
    Requested(ResultId),
    Applied,
    Discarded,
}

#[derive(Debug, Default)]
pub struct RowStates {
    states: HashMap<(InternalIndex, JobKind), RowState>,
}

impl RowStates {
    pub fn get(&self, index: InternalIndex, kind: JobKind) -> RowState {
        self.states.get(&(index, kind)).copied().unwrap_or_default()
    }

    pub fn set(&mut self, index: InternalIndex, kind: JobKind, state: RowState) {
        match state {
            RowState::Unknown => {
                self.states.remove(&(index, kind));
            }
            _ => {
                self.states.insert((index, kind), state);
            }
        }
    }

    pub fn forget_index(&mut self, index: InternalIndex) {
        self.states.retain(|(i, _), _| *i != index);
    }

    pub fn forget_kinds<F>(&mut self, mut matches: F)
    where
        F: FnMut(JobKind) -> bool,
    {
        self.states.retain(|(_, kind), _| !matches(*kind));
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Pairs still waiting for a result.
    pub fn pending(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, RowState::Requested(_)))
            .count()
    }
}
