//! Authoritative store of the items shown in the view.
//!
//! Items are addressed by [`InternalIndex`], which never changes while the item is present. Row
//! order is tracked separately because sorting, inserting and deleting move rows around without
//! touching identity.
//!
//! Removed indices are retired for the rest of the generation: they are not handed out again
//! until [`ItemRegistry::clear`], so a late result for a removed index can never land on a
//! different item.

use std::cmp::Ordering;

use crate::error::EnrichError;
use crate::types::{InternalIndex, Item};

#[derive(Debug, Default)]
pub struct ItemRegistry {
    slots: Vec<Option<Item>>,
    rows: Vec<InternalIndex>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` as the last row. Returns its internal index.
    pub fn insert(&mut self, item: Item) -> InternalIndex {
        let index = self.slots.len();
        self.slots.push(Some(item));
        self.rows.push(index);
        index
    }

    /// Add `item` at row position `row` (clamped to the end).
    pub fn insert_at_row(&mut self, row: usize, item: Item) -> InternalIndex {
        let index = self.slots.len();
        self.slots.push(Some(item));
        let row = row.min(self.rows.len());
        self.rows.insert(row, index);
        index
    }

    pub fn get(&self, index: InternalIndex) -> Result<&Item, EnrichError> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(EnrichError::NotFound(index))
    }

    pub fn contains(&self, index: InternalIndex) -> bool {
        self.get(index).is_ok()
    }

    /// Swap in new data for a live item. Returns the previous item.
    pub fn replace(&mut self, index: InternalIndex, item: Item) -> Result<Item, EnrichError> {
        match self.slots.get_mut(index) {
            Some(Some(slot)) => Ok(std::mem::replace(slot, item)),
            _ => Err(EnrichError::NotFound(index)),
        }
    }

    /// Remove the item and its row. The index is retired, not reused.
    pub fn remove(&mut self, index: InternalIndex) -> Result<Item, EnrichError> {
        let item = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(EnrichError::NotFound(index))?;
        if let Some(row) = self.locate_row_for(index) {
            self.rows.remove(row);
        }
        Ok(item)
    }

    /// Current row of `index`, if the item is still shown.
    pub fn locate_row_for(&self, index: InternalIndex) -> Option<usize> {
        self.rows.iter().position(|&i| i == index)
    }

    pub fn index_at_row(&self, row: usize) -> Result<InternalIndex, EnrichError> {
        self.rows
            .get(row)
            .copied()
            .ok_or(EnrichError::RowOutOfRange(row))
    }

    /// Reorder rows. Internal indices are unaffected.
    pub fn sort_rows_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        let slots = &self.slots;
        self.rows.sort_by(|&a, &b| match (&slots[a], &slots[b]) {
            (Some(x), Some(y)) => compare(x, y),
            _ => Ordering::Equal,
        });
    }

    /// Row-ordered internal indices.
    pub fn rows(&self) -> &[InternalIndex] {
        &self.rows
    }

    /// Row-ordered `(index, item)` pairs.
    pub fn iter_rows(&self) -> impl Iterator<Item = (InternalIndex, &Item)> {
        self.rows
            .iter()
            .filter_map(|&i| self.slots[i].as_ref().map(|item| (i, item)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop everything. Indices start again from 0.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.rows.clear();
    }
}
