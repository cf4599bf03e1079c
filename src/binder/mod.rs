//! Interactive-thread controller: turns "row needs X" into jobs and applies results that are
//! still current.
//!
//! The binder owns the registry, the result channel and the caches. Nothing here is shared with
//! workers; jobs leave with copies and results come back through the channel.

pub mod cache;
pub mod stale;
pub mod state;
pub mod view;

pub use cache::LruCache;
pub use stale::{StaleReason, StaleResultFilter};
pub use state::{RowState, RowStates};
pub use view::ViewSink;

use log::debug;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::error::EnrichError;
use crate::opts::ViewConfig;
use crate::pipeline::{Displaced, JobSink, ResultChannel, WorkerPool};
use crate::registry::ItemRegistry;
use crate::types::{
    EnrichResult, EnrichmentJob, Generation, IconPayload, InternalIndex, Item, ItemIdentity,
    JobKind, Payload, ResultId, Thumbnail,
};
use crate::utils::config::{CacheCaps, DefaultIcons};

/// What [`ViewBinder::on_row_needs_enrichment`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeedOutcome {
    /// A job was queued.
    Submitted(ResultId),
    /// A job for the pair is already on its way.
    Pending(ResultId),
    /// Applied straight from the cache.
    Cached,
    /// The row already has a value.
    AlreadyApplied,
    /// Turned off in the configuration (info tips).
    Disabled,
}

/// Counts from one [`ViewBinder::on_results_ready`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: usize,
    pub discarded: usize,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.applied + self.discarded
    }
}

pub struct ViewBinder<V: ViewSink, S: JobSink = WorkerPool> {
    registry: ItemRegistry,
    sink: S,
    results: ResultChannel,
    view: V,
    config: Arc<ViewConfig>,
    generation: Generation,
    next_result_id: u64,
    filter: StaleResultFilter,
    states: RowStates,
    icon_cache: LruCache<ItemIdentity, IconPayload>,
    thumbnail_cache: LruCache<ItemIdentity, Thumbnail>,
}

impl<V: ViewSink, S: JobSink> ViewBinder<V, S> {
    /// `results` must be the channel whose poster the workers behind `sink` post to.
    pub fn new(
        registry: ItemRegistry,
        sink: S,
        results: ResultChannel,
        view: V,
        config: Arc<ViewConfig>,
    ) -> Self {
        Self {
            registry,
            sink,
            results,
            view,
            config,
            generation: Generation::default(),
            next_result_id: 0,
            filter: StaleResultFilter::new(),
            states: RowStates::default(),
            icon_cache: LruCache::new(CacheCaps::ICONS),
            thumbnail_cache: LruCache::new(CacheCaps::THUMBNAILS),
        }
    }

    pub fn with_cache_caps(mut self, icons: usize, thumbnails: usize) -> Self {
        self.icon_cache = LruCache::new(icons);
        self.thumbnail_cache = LruCache::new(thumbnails);
        self
    }

    // ---- item lifecycle ----

    pub fn insert_item(&mut self, item: Item) -> InternalIndex {
        self.registry.insert(item)
    }

    pub fn insert_item_at(&mut self, row: usize, item: Item) -> InternalIndex {
        self.registry.insert_at_row(row, item)
    }

    /// Remove an item. Results still in flight for it are discarded on arrival.
    pub fn remove_item(&mut self, index: InternalIndex) -> Result<Item, EnrichError> {
        let item = self.registry.remove(index)?;
        self.filter.forget_index(index);
        self.states.forget_index(index);
        Ok(item)
    }

    /// Replace an item's data (rename, attribute change). Every kind of the row goes back to
    /// `Unknown` and cached icon/thumbnail of the old identity are dropped.
    pub fn update_item(&mut self, index: InternalIndex, item: Item) -> Result<(), EnrichError> {
        let old = self.registry.replace(index, item)?;
        self.icon_cache.remove(&old.identity);
        self.thumbnail_cache.remove(&old.identity);
        self.filter.forget_index(index);
        self.states.forget_index(index);
        Ok(())
    }

    /// Clear the view (e.g. navigating to another folder) and start a new generation.
    /// Caches survive; they are keyed by identity, not by index.
    pub fn reset_view(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.registry.clear();
        self.filter.clear();
        self.states.clear();
        debug!("view reset to generation {}", self.generation.0);
        self.generation
    }

    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        self.registry.sort_rows_by(compare);
    }

    /// Swap the configuration. Column and info-tip values are formatted with it, so those pairs
    /// are reset and anything in flight for them is discarded.
    pub fn set_config(&mut self, config: Arc<ViewConfig>) {
        let thumbnails_changed = config.thumbnail_size != self.config.thumbnail_size;
        self.config = config;
        let affected = |kind: JobKind| {
            matches!(kind, JobKind::Column(_) | JobKind::InfoTip)
                || (thumbnails_changed && kind == JobKind::Thumbnail)
        };
        self.filter.forget_kinds(affected);
        self.states.forget_kinds(affected);
        if thumbnails_changed {
            self.thumbnail_cache.clear();
        }
    }

    // ---- requests ----

    /// The view painted `row` without a value for `kind`.
    pub fn on_row_needs_enrichment(
        &mut self,
        row: usize,
        kind: JobKind,
    ) -> Result<NeedOutcome, EnrichError> {
        self.request(row, kind, None)
    }

    /// The view wants an info tip for `row`. `existing_text` (e.g. a truncated name) is kept as
    /// the first line of the tip.
    pub fn on_info_tip_needed(
        &mut self,
        row: usize,
        existing_text: Option<&str>,
    ) -> Result<NeedOutcome, EnrichError> {
        self.request(row, JobKind::InfoTip, existing_text)
    }

    fn request(
        &mut self,
        row: usize,
        kind: JobKind,
        existing_text: Option<&str>,
    ) -> Result<NeedOutcome, EnrichError> {
        if kind == JobKind::InfoTip && !self.config.show_info_tips {
            return Ok(NeedOutcome::Disabled);
        }
        let index = self.registry.index_at_row(row)?;
        match self.states.get(index, kind) {
            // A job that ended without posting (failed lookup) no longer blocks a retry.
            RowState::Requested(id) if self.sink.is_live(id) => {
                return Ok(NeedOutcome::Pending(id));
            }
            RowState::Applied => return Ok(NeedOutcome::AlreadyApplied),
            RowState::Requested(_) | RowState::Unknown | RowState::Discarded => {}
        }
        if self.apply_cached(index, row, kind)? {
            return Ok(NeedOutcome::Cached);
        }
        self.submit(index, kind, existing_text.map(str::to_string))
            .map(NeedOutcome::Submitted)
    }

    /// Paint from the caches. Returns true when nothing is left to fetch. A cached icon is painted
    /// without its overlay; the overlay only comes with a fresh lookup.
    fn apply_cached(
        &mut self,
        index: InternalIndex,
        row: usize,
        kind: JobKind,
    ) -> Result<bool, EnrichError> {
        let identity = self.registry.get(index)?.identity.clone();
        let hit = match kind {
            JobKind::Icon => match self.icon_cache.get(&identity) {
                Some(icon) => {
                    self.view.apply_icon(row, &icon.without_overlay());
                    icon.overlay.is_none()
                }
                None => false,
            },
            JobKind::Thumbnail => match self.thumbnail_cache.get(&identity) {
                Some(thumb) => {
                    self.view.apply_thumbnail(row, thumb);
                    true
                }
                None => false,
            },
            JobKind::Column(_) | JobKind::InfoTip => false,
        };
        if hit {
            self.states.set(index, kind, RowState::Applied);
        }
        Ok(hit)
    }

    fn submit(
        &mut self,
        index: InternalIndex,
        kind: JobKind,
        existing_text: Option<String>,
    ) -> Result<ResultId, EnrichError> {
        let item = self.registry.get(index)?.clone();
        let result_id = ResultId(self.next_result_id);
        self.next_result_id += 1;

        let job = EnrichmentJob {
            kind,
            target_index: index,
            result_id,
            generation: self.generation,
            item,
            config: Arc::clone(&self.config),
            existing_text,
        };
        let outcome = self.sink.submit(job)?;

        self.filter.record_submission(index, kind, result_id);
        self.states.set(index, kind, RowState::Requested(result_id));
        if let Some(displaced) = outcome.displaced {
            self.on_displaced(displaced);
        }
        Ok(result_id)
    }

    /// A queued job will never run. If it was the newest for its pair, let the next paint ask
    /// again.
    fn on_displaced(&mut self, displaced: Displaced) {
        let Displaced {
            target_index,
            kind,
            result_id,
        } = displaced;
        if self.filter.is_latest(target_index, kind, result_id) {
            self.states.set(target_index, kind, RowState::Discarded);
        }
    }

    // ---- results ----

    /// Drain the result channel and apply whatever is still current.
    pub fn on_results_ready(&mut self) -> DrainReport {
        let mut report = DrainReport::default();
        for result in self.results.drain() {
            if self.accept(result) {
                report.applied += 1;
            } else {
                report.discarded += 1;
            }
        }
        report
    }

    /// Wait up to `timeout` for a wake-up, then drain. Returns an empty report on timeout.
    pub fn wait_and_apply(&mut self, timeout: Duration) -> DrainReport {
        if self.results.wait_for_wake(timeout) {
            self.on_results_ready()
        } else {
            DrainReport::default()
        }
    }

    fn accept(&mut self, result: EnrichResult) -> bool {
        if let Some(reason) = self
            .filter
            .staleness(&result, self.generation, &self.registry)
        {
            debug!(
                "discarding {:?} for #{} ({:?}): {:?}",
                result.result_id, result.target_index, result.kind, reason
            );
            return false;
        }
        let Some(row) = self.registry.locate_row_for(result.target_index) else {
            self.states
                .set(result.target_index, result.kind, RowState::Discarded);
            return false;
        };

        match &result.payload {
            Payload::Icon(icon) => {
                self.view.apply_icon(row, icon);
                self.icon_cache.insert(result.identity.clone(), *icon);
            }
            Payload::Thumbnail(thumb) => {
                self.view.apply_thumbnail(row, thumb);
                self.thumbnail_cache
                    .insert(result.identity.clone(), thumb.clone());
            }
            Payload::ColumnText(text) => match result.kind {
                JobKind::Column(column) => self.view.apply_column_text(row, column, text),
                other => {
                    debug!("column text for {:?} job; ignoring", other);
                    return false;
                }
            },
            Payload::InfoTip(text) => self.view.apply_info_tip(row, text),
        }
        self.states
            .set(result.target_index, result.kind, RowState::Applied);
        true
    }

    // ---- queries ----

    /// Icon to paint right now: the cached one without overlay, or the folder/file default.
    pub fn display_icon(&self, row: usize) -> Result<IconPayload, EnrichError> {
        let item = self.registry.get(self.registry.index_at_row(row)?)?;
        if let Some(icon) = self.icon_cache.peek(&item.identity) {
            return Ok(icon.without_overlay());
        }
        Ok(IconPayload::plain(if item.is_dir() {
            DefaultIcons::FOLDER
        } else {
            DefaultIcons::FILE
        }))
    }

    /// Cached thumbnail for `row`, if any. Without one the row shows its icon.
    pub fn display_thumbnail(&self, row: usize) -> Result<Option<&Thumbnail>, EnrichError> {
        let item = self.registry.get(self.registry.index_at_row(row)?)?;
        Ok(self.thumbnail_cache.peek(&item.identity))
    }

    pub fn row_state(&self, row: usize, kind: JobKind) -> Result<RowState, EnrichError> {
        let index = self.registry.index_at_row(row)?;
        Ok(self.states.get(index, kind))
    }

    pub fn state_of(&self, index: InternalIndex, kind: JobKind) -> RowState {
        self.states.get(index, kind)
    }

    /// Pairs still waiting for a result.
    pub fn pending(&self) -> usize {
        self.states.pending()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn results(&self) -> &ResultChannel {
        &self.results
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &Arc<ViewConfig> {
        &self.config
    }

    /// Take the parts back (e.g. to shut the pool down).
    pub fn into_parts(self) -> (ItemRegistry, S, V) {
        (self.registry, self.sink, self.view)
    }
}
