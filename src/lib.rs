//! Shellview: asynchronous icon, thumbnail, column and info-tip enrichment for file list views

pub mod binder;
pub mod engine;
pub mod error;
pub mod opts;
pub mod pipeline;
pub mod registry;
pub mod service;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use binder::{DrainReport, NeedOutcome, RowState, ViewBinder, ViewSink};
pub use error::{EnrichError, LookupError};
pub use opts::*;
pub use pipeline::{ResultChannel, WorkerPool};
pub use registry::ItemRegistry;
pub use service::{FsMetadataService, MetadataService};
pub use types::*;

use log::debug;
use std::sync::Arc;

/// Result alias used by the application layer
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: start a worker pool on `service` and return a binder for `view` with an
/// empty registry.
///
/// Insert items with [`ViewBinder::insert_item`], report painted rows with
/// [`ViewBinder::on_row_needs_enrichment`], and call [`ViewBinder::on_results_ready`] whenever the
/// result channel wakes you (see [`ResultChannel::wait_for_wake`] or
/// [`start_view_with_notifier`]).
pub fn start_view<V: ViewSink>(
    service: Arc<dyn MetadataService>,
    view: V,
    config: ViewConfig,
    pool: &PoolConfig,
) -> ViewBinder<V> {
    build_view(service, view, config, pool, ResultChannel::new())
}

/// Like [`start_view`], but `notify` runs on a worker thread once per burst of results, e.g. to
/// post a message to the UI event loop.
pub fn start_view_with_notifier<V, F>(
    service: Arc<dyn MetadataService>,
    view: V,
    config: ViewConfig,
    pool: &PoolConfig,
    notify: F,
) -> ViewBinder<V>
where
    V: ViewSink,
    F: Fn() + Send + Sync + 'static,
{
    build_view(
        service,
        view,
        config,
        pool,
        ResultChannel::with_notifier(notify),
    )
}

fn build_view<V: ViewSink>(
    service: Arc<dyn MetadataService>,
    view: V,
    config: ViewConfig,
    pool: &PoolConfig,
    results: ResultChannel,
) -> ViewBinder<V> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        config
    );
    let workers = WorkerPool::start(service, results.poster(), pool);
    ViewBinder::new(
        ItemRegistry::new(),
        workers,
        results,
        view,
        Arc::new(config),
    )
    .with_cache_caps(pool.icon_cache_cap, pool.thumbnail_cache_cap)
}
