//! CLI command handler: list a directory, enrich every row in the background, print the result.

use anyhow::Result;
use kdam::Animation;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::binder::{NeedOutcome, ViewBinder, ViewSink};
use crate::engine::arg_parser::{Cli, ViewMode};
use crate::engine::listing::{explorer_order, list_dir};
use crate::engine::progress::{
    ProgressBar, ProgressBarConfig, create_progress_bar, refresh_bar, update_progress_bar,
};
use crate::engine::table::TableView;
use crate::opts::{InfoTipType, PoolConfig, ViewConfig};
use crate::service::FsMetadataService;
use crate::types::{ColumnType, JobKind};
use crate::utils::config::{DEFAULT_SETTLE_TIMEOUT_SECS, WAKE_POLL_INTERVAL};
use crate::utils::{apply_settings_to_config, load_settings_toml, setup_logging};

/// Default details columns when neither the CLI nor the settings file names any.
const DEFAULT_COLUMNS: [ColumnType; 4] = [
    ColumnType::Name,
    ColumnType::Type,
    ColumnType::Size,
    ColumnType::DateModified,
];

/// Everything the run needs, merged from defaults, the settings file and CLI flags.
#[derive(Clone, Debug)]
pub struct RunOpts {
    pub dir: PathBuf,
    pub mode: ViewMode,
    pub columns: Vec<ColumnType>,
    pub view: ViewConfig,
    pub pool: PoolConfig,
    pub exclude: Vec<String>,
    pub show_hidden: bool,
    pub json: bool,
    pub timeout: Duration,
    pub verbose: bool,
}

/// Build run options: defaults, then `.shellview.toml` in DIR, then CLI flags.
pub fn setup_opts(cli: &Cli) -> RunOpts {
    let mut view = ViewConfig::default();
    let mut pool = PoolConfig::tuned();
    let mut mode = ViewMode::default();
    let mut columns = DEFAULT_COLUMNS.to_vec();

    if let Some(file) = load_settings_toml(&cli.dir) {
        apply_settings_to_config(&file, &mut view, &mut pool);
        if let Some(m) = file.view_mode() {
            mode = m;
        }
        if let Some(c) = file.columns() {
            columns = c.to_vec();
        }
    }

    if let Some(m) = cli.view {
        mode = m;
    }
    if !cli.columns.is_empty() {
        columns = cli.columns.clone();
    }
    if let Some(v) = cli.info_tips {
        view.show_info_tips = v;
    }
    if let Some(v) = cli.date_info_tips {
        view.info_tip_type = if v {
            InfoTipType::ModifiedDate
        } else {
            InfoTipType::System
        };
    }
    if let Some(size) = cli.thumb_size {
        view.thumbnail_size = size;
    }
    if let Some(v) = cli.friendly_dates {
        view.show_friendly_dates = v;
    }
    if let Some(f) = &cli.date_format {
        view.date_format = f.clone();
    }
    if let Some(v) = cli.hide_extensions {
        view.show_extensions = !v;
    }

    RunOpts {
        dir: cli.dir.clone(),
        mode,
        columns,
        view,
        pool,
        exclude: cli.exclude.clone(),
        show_hidden: cli.show_hidden.unwrap_or(false),
        json: cli.json.unwrap_or(false),
        timeout: Duration::from_secs(cli.timeout.unwrap_or(DEFAULT_SETTLE_TIMEOUT_SECS)),
        verbose: cli.verbose.unwrap_or(false),
    }
}

/// Kinds a row asks for in `mode`. A listing has no hover, so info tips are fetched up front only
/// when `info_tips` is set.
pub fn kinds_for_mode(mode: ViewMode, columns: &[ColumnType], info_tips: bool) -> Vec<JobKind> {
    let mut kinds = vec![JobKind::Icon];
    match mode {
        ViewMode::Icons => {}
        ViewMode::Details => kinds.extend(columns.iter().map(|&c| JobKind::Column(c))),
        ViewMode::Thumbnails => kinds.push(JobKind::Thumbnail),
    }
    if info_tips {
        kinds.push(JobKind::InfoTip);
    }
    kinds
}

/// Run the listing. Prints a table (or JSON) to stdout.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose.unwrap_or(false));
    let opts = setup_opts(cli);
    let want_info_tips = cli.info_tips.unwrap_or(false);

    let items = list_dir(&opts.dir, &opts.exclude, opts.show_hidden)?;
    debug!("Listing {} items in {:?} view", items.len(), opts.mode);

    let mut binder = crate::start_view(
        FsMetadataService::shared(),
        TableView::new(),
        opts.view.clone(),
        &opts.pool,
    );
    for item in items {
        binder.insert_item(item);
    }
    binder.sort_rows_by(explorer_order);

    let rows: Vec<(String, bool)> = binder
        .registry()
        .iter_rows()
        .map(|(_, item)| (item.display_name.clone(), item.is_dir()))
        .collect();
    binder.view_mut().reset(rows);

    let kinds = kinds_for_mode(opts.mode, &opts.columns, want_info_tips);
    let submitted = request_all(&mut binder, &kinds)?;

    let bar = opts.verbose.then(|| {
        create_progress_bar(ProgressBarConfig::new(
            submitted,
            "Enriching",
            Animation::Classic,
        ))
    });
    let settled = settle(&mut binder, opts.timeout, bar.as_ref());
    if let Some(bar) = &bar {
        refresh_bar(bar);
        eprintln!();
    }
    if !settled {
        warn!(
            "Background lookups did not settle within {:?}; showing what arrived",
            opts.timeout
        );
    }

    let (_, pool, view) = binder.into_parts();
    pool.shutdown()?;

    if opts.json {
        println!("{}", view.to_json()?);
    } else {
        print!("{}", view.render(opts.mode, &opts.columns));
    }
    Ok(())
}

/// Paint every row: placeholder icon now, then ask for each kind. Returns the number of jobs
/// queued.
fn request_all(binder: &mut ViewBinder<TableView>, kinds: &[JobKind]) -> Result<usize> {
    let mut submitted = 0;
    for row in 0..binder.registry().len() {
        let icon = binder.display_icon(row)?;
        binder.view_mut().apply_icon(row, &icon);
        for &kind in kinds {
            if let NeedOutcome::Submitted(_) = binder.on_row_needs_enrichment(row, kind)? {
                submitted += 1;
            }
        }
    }
    Ok(submitted)
}

/// Pump wake-ups until the pool is idle and the channel is empty, or `timeout` passes.
/// Returns false on timeout.
fn settle(
    binder: &mut ViewBinder<TableView>,
    timeout: Duration,
    bar: Option<&ProgressBar>,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        let report = binder.wait_and_apply(WAKE_POLL_INTERVAL);
        if let Some(bar) = bar {
            update_progress_bar(bar, report.total());
        }
        if binder.sink().is_idle() {
            // Workers post before they count themselves done, so whatever is left is in the
            // channel now.
            let report = binder.on_results_ready();
            if let Some(bar) = bar {
                update_progress_bar(bar, report.total());
            }
            let stats = binder.sink().stats();
            debug!(
                "settled: {} completed, {} failed, {} rows still waiting",
                stats.completed,
                stats.failed,
                binder.pending()
            );
            return true;
        }
    }
    false
}
