//! Load `.shellview.toml` from the browsed directory (CLI only). Library callers pass
//! [`ViewConfig`] and [`PoolConfig`] directly.

use serde::Deserialize;
use std::path::Path;

use crate::engine::arg_parser::ViewMode;
use crate::opts::{InfoTipType, PoolConfig, SizeDisplay, ViewConfig};
use crate::types::{ColumnType, TaskLane};
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsToml {
    #[serde(default)]
    pub(crate) view: ViewSection,
    #[serde(default)]
    pub(crate) workers: WorkersSection,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewSection {
    pub(crate) mode: Option<ViewMode>,
    pub(crate) columns: Option<Vec<ColumnType>>,
    show_info_tips: Option<bool>,
    info_tip_type: Option<InfoTipType>,
    friendly_dates: Option<bool>,
    show_extensions: Option<bool>,
    size_display: Option<SizeDisplay>,
    thumbnail_size: Option<u32>,
    date_format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WorkersSection {
    icon_threads: Option<usize>,
    thumbnail_threads: Option<usize>,
    column_threads: Option<usize>,
    icon_cache: Option<usize>,
    thumbnail_cache: Option<usize>,
}

/// Load the settings file from `dir` if present. Returns None if missing, unreadable or malformed
/// (the latter logged as a warning).
pub fn load_settings_toml(dir: &Path) -> Option<SettingsToml> {
    let path = dir.join(PackagePaths::get().settings_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite a field from the file when present.
macro_rules! apply_file_opt {
    ($section:expr, $target:expr, $section_field:ident => $target_field:ident) => {
        if let Some(v) = $section.$section_field.clone() {
            $target.$target_field = v;
        }
    };
}

/// Apply file values (only those present). Call before applying CLI flags.
pub fn apply_settings_to_config(file: &SettingsToml, view: &mut ViewConfig, pool: &mut PoolConfig) {
    let v = &file.view;
    apply_file_opt!(v, view, show_info_tips => show_info_tips);
    apply_file_opt!(v, view, info_tip_type => info_tip_type);
    apply_file_opt!(v, view, friendly_dates => show_friendly_dates);
    apply_file_opt!(v, view, show_extensions => show_extensions);
    apply_file_opt!(v, view, size_display => size_display);
    apply_file_opt!(v, view, thumbnail_size => thumbnail_size);
    apply_file_opt!(v, view, date_format => date_format);

    let w = &file.workers;
    for (lane, threads) in [
        (TaskLane::Icon, w.icon_threads),
        (TaskLane::Thumbnail, w.thumbnail_threads),
        (TaskLane::Column, w.column_threads),
    ] {
        if let Some(n) = threads {
            pool.lane_mut(lane).threads = n.max(1);
        }
    }
    apply_file_opt!(w, pool, icon_cache => icon_cache_cap);
    apply_file_opt!(w, pool, thumbnail_cache => thumbnail_cache_cap);
}

impl SettingsToml {
    /// Parse settings from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        self.view.mode
    }

    pub fn columns(&self) -> Option<&[ColumnType]> {
        self.view.columns.as_deref()
    }
}
