//! View and pool configuration.
//!
//! [`ViewConfig`] is snapshotted into every job as an `Arc`, so changing it only affects jobs
//! submitted afterwards. [`PoolConfig`] is read once when the pool starts.

use serde::{Deserialize, Serialize};

use crate::types::TaskLane;
use crate::utils::config::{
    CacheCaps, DEFAULT_DATE_FORMAT, DEFAULT_THUMBNAIL_SIZE, LaneThreadLimits, QueueCaps,
};

/// Where info-tip text comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoTipType {
    /// Ask the shell service.
    #[default]
    System,
    /// "Date modified: ..." built from the item snapshot.
    ModifiedDate,
}

/// How the size column is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeDisplay {
    /// Raw byte count with thousands separators.
    Bytes,
    /// KB / MB / GB, one decimal.
    #[default]
    Auto,
}

/// Formatting options read by workers when building column and info-tip text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub show_info_tips: bool,
    pub info_tip_type: InfoTipType,
    /// "Today, 10:42" style dates.
    pub show_friendly_dates: bool,
    /// When false, file names are shown without extension.
    pub show_extensions: bool,
    pub size_display: SizeDisplay,
    /// Thumbnail edge in pixels.
    pub thumbnail_size: u32,
    /// strftime format used when friendly dates are off (and for the time part otherwise).
    pub date_format: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_info_tips: true,
            info_tip_type: InfoTipType::default(),
            show_friendly_dates: true,
            show_extensions: true,
            size_display: SizeDisplay::default(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Threads and queue capacity for one lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneConfig {
    pub threads: usize,
    pub queue_cap: usize,
}

/// Worker pool and cache sizing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub icon: LaneConfig,
    pub thumbnail: LaneConfig,
    pub column: LaneConfig,
    pub info_tip: LaneConfig,
    pub icon_cache_cap: usize,
    pub thumbnail_cache_cap: usize,
}

impl PoolConfig {
    /// Defaults with thread counts capped by the rayon pool size.
    pub fn tuned() -> Self {
        let limits = LaneThreadLimits::current();
        Self {
            icon: LaneConfig {
                threads: limits.capped(limits.icon_max),
                queue_cap: QueueCaps::ICON,
            },
            thumbnail: LaneConfig {
                threads: limits.capped(limits.thumbnail_max),
                queue_cap: QueueCaps::THUMBNAIL,
            },
            column: LaneConfig {
                threads: limits.capped(limits.column_max),
                queue_cap: QueueCaps::COLUMN,
            },
            info_tip: LaneConfig {
                threads: limits.info_tip,
                queue_cap: QueueCaps::INFO_TIP,
            },
            icon_cache_cap: CacheCaps::ICONS,
            thumbnail_cache_cap: CacheCaps::THUMBNAILS,
        }
    }

    pub fn lane(&self, lane: TaskLane) -> LaneConfig {
        match lane {
            TaskLane::Icon => self.icon,
            TaskLane::Thumbnail => self.thumbnail,
            TaskLane::Column => self.column,
            TaskLane::InfoTip => self.info_tip,
        }
    }

    pub fn lane_mut(&mut self, lane: TaskLane) -> &mut LaneConfig {
        match lane {
            TaskLane::Icon => &mut self.icon,
            TaskLane::Thumbnail => &mut self.thumbnail,
            TaskLane::Column => &mut self.column,
            TaskLane::InfoTip => &mut self.info_tip,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::tuned()
    }
}
