//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    settings_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                settings_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory settings file (e.g. `.shellview.toml`).
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Names never listed: our own settings file.
    pub fn default_exclude_patterns(&self) -> Vec<String> {
        vec![self.settings_filename().to_string()]
    }
}

// ---- Worker lanes ----

/// Thread limits per worker lane.
/// Use [`LaneThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct LaneThreadLimits {
    /// Available threads (from rayon); set by [`LaneThreadLimits::current()`].
    pub all_threads: usize,
    pub icon_max: usize,
    pub thumbnail_max: usize,
    pub column_max: usize,
    /// Info tips are requested one at a time on hover.
    pub info_tip: usize,
}

impl Default for LaneThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            icon_max: Self::ICON_MAX_THREADS,
            thumbnail_max: Self::THUMBNAIL_MAX_THREADS,
            column_max: Self::COLUMN_MAX_THREADS,
            info_tip: Self::INFO_TIP_THREADS,
        }
    }
}

impl LaneThreadLimits {
    pub const ICON_MAX_THREADS: usize = 4;
    pub const THUMBNAIL_MAX_THREADS: usize = 4;
    pub const COLUMN_MAX_THREADS: usize = 2;
    pub const INFO_TIP_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Effective count for a lane: its max, capped by available threads, at least 1.
    pub fn capped(&self, max: usize) -> usize {
        match self.all_threads {
            0 => max.max(1),
            all => max.min(all).max(1),
        }
    }
}

// ---- Queues ----

/// Per-lane queue capacity. When full, the oldest queued job is dropped.
pub struct QueueCaps;

impl QueueCaps {
    pub const ICON: usize = 1_000;
    pub const THUMBNAIL: usize = 256;
    pub const COLUMN: usize = 4_000;
    pub const INFO_TIP: usize = 16;
}

// ---- Caches ----

/// Capacity of the identity-keyed caches kept by the binder.
pub struct CacheCaps;

impl CacheCaps {
    pub const ICONS: usize = 1_000;
    pub const THUMBNAILS: usize = 200;
}

// ---- View defaults ----

/// Default thumbnail edge in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 120;

/// Default strftime format for dates when friendly dates are off.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Icon indices handed out by the filesystem service for folders and files without a known type.
pub struct DefaultIcons;

impl DefaultIcons {
    pub const FOLDER: u32 = 3;
    pub const FILE: u32 = 0;
    /// Overlay slot used for links.
    pub const LINK_OVERLAY: u8 = 2;
}

// ---- CLI pumping ----

/// How long the CLI waits for a wake-up before re-checking pool state.
pub const WAKE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default overall timeout (seconds) for the CLI to wait for enrichment to settle.
pub const DEFAULT_SETTLE_TIMEOUT_SECS: u64 = 30;
