//! Public and internal types for the shellview API and pipeline.

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stable identifier of an item in the view. Independent of the row the item is shown in.
pub type InternalIndex = usize;

/// Opaque handle to the underlying shell item, used to ask the metadata service about it.
///
/// Cheap to clone and safe to send to worker threads; two identities compare equal when they
/// refer to the same parsing path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemIdentity(Arc<Path>);

impl ItemIdentity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Arc::from(path.into().into_boxed_path()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

bitflags! {
    /// Attribute flags of an item.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemAttributes: u32 {
        const DIRECTORY = 1 << 0;
        const HIDDEN = 1 << 1;
        const LINK = 1 << 2;
        const STREAM = 1 << 3;
    }
}

impl ItemAttributes {
    /// Fixed-width flag string, e.g. `D-L-`.
    pub fn flag_string(&self) -> String {
        [
            (Self::DIRECTORY, 'D'),
            (Self::HIDDEN, 'H'),
            (Self::LINK, 'L'),
            (Self::STREAM, 'S'),
        ]
        .iter()
        .map(|(flag, c)| if self.contains(*flag) { *c } else { '-' })
        .collect()
    }
}

/// One filesystem entry shown in the view.
///
/// Owned by [`ItemRegistry`](crate::registry::ItemRegistry). Jobs carry a clone of it, never a
/// reference, so workers can run after the item was changed or removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub identity: ItemIdentity,
    pub display_name: String,
    /// Name shown when renaming (always with extension).
    pub editing_name: String,
    pub parsing_path: PathBuf,
    pub attributes: ItemAttributes,
    /// Size in bytes (0 for directories).
    pub size: u64,
    pub last_write_time: Option<DateTime<Utc>>,
}

impl Item {
    /// Build an item for `path` from already-read values. Display and editing names default to the
    /// file name.
    pub fn new(
        path: impl Into<PathBuf>,
        attributes: ItemAttributes,
        size: u64,
        last_write_time: Option<DateTime<Utc>>,
    ) -> Self {
        let parsing_path: PathBuf = path.into();
        let name = parsing_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| parsing_path.display().to_string());
        Self {
            identity: ItemIdentity::new(parsing_path.clone()),
            display_name: name.clone(),
            editing_name: name,
            parsing_path,
            attributes,
            size,
            last_write_time,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.contains(ItemAttributes::DIRECTORY)
    }

    /// High 32 bits of the size.
    pub fn size_high(&self) -> u32 {
        (self.size >> 32) as u32
    }

    /// Low 32 bits of the size.
    pub fn size_low(&self) -> u32 {
        self.size as u32
    }
}

/// Columns the details view can show.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Name,
    Type,
    Size,
    DateModified,
    Attributes,
    Extension,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Name,
        ColumnType::Type,
        ColumnType::Size,
        ColumnType::DateModified,
        ColumnType::Attributes,
        ColumnType::Extension,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ColumnType::Name => "Name",
            ColumnType::Type => "Type",
            ColumnType::Size => "Size",
            ColumnType::DateModified => "Date modified",
            ColumnType::Attributes => "Attributes",
            ColumnType::Extension => "Extension",
        }
    }
}

/// What a job computes for its row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    Icon,
    Thumbnail,
    Column(ColumnType),
    InfoTip,
}

impl JobKind {
    /// Worker lane that executes jobs of this kind.
    pub fn lane(&self) -> TaskLane {
        match self {
            JobKind::Icon => TaskLane::Icon,
            JobKind::Thumbnail => TaskLane::Thumbnail,
            JobKind::Column(_) => TaskLane::Column,
            JobKind::InfoTip => TaskLane::InfoTip,
        }
    }
}

/// Worker lanes. Each lane has its own queue and its own bounded set of threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskLane {
    Icon,
    Thumbnail,
    Column,
    InfoTip,
}

impl TaskLane {
    pub const ALL: [TaskLane; 4] = [
        TaskLane::Icon,
        TaskLane::Thumbnail,
        TaskLane::Column,
        TaskLane::InfoTip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TaskLane::Icon => "icon",
            TaskLane::Thumbnail => "thumbnail",
            TaskLane::Column => "column",
            TaskLane::InfoTip => "infotip",
        }
    }
}

impl fmt::Display for TaskLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Monotonic id handed out per submitted job. Larger means submitted later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultId(pub u64);

/// Version stamp of the view contents. Bumped whenever the view is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Icon from the system image list. `overlay` is the overlay slot (e.g. link arrow), if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IconPayload {
    pub index: u32,
    pub overlay: Option<u8>,
}

impl IconPayload {
    pub fn plain(index: u32) -> Self {
        Self {
            index,
            overlay: None,
        }
    }

    /// Same icon without overlay. Cached icons are shown this way until a fresh lookup lands.
    pub fn without_overlay(self) -> Self {
        Self::plain(self.index)
    }
}

/// RGBA thumbnail bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

/// Computed value carried by a result.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Icon(IconPayload),
    Thumbnail(Thumbnail),
    ColumnText(String),
    InfoTip(String),
}

/// A unit of background work. Owns copies of everything it needs.
#[derive(Clone, Debug)]
pub struct EnrichmentJob {
    pub kind: JobKind,
    pub target_index: InternalIndex,
    pub result_id: ResultId,
    pub generation: Generation,
    /// Snapshot of the item at submission time.
    pub item: Item,
    /// Snapshot of the view configuration at submission time.
    pub config: Arc<crate::ViewConfig>,
    /// Text the view already had for an info tip (e.g. a truncated name). Prepended to the result.
    pub existing_text: Option<String>,
}

/// Completed job, produced by a worker and consumed once by the binder.
#[derive(Clone, Debug)]
pub struct EnrichResult {
    pub result_id: ResultId,
    pub kind: JobKind,
    pub target_index: InternalIndex,
    pub generation: Generation,
    pub identity: ItemIdentity,
    pub payload: Payload,
}
