//! Boundary to the shell metadata service.
//!
//! The core only calls these from worker threads, with identities copied out of item snapshots.

pub mod format;
pub mod fs;

pub use fs::{FsMetadataService, read_item};

use crate::error::LookupError;
use crate::types::{ColumnType, IconPayload, ItemIdentity, Thumbnail};

/// Per-item metadata lookups. Implementations must be callable from several threads at once.
pub trait MetadataService: Send + Sync {
    fn fetch_icon(&self, identity: &ItemIdentity) -> Result<IconPayload, LookupError>;

    /// Thumbnail no larger than `size` x `size`.
    fn fetch_thumbnail(&self, identity: &ItemIdentity, size: u32)
    -> Result<Thumbnail, LookupError>;

    fn fetch_column_value(
        &self,
        identity: &ItemIdentity,
        column: ColumnType,
    ) -> Result<String, LookupError>;

    fn fetch_info_tip(&self, identity: &ItemIdentity) -> Result<String, LookupError>;
}
