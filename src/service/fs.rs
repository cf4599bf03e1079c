//! Metadata service backed by the local filesystem.
//!
//! Icons are indices into a per-process image list that grows one slot per file extension.
//! Thumbnails are decoded with `image`; anything it can't decode has no thumbnail.

use chrono::{DateTime, Local, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::MetadataService;
use super::format::{DATE_MODIFIED_LABEL, format_size, format_timestamp};
use crate::error::LookupError;
use crate::opts::SizeDisplay;
use crate::types::{ColumnType, IconPayload, Item, ItemAttributes, ItemIdentity, Thumbnail};
use crate::utils::config::{DEFAULT_DATE_FORMAT, DefaultIcons};

/// First image-list slot handed to a file extension.
const FIRST_EXTENSION_ICON: u32 = 10;

/// Read `path` into an [`Item`]. Links are described by their own metadata; the directory flag
/// follows the link target.
pub fn read_item(path: &Path) -> Result<Item, LookupError> {
    let io_err = |e| LookupError::Io(e, path.to_path_buf());
    let link_meta = std::fs::symlink_metadata(path).map_err(io_err)?;
    let meta = if link_meta.file_type().is_symlink() {
        std::fs::metadata(path).unwrap_or_else(|_| link_meta.clone())
    } else {
        link_meta.clone()
    };

    let mut attributes = ItemAttributes::empty();
    if meta.is_dir() {
        attributes |= ItemAttributes::DIRECTORY;
    }
    if link_meta.file_type().is_symlink() {
        attributes |= ItemAttributes::LINK;
    }
    if is_hidden(path, &meta) {
        attributes |= ItemAttributes::HIDDEN;
    }

    let size = if meta.is_dir() { 0 } else { meta.len() };
    let last_write_time = meta.modified().ok().map(DateTime::<Utc>::from);
    Ok(Item::new(path, attributes, size, last_write_time))
}

#[cfg(windows)]
fn is_hidden(_path: &Path, meta: &std::fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(path: &Path, _meta: &std::fs::Metadata) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Human-readable type, Explorer style ("File folder", "PNG File").
pub fn type_description(item: &Item) -> String {
    if item.is_dir() {
        return "File folder".to_string();
    }
    match item.parsing_path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{} File", ext.to_uppercase()),
        _ => "File".to_string(),
    }
}

#[derive(Default)]
pub struct FsMetadataService {
    extension_icons: Mutex<HashMap<String, u32>>,
}

impl FsMetadataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn MetadataService> {
        Arc::new(Self::new())
    }

    fn icon_for_extension(&self, ext: &str) -> u32 {
        let mut icons = self.extension_icons.lock().unwrap();
        let next = FIRST_EXTENSION_ICON + icons.len() as u32;
        *icons.entry(ext.to_lowercase()).or_insert(next)
    }
}

impl MetadataService for FsMetadataService {
    fn fetch_icon(&self, identity: &ItemIdentity) -> Result<IconPayload, LookupError> {
        let item = read_item(identity.as_path())?;
        let index = if item.is_dir() {
            DefaultIcons::FOLDER
        } else {
            match item.parsing_path.extension().and_then(|e| e.to_str()) {
                Some(ext) if !ext.is_empty() => self.icon_for_extension(ext),
                _ => DefaultIcons::FILE,
            }
        };
        let overlay = item
            .attributes
            .contains(ItemAttributes::LINK)
            .then_some(DefaultIcons::LINK_OVERLAY);
        Ok(IconPayload { index, overlay })
    }

    fn fetch_thumbnail(
        &self,
        identity: &ItemIdentity,
        size: u32,
    ) -> Result<Thumbnail, LookupError> {
        let path = identity.as_path();
        if path.is_dir() {
            return Err(LookupError::Unsupported {
                what: "thumbnail",
                path: path.to_path_buf(),
            });
        }
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => LookupError::Io(io, path.to_path_buf()),
            other => LookupError::Decode {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        let rgba = img.thumbnail(size, size).to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Thumbnail {
            width,
            height,
            rgba: Arc::from(rgba.into_raw()),
        })
    }

    fn fetch_column_value(
        &self,
        identity: &ItemIdentity,
        column: ColumnType,
    ) -> Result<String, LookupError> {
        match column {
            ColumnType::Type => Ok(type_description(&read_item(identity.as_path())?)),
            _ => Err(LookupError::Unsupported {
                what: column.header(),
                path: identity.as_path().to_path_buf(),
            }),
        }
    }

    fn fetch_info_tip(&self, identity: &ItemIdentity) -> Result<String, LookupError> {
        let item = read_item(identity.as_path())?;
        let mut lines = vec![format!("Type: {}", type_description(&item))];
        if !item.is_dir() {
            lines.push(format!("Size: {}", format_size(&item, SizeDisplay::Auto)));
        }
        if let Some(t) = item.last_write_time {
            let now = Local::now();
            let local = t.with_timezone(&Local);
            lines.push(format!(
                "{}: {}",
                DATE_MODIFIED_LABEL,
                format_timestamp(&local, &now, false, DEFAULT_DATE_FORMAT)
            ));
        }
        Ok(lines.join("\n"))
    }
}
