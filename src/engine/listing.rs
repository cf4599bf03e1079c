//! One-level directory listing into items.

use anyhow::{Context, Result};
use log::{debug, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::service::read_item;
use crate::types::{Item, ItemAttributes};
use crate::utils::config::PackagePaths;

use super::tools::should_list;

/// List the direct children of `dir`. Metadata is read in parallel; entries that can't be read
/// are skipped with a warning. Hidden items are kept only when `show_hidden` is set.
pub fn list_dir(dir: &Path, exclude: &[String], show_hidden: bool) -> Result<Vec<Item>> {
    let root = dir.canonicalize().context("canonicalize directory")?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut patterns = PackagePaths::get().default_exclude_patterns();
    patterns.extend(exclude.iter().cloned());

    let paths: Vec<PathBuf> = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|r| match r {
            Ok(entry) => Some(entry.into_path()),
            Err(err) => {
                warn!("Permission denied or error accessing path: {}", err);
                None
            }
        })
        .filter(|p| should_list(p, &patterns))
        .collect();

    let items: Vec<Item> = paths
        .par_iter()
        .filter_map(|p| {
            read_item(p)
                .map_err(|e| warn!("Skipping {}: {}", p.display(), e))
                .ok()
        })
        .filter(|item| show_hidden || !item.attributes.contains(ItemAttributes::HIDDEN))
        .collect();

    debug!("listed {} of {} entries in {}", items.len(), paths.len(), root.display());
    Ok(items)
}

/// Explorer order: folders first, then case-insensitive name.
pub fn explorer_order(a: &Item, b: &Item) -> std::cmp::Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        })
}
