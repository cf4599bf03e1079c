//! Column and info-tip text built from an item snapshot and the view configuration.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::opts::{SizeDisplay, ViewConfig};
use crate::types::{ColumnType, Item};

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Label in front of the modification time in date-style info tips.
pub const DATE_MODIFIED_LABEL: &str = "Date modified";

/// Size text. Directories get an empty string.
pub fn format_size(item: &Item, display: SizeDisplay) -> String {
    if item.is_dir() {
        return String::new();
    }
    match display {
        SizeDisplay::Bytes => format!("{} bytes", group_thousands(item.size)),
        SizeDisplay::Auto => format_size_auto(item.size),
    }
}

fn format_size_auto(size: u64) -> String {
    if size < 1024 {
        return format!("{size} bytes");
    }
    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, SIZE_UNITS[unit])
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Timestamp text. Friendly mode renders today's and yesterday's times as "Today, HH:MM" and
/// "Yesterday, HH:MM"; everything else uses `date_format`.
pub fn format_timestamp<Tz>(
    time: &DateTime<Tz>,
    now: &DateTime<Tz>,
    friendly: bool,
    date_format: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if friendly {
        let day = time.date_naive();
        let today = now.date_naive();
        if day == today {
            return format!("Today, {}", time.format("%H:%M"));
        }
        if today.pred_opt() == Some(day) {
            return format!("Yesterday, {}", time.format("%H:%M"));
        }
    }
    time.format(date_format).to_string()
}

/// Name as shown in the Name column. Extensions are hidden for files when configured.
pub fn display_name(item: &Item, show_extensions: bool) -> String {
    if show_extensions || item.is_dir() {
        return item.display_name.clone();
    }
    match item.display_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => item.display_name.clone(),
    }
}

/// Extension without the dot, empty for directories and extension-less files.
pub fn extension(item: &Item) -> String {
    if item.is_dir() {
        return String::new();
    }
    item.parsing_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Text for the columns that can be built from the snapshot alone.
///
/// Returns `None` for columns that have to come from the shell service (e.g. Type), and for a
/// date column when the item has no modification time.
pub fn column_text<Tz>(
    item: &Item,
    column: ColumnType,
    config: &ViewConfig,
    now: &DateTime<Tz>,
) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match column {
        ColumnType::Name => Some(display_name(item, config.show_extensions)),
        ColumnType::Size => Some(format_size(item, config.size_display)),
        ColumnType::DateModified => item.last_write_time.map(|t| {
            let local = t.with_timezone(&now.timezone());
            format_timestamp(&local, now, config.show_friendly_dates, &config.date_format)
        }),
        ColumnType::Attributes => Some(item.attributes.flag_string()),
        ColumnType::Extension => Some(extension(item)),
        ColumnType::Type => None,
    }
}

/// "Date modified: ..." info tip. `None` when the item has no modification time.
pub fn modified_info_tip<Tz>(item: &Item, config: &ViewConfig, now: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = item.last_write_time?.with_timezone(&now.timezone());
    Some(format!(
        "{}: {}",
        DATE_MODIFIED_LABEL,
        format_timestamp(&time, now, config.show_friendly_dates, &config.date_format)
    ))
}

/// Prepend text the view already showed (e.g. a truncated name) to a fetched info tip.
pub fn join_info_tip(existing: Option<&str>, tip: String) -> String {
    match existing {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}\n{tip}"),
        _ => tip,
    }
}
