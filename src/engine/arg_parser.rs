use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::ColumnType;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// How the listing is presented; decides which kinds each row asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Icons,
    #[default]
    Details,
    Thumbnails,
}

/// Parse a column name as used on the command line (`name`, `type`, `size`, `date-modified`, ...).
pub fn parse_column(s: &str) -> Result<ColumnType, String> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "name" => Ok(ColumnType::Name),
        "type" => Ok(ColumnType::Type),
        "size" => Ok(ColumnType::Size),
        "date_modified" | "modified" | "date" => Ok(ColumnType::DateModified),
        "attributes" | "attrs" => Ok(ColumnType::Attributes),
        "extension" | "ext" => Ok(ColumnType::Extension),
        other => Err(format!("unknown column '{other}'")),
    }
}

/// List a directory and fill icons, thumbnails, columns and info tips in the background.
#[derive(Clone, Parser)]
#[command(name = "shellview")]
#[command(about = "List a directory; icons, thumbnails, columns and tips load on worker threads.")]
pub struct Cli {
    /// Directory to list. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// View mode. Default: details.
    #[arg(long, value_enum)]
    pub view: Option<ViewMode>,

    /// Columns for details view, comma separated
    /// (name,type,size,date-modified,attributes,extension).
    #[arg(long, short = 'C', value_delimiter = ',', value_parser = parse_column)]
    pub columns: Vec<ColumnType>,

    /// Fetch info tips for every row.
    #[arg(
        long,
        short = 'i',
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub info_tips: Option<bool>,

    /// Info tip source: ask the shell, or show the modification date only.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub date_info_tips: Option<bool>,

    /// Thumbnail edge in pixels.
    #[arg(long, short = 't', value_parser = clap::value_parser!(u32))]
    pub thumb_size: Option<u32>,

    /// Show "Today, 10:42" style dates.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub friendly_dates: Option<bool>,

    /// Date format (strftime) when friendly dates are off.
    #[arg(long)]
    pub date_format: Option<String>,

    /// Hide file extensions in the Name column.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub hide_extensions: Option<bool>,

    /// Include hidden items.
    #[arg(
        long,
        short = 'a',
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub show_hidden: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Print rows as JSON instead of a table.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub json: Option<bool>,

    /// Seconds to wait for background lookups to settle.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Verbose output.
    #[arg(
        long,
        short = 'v',
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub verbose: Option<bool>,
}
