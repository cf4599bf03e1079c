//! CLI engine: argument parsing, listing, rendering

pub mod arg_parser;
pub mod cli;
pub mod listing;
pub mod progress;
pub mod table;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, ViewMode, parse_column};
pub use cli::{RunOpts, handle_run, kinds_for_mode, setup_opts};
pub use listing::{explorer_order, list_dir};
pub use table::{RowView, TableView};
pub use tools::{glob_match, is_os_hidden_file, should_list};
