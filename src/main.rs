//! Shellview CLI: list a directory and fill icons, thumbnails, columns and info tips in the
//! background.

use anyhow::Result;
use clap::Parser;
use shellview::engine::arg_parser::Cli;
use shellview::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
