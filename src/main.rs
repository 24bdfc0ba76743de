//! Command-line entry point for eggnog-arff.
//!
//! Converts one eggNOG-mapper annotation table into an ARFF file, or several
//! tables into one ARFF with a row per sample.

use anyhow::Result;
use clap::Parser;
use log::info;
use simple_logger::init_with_level;

mod cli;
use cli::{Args, Job};

fn main() -> Result<()> {
    let start = std::time::Instant::now();
    let args = Args::parse();
    init_with_level(args.log_level())?;

    let stats = match args.job()? {
        Job::Single(cfg) => eggnog_arff::convert_file(&cfg)?,
        Job::Batch(cfg) => eggnog_arff::convert_batch(&cfg)?,
    };
    stats.log_summary();

    info!("Elapsed time: {:?}", start.elapsed());
    Ok(())
}
