use anyhow::{Result, bail};
use clap::Parser;
use eggnog_arff::config::{DEFAULT_LABEL, DEFAULT_RELATION};
use eggnog_arff::{ArffOptions, BatchConfig, ConversionConfig};
use log::Level;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "eggnog-arff")]
#[command(about = "Convert eggNOG-mapper annotations into an ARFF feature matrix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        num_args = 1..,
        required_unless_present_any = ["glob", "config"],
        help = "eggNOG-mapper annotation file(s); more than one produces a row per sample"
    )]
    pub files: Vec<PathBuf>,

    #[arg(
        short = 'g',
        long = "glob",
        value_name = "PATTERN",
        help = "Glob pattern of annotation files to convert as a batch"
    )]
    pub glob: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        required_unless_present = "config",
        help = "Output .arff file (compressed when ending in .gz, .zst, .bz2 or .xz)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        conflicts_with_all = [
            "files",
            "glob",
            "output",
            "relation",
            "label",
            "skip_placeholders",
            "stats",
            "threads",
        ],
        help = "JSON conversion config written by a workflow"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "relation",
        value_name = "NAME",
        default_value = DEFAULT_RELATION,
        help = "Relation name and attribute prefix"
    )]
    pub relation: String,

    #[arg(
        long = "label",
        value_name = "NAME",
        default_value = DEFAULT_LABEL,
        help = "Name of the (empty) class attribute"
    )]
    pub label: String,

    #[arg(
        long = "skip-placeholders",
        help = "Do not count genes whose eggNOG_OGs value is empty or '-'"
    )]
    pub skip_placeholders: bool,

    #[arg(
        long = "stats",
        value_name = "PATH",
        help = "Save conversion statistics as JSON"
    )]
    pub stats: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads for batch reads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,

    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Job {
    Single(ConversionConfig),
    Batch(BatchConfig),
}

impl Args {
    pub fn log_level(&self) -> Level {
        match (self.verbose, self.quiet) {
            (true, _) => Level::Debug,
            (_, true) => Level::Warn,
            _ => Level::Info,
        }
    }

    fn options(&self) -> ArffOptions {
        ArffOptions::default()
            .with_relation(self.relation.clone())
            .with_label(self.label.clone())
            .with_skip_placeholders(self.skip_placeholders)
    }

    pub fn job(&self) -> Result<Job> {
        if let Some(path) = &self.config {
            return Ok(Job::Single(ConversionConfig::from_json_file(path)?));
        }
        let Some(output) = self.output.clone() else {
            bail!("ERROR: --output is required");
        };

        if self.glob.is_none() && self.files.len() == 1 {
            let mut cfg = ConversionConfig::new(self.files[0].clone(), output)
                .with_options(self.options());
            cfg.stats = self.stats.clone();
            return Ok(Job::Single(cfg));
        }

        let mut cfg = BatchConfig::new(output)
            .with_inputs(self.files.iter().cloned())
            .with_options(self.options())
            .with_threads(self.threads);
        if let Some(pattern) = &self.glob {
            cfg = cfg.with_pattern(pattern.clone());
        }
        cfg.stats = self.stats.clone();
        Ok(Job::Batch(cfg))
    }
}
