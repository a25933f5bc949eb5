mod common;
mod info;
mod inspect;
mod scan;

use crate::common::*;
use std::env;
use structopt::StructOpt;
use textseg_data::{config::Config, dataset::SegmentationDataset};
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

#[derive(Debug, Clone, StructOpt)]
/// Inspect text segmentation datasets
struct Args {
    #[structopt(long, default_value = "textseg.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, StructOpt)]
enum Command {
    /// Print dataset information
    Info,
    /// Write one transformed sample as image files
    Inspect {
        #[structopt(long, default_value = "0")]
        /// sample index
        index: usize,
        #[structopt(long, default_value = "trash")]
        /// output directory
        output_dir: PathBuf,
        #[structopt(long)]
        /// apply the configured color jitter to the image
        jitter: bool,
    },
    /// Load every sample and report failures
    Scan {
        #[structopt(long)]
        /// number of concurrent loading jobs, defaults to the number of CPUs
        jobs: Option<usize>,
    },
}

#[tokio::main]
pub async fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    // parse arguments
    let Args {
        config_file,
        command,
    } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    let dataset = Arc::new(SegmentationDataset::from_config(&config)?);

    match command {
        Command::Info => info::info(&dataset, &config)?,
        Command::Inspect {
            index,
            output_dir,
            jitter,
        } => inspect::inspect(&dataset, index, &output_dir, jitter)?,
        Command::Scan { jobs } => scan::scan(dataset, jobs).await?,
    }

    Ok(())
}
