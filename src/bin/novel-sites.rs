use std::env;
use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, Level};

use novel_pas::browser::{BrowserClient, ImageRenderer, TrackWriter};
use novel_pas::cli::Cli;
use novel_pas::config::Config;
use novel_pas::pipeline::{write_summary, Pipeline};
use novel_pas::records::{read_comparison_records, read_reference_samples};

fn run(cli: &Cli) -> Result<()> {
    let config = cli.apply(Config::load(cli.config.as_deref())?);

    let outdir = match &cli.outdir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("can not determine the current directory")?,
    };
    fs::create_dir_all(&outdir).with_context(|| format!("create output folder {}", outdir.display()))?;
    fs::create_dir_all(&config.web_root)
        .with_context(|| format!("create web folder {}", config.web_root.display()))?;

    let references = read_reference_samples(&config.reference_file)?;
    let records = read_comparison_records(&cli.data, !cli.no_header)?;
    info!(
        "Loaded {} comparison records and {} reference samples",
        records.len(),
        references.len()
    );

    let renderer: Box<dyn ImageRenderer> = if cli.tracks_only {
        Box::new(TrackWriter::new(&config))
    } else {
        Box::new(BrowserClient::new(&config, &outdir)?)
    };

    let pipeline = Pipeline::new(&config, cli.exclude.clone(), cli.seed);
    let reports = pipeline.run(records, &references, renderer.as_ref())?;

    let summary = outdir.join(format!("{}.tsv", cli.name));
    write_summary(&summary, &reports)?;
    info!("Summary written to {}", summary.display());

    Ok(())
}

fn main() {
    let start = Instant::now();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::Debug } else { Level::Info };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("logger setup failed: {}", e);
    }

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("Elapsed time: {:.3?}", start.elapsed());
}
