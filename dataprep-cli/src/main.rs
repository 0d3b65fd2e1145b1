//! Dataprep CLI: fetch, load, split, and summarize a tabular dataset.
//!
//! With no arguments it runs the stock housing pipeline:
//! 1. fetch the archive into `datasets/housing` (skipped if the directory exists)
//! 2. load `housing.csv`
//! 3. hash-stable split on a positional `index` column
//! 4. stratified split on `median_income` capped at 5
//! 5. print a preview, the column/type summary, and descriptive statistics

use anyhow::{Context, Result};
use clap::Parser;
use dataprep_core::data::{fetch_data, load_data, HttpSource};
use dataprep_core::split::{category_labels, category_proportions, Split, Splitter};
use dataprep_core::{Dataset, PrepConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dataprep",
    about = "Fetch a dataset and split it into train/test sets"
)]
struct Cli {
    /// TOML config overriding the built-in housing dataset defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also run the seeded random split.
    #[arg(long, default_value_t = false)]
    random: bool,

    /// Rows shown in the preview.
    #[arg(long, default_value_t = 5)]
    head: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PrepConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PrepConfig::default(),
    };

    run(&config, &cli)
}

fn run(config: &PrepConfig, cli: &Cli) -> Result<()> {
    let source = HttpSource::new()?;
    fetch_data(
        &source,
        &config.source.url,
        &config.source.local_path,
        &config.source.archive_name,
    )
    .context("fetching dataset")?;

    let data = load_data(&config.source.local_path, &config.source.csv_name)
        .context("loading dataset")?;
    log::info!(
        "loaded {} rows x {} columns",
        data.len(),
        data.columns().len()
    );

    if cli.random {
        let split = config
            .split
            .random_splitter()
            .split(&data)
            .context("random split")?;
        log_split("random", &split);
    }

    let id_column = &config.split.id_column;
    let with_id = if data.column_index(id_column).is_some() {
        data.clone()
    } else {
        data.with_row_index(id_column)?
    };
    let split = config
        .split
        .hash_splitter()
        .split(&with_id)
        .context("hash split")?;
    log_split("hash", &split);

    let stratified = config.split.stratified_splitter();
    let split = stratified.split(&data).context("stratified split")?;
    log_split("stratified", &split);
    print_proportions(&data, &split, &stratified.column, stratified.cap)?;

    println!("{}", data.head(cli.head));
    println!("{}", data.info());
    println!("{}", data.describe());
    Ok(())
}

fn log_split(name: &str, split: &Split) {
    let total = split.train.len() + split.test.len();
    let share = if total == 0 {
        0.0
    } else {
        split.test.len() as f64 / total as f64
    };
    log::info!(
        "{name} split: {} train, {} test ({:.1}% test)",
        split.train.len(),
        split.test.len(),
        share * 100.0
    );
}

/// Category shares in the full dataset and in each side of the split.
fn print_proportions(data: &Dataset, split: &Split, column: &str, cap: i64) -> Result<()> {
    let overall = category_proportions(&category_labels(data, column, cap)?);
    let train = category_proportions(&category_labels(&split.train, column, cap)?);
    let test = category_proportions(&category_labels(&split.test, column, cap)?);

    println!("{column} categories (cap {cap}):");
    println!("{:>8}  {:>8}  {:>8}  {:>8}", "category", "overall", "train", "test");
    for (label, share) in &overall {
        let tr = train.get(label).copied().unwrap_or(0.0);
        let te = test.get(label).copied().unwrap_or(0.0);
        println!("{label:>8}  {share:>8.4}  {tr:>8.4}  {te:>8.4}");
    }
    println!();
    Ok(())
}
