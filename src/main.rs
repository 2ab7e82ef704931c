use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use ladim_release::config::load_groups;
use ladim_release::release::{write_table, write_table_to_path};
use ladim_release::{Layout, ReleaseBuilder, ReleaseTable};

/// Generate particle release files for LADIM
///
/// Examples:
///   # Print the release table of a config file
///   makerelease release.yaml
///
///   # Write a release file with sinking velocities
///   makerelease release.yaml particles.rls --layout sinking
#[derive(Parser, Debug)]
#[command(name = "makerelease")]
#[command(version, about, long_about = None)]
struct Args {
    /// Release configuration (YAML, TOML or JSON)
    config: PathBuf,

    /// Output release file (prints to stdout if omitted)
    output: Option<PathBuf>,

    /// Column layout of the release file
    #[arg(long, default_value = "basic")]
    layout: Layout,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let start = Instant::now();

    let groups = load_groups(&args.config)?;
    let builder = ReleaseBuilder::new(args.layout);

    let progress = if args.verbose {
        create_progress(groups.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut table = ReleaseTable::new(args.layout);
    for group in &groups {
        progress.set_message(format!("group {}", group.group_id));
        let rows = builder
            .build_group(group)
            .with_context(|| format!("Failed to build release group {}", group.group_id))?;
        table.extend(rows);
        progress.inc(1);
    }
    progress.finish_with_message(format!(
        "Built {} particles in {} groups [{:.2}s]",
        table.len(),
        groups.len(),
        start.elapsed().as_secs_f32()
    ));

    match &args.output {
        Some(path) => {
            write_table_to_path(path, &table).context("Failed to write release file")?;
            println!("Output: {} ({} rows)", path.display(), table.len());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_table(&mut writer, &table)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn create_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}
