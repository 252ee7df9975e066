//! cfgstat CLI
//!
//! Renders the statistics of an analysis run over the program's
//! control-flow structure: colorized CFGs in Graphviz DOT, or
//! annotated source listings in HTML.

use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use cfgstat::commands::{execute_list, execute_render, validate_args, RenderArgs, View};
use cfgstat::parser::list_stats;
use cfgstat::utils::config::{DEFAULT_STAT, RUN_DIR_SUFFIX, STATS_SUBDIR};

/// cfgstat - statistics display over control-flow graphs
#[derive(Parser, Debug)]
#[command(name = "cfgstat")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Task name
    task: String,

    /// Statistics to display
    stats: Vec<String>,

    /// Run directory (defaults to <task>-stat)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// List available statistics
    #[arg(short, long)]
    list: bool,

    /// Include all available statistics in the output
    #[arg(short, long)]
    all: bool,

    /// Do not use colors in the output
    #[arg(long)]
    no_color: bool,

    /// Statistic used to color the output
    #[arg(short = 's', long)]
    color_stat: Option<String>,

    /// Output sources colored according to the statistics
    #[arg(short = 'S', long)]
    source: bool,

    /// Output CFGs colored according to the statistics
    #[arg(short = 'G', long = "cfg")]
    cfg: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let run_dir = cli
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}{}", cli.task, RUN_DIR_SUFFIX)));

    // nothing can be done without the statistics directory
    let stat_dir = run_dir.join(STATS_SUBDIR);
    if !stat_dir.is_dir() {
        bail!("no statistics generated under {}", stat_dir.display());
    }

    if cli.list {
        return execute_list(&run_dir);
    }

    // Select statistics to display
    let mut stats = cli.stats.clone();
    if stats.is_empty() {
        if cli.all {
            stats = list_stats(&run_dir)?;
        } else {
            stats = vec![DEFAULT_STAT.to_string()];
        }
    }

    // The coloring statistic defaults to the first displayed one
    let mut main = stats.first().cloned().unwrap_or_default();
    if let Some(color_stat) = cli.color_stat {
        if !stats.contains(&color_stat) {
            stats.push(color_stat.clone());
        }
        main = color_stat;
    }

    let view = if cli.cfg { View::Graphs } else { View::Sources };

    let args = RenderArgs {
        task: cli.task,
        run_dir,
        stats,
        main,
        view,
        colorized: !cli.no_color,
        with_source: cli.source,
    };

    // Validate args first
    validate_args(&args)?;

    // Execute render
    execute_render(args)?;

    Ok(())
}
