//! Render command implementation.
//!
//! The render command:
//! 1. Builds the graph model from the XML description
//! 2. Collects each requested statistic stream, in order
//! 3. Aggregates per-CFG and per-task totals
//! 4. Renders the graph view or the source view

use crate::aggregator::{aggregate, collect_lines};
use crate::parser::{read_stat, read_task};
use crate::render::{
    write_cfgs, write_sources, ColorDecorator, ColorizerRegistry, Decorator, Palette,
    PlainDecorator, SourceManager,
};
use crate::utils::config::{SOURCE_SUBDIR, STATS_SUBDIR};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Which report the run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// One DOT document per CFG
    Graphs,
    /// Annotated source listings plus an index
    Sources,
}

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Task name, used in document titles
    pub task: String,

    /// Run directory holding the statistics and receiving the views
    pub run_dir: PathBuf,

    /// Statistics to display, in order
    pub stats: Vec<String>,

    /// Statistic driving the coloring
    pub main: String,

    /// Report to produce
    pub view: View,

    /// Color the output (plain decorator otherwise)
    pub colorized: bool,

    /// Embed source snippets in graph-view block labels
    pub with_source: bool,
}

/// Validate render arguments before any processing starts.
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    let stat_dir = args.run_dir.join(STATS_SUBDIR);
    if !stat_dir.is_dir() {
        bail!("no statistics generated under {}", stat_dir.display());
    }

    if args.stats.is_empty() {
        bail!("no statistic selected");
    }

    if !args.stats.iter().any(|s| s == &args.main) {
        bail!(
            "coloring statistic {} is not among the displayed ones",
            args.main
        );
    }

    Ok(())
}

/// Execute the render command.
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Graph description or record stream failures (fatal, nothing is
///   rendered)
/// * Document write failures (fatal; documents fully written earlier
///   in the run are left in place)
pub fn execute_render(args: RenderArgs) -> Result<()> {
    info!(
        "rendering task {} from {}",
        args.task,
        args.run_dir.display()
    );

    // Step 1: build the graph model
    let mut task = read_task(&args.run_dir, &args.task)
        .context("failed to read the graph description")?;
    debug!("built {} cfgs", task.cfgs.len());

    // Step 2: collect every statistic before aggregation starts
    for stat in &args.stats {
        read_stat(&args.run_dir, &mut task, stat)
            .with_context(|| format!("failed to collect statistic {stat}"))?;
    }

    // Step 3: aggregate; the model is read-only from here on
    let agg = aggregate(&task, &args.stats);

    // Step 4: render the requested view
    let palette = Palette::default();
    match args.view {
        View::Graphs => {
            let mut sman = SourceManager::new();
            let plain = PlainDecorator;
            let color = ColorDecorator { palette: &palette };
            let decorator: &dyn Decorator = if args.colorized { &color } else { &plain };
            // one document set per statistic, each colored as major
            for major in &args.stats {
                let out_dir = args.run_dir.join(format!("{major}-cfg"));
                write_cfgs(
                    &out_dir,
                    &task,
                    &agg,
                    &args.stats,
                    major,
                    decorator,
                    &mut sman,
                    args.with_source,
                )
                .with_context(|| format!("failed to write the graph view for {major}"))?;
            }
        }
        View::Sources => {
            let table = collect_lines(&task, &args.stats);
            let colorizers = ColorizerRegistry::with_defaults();
            let out_dir = args.run_dir.join(SOURCE_SUBDIR);
            write_sources(
                &out_dir,
                &task,
                &table,
                &args.stats,
                &args.main,
                &palette,
                &colorizers,
            )
            .context("failed to write the source view")?;
        }
    }

    info!("rendering completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(run_dir: PathBuf) -> RenderArgs {
        RenderArgs {
            task: "t".to_string(),
            run_dir,
            stats: vec!["time".to_string()],
            main: "time".to_string(),
            view: View::Sources,
            colorized: true,
            with_source: false,
        }
    }

    #[test]
    fn test_validate_args_missing_stats_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_args(&args(dir.path().join("absent"))).is_err());
    }

    #[test]
    fn test_validate_args_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(STATS_SUBDIR)).unwrap();
        let mut args = args(dir.path().to_path_buf());
        args.stats.clear();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_main_must_be_displayed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(STATS_SUBDIR)).unwrap();
        let mut args = args(dir.path().to_path_buf());
        args.main = "other".to_string();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(STATS_SUBDIR)).unwrap();
        assert!(validate_args(&args(dir.path().to_path_buf())).is_ok());
    }
}
