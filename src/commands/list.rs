//! List command: show the statistics available in a run directory.

use crate::parser::records::list_stats;
use anyhow::{Context, Result};
use std::path::Path;

/// Print the available statistic names, one per line.
pub fn execute_list(run_dir: &Path) -> Result<()> {
    let stats = list_stats(run_dir)
        .with_context(|| format!("cannot list statistics under {}", run_dir.display()))?;
    for stat in stats {
        println!("{stat}");
    }
    Ok(())
}
