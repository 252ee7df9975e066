//! Per-source-line accumulation feeding the annotated source view.

use crate::model::{BlockKind, Task};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Accumulated values keyed by (statistic, file, line), plus the
/// bookkeeping the source renderer needs to scale its color ramps.
///
/// A line covered by at least one basic block has an entry even when
/// its accumulated value is 0; an uncovered line has none. The
/// renderer shows a blank cell for the latter only.
#[derive(Debug, Clone, Default)]
pub struct LineTable {
    /// Source files that were both referenced and found on the file
    /// system, in first-reference order
    pub sources: Vec<String>,
    values: HashMap<(String, String, u32), u64>,
    max_values: HashMap<String, u64>,
}

impl LineTable {
    /// Accumulated value of a statistic on one line; `None` when no
    /// block covers the line.
    pub fn value(&self, stat: &str, file: &str, line: u32) -> Option<u64> {
        self.values
            .get(&(stat.to_string(), file.to_string(), line))
            .copied()
    }

    /// Largest accumulated line value of a statistic, over every file.
    pub fn max_value(&self, stat: &str) -> u64 {
        self.max_values.get(stat).copied().unwrap_or(0)
    }
}

/// Scan every basic block's line mapping across the whole task.
///
/// **Public** - main entry point for the source view input
///
/// Blocks covering the same line sum their contributions. Files that
/// cannot be found on the file system are excluded entirely, so the
/// source view never references an unreadable document.
pub fn collect_lines(task: &Task, stats: &[String]) -> LineTable {
    let mut table = LineTable::default();

    for cfg in &task.cfgs {
        for block in &cfg.blocks {
            let BlockKind::Basic { lines, .. } = &block.kind else {
                continue;
            };
            for (file, line) in lines {
                if !table.sources.iter().any(|s| s == file) {
                    if !Path::new(file).is_file() {
                        continue;
                    }
                    table.sources.push(file.clone());
                }
                for stat in stats {
                    let key = (stat.clone(), file.clone(), *line);
                    let val = table.values.entry(key).or_insert(0);
                    *val += block.data.get(stat);
                    let max = table.max_values.entry(stat.clone()).or_insert(0);
                    *max = (*max).max(*val);
                }
            }
        }
    }

    debug!(
        "collected line statistics for {} source files",
        table.sources.len()
    );
    table
}
