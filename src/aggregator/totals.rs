//! Per-CFG and per-task maxima and sums of block-level values.

use crate::model::{Data, Task};
use log::debug;

/// Reductions over one CFG's blocks
#[derive(Debug, Clone, Default)]
pub struct CfgTotals {
    /// Elementwise maximum over the blocks' raw values
    pub max: Data,
    /// Elementwise sum over the blocks' raw values
    pub sum: Data,
}

/// Reductions over the whole task.
///
/// `cfgs` is parallel to `Task::cfgs`, so a call block's callee index
/// selects its callee's totals directly.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub cfgs: Vec<CfgTotals>,
    pub task_max: Data,
    pub task_sum: Data,
}

/// Recompute every reduction from scratch for the given statistics.
///
/// **Public** - main entry point for aggregation
///
/// The reductions are commutative and associative, so block order does
/// not matter, and zero values never create entries (matching the
/// sparse semantics of `Data`).
pub fn aggregate(task: &Task, stats: &[String]) -> Aggregates {
    let mut agg = Aggregates::default();
    for cfg in &task.cfgs {
        let mut totals = CfgTotals::default();
        for block in &cfg.blocks {
            for stat in stats {
                let val = block.data.get(stat);
                totals.max.set_max(stat, val);
                totals.sum.add_val(stat, val);
            }
        }
        for stat in stats {
            agg.task_max.set_max(stat, totals.max.get(stat));
            agg.task_sum.add_val(stat, totals.sum.get(stat));
        }
        agg.cfgs.push(totals);
    }
    debug!(
        "aggregated {} statistics over {} cfgs",
        stats.len(),
        task.cfgs.len()
    );
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind, Cfg};

    fn basic(id: &str, base: u64, size: u64) -> Block {
        Block::new(
            id,
            BlockKind::Basic {
                base,
                size,
                lines: Vec::new(),
            },
        )
    }

    fn stats(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cfg_totals_over_blocks() {
        let mut task = Task::new("t");
        let mut cfg = Cfg::new("1", "main", "");
        let a = cfg.add_block(basic("1-1", 0x100, 4));
        let b = cfg.add_block(basic("1-2", 0x104, 4));
        cfg.blocks[a].data.set("time", 10);
        cfg.blocks[b].data.set("time", 4);
        task.cfgs.push(cfg);

        let agg = aggregate(&task, &stats(&["time"]));
        assert_eq!(agg.cfgs[0].max.get("time"), 10);
        assert_eq!(agg.cfgs[0].sum.get("time"), 14);
    }

    #[test]
    fn test_task_totals_over_cfgs() {
        let mut task = Task::new("t");
        for (id, val) in [("1", 10u64), ("2", 7u64)] {
            let mut cfg = Cfg::new(id, id, "");
            let at = cfg.add_block(basic("b-1", 0x100, 4));
            cfg.blocks[at].data.set("time", val);
            task.cfgs.push(cfg);
        }

        let agg = aggregate(&task, &stats(&["time"]));
        assert_eq!(agg.task_max.get("time"), 10);
        assert_eq!(agg.task_sum.get("time"), 17);
    }

    #[test]
    fn test_uncollected_stat_stays_zero() {
        let mut task = Task::new("t");
        task.cfgs.push(Cfg::new("1", "main", ""));

        let agg = aggregate(&task, &stats(&["time"]));
        assert_eq!(agg.cfgs[0].max.get("time"), 0);
        assert_eq!(agg.cfgs[0].sum.get("time"), 0);
        assert_eq!(agg.task_max.get("time"), 0);
        assert_eq!(agg.task_sum.get("time"), 0);
    }

    #[test]
    fn test_round_trip_single_block() {
        let mut task = Task::new("t");
        let mut cfg = Cfg::new("1", "main", "");
        cfg.add_block(basic("1-1", 0x100, 4));
        task.cfgs.push(cfg);

        task.collect("time", 10, 0x100, 4, "");
        assert_eq!(task.cfgs[0].blocks[0].data.get("time"), 10);

        let agg = aggregate(&task, &stats(&["time"]));
        assert_eq!(agg.cfgs[0].max.get("time"), 10);
        assert_eq!(agg.cfgs[0].sum.get("time"), 10);
        assert_eq!(agg.task_max.get("time"), 10);
        assert_eq!(agg.task_sum.get("time"), 10);
    }
}
