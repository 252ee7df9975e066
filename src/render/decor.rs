//! Block decoration strategies for the graph view.
//!
//! The plain decorator leaves nodes unstyled; the color decorator
//! fills each block according to its share of the task maximum for
//! the major statistic.

use crate::aggregator::Aggregates;
use crate::model::{Block, BlockKind};
use crate::render::color::Palette;

/// Strategy hook deciding the extra DOT attributes of a block node.
pub trait Decorator {
    /// Name recorded in the document provenance label.
    fn name(&self) -> &'static str;

    /// Extra attributes appended to a block's node statement, starting
    /// with a comma when non-empty.
    fn block_attrs(&self, agg: &Aggregates, major: &str, block: &Block) -> String;
}

/// Emits no attributes; the graph stays uncolored.
pub struct PlainDecorator;

impl Decorator for PlainDecorator {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn block_attrs(&self, _agg: &Aggregates, _major: &str, _block: &Block) -> String {
        String::new()
    }
}

/// Fills each block with the ramp color of its ratio to the task
/// maximum for the major statistic.
pub struct ColorDecorator<'a> {
    pub palette: &'a Palette,
}

impl Decorator for ColorDecorator<'_> {
    fn name(&self) -> &'static str {
        "color"
    }

    fn block_attrs(&self, agg: &Aggregates, major: &str, block: &Block) -> String {
        // A call block carries no raw values of its own: its displayed
        // cost is the worst case reachable through the callee.
        let val = match block.kind {
            BlockKind::Call { callee } => agg.cfgs[callee].max.get(major),
            _ => block.data.get(major),
        };
        let max = agg.task_max.get(major);
        if val == 0 || max == 0 {
            return String::new();
        }

        let ratio = val as f64 / max as f64;
        let (bg, fg) = self.palette.color_of(ratio);
        format!(",fillcolor=\"{bg}\",style=\"filled\",fontcolor=\"{fg}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::model::{Cfg, Task};

    fn colored_task() -> (Task, Aggregates) {
        let mut task = Task::new("t");

        let mut callee = Cfg::new("2", "leaf", "");
        let at = callee.add_block(Block::new(
            "2-1",
            BlockKind::Basic {
                base: 0x200,
                size: 4,
                lines: Vec::new(),
            },
        ));
        callee.blocks[at].data.set("time", 50);

        let mut caller = Cfg::new("1", "main", "");
        let at = caller.add_block(Block::new(
            "1-1",
            BlockKind::Basic {
                base: 0x100,
                size: 4,
                lines: Vec::new(),
            },
        ));
        caller.blocks[at].data.set("time", 100);
        caller.add_block(Block::new("1-2", BlockKind::Call { callee: 1 }));

        task.cfgs.push(caller);
        task.cfgs.push(callee);
        let agg = aggregate(&task, &["time".to_string()]);
        (task, agg)
    }

    #[test]
    fn test_plain_decorator_is_empty() {
        let (task, agg) = colored_task();
        let attrs = PlainDecorator.block_attrs(&agg, "time", &task.cfgs[0].blocks[0]);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_block_at_task_max_gets_darkest_bucket() {
        let (task, agg) = colored_task();
        let palette = Palette::default();
        let decorator = ColorDecorator { palette: &palette };
        let attrs = decorator.block_attrs(&agg, "time", &task.cfgs[0].blocks[0]);
        assert_eq!(
            attrs,
            ",fillcolor=\"#7162dd\",style=\"filled\",fontcolor=\"#ffffff\""
        );
    }

    #[test]
    fn test_call_block_uses_callee_max() {
        // callee max 50 over task max 100: mid-ramp bucket, white text
        let (task, agg) = colored_task();
        let palette = Palette::default();
        let decorator = ColorDecorator { palette: &palette };
        let attrs = decorator.block_attrs(&agg, "time", &task.cfgs[0].blocks[1]);
        assert_eq!(
            attrs,
            ",fillcolor=\"#a194fa\",style=\"filled\",fontcolor=\"#ffffff\""
        );
    }

    #[test]
    fn test_zero_value_stays_uncolored() {
        let (task, agg) = colored_task();
        let palette = Palette::default();
        let decorator = ColorDecorator { palette: &palette };
        let mut block = Block::new(
            "1-3",
            BlockKind::Basic {
                base: 0x300,
                size: 4,
                lines: Vec::new(),
            },
        );
        block.data.set("other", 3);
        assert!(decorator.block_attrs(&agg, "time", &block).is_empty());
    }
}
