//! Blocks, edges, control-flow graphs and the task owning them.

use super::Data;

/// Index of a CFG inside its owning `Task`
pub type CfgId = usize;

/// Index of an edge inside its owning `Cfg`
pub type EdgeId = usize;

/// Kind-specific payload of a block
#[derive(Debug, Clone)]
pub enum BlockKind {
    Entry,
    Exit,
    Basic {
        /// Base address of the covered code range
        base: u64,
        /// Byte size of the covered code range
        size: u64,
        /// (source file, physical line) pairs in instruction order;
        /// the same line may repeat.
        lines: Vec<(String, u32)>,
    },
    Call {
        /// Callee CFG, resolved into the owning task's arena. The
        /// block never owns the callee.
        callee: CfgId,
    },
}

/// One vertex of a control-flow graph
#[derive(Debug, Clone)]
pub struct Block {
    /// Block id, unique within the owning CFG
    pub id: String,
    pub kind: BlockKind,
    /// Raw statistic values collected onto this block
    pub data: Data,
    /// Outgoing edges, in insertion order
    pub out: Vec<EdgeId>,
    /// Back-reference to the last incoming edge, kept for rendering
    /// only and never traversed for ownership
    pub back: Option<EdgeId>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: Data::new(),
            out: Vec::new(),
            back: None,
        }
    }

    /// Attribute `val` to this block when `addr` falls inside its code
    /// range. Only the record's address is tested; the record's own
    /// size is ignored, so a span starting before the block never
    /// contributes here even when it overlaps the range.
    pub fn collect(&mut self, stat: &str, val: u64, addr: u64, _size: u64) {
        if let BlockKind::Basic { base, size, .. } = &self.kind {
            if *base <= addr && addr < *base + *size {
                self.data.add_val(stat, val);
            }
        }
    }
}

/// Directed arc between two blocks of the same CFG.
///
/// Owned by the CFG's edge collection; blocks refer to edges by index.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Source block index within the CFG
    pub src: usize,
    /// Sink block index within the CFG
    pub snk: usize,
    /// Present for future per-edge statistics; unused today.
    pub data: Data,
}

/// One control-flow graph of the task
#[derive(Debug, Clone)]
pub struct Cfg {
    pub id: String,
    /// Display label, usually the procedure name
    pub label: String,
    /// Call context disambiguating instantiations of the same procedure
    pub ctx: String,
    /// Blocks in document order
    pub blocks: Vec<Block>,
    pub edges: Vec<Edge>,
    /// Index of the entry block
    pub entry: Option<usize>,
    /// Index of the exit block
    pub exit: Option<usize>,
}

impl Cfg {
    pub fn new(id: impl Into<String>, label: impl Into<String>, ctx: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ctx: ctx.into(),
            blocks: Vec::new(),
            edges: Vec::new(),
            entry: None,
            exit: None,
        }
    }

    /// Append a block, returning its index.
    pub fn add_block(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Connect two blocks, wiring the source's outgoing list and the
    /// sink's incoming back-reference.
    pub fn add_edge(&mut self, src: usize, snk: usize) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Edge {
            src,
            snk,
            data: Data::new(),
        });
        self.blocks[src].out.push(id);
        self.blocks[snk].back = Some(id);
        id
    }

    /// Fan a record into this CFG's blocks when the contexts match.
    /// Returns whether the context matched.
    pub fn collect(&mut self, stat: &str, val: u64, addr: u64, size: u64, ctx: &str) -> bool {
        if ctx != self.ctx {
            return false;
        }
        for block in &mut self.blocks {
            block.collect(stat, val, addr, size);
        }
        true
    }
}

/// The whole analyzed unit: an ordered collection of CFGs.
///
/// The first CFG of the description is the program's entry CFG.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub cfgs: Vec<Cfg>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cfgs: Vec::new(),
        }
    }

    /// The program entry CFG.
    pub fn entry(&self) -> Option<&Cfg> {
        self.cfgs.first()
    }

    /// Fan a record into every CFG with a matching context. Returns
    /// the number of CFGs that matched.
    pub fn collect(&mut self, stat: &str, val: u64, addr: u64, size: u64, ctx: &str) -> usize {
        let mut matched = 0;
        for cfg in &mut self.cfgs {
            if cfg.collect(stat, val, addr, size, ctx) {
                matched += 1;
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_collect_inside_range() {
        let mut block = basic("1-1", 0x100, 4);
        block.collect("time", 10, 0x102, 1);
        assert_eq!(block.data.get("time"), 10);
    }

    #[test]
    fn test_collect_outside_range() {
        let mut block = basic("1-1", 0x100, 4);
        block.collect("time", 10, 0x104, 1);
        assert_eq!(block.data.get("time"), 0);
    }

    #[test]
    fn test_collect_ignores_record_size() {
        // A span starting just below the block and overlapping it is
        // still rejected: only the record's address is tested.
        let mut block = basic("1-1", 0x100, 4);
        block.collect("time", 10, 0xfe, 8);
        assert_eq!(block.data.get("time"), 0);
    }

    #[test]
    fn test_markers_never_collect() {
        let mut entry = Block::new("1-0", BlockKind::Entry);
        entry.collect("time", 10, 0x100, 4);
        assert_eq!(entry.data.get("time"), 0);
    }

    #[test]
    fn test_cfg_collect_filters_on_context() {
        let mut cfg = Cfg::new("1", "main", "[f]");
        cfg.add_block(basic("1-1", 0x100, 4));

        assert!(!cfg.collect("time", 10, 0x100, 4, "[g]"));
        assert_eq!(cfg.blocks[0].data.get("time"), 0);

        assert!(cfg.collect("time", 10, 0x100, 4, "[f]"));
        assert_eq!(cfg.blocks[0].data.get("time"), 10);
    }

    #[test]
    fn test_add_edge_wires_references() {
        let mut cfg = Cfg::new("1", "main", "");
        let a = cfg.add_block(Block::new("1-0", BlockKind::Entry));
        let b = cfg.add_block(basic("1-1", 0x100, 4));
        let e = cfg.add_edge(a, b);

        assert_eq!(cfg.blocks[a].out, vec![e]);
        assert_eq!(cfg.blocks[b].back, Some(e));
        assert_eq!(cfg.edges[e].src, a);
        assert_eq!(cfg.edges[e].snk, b);
    }
}
