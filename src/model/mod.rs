//! In-memory model of the analyzed program.
//!
//! A `Task` owns the control-flow graphs produced by one analysis run;
//! each `Cfg` owns its blocks and edges. Statistic values are attached
//! to basic blocks through `collect` and read back during aggregation
//! and rendering. The model is built once, enriched in place by the
//! collector, then treated as read-only.

pub mod data;
pub mod graph;

// Re-export main types
pub use data::Data;
pub use graph::{Block, BlockKind, Cfg, CfgId, Edge, EdgeId, Task};
