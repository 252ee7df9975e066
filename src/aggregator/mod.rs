//! Hierarchical reductions over the collected statistics.
//!
//! This module transforms block-level raw values into:
//! - Per-CFG and per-task maxima and sums (graph view scaling)
//! - Per-source-line accumulated values (source view rows and ramps)

pub mod lines;
pub mod totals;

// Re-export main types and functions
pub use lines::{collect_lines, LineTable};
pub use totals::{aggregate, Aggregates, CfgTotals};
