//! Graph view writer: one DOT document per control-flow graph.
//!
//! The task's entry CFG becomes `index.dot`; every other graph is
//! named by its id. Call blocks link to their callee's document so a
//! DOT viewer can navigate the call tree.

use crate::aggregator::Aggregates;
use crate::model::{BlockKind, Cfg, Task};
use crate::render::colorize::escape_html;
use crate::render::decor::Decorator;
use crate::render::source::SourceManager;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Escape the DOT structural metacharacters of a label fragment.
pub fn escape_dot(s: &str) -> String {
    s.replace('{', "\\{")
        .replace('}', "\\}")
        .replace(['\n', '\r'], "")
}

/// Escape text embedded in an HTML-like DOT label, preserving
/// indentation.
fn escape_label(s: &str) -> String {
    escape_html(s)
        .replace(' ', "&nbsp;")
        .replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;")
}

/// DOT node ids must not contain dashes.
fn norm(id: &str) -> String {
    id.replace('-', "_")
}

/// Write the graph view of a task.
///
/// **Public** - main entry point for the graph view
///
/// # Arguments
/// * `out_dir` - view directory, recreated from scratch
/// * `stats` - statistics displayed inside every basic block
/// * `major` - statistic driving the decorator's coloring
/// * `with_source` - embed best-effort source snippets in block labels
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error while (re)creating the
///   directory or writing a document
#[allow(clippy::too_many_arguments)]
pub fn write_cfgs(
    out_dir: &Path,
    task: &Task,
    agg: &Aggregates,
    stats: &[String],
    major: &str,
    decorator: &dyn Decorator,
    sman: &mut SourceManager,
    with_source: bool,
) -> Result<(), OutputError> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    info!("writing graph view to {}", out_dir.display());

    for (index, cfg) in task.cfgs.iter().enumerate() {
        // the entry CFG is the canonical landing document
        let name = if index == 0 {
            "index.dot".to_string()
        } else {
            format!("{}.dot", cfg.id)
        };
        let file = File::create(out_dir.join(&name))?;
        let mut out = BufWriter::new(file);
        write_cfg(
            &mut out,
            task,
            cfg,
            agg,
            stats,
            major,
            decorator,
            sman,
            with_source,
        )?;
        out.flush()?;
        debug!("wrote {name}");
    }
    Ok(())
}

/// Emit one CFG document: nodes first, then edges, then the trailing
/// provenance label.
///
/// **Private** - internal helper for write_cfgs
#[allow(clippy::too_many_arguments)]
fn write_cfg(
    out: &mut impl Write,
    task: &Task,
    cfg: &Cfg,
    agg: &Aggregates,
    stats: &[String],
    major: &str,
    decorator: &dyn Decorator,
    sman: &mut SourceManager,
    with_source: bool,
) -> std::io::Result<()> {
    writeln!(out, "digraph {} {{", norm(&cfg.id))?;

    for block in &cfg.blocks {
        write!(out, "\t{} [", norm(&block.id))?;
        match &block.kind {
            BlockKind::Entry => write!(out, "label=\"entry\"")?,
            BlockKind::Exit => write!(out, "label=\"exit\"")?,
            BlockKind::Call { callee } => {
                let callee = &task.cfgs[*callee];
                write!(
                    out,
                    "URL=\"{}.dot\",label=\"call {}\",shape=\"box\"",
                    callee.id,
                    escape_dot(&callee.label)
                )?;
            }
            BlockKind::Basic { base, size, lines } => {
                // block number taken from the id suffix
                let num = block
                    .id
                    .split_once('-')
                    .map(|(_, rest)| rest)
                    .unwrap_or(&block.id);
                write!(
                    out,
                    "margin=0,shape=\"box\",label=<<table border='0' cellpadding='8px'>\
                     <tr><td>BB {num} ({base:#x}:{size})</td></tr><hr/><tr><td align='left'>"
                )?;
                if with_source {
                    for (file, line) in lines {
                        let text = sman.line(file, *line).unwrap_or_default();
                        write!(
                            out,
                            "{}:{}: {}<br align='left'/>",
                            escape_label(file),
                            line,
                            escape_label(&text)
                        )?;
                    }
                    write!(out, "</td></tr><hr/><tr><td>")?;
                }
                for stat in stats {
                    let val = block.data.get(stat);
                    let total = agg.task_sum.get(stat);
                    // an all-zero statistic has no meaningful share
                    let pct = if total == 0 {
                        0.0
                    } else {
                        val as f64 * 100.0 / total as f64
                    };
                    write!(out, "{stat}={val} ({pct:.2}%)<br/>")?;
                }
                write!(out, "</td></tr></table>>")?;
            }
        }
        write!(out, "{}", decorator.block_attrs(agg, major, block))?;
        writeln!(out, "];")?;
    }

    for block in &cfg.blocks {
        for &out_edge in &block.out {
            let edge = &cfg.edges[out_edge];
            writeln!(
                out,
                "\t{} -> {};",
                norm(&block.id),
                norm(&cfg.blocks[edge.snk].id)
            )?;
        }
    }

    writeln!(
        out,
        "label=<CFG: {} {}<br/>colorized by {} ({} decorator)<br/>\
         <i>Generated by cfgstat {} ({}).</i>>;",
        escape_html(&cfg.label),
        escape_html(&cfg.ctx),
        major,
        decorator.name(),
        env!("CARGO_PKG_VERSION"),
        Utc::now().to_rfc3339()
    )?;
    writeln!(out, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("a{b}c\nd"), "a\\{b\\}cd");
    }

    #[test]
    fn test_norm_strips_dashes() {
        assert_eq!(norm("1-2"), "1_2");
    }

    #[test]
    fn test_escape_label_indentation() {
        assert_eq!(escape_label("\ta<b"), "&nbsp;&nbsp;&nbsp;&nbsp;a&lt;b");
    }
}
