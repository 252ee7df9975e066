//! Graph description reader.
//!
//! The description is a `cfg-collection` XML document: one `cfg`
//! fragment per control-flow graph, with `entry`/`exit`/`bb` child
//! nodes and `edge` nodes naming local block ids. A `bb` node either
//! carries a `call` attribute referencing another fragment, or an
//! `address` and `size` with nested `line` entries.
//!
//! Construction is two-phase so call targets may reference fragments
//! that appear later in the document: phase 1 registers an empty CFG
//! shell per fragment, phase 2 populates blocks and edges.

use crate::model::{Block, BlockKind, Cfg, CfgId, Task};
use crate::parser::parse_hex;
use crate::utils::config::{CFG_FILE, STATS_SUBDIR};
use crate::utils::error::BuildError;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Identifier of the embedded property carrying the call context when
/// the fragment has no explicit `context` attribute
const CONTEXT_PROPERTY: &str = "otawa::CONTEXT";

/// Read the graph description of a run directory into a `Task`.
///
/// **Public** - main entry point for model construction
///
/// # Errors
/// * `BuildError::Io` - the description file cannot be read
/// * `BuildError::Xml` / `BuildError::Format` - malformed document
/// * `BuildError::Reference` - an edge or call names an unknown id
pub fn read_task(run_dir: &Path, name: &str) -> Result<Task, BuildError> {
    let path = run_dir.join(STATS_SUBDIR).join(CFG_FILE);
    let text = std::fs::read_to_string(&path)?;
    parse_task(&text, name, &path.display().to_string())
}

/// Parse a graph description document. Split from `read_task` so tests
/// can feed documents without touching the file system; `origin` names
/// the document in error messages.
pub fn parse_task(text: &str, name: &str, origin: &str) -> Result<Task, BuildError> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "cfg-collection" {
        return Err(format_err(
            origin,
            format!("unexpected root element <{}>", root.tag_name().name()),
        ));
    }

    let fragments: Vec<roxmltree::Node> = root
        .children()
        .filter(|n| n.has_tag_name("cfg"))
        .collect();

    // Phase 1: register one shell per fragment so calls can point to
    // fragments not built yet
    let mut task = Task::new(name);
    let mut cfg_ids: HashMap<String, CfgId> = HashMap::new();
    for frag in &fragments {
        let id = require_attr(frag, "id", origin)?;
        let label = require_attr(frag, "label", origin)?;
        let ctx = frag
            .attribute("context")
            .map(str::to_string)
            .unwrap_or_else(|| embedded_context(frag));
        if cfg_ids.insert(id.to_string(), task.cfgs.len()).is_some() {
            return Err(format_err(origin, format!("duplicate cfg id {id}")));
        }
        task.cfgs.push(Cfg::new(id, label, ctx));
    }
    if task.cfgs.is_empty() {
        return Err(format_err(origin, "no cfg fragment in collection"));
    }

    // Phase 2: populate blocks, then attach edges
    for (index, frag) in fragments.iter().enumerate() {
        let block_ids = build_blocks(frag, index, &mut task, &cfg_ids, origin)?;
        build_edges(frag, &mut task.cfgs[index], &block_ids, origin)?;
    }

    debug!("built task {} with {} cfgs", task.name, task.cfgs.len());
    Ok(task)
}

/// Classify and append the blocks of one fragment, returning the local
/// id table used to attach edges.
///
/// **Private** - internal helper for parse_task
fn build_blocks(
    frag: &roxmltree::Node,
    index: CfgId,
    task: &mut Task,
    cfg_ids: &HashMap<String, CfgId>,
    origin: &str,
) -> Result<HashMap<String, usize>, BuildError> {
    let mut block_ids: HashMap<String, usize> = HashMap::new();

    for node in frag.children().filter(|n| n.is_element()) {
        // property and edge nodes carry no block id
        let Some(id) = node.attribute("id") else {
            continue;
        };
        let kind = match node.tag_name().name() {
            "entry" => BlockKind::Entry,
            "exit" => BlockKind::Exit,
            "bb" => classify_bb(&node, cfg_ids, origin)?,
            _ => continue,
        };

        let cfg = &mut task.cfgs[index];
        let at = cfg.add_block(Block::new(id, kind));
        match cfg.blocks[at].kind {
            BlockKind::Entry => cfg.entry = Some(at),
            BlockKind::Exit => cfg.exit = Some(at),
            _ => {}
        }
        if block_ids.insert(id.to_string(), at).is_some() {
            return Err(format_err(
                origin,
                format!("duplicate block id {} in cfg {}", id, cfg.id),
            ));
        }
    }

    let cfg = &task.cfgs[index];
    if cfg.entry.is_none() || cfg.exit.is_none() {
        return Err(format_err(
            origin,
            format!("cfg {} is missing its entry or exit block", cfg.id),
        ));
    }
    Ok(block_ids)
}

/// A `bb` node with a `call` attribute is a call block; otherwise it
/// must carry an address and size and becomes a basic block.
///
/// **Private** - internal helper for build_blocks
fn classify_bb(
    node: &roxmltree::Node,
    cfg_ids: &HashMap<String, CfgId>,
    origin: &str,
) -> Result<BlockKind, BuildError> {
    if let Some(target) = node.attribute("call") {
        let callee = cfg_ids.get(target).copied().ok_or_else(|| {
            BuildError::Reference {
                file: origin.to_string(),
                reason: format!("call target {target} names no cfg"),
            }
        })?;
        return Ok(BlockKind::Call { callee });
    }

    let address = require_attr(node, "address", origin)?;
    let base = parse_hex(address)
        .ok_or_else(|| format_err(origin, format!("bad block address {address}")))?;
    let size = require_attr(node, "size", origin)?;
    let size = size
        .parse::<u64>()
        .map_err(|_| format_err(origin, format!("bad block size {size}")))?;

    let mut lines = Vec::new();
    for entry in node.children().filter(|n| n.has_tag_name("line")) {
        let file = require_attr(&entry, "file", origin)?;
        let line = require_attr(&entry, "line", origin)?;
        let line = line
            .parse::<u32>()
            .map_err(|_| format_err(origin, format!("bad line number {line}")))?;
        lines.push((file.to_string(), line));
    }

    Ok(BlockKind::Basic { base, size, lines })
}

/// Attach the edges of one fragment; both endpoints must be blocks of
/// the same CFG.
///
/// **Private** - internal helper for parse_task
fn build_edges(
    frag: &roxmltree::Node,
    cfg: &mut Cfg,
    block_ids: &HashMap<String, usize>,
    origin: &str,
) -> Result<(), BuildError> {
    for node in frag.children().filter(|n| n.has_tag_name("edge")) {
        let source = require_attr(&node, "source", origin)?;
        let target = require_attr(&node, "target", origin)?;
        let (src, snk) = match (block_ids.get(source), block_ids.get(target)) {
            (Some(&src), Some(&snk)) => (src, snk),
            _ => {
                return Err(BuildError::Reference {
                    file: origin.to_string(),
                    reason: format!("edge {source} -> {target} names an unknown block"),
                })
            }
        };
        cfg.add_edge(src, snk);
    }
    Ok(())
}

/// Context text of the embedded `property` node, empty when absent.
///
/// **Private** - internal helper for parse_task
fn embedded_context(frag: &roxmltree::Node) -> String {
    frag.descendants()
        .filter(|n| n.has_tag_name("property"))
        .find(|n| n.attribute("identifier") == Some(CONTEXT_PROPERTY))
        .and_then(|n| n.text())
        .unwrap_or("")
        .to_string()
}

fn require_attr<'a>(
    node: &'a roxmltree::Node,
    name: &str,
    origin: &str,
) -> Result<&'a str, BuildError> {
    node.attribute(name).ok_or_else(|| {
        format_err(
            origin,
            format!(
                "element <{}> is missing attribute {}",
                node.tag_name().name(),
                name
            ),
        )
    })
}

fn format_err(origin: &str, reason: impl Into<String>) -> BuildError {
    BuildError::Format {
        file: origin.to_string(),
        reason: reason.into(),
    }
}
