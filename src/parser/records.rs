//! Statistic record stream reader.
//!
//! One stream per named statistic: one record per physical line,
//! exactly four tab-separated fields `value`, `address` (hex), `size`
//! (decimal) and `context` (quoted). Every record is fanned into the
//! CFGs whose context matches; this is the single point mutating the
//! model after construction.

use crate::model::Task;
use crate::utils::config::{STATS_SUBDIR, STAT_EXT};
use crate::utils::error::StatError;
use log::debug;
use std::path::Path;

use super::parse_hex;

/// Number of tab-separated fields of a well-formed record
const RECORD_FIELDS: usize = 4;

/// Read one statistic stream of a run directory and distribute its
/// records onto the task.
///
/// **Public** - main entry point for statistic collection
///
/// # Errors
/// * `StatError::Io` - the stream cannot be opened
/// * `StatError::Malformed` - a record has the wrong field count or an
///   unparsable field; the whole run aborts
pub fn read_stat(run_dir: &Path, task: &mut Task, stat: &str) -> Result<(), StatError> {
    let path = run_dir
        .join(STATS_SUBDIR)
        .join(format!("{stat}.{STAT_EXT}"));
    let text = std::fs::read_to_string(&path).map_err(|source| StatError::Io {
        stat: stat.to_string(),
        source,
    })?;
    collect_records(&text, task, stat, &path.display().to_string())
}

/// Distribute the records of one stream onto the task. Split from
/// `read_stat` so tests can feed streams without touching the file
/// system; `origin` names the stream in error messages.
pub fn collect_records(
    text: &str,
    task: &mut Task,
    stat: &str,
    origin: &str,
) -> Result<(), StatError> {
    let mut dropped = 0usize;
    for (num, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != RECORD_FIELDS {
            return Err(malformed(
                origin,
                num + 1,
                format!("expected {} fields, got {}", RECORD_FIELDS, fields.len()),
            ));
        }

        let val = fields[0]
            .parse::<u64>()
            .map_err(|_| malformed(origin, num + 1, format!("bad value {}", fields[0])))?;
        let addr = parse_hex(fields[1])
            .ok_or_else(|| malformed(origin, num + 1, format!("bad address {}", fields[1])))?;
        let size = fields[2]
            .parse::<u64>()
            .map_err(|_| malformed(origin, num + 1, format!("bad size {}", fields[2])))?;
        // the context field is quoted on disk and bracketed in the model
        let ctx = format!("[{}]", fields[3].trim_matches('"'));

        // contexts are a sparse dimension, so a record matching no CFG
        // is not an error
        if task.collect(stat, val, addr, size, &ctx) == 0 {
            dropped += 1;
        }
    }
    if dropped != 0 {
        debug!("{origin}: {dropped} records matched no cfg context");
    }
    Ok(())
}

/// Statistics available in a run directory: the stems of every record
/// stream under its statistics sub-directory, sorted for stable output.
pub fn list_stats(run_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut stats = Vec::new();
    for entry in std::fs::read_dir(run_dir.join(STATS_SUBDIR))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == STAT_EXT) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stats.push(stem.to_string());
            }
        }
    }
    stats.sort();
    Ok(stats)
}

fn malformed(origin: &str, line: usize, reason: String) -> StatError {
    StatError::Malformed {
        file: origin.to_string(),
        line,
        reason,
    }
}
