//! Configuration and constants for the CLI.

/// Statistic rendered when none is requested on the command line
pub const DEFAULT_STAT: &str = "total_time";

/// Sub-directory of the run directory holding the graph description
/// and the record streams
pub const STATS_SUBDIR: &str = "stats";

/// File name of the graph description inside the statistics directory
pub const CFG_FILE: &str = "cfg.xml";

/// Extension of statistic record streams
pub const STAT_EXT: &str = "csv";

/// Suffix appended to the task name to derive the default run directory
pub const RUN_DIR_SUFFIX: &str = "-stat";

/// Sub-directory of the run directory receiving the source view
pub const SOURCE_SUBDIR: &str = "src";
