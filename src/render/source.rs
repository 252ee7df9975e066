//! Source file lookup and caching.
//!
//! Lookup is best-effort: a file that cannot be read is remembered as
//! absent so rendering never blocks on it and never retries it.

use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Caching loader for the source files referenced by line mappings.
pub struct SourceManager {
    paths: Vec<PathBuf>,
    cache: HashMap<PathBuf, Option<Vec<String>>>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::with_paths(vec![PathBuf::from(".")])
    }

    /// Manager resolving relative names against the given lookup paths,
    /// in order.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            cache: HashMap::new(),
        }
    }

    fn load(path: &Path) -> Option<Vec<String>> {
        std::fs::read_to_string(path)
            .ok()
            .map(|text| text.lines().map(str::to_string).collect())
    }

    /// Lines of a source file, loading and caching it on first use.
    pub fn find(&mut self, file: &str) -> Option<&[String]> {
        let key = PathBuf::from(file);
        if !self.cache.contains_key(&key) {
            let loaded = if key.is_absolute() {
                Self::load(&key)
            } else {
                self.paths.iter().find_map(|p| Self::load(&p.join(file)))
            };
            if loaded.is_none() {
                debug!("source {file} not found");
            }
            self.cache.insert(key.clone(), loaded);
        }
        self.cache.get(&key).and_then(|lines| lines.as_deref())
    }

    /// Text of line `line` (1-based) of `file`, if the file resolves
    /// and is long enough.
    pub fn line(&mut self, file: &str, line: u32) -> Option<String> {
        let index = line.checked_sub(1)? as usize;
        self.find(file)?.get(index).cloned()
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_line_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.c");
        write!(std::fs::File::create(&path).unwrap(), "first\nsecond\n").unwrap();

        let mut sman = SourceManager::new();
        let file = path.display().to_string();
        assert_eq!(sman.line(&file, 2).as_deref(), Some("second"));
        assert_eq!(sman.line(&file, 3), None);
        assert_eq!(sman.line(&file, 0), None);
    }

    #[test]
    fn test_missing_file_is_cached_as_absent() {
        let mut sman = SourceManager::new();
        assert!(sman.find("/no/such/file.c").is_none());
        assert!(sman.find("/no/such/file.c").is_none());
    }

    #[test]
    fn test_relative_lookup_through_paths() {
        let dir = tempfile::tempdir().unwrap();
        write!(
            std::fs::File::create(dir.path().join("rel.c")).unwrap(),
            "only\n"
        )
        .unwrap();

        let mut sman = SourceManager::with_paths(vec![dir.path().to_path_buf()]);
        assert_eq!(sman.line("rel.c", 1).as_deref(), Some("only"));
    }
}
