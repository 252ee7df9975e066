//! Generic statistic holder.

use std::collections::HashMap;

/// Mapping from statistic id to an accumulated value.
///
/// Zero is the implicit value of every absent statistic: `add_val` and
/// `set_max` with a zero operand leave the map untouched, so sparse
/// accumulation never materializes entries for untouched statistics.
#[derive(Debug, Clone, Default)]
pub struct Data {
    values: HashMap<String, u64>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the value for `id`.
    pub fn set(&mut self, id: &str, val: u64) {
        self.values.insert(id.to_string(), val);
    }

    /// Value for `id`, defaulting to 0 when absent.
    pub fn get(&self, id: &str) -> u64 {
        self.values.get(id).copied().unwrap_or(0)
    }

    /// Whether a value has been recorded for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Accumulate `val` onto `id`. A zero `val` is a no-op and does
    /// not create the entry.
    pub fn add_val(&mut self, id: &str, val: u64) {
        if val != 0 {
            *self.values.entry(id.to_string()).or_insert(0) += val;
        }
    }

    /// Keep the running maximum for `id`. A zero `val` is a no-op and
    /// does not create the entry.
    pub fn set_max(&mut self, id: &str, val: u64) {
        if val != 0 {
            let entry = self.values.entry(id.to_string()).or_insert(0);
            *entry = (*entry).max(val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults_to_zero() {
        let data = Data::new();
        assert_eq!(data.get("missing"), 0);
    }

    #[test]
    fn test_add_val_accumulates() {
        let mut data = Data::new();
        data.add_val("time", 3);
        data.add_val("time", 4);
        assert_eq!(data.get("time"), 7);
    }

    #[test]
    fn test_add_val_zero_is_noop() {
        let mut data = Data::new();
        data.add_val("time", 0);
        assert!(!data.contains("time"));

        data.add_val("time", 5);
        data.add_val("time", 0);
        assert_eq!(data.get("time"), 5);
    }

    #[test]
    fn test_set_max_keeps_maximum() {
        let mut data = Data::new();
        data.set_max("time", 4);
        data.set_max("time", 2);
        assert_eq!(data.get("time"), 4);
        data.set_max("time", 9);
        assert_eq!(data.get("time"), 9);
    }

    #[test]
    fn test_set_max_zero_is_noop() {
        let mut data = Data::new();
        data.set_max("time", 0);
        assert!(!data.contains("time"));
    }
}
