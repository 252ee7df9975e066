//! Input readers for the graph description and the statistic streams.
//!
//! This module handles:
//! - Building the graph model from the XML description
//! - Distributing statistic records onto matching blocks
//! - Listing the statistics available in a run directory

pub mod cfg_xml;
pub mod records;

// Re-export main functions
pub use cfg_xml::{parse_task, read_task};
pub use records::{collect_records, list_stats, read_stat};

/// Parse an address written in hexadecimal, with or without a `0x`
/// prefix.
pub fn parse_hex(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_accepts_both_prefixes() {
        assert_eq!(parse_hex("0x100"), Some(0x100));
        assert_eq!(parse_hex("100"), Some(0x100));
        assert_eq!(parse_hex("0XfF"), Some(0xff));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(parse_hex("zz"), None);
        assert_eq!(parse_hex(""), None);
    }
}
