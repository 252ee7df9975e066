//! Best-effort syntax coloring of source lines.
//!
//! Colorizers are looked up by file extension; when none is registered
//! the line is emitted as escaped plain text, so a missing colorizer
//! never blocks rendering.

use std::collections::HashMap;
use std::path::Path;

/// Escape text for inclusion in HTML markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Per-extension syntax colorizer writing HTML fragments.
pub trait SyntaxColorizer {
    /// Append the HTML rendering of `line` to `out`. Implementations
    /// must escape everything they emit.
    fn colorize(&self, line: &str, out: &mut String);
}

/// Fallback colorizer: escaped text, no markup.
pub struct PlainColorizer;

impl SyntaxColorizer for PlainColorizer {
    fn colorize(&self, line: &str, out: &mut String) {
        out.push_str(&escape_html(line));
    }
}

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "case", "break", "continue", "do", "return",
];

const TYPE_KEYWORDS: &[&str] = &[
    "typedef", "bool", "int", "char", "float", "double", "short", "long", "signed", "unsigned",
    "struct", "union", "enum",
];

/// C-family colorizer: preprocessor directives, control and type
/// keywords, comments.
pub struct CColorizer;

impl SyntaxColorizer for CColorizer {
    fn colorize(&self, line: &str, out: &mut String) {
        let mut rest = line;
        let mut at_start = true;
        while !rest.is_empty() {
            // a line comment swallows the remainder
            if rest.starts_with("//") {
                out.push_str("<font color='green'><i>");
                out.push_str(&escape_html(rest));
                out.push_str("</i></font>");
                return;
            }
            if rest.starts_with("/*") {
                let end = rest.find("*/").map(|i| i + 2).unwrap_or(rest.len());
                out.push_str("<font color='green'><i>");
                out.push_str(&escape_html(&rest[..end]));
                out.push_str("</i></font>");
                rest = &rest[end..];
                at_start = false;
                continue;
            }
            if at_start && rest.starts_with('#') {
                let end = rest[1..]
                    .find(|c: char| !c.is_ascii_lowercase())
                    .map(|i| i + 1)
                    .unwrap_or(rest.len());
                out.push_str("<font color='orange'><b>");
                out.push_str(&rest[..end]);
                out.push_str("</b></font>");
                rest = &rest[end..];
                at_start = false;
                continue;
            }

            let Some(c) = rest.chars().next() else {
                break;
            };
            if c.is_ascii_alphabetic() || c == '_' {
                let end = rest
                    .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                    .unwrap_or(rest.len());
                let word = &rest[..end];
                if CONTROL_KEYWORDS.contains(&word) {
                    out.push_str("<font color='red'><b>");
                    out.push_str(word);
                    out.push_str("</b></font>");
                } else if TYPE_KEYWORDS.contains(&word) {
                    out.push_str("<b>");
                    out.push_str(word);
                    out.push_str("</b>");
                } else {
                    out.push_str(word);
                }
                rest = &rest[end..];
            } else {
                let mut buf = [0u8; 4];
                out.push_str(&escape_html(c.encode_utf8(&mut buf)));
                rest = &rest[c.len_utf8()..];
            }
            at_start = false;
        }
    }
}

/// Extension-keyed registry with a pass-through fallback.
pub struct ColorizerRegistry {
    by_ext: HashMap<String, Box<dyn SyntaxColorizer>>,
    fallback: PlainColorizer,
}

impl ColorizerRegistry {
    /// Registry with the built-in C-family colorizer installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            by_ext: HashMap::new(),
            fallback: PlainColorizer,
        };
        for ext in ["c", "h", "cpp", "hpp", "cc", "hh"] {
            registry.register(ext, Box::new(CColorizer));
        }
        registry
    }

    pub fn register(&mut self, ext: &str, colorizer: Box<dyn SyntaxColorizer>) {
        self.by_ext.insert(ext.to_string(), colorizer);
    }

    /// Colorizer for a file, by extension, defaulting to plain text.
    pub fn for_file(&self, file: &str) -> &dyn SyntaxColorizer {
        Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_ext.get(ext))
            .map(|boxed| boxed.as_ref())
            .unwrap_or(&self.fallback)
    }
}
