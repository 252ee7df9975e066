//! Source view writer: an index document plus one annotated listing
//! per source file.
//!
//! Every listing embeds, per statistic, a precomputed palette-index
//! array (row 0 reserved for "no data") and a `colorize` script, so
//! switching the coloring statistic happens entirely in the viewer.

use crate::aggregator::LineTable;
use crate::model::Task;
use crate::render::color::{Palette, BLACK, WHITE};
use crate::render::colorize::{escape_html, ColorizerRegistry};
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Style block shared by every listing
const LISTING_STYLE: &str = "\
    <style>
        td {
            text-align: right;
            padding-left: 8pt;
            padding-right: 8pt;
        }
        td.source {
            text-align: left;
        }
        table {
            margin-top: 1em;
        }
    </style>
";

/// Recoloring function shared by every listing; `backs` is one of the
/// per-statistic palette-index arrays
const COLORIZE_SCRIPT: &str = "\
        function colorize(backs, label) {
            document.getElementById('label').textContent = label;
            var trs = document.getElementById('stats').getElementsByTagName('tr');
            for (var i = 0; i < trs.length; i++) {
                trs[i].style.backgroundColor = backgrounds[backs[i]];
                trs[i].style.color = foregrounds[backs[i]];
            }
        }
";

/// Write the source view of a task.
///
/// **Public** - main entry point for the source view
///
/// # Arguments
/// * `out_dir` - view directory, recreated from scratch
/// * `table` - per-line accumulation from the aggregator
/// * `stats` - statistics exposed as recoloring choices
/// * `main` - statistic the documents open colorized by
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error while writing a document
pub fn write_sources(
    out_dir: &Path,
    task: &Task,
    table: &LineTable,
    stats: &[String],
    main: &str,
    palette: &Palette,
    colorizers: &ColorizerRegistry,
) -> Result<(), OutputError> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    info!("writing source view to {}", out_dir.display());

    write_index(out_dir, task, table, main)?;
    for file in &table.sources {
        write_listing(out_dir, task, table, stats, main, palette, colorizers, file)?;
    }
    Ok(())
}

/// Document name of a source file's listing, relative to the view
/// directory.
///
/// **Private** - internal naming rule, shared by index links
fn doc_name(file: &str) -> String {
    format!("{}.html", file.trim_start_matches('/'))
}

/// Write the index document listing every resolvable source file.
///
/// **Private** - internal helper for write_sources
fn write_index(
    out_dir: &Path,
    task: &Task,
    table: &LineTable,
    main: &str,
) -> Result<(), OutputError> {
    let file = File::create(out_dir.join("index.html"))?;
    let mut out = BufWriter::new(file);

    let title = format!("Task {} colored by {}", escape_html(&task.name), main);
    writeln!(out, "<html><head><title>{title}</title></head><body>")?;
    writeln!(out, "<h1>{title}</h1>")?;
    writeln!(out, "<p>List of sources:</p>")?;
    writeln!(out, "<ul>")?;
    for source in &table.sources {
        writeln!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            doc_name(source),
            escape_html(source)
        )?;
    }
    writeln!(out, "</ul>")?;
    write_sign(&mut out)?;
    writeln!(out, "</body></html>")?;
    out.flush()?;
    Ok(())
}

/// Write one annotated listing.
///
/// **Private** - internal helper for write_sources
#[allow(clippy::too_many_arguments)]
fn write_listing(
    out_dir: &Path,
    task: &Task,
    table: &LineTable,
    stats: &[String],
    main: &str,
    palette: &Palette,
    colorizers: &ColorizerRegistry,
    source: &str,
) -> Result<(), OutputError> {
    // the file resolved during collection but may have vanished since
    let Ok(text) = fs::read_to_string(source) else {
        warn!("source {source} disappeared, skipping its listing");
        return Ok(());
    };
    let lines: Vec<&str> = text.lines().collect();
    let colorizer = colorizers.for_file(source);

    let doc = doc_name(source);
    let path = out_dir.join(&doc);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;
    let mut out = BufWriter::new(file);

    // head: style and recoloring script
    writeln!(
        out,
        "<html><head><title>{} colored for {}</title>",
        escape_html(source),
        main
    )?;
    out.write_all(LISTING_STYLE.as_bytes())?;
    writeln!(out, "    <script type=\"text/javascript\">")?;
    write_color_tables(&mut out, palette)?;
    for (index, stat) in stats.iter().enumerate() {
        let ramp = line_ramp(table, palette, stat, source, lines.len());
        writeln!(out, "        var s{index} = {};", serde_json::to_string(&ramp)?)?;
    }
    out.write_all(COLORIZE_SCRIPT.as_bytes())?;
    writeln!(out, "    </script>")?;
    writeln!(out, "</head><body>")?;

    // details and table header
    writeln!(out, "    <h1>{}</h1>", escape_html(source))?;
    let depth = doc.matches('/').count();
    writeln!(
        out,
        "    <p><a href=\"{}index.html\">Top</a><br/>",
        "../".repeat(depth)
    )?;
    writeln!(out, "    <b>Task:</b> {}<br/>", escape_html(&task.name))?;
    writeln!(out, "    <b>Colored by:</b> <span id='label'>{main}</span></p>")?;
    writeln!(out, "    <table id=\"stats\">")?;
    write!(out, "    <tr><th>num.</th><th>source</th>")?;
    for (index, stat) in stats.iter().enumerate() {
        write!(
            out,
            "<th><a href=\"javascript:colorize(s{index}, '{}')\">{}</a></th>",
            escape_html(stat),
            escape_html(stat)
        )?;
    }
    writeln!(out, "</tr>")?;

    // one row per physical line
    for (num, line) in lines.iter().enumerate() {
        let num = num as u32 + 1;
        let (indent, text) = split_indent(line);
        write!(out, "    <tr><td>{num}</td><td class=\"source\"")?;
        if indent != 0 {
            write!(out, " style=\"padding-left: {indent}pt;\"")?;
        }
        write!(out, ">")?;
        let mut rendered = String::new();
        colorizer.colorize(text, &mut rendered);
        write!(out, "{rendered}</td>")?;
        for stat in stats {
            match table.value(stat, source, num) {
                Some(val) => write!(out, "<td>{val}</td>")?,
                None => write!(out, "<td></td>")?,
            }
        }
        writeln!(out, "</tr>")?;
    }

    writeln!(out, "    </table>")?;
    write_sign(&mut out)?;
    let main_index = stats.iter().position(|s| s == main).unwrap_or(0);
    writeln!(
        out,
        "    <script type='text/javascript'>colorize(s{main_index}, '{}');</script>",
        escape_html(main)
    )?;
    writeln!(out, "</body></html>")?;
    out.flush()?;
    debug!("wrote {doc}");
    Ok(())
}

/// Emit the background and foreground tables of the recoloring script:
/// entry 0 is the uncolored row, entries 1..=K the palette buckets.
///
/// **Private** - internal helper for write_listing
fn write_color_tables(out: &mut impl Write, palette: &Palette) -> Result<(), OutputError> {
    let mut backgrounds = vec![WHITE.to_string()];
    backgrounds.extend(palette.colors.iter().map(|c| c.to_string()));
    let mut foregrounds = vec![BLACK.to_string(); palette.threshold + 1];
    foregrounds.extend(vec![WHITE.to_string(); palette.len() - palette.threshold]);

    writeln!(
        out,
        "        var backgrounds = {};",
        serde_json::to_string(&backgrounds)?
    )?;
    writeln!(
        out,
        "        var foregrounds = {};",
        serde_json::to_string(&foregrounds)?
    )?;
    Ok(())
}

/// Palette-index array of one statistic over one file: index 0 covers
/// the table header row, indices 1..=n the source lines; 0 means "no
/// data, keep the row uncolored".
///
/// **Private** - internal helper for write_listing
fn line_ramp(
    table: &LineTable,
    palette: &Palette,
    stat: &str,
    source: &str,
    line_count: usize,
) -> Vec<usize> {
    let maxv = table.max_value(stat);
    let mut ramp = Vec::with_capacity(line_count + 1);
    ramp.push(0);
    for num in 1..=line_count {
        let bucket = match table.value(stat, source, num as u32) {
            Some(val) if val > 0 && maxv > 0 => {
                palette.index_of(val as f64 / maxv as f64) + 1
            }
            _ => 0,
        };
        ramp.push(bucket);
    }
    ramp
}

/// Provenance footer shared by every document.
///
/// **Private** - internal helper
fn write_sign(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "    <center><i>Generated by cfgstat {} ({}).</i></center>",
        env!("CARGO_PKG_VERSION"),
        Utc::now().to_rfc3339()
    )
}

/// Leading indentation of a line in points (8 per space, 32 per tab)
/// and the remaining text.
///
/// **Private** - internal helper for write_listing
fn split_indent(line: &str) -> (usize, &str) {
    let mut indent = 0;
    for (at, c) in line.char_indices() {
        match c {
            ' ' => indent += 8,
            '\t' => indent += 32,
            _ => return (indent, &line[at..]),
        }
    }
    (indent, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_name_keeps_relative_layout() {
        assert_eq!(doc_name("/a/b.c"), "a/b.c.html");
        assert_eq!(doc_name("b.c"), "b.c.html");
    }

    #[test]
    fn test_split_indent() {
        assert_eq!(split_indent("    x"), (32, "x"));
        assert_eq!(split_indent("\tx"), (32, "x"));
        assert_eq!(split_indent("x  "), (0, "x  "));
        assert_eq!(split_indent(" \ty"), (40, "y"));
    }
}
