use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;

use crate::chart::sorted_by_mean;
use crate::registry::{self, BASELINE_TOOL};
use crate::types::ResultRecord;

static VERIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Last verified: \w+ \d{4}\.").expect("valid regex"));

// The "Last run" stamp sits on its own line inside a blockquote.
static LAST_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Last run:\n> \w+ \d{4}\.").expect("valid regex"));

const TABLE_HEADER: &str = "| Tool                    | Type   | Mean   | vs rumdl |";
const TABLE_SEPARATOR: &str = "| ----------------------- | ------ | ------ | -------- |";

/// Rewrite the two date stamps and the results table inside the comparison
/// document. Each substitution is independently optional: a missing anchor is
/// warned about and skipped, everything outside the anchored regions stays
/// byte-identical. A missing document skips the whole update.
pub fn sync_comparison_doc(
    doc_path: &Path,
    records: &[ResultRecord],
    now: DateTime<Local>,
) -> Result<()> {
    if !doc_path.is_file() {
        println!("⚠️  {} not found, skipping doc update", doc_path.display());
        return Ok(());
    }

    let content = fs::read_to_string(doc_path)
        .with_context(|| format!("failed to read {}", doc_path.display()))?;
    let date_str = now.format("%B %Y").to_string();
    let updated = apply_updates(&content, records, &date_str);
    fs::write(doc_path, updated)
        .with_context(|| format!("failed to write {}", doc_path.display()))?;

    println!("✅ Updated dates and results in {}", doc_path.display());
    Ok(())
}

/// The three substitutions, applied to the document contents in memory.
/// `date_str` is the full month name plus four-digit year.
pub fn apply_updates(content: &str, records: &[ResultRecord], date_str: &str) -> String {
    let mut content = content.to_string();

    if VERIFIED_RE.is_match(&content) {
        content = VERIFIED_RE
            .replace_all(&content, format!("Last verified: {date_str}."))
            .into_owned();
    } else {
        println!("⚠️  Could not find 'Last verified' date to update");
    }

    if LAST_RUN_RE.is_match(&content) {
        content = LAST_RUN_RE
            .replace_all(&content, format!("Last run:\n> {date_str}."))
            .into_owned();
    } else {
        println!("⚠️  Could not find 'Last run' date to update");
    }

    match table_bounds(&content) {
        Some(range) => {
            let mut rebuilt = String::with_capacity(content.len());
            rebuilt.push_str(&content[..range.start]);
            rebuilt.push_str(&render_table(records));
            rebuilt.push_str(&content[range.end..]);
            content = rebuilt;
        }
        None => println!("⚠️  Could not find benchmark results table to update"),
    }

    content
}

fn is_table_header(line: &str) -> bool {
    line.starts_with("| Tool") && line.contains("| vs rumdl")
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.starts_with('|')
        && trimmed.contains('-')
        && trimmed.chars().all(|c| matches!(c, '|' | '-' | ' '))
}

/// Byte range of the table block: the header line, the separator line, and
/// every immediately following line that starts with the table delimiter.
fn table_bounds(content: &str) -> Option<Range<usize>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        lines.push((offset, line));
        offset += line.len();
    }

    for (i, (start, line)) in lines.iter().enumerate() {
        if !is_table_header(line) {
            continue;
        }
        let Some((_, separator)) = lines.get(i + 1) else {
            continue;
        };
        if !is_table_separator(separator) {
            continue;
        }

        let mut end_idx = i + 2;
        while end_idx < lines.len() && lines[end_idx].1.starts_with('|') {
            end_idx += 1;
        }
        let end = lines.get(end_idx).map_or(content.len(), |(off, _)| *off);
        return Some(*start..end);
    }

    None
}

/// Regenerate the whole table block, rows sorted ascending by mean.
pub fn render_table(records: &[ResultRecord]) -> String {
    let sorted = sorted_by_mean(records);
    let baseline_mean = sorted
        .iter()
        .find(|r| r.command == BASELINE_TOOL)
        .map(|r| r.mean);

    let mut out = String::new();
    out.push_str(TABLE_HEADER);
    out.push('\n');
    out.push_str(TABLE_SEPARATOR);
    out.push('\n');

    for record in &sorted {
        let name = format!("**{}**", record.command);
        let category = category_label(&record.command);
        let mean = format_table_mean(record.mean);
        let ratio = format_ratio(record.mean, baseline_mean);
        out.push_str(&format!("| {name:<23} | {category:<6} | {mean:<6} | {ratio:<8} |\n"));
    }

    out
}

fn category_label(name: &str) -> &'static str {
    match registry::category_of(name) {
        Some(category) => category.as_str(),
        None => {
            println!("⚠️  Unknown tool in results: {name}, defaulting to Lint");
            "Lint"
        }
    }
}

/// Table mean: whole milliseconds under one second, one-decimal seconds
/// otherwise (spaced units, unlike the chart's value labels).
pub fn format_table_mean(mean_secs: f64) -> String {
    if mean_secs < 1.0 {
        format!("{:.0} ms", mean_secs * 1000.0)
    } else {
        format!("{mean_secs:.1} s")
    }
}

/// Ratio against the baseline mean: two decimals under 0.1x, one decimal
/// otherwise, `-` when the baseline record is absent.
pub fn format_ratio(mean_secs: f64, baseline_mean: Option<f64>) -> String {
    match baseline_mean {
        Some(base) if base > 0.0 => {
            let ratio = mean_secs / base;
            if ratio < 0.1 {
                format!("{ratio:.2}x")
            } else {
                format!("{ratio:.1}x")
            }
        }
        _ => "-".to_string(),
    }
}
