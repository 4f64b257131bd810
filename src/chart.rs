use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::registry::BASELINE_TOOL;
use crate::types::{ProjectPaths, ResultRecord};

// Layout mirrors the published chart: 10in wide, 0.5in per bar with a 2.5in
// floor, rendered at 96 px/in.
const DPI: f64 = 96.0;
const FIG_WIDTH_IN: f64 = 10.0;
const MARGIN_LEFT: f64 = 170.0;
const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 32.0;

const HIGHLIGHT_COLOR: &str = "#10b981";
const NEUTRAL_BAR_COLOR: &str = "#e5e7eb";
const NEUTRAL_LABEL_COLOR: &str = "#9ca3af";
const VALUE_COLOR: &str = "#666666";
const GRID_COLOR: &str = "#888888";
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Records sorted ascending by mean. The sort is stable, so ties keep the
/// engine-reported order.
pub fn sorted_by_mean(records: &[ResultRecord]) -> Vec<ResultRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Bar value label: whole milliseconds under one second, one-decimal seconds
/// otherwise.
pub fn format_mean(mean_secs: f64) -> String {
    if mean_secs < 1.0 {
        format!("{:.0}ms", mean_secs * 1000.0)
    } else {
        format!("{:.1}s", mean_secs)
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Pick a 1/2/5-series gridline step that yields roughly five ticks.
fn grid_step(max_value: f64) -> f64 {
    let rough = (max_value / 5.0).max(f64::MIN_POSITIVE);
    let magnitude = 10f64.powf(rough.log10().floor());
    let normalized = rough / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Render the sorted horizontal-bar comparison as standalone SVG markup.
///
/// The baseline tool gets the highlight treatment (emerald bar, bold emerald
/// label); every other tool shares the neutral palette. The background is
/// transparent so the chart composes over light and dark document themes.
pub fn render_svg(records: &[ResultRecord]) -> String {
    let sorted = sorted_by_mean(records);
    let n = sorted.len();

    let fig_height_in = (0.5 * n as f64 + 0.5).max(2.5);
    let width = FIG_WIDTH_IN * DPI;
    let height = fig_height_in * DPI;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;

    let times_ms: Vec<f64> = sorted.iter().map(|r| r.mean * 1000.0).collect();
    let max_ms = times_ms.iter().copied().fold(0.0_f64, f64::max).max(1.0);
    let px_per_ms = plot_w / max_ms;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="{FONT_FAMILY}">"#
    );

    // Subtle vertical gridlines behind the bars, with tick labels along the
    // bottom edge.
    let step = grid_step(max_ms);
    let mut tick = 0.0;
    while tick <= max_ms {
        let x = MARGIN_LEFT + tick * px_per_ms;
        let _ = writeln!(
            svg,
            r#"  <line x1="{x:.1}" y1="{MARGIN_TOP:.1}" x2="{x:.1}" y2="{:.1}" stroke="{GRID_COLOR}" stroke-width="0.5" opacity="0.2"/>"#,
            MARGIN_TOP + plot_h
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{x:.1}" y="{:.1}" font-size="9" fill="{VALUE_COLOR}" text-anchor="middle">{}</text>"#,
            height - 10.0,
            format_mean(tick / 1000.0)
        );
        tick += step;
    }

    let row_h = if n > 0 { plot_h / n as f64 } else { plot_h };
    let bar_h = row_h * 0.6;

    for (i, (record, &ms)) in sorted.iter().zip(&times_ms).enumerate() {
        let highlighted = record.command == BASELINE_TOOL;
        let bar_color = if highlighted { HIGHLIGHT_COLOR } else { NEUTRAL_BAR_COLOR };
        let label_color = if highlighted { HIGHLIGHT_COLOR } else { NEUTRAL_LABEL_COLOR };
        let label_size = if highlighted { 12 } else { 11 };
        let label_weight = if highlighted { "bold" } else { "normal" };

        let y = MARGIN_TOP + i as f64 * row_h + (row_h - bar_h) / 2.0;
        let bar_w = ms * px_per_ms;
        let center = y + bar_h / 2.0;

        let _ = writeln!(
            svg,
            r#"  <rect x="{MARGIN_LEFT:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{bar_color}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{center:.1}" font-size="{label_size}" font-weight="{label_weight}" fill="{label_color}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            MARGIN_LEFT - 8.0,
            xml_escape(&record.command)
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{center:.1}" font-size="10" font-weight="500" fill="{VALUE_COLOR}" dominant-baseline="middle">{}</text>"#,
            MARGIN_LEFT + bar_w + max_ms * 0.01 * px_per_ms,
            format_mean(record.mean)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Emit the chart to the public asset path and the intermediate results
/// path, creating parent directories as needed.
pub fn write_chart(paths: &ProjectPaths, records: &[ResultRecord]) -> Result<()> {
    let svg = render_svg(records);
    for path in [paths.chart_asset(), paths.chart_intermediate()] {
        write_svg(&path, &svg)?;
        println!("✅ Chart saved to {}", path.display());
    }
    Ok(())
}

fn write_svg(path: &Path, svg: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))
}
