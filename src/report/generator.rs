//! Markdown and JSON report generation.
//!
//! This module renders the assembled chart models into a document the
//! drawing layer (or a human) can consume.

use crate::chart::{Annotation, BarChart, ScatterPlot};
use crate::models::{CategoryKey, Counted, HotelRecord, Report, ReportMetadata};
use anyhow::Result;

/// Widest text bar in the category table.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# HotelStats Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str(&generate_table_of_contents(report));

    if let Some(ref bar) = report.bar {
        output.push_str(&generate_bar_section(bar));
    }

    if let Some(ref scatter) = report.scatter {
        output.push_str(&generate_scatter_section(scatter, &report.hidden));
    }

    output.push_str(&generate_records_section(&report.records));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!("- **Category Field:** {}\n", metadata.category_field));
    if metadata.undefined_records > 0 {
        section.push_str(&format!(
            "- **Records Without {}:** {} (counted as `undefined`)\n",
            metadata.category_field, metadata.undefined_records
        ));
    }
    section.push_str(&format!("- **Duration:** {:.2}s\n", metadata.duration_seconds));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    if report.bar.is_some() {
        toc.push_str("- [Category Counts](#category-counts)\n");
    }
    if report.scatter.is_some() {
        toc.push_str("- [Scatter Plot](#scatter-plot)\n");
    }
    if !report.records.is_empty() {
        toc.push_str("- [Records](#records)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the category-count section.
fn generate_bar_section(chart: &BarChart) -> String {
    let mut section = String::new();

    section.push_str("## Category Counts\n\n");

    if chart.bars.is_empty() {
        section.push_str("No records were loaded.\n\n");
        return section;
    }

    if let Some(ref headline) = chart.headline {
        section.push_str(&format!("> **{}**: {}\n\n", headline.title, headline.label));
    }

    section.push_str(&format!(
        "| {} | Hotels | |\n",
        capitalize(&chart.field.to_string())
    ));
    section.push_str("|:---|:---:|:---|\n");

    for bar in &chart.bars {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            bar.category,
            bar.count,
            text_bar(bar.count, chart.y_max)
        ));
    }
    section.push('\n');

    section
}

/// Generate the scatter section.
fn generate_scatter_section(plot: &ScatterPlot, hidden: &[CategoryKey]) -> String {
    let mut section = String::new();

    section.push_str("## Scatter Plot\n\n");

    if plot.points.is_empty() {
        section.push_str("No records were loaded.\n\n");
        return section;
    }

    if let Some((lo, hi)) = plot.x_extent {
        section.push_str(&format!("- **Year of construction:** {} to {}\n", lo, hi));
    }
    if let Some((lo, hi)) = plot.y_extent {
        section.push_str(&format!("- **Score (0-100 scale):** {} to {}\n", lo, hi));
    }
    section.push_str(&format!("- **Colored by:** {}\n", plot.color_field));
    if !hidden.is_empty() {
        let names: Vec<String> = hidden.iter().map(ToString::to_string).collect();
        section.push_str(&format!("- **Hidden:** {}\n", names.join(", ")));
    }
    section.push('\n');

    if !plot.annotations.is_empty() {
        section.push_str("### Highlights\n\n");
        for annotation in &plot.annotations {
            section.push_str(&generate_annotation(annotation));
        }
        section.push('\n');
    }

    section.push_str("### Visibility\n\n");
    section.push_str(&format!(
        "| {} | Color | Visible |\n",
        capitalize(&plot.color_field.to_string())
    ));
    section.push_str("|:---|:---:|:---:|\n");

    for (category, visible) in plot.visible_counts() {
        let color = plot
            .points
            .iter()
            .find(|p| p.category == category)
            .map(|p| p.color.as_str())
            .unwrap_or("");
        section.push_str(&format!("| {} | `{}` | {} |\n", category, color, visible));
    }
    section.push('\n');

    if hidden.is_empty() {
        if let Some(hint) = visibility_hint(plot) {
            section.push_str(&hint);
        }
    }

    section
}

/// Nudge toward the first named category when nothing is hidden yet.
fn visibility_hint(plot: &ScatterPlot) -> Option<String> {
    let first = plot.points.iter().find_map(|p| p.category.as_str())?;
    Some(format!(
        "> Try hiding the '{}' {}: `--hide \"{}\"`\n\n",
        first, plot.color_field, first
    ))
}

fn generate_annotation(annotation: &Annotation) -> String {
    format!("- **{}**: {}\n", annotation.title, annotation.label)
}

/// Generate the per-record table.
fn generate_records_section(records: &[Counted<HotelRecord>]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Records\n\n");
    section.push_str("| Hotel | Region | Country | Theme | Year | Score | Rooms | Count |\n");
    section.push_str("|:---|:---|:---|:---|:---:|:---:|:---:|:---:|\n");

    for row in records {
        let r = &row.record;
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            r.hotel,
            r.region.as_deref().unwrap_or("undefined"),
            r.country.as_deref().unwrap_or("undefined"),
            r.theme.as_deref().unwrap_or("undefined"),
            r.year,
            r.score,
            r.rooms,
            row.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by HotelStats*\n");

    footer
}

/// Proportional bar of block characters; non-zero counts get at least one.
fn text_bar(count: usize, max: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max).clamp(1, BAR_WIDTH);
    "█".repeat(width)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
