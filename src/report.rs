//! Console rendering of the selected versions

use crate::stats::types::{VersionRecord, sum_downloads};

const RATIO_HEADER: &str = "ratio(%)";

/// Round `value` to `decimals` places
pub fn round(value: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    ((value + f64::EPSILON) * m).round() / m
}

/// Share of `part` in `total` as a percentage; zero when there are no downloads
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}

/// Format an integer with en-US thousands separators (`1234567` -> `1,234,567`)
pub fn format_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Render `records` as a table; ratios are relative to the unfiltered `total`
pub fn render_table(records: &[VersionRecord], total: u64) -> String {
    let show_deprecated = records.iter().any(|r| r.is_deprecated);

    let mut headers = vec![("version", Align::Left)];
    if show_deprecated {
        headers.push(("isDeprecated", Align::Left));
    }
    headers.extend([
        ("time", Align::Left),
        ("tags", Align::Left),
        ("downloads", Align::Right),
        (RATIO_HEADER, Align::Right),
    ]);

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.version.clone()];
            if show_deprecated {
                row.push(r.is_deprecated.to_string());
            }
            row.extend([
                r.time.format("%Y-%m-%d").to_string(),
                r.tags.join(", "),
                r.downloads.to_string(),
                round(percent(r.downloads, total), 1).to_string(),
            ]);
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, (header, _))| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_cells: Vec<String> = headers.iter().map(|(h, _)| h.to_string()).collect();
    let mut out = String::new();
    push_row(&mut out, &header_cells, &headers, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &separator, &headers, &widths);
    for row in &rows {
        push_row(&mut out, row, &headers, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], headers: &[(&str, Align)], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(headers)
        .zip(widths)
        .map(|((cell, (_, align)), width)| match align {
            Align::Left => format!("{cell:<width$}"),
            Align::Right => format!("{cell:>width$}"),
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

/// Summary lines printed below the table
pub fn render_summary(records: &[VersionRecord], total: u64) -> String {
    let shown = sum_downloads(records);
    format!(
        "Ratio of downloads through versions shown in the table: {}%\nTotal weekly downloads: {}\n",
        round(percent(shown, total), 2),
        format_grouped(total)
    )
}
