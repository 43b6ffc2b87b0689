//! Output formatting for CLI display.

use std::cmp::Ordering;
use std::fmt::Write;

use jiff::Timestamp;

use crate::model::{Cargo, LuggageStatus, StatusKind};
use crate::stepper::{Step, kind_color, kind_icon, kind_label, status_label};
use crate::table::{Column, Page, Table};

/// The columns shown by `cargo list`.
pub(super) fn cargo_table() -> Table<Cargo> {
    Table::new(vec![
        Column::new("id", Cargo::short_id),
        Column::new("reference", |c: &Cargo| c.reference.clone())
            .sortable(|a, b| a.reference.cmp(&b.reference)),
        Column::new("customer", |c: &Cargo| c.customer.clone())
            .sortable(|a, b| cmp_ignore_case(&a.customer, &b.customer)),
        Column::new("route", route),
        Column::new("created", |c: &Cargo| format_time(c.created_at))
            .sortable(|a, b| a.created_at.cmp(&b.created_at)),
    ])
}

fn route(cargo: &Cargo) -> String {
    format!("{} -> {}", cargo.origin, cargo.destination)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Aligned rows plus a page footer.
pub(super) fn format_cargo_page(page: &Page<&Cargo>) -> String {
    let table = cargo_table();
    let mut out = String::new();

    if page.rows.is_empty() {
        let _ = writeln!(out, "No matching cargo");
    } else {
        let rows: Vec<Vec<String>> = page.rows.iter().map(|c| table.render_row(c)).collect();
        let headers: Vec<&str> = table.columns().iter().map(|c| c.header).collect();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .fold(h.len(), usize::max)
            })
            .collect();

        let _ = writeln!(out, "{}", pad_row(headers.iter().copied(), &widths));
        for row in &rows {
            let _ = writeln!(out, "{}", pad_row(row.iter().map(String::as_str), &widths));
        }
    }

    let _ = writeln!(
        out,
        "page {} of {} ({} cargo)",
        page.page,
        page.page_count.max(1),
        page.total
    );
    out
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// The stepper as a vertical text timeline.
pub(super) fn format_timeline(cargo: &Cargo, steps: &[Step<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}  {} -> {}",
        cargo.reference, cargo.customer, cargo.origin, cargo.destination
    );

    if steps.is_empty() {
        let _ = writeln!(out, "No tracking recorded");
        return out;
    }

    for step in steps {
        let marker = match (step.expandable, step.expanded) {
            (true, true) => "-",
            (true, false) => "+",
            (false, _) => " ",
        };
        let place = step.waypoint.location.as_deref().unwrap_or("(no location)");
        let _ = writeln!(
            out,
            "{marker}{:>3}. [{} {}] {:<14} {}  {}",
            step.index + 1,
            step.color,
            step.icon,
            step.label,
            place,
            format_time(step.waypoint.updated_at),
        );
        if let Some(note) = &step.waypoint.description {
            let _ = writeln!(out, "       {note}");
        }
        for status in &step.history {
            let _ = writeln!(out, "       | {}", format_status(status));
        }
    }
    out
}

fn format_status(status: &LuggageStatus) -> String {
    let label = status_label(Some(&status.status));
    match status.created_at {
        Some(at) => format!("{label:<14} {}", format_time(at)),
        None => format!("{label:<14} (no time)"),
    }
}

/// Every status with how the timeline draws it.
pub(super) fn format_status_legend() -> String {
    let mut out = String::new();
    for kind in StatusKind::ALL {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:<10} {}",
            kind.as_str(),
            kind_label(kind),
            kind_color(kind),
            kind_icon(kind)
        );
    }
    out
}

fn format_time(at: Timestamp) -> String {
    at.strftime("%Y-%m-%d %H:%M").to_string()
}
