//! Terminal rendering of records, the open form and notifications.

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::form::FormController;
use crate::notify::Notification;
use crate::record::Record;

const HEADERS: [&str; 7] = [
    "#",
    "First Name",
    "Last Name",
    "Contact",
    "Does Work",
    "Group",
    "Id",
];

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line per record.
    Plain,
    /// Aligned table with headers.
    #[default]
    Table,
    /// JSON array.
    Json,
}

/// Text for the "Does Work" column.
#[must_use]
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Write the given rows in `format`.
///
/// # Errors
///
/// Returns an error if writing or JSON serialization fails.
pub fn write_records(
    out: &mut impl Write,
    records: &[&Record],
    format: OutputFormat,
    show_ids: bool,
) -> Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, records, show_ids),
        OutputFormat::Table => write_table(out, records, show_ids),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_plain(out: &mut impl Write, records: &[&Record], show_ids: bool) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "(no students)")?;
        return Ok(());
    }
    for (index, record) in records.iter().enumerate() {
        write!(
            out,
            "{}. {} ({}) works: {}",
            index + 1,
            record.full_name(),
            record.group,
            yes_no(record.does_work)
        )?;
        if !record.contact.is_empty() {
            write!(out, " contact: {}", record.contact)?;
        }
        if show_ids {
            write!(out, " [{}]", record.id.short())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_table(out: &mut impl Write, records: &[&Record], show_ids: bool) -> Result<()> {
    let columns = if show_ids {
        HEADERS.len()
    } else {
        HEADERS.len() - 1
    };

    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut row = vec![
                (index + 1).to_string(),
                record.first_name.clone(),
                record.last_name.clone(),
                record.contact.clone(),
                yes_no(record.does_work).to_string(),
                record.group.to_string(),
            ];
            if show_ids {
                row.push(record.id.short());
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS[..columns]
        .iter()
        .map(|header| header.chars().count())
        .collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS[..columns].iter().map(ToString::to_string).collect();
    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(out, &rule, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    if rows.is_empty() {
        writeln!(out, "(no students)")?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

/// Describe the open form and its draft.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_form(out: &mut impl Write, form: &FormController) -> Result<()> {
    let state = form.state();
    if !state.is_open() {
        writeln!(out, "No form open.")?;
        return Ok(());
    }
    let draft = form.draft();
    writeln!(out, "{}", state.title())?;
    writeln!(out, "  First Name: {}", draft.first_name)?;
    writeln!(out, "  Last Name:  {}", draft.last_name)?;
    writeln!(out, "  Contact:    {}", draft.contact)?;
    writeln!(out, "  Does Work:  {}", yes_no(draft.does_work))?;
    writeln!(
        out,
        "  Group:      {}",
        draft.group.map_or("Select Group", |group| group.as_str())
    )?;
    writeln!(out, "  ['submit' to {}]", state.submit_label())?;
    Ok(())
}

/// Write notifications, one per line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_notifications<'a>(
    out: &mut impl Write,
    notifications: impl IntoIterator<Item = &'a Notification>,
) -> Result<()> {
    for notification in notifications {
        writeln!(out, "{notification}")?;
    }
    Ok(())
}
