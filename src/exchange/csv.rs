// CSV encoding for task exchange
//
// Fields are quoted only when they contain a comma, a quote or a line break;
// embedded quotes are doubled. Records end with CRLF. The reader accepts
// CRLF or LF and quoted fields spanning lines.

use anyhow::{Context, Result};
use crate::models::TaskRecord;

pub const HEADER: [&str; 4] = ["ID", "Quadrant", "Description", "Status"];

const STATUS_DONE: &str = "Done";
const STATUS_PENDING: &str = "Pending";

/// Render records as CSV text, header first
pub fn write_records(records: &[TaskRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, &HEADER);
    for record in records {
        let status = if record.done { STATUS_DONE } else { STATUS_PENDING };
        push_row(
            &mut out,
            &[record.id.as_str(), record.quadrant.as_str(), record.description.as_str(), status],
        );
    }
    out
}

/// Parse CSV text into records, locating columns by header name
///
/// `Status` is done when it equals `done` ignoring case; any other value is
/// pending. Blank lines are skipped. A record missing any of the four
/// columns is an error.
pub fn read_records(text: &str) -> Result<Vec<TaskRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = parse_rows(text)?.into_iter();

    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let column = |name: &str| -> Result<usize> {
        header
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV header is missing column '{}'", name))
    };
    let id_col = column("ID")?;
    let quadrant_col = column("Quadrant")?;
    let description_col = column("Description")?;
    let status_col = column("Status")?;

    let width = [id_col, quadrant_col, description_col, status_col]
        .into_iter()
        .max()
        .unwrap_or(0)
        + 1;

    let mut records = Vec::new();
    for (n, row) in rows.enumerate() {
        if row.len() < width {
            anyhow::bail!(
                "CSV record {} has {} fields, expected at least {}",
                n + 1,
                row.len(),
                width
            );
        }
        records.push(TaskRecord {
            id: row[id_col].clone(),
            quadrant: row[quadrant_col].clone(),
            description: row[description_col].clone(),
            done: row[status_col].eq_ignore_ascii_case("done"),
        });
    }
    Ok(records)
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, value) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(value));
    }
    out.push_str("\r\n");
}

fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split CSV text into rows of fields
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Set once the current row has any content, so blank lines are dropped
    let mut row_started = false;
    // A quote opens a quoted field only as the field's first character
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
                row_started = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                field_started = false;
                row_started = true;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if row_started {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                row_started = false;
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
                row_started = true;
            }
        }
    }

    if in_quotes {
        anyhow::bail!("CSV ends inside a quoted field");
    }
    if row_started {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
