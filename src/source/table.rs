//! CSV exports: reading header + rows, writing plain row lists.

use crate::error::{RosterError, RosterResult};
use crate::source::Row;
use std::path::Path;

/// A CSV file with its header row split off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub header: Row,
    pub rows: Vec<Row>,
}

impl Table {
    /// Index of a named header column.
    pub fn column(&self, column: &str) -> RosterResult<usize> {
        self.header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| RosterError::MissingColumn {
                source_name: self.name.clone(),
                column: column.to_string(),
            })
    }
}

pub fn read_csv(path: impl AsRef<Path>) -> RosterResult<Table> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Row>());
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let table = Table {
        name: path.display().to_string(),
        header,
        rows: rows.collect(),
    };
    tracing::debug!("read {} rows from {}", table.rows.len(), table.name);
    Ok(table)
}

/// Write rows (no header) to `path`, replacing any existing file.
pub fn write_rows<'a>(
    path: impl AsRef<Path>,
    rows: impl IntoIterator<Item = &'a Row>,
) -> RosterResult<usize> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())?;
    let mut written = 0;
    for row in rows {
        writer.write_record(row)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
