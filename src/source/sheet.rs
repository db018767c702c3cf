//! Spreadsheet access: open a roster workbook and pull sheets out as text rows.

use crate::error::{RosterError, RosterResult};
use crate::source::Row;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A sheet with its header row split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub header: Row,
    pub rows: Vec<Row>,
    /// 1-based sheet line of the header row.
    pub header_line: usize,
}

impl Sheet {
    /// The first row is taken as the header; an empty sheet has an empty header.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        Self {
            name: name.into(),
            header,
            rows: rows.collect(),
            header_line: 1,
        }
    }

    /// Text rows of a calamine range, placed back at their sheet coordinates.
    ///
    /// A range starts at its first used cell, so leading blank columns are
    /// padded back in and the header line is taken from the range origin.
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let rows = range
            .rows()
            .map(|cells| {
                let mut row = vec![String::new(); start_col as usize];
                row.extend(cells.iter().map(cell_text));
                row
            })
            .collect();
        Self {
            header_line: start_row as usize + 1,
            ..Self::from_rows(name, rows)
        }
    }

    /// 1-based sheet line of the data row at `idx`.
    pub fn line_of(&self, idx: usize) -> usize {
        self.header_line + 1 + idx
    }
}

/// An opened ODS/XLSX/XLS workbook.
pub struct Workbook {
    path: String,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> RosterResult<Self> {
        let path = path.as_ref();
        let sheets = open_workbook_auto(path).map_err(|e| RosterError::Workbook {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.display().to_string(),
            sheets,
        })
    }

    pub fn sheet(&mut self, name: &str) -> RosterResult<Sheet> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(RosterError::MissingSheet(name.to_string()));
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| RosterError::Workbook {
                path: self.path.clone(),
                message: format!("read sheet '{}': {}", name, e),
            })?;
        let sheet = Sheet::from_range(name, &range);
        tracing::debug!(
            "read {} rows from sheet '{}' starting at line {}",
            range.height(),
            name,
            sheet.header_line
        );
        Ok(sheet)
    }
}

/// Render a cell as the text a person would see in the spreadsheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integral values (ages, zip codes) print without a decimal part.
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n),
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn from_rows_splits_header() {
        let sheet = Sheet::from_rows("Members", vec![row(&["Name", "Email"]), row(&["Lee, Bo", "bo@x.org"])]);
        assert_eq!(sheet.header, row(&["Name", "Email"]));
        assert_eq!(sheet.rows, vec![row(&["Lee, Bo", "bo@x.org"])]);
    }

    #[test]
    fn from_rows_tolerates_empty_sheet() {
        let sheet = Sheet::from_rows("Members", vec![]);
        assert!(sheet.header.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn range_offset_keeps_sheet_lines_and_columns() {
        // Used range B2:C3; row 1 and column A are blank.
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Name".into()));
        range.set_value((1, 2), Data::String("Email".into()));
        range.set_value((2, 1), Data::String("Lee, Bo".into()));
        range.set_value((2, 2), Data::String("bo@x.org".into()));

        let sheet = Sheet::from_range("Members", &range);
        assert_eq!(sheet.header_line, 2);
        assert_eq!(sheet.header, row(&["", "Name", "Email"]));
        assert_eq!(sheet.rows, vec![row(&["", "Lee, Bo", "bo@x.org"])]);
        assert_eq!(sheet.line_of(0), 3);
    }

    #[test]
    fn range_at_origin_is_unshifted() {
        let mut range = Range::new((0, 0), (1, 0));
        range.set_value((0, 0), Data::String("Name".into()));
        range.set_value((1, 0), Data::String("Lee, Bo".into()));

        let sheet = Sheet::from_range("Members", &range);
        assert_eq!(sheet.header_line, 1);
        assert_eq!(sheet.rows, vec![row(&["Lee, Bo"])]);
        assert_eq!(sheet.line_of(0), 2);
    }

    #[test]
    fn cell_text_formats_numbers_like_the_sheet() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Davis".into())), "Davis");
    }

    #[test]
    fn open_missing_workbook_fails() {
        let err = Workbook::open("/nonexistent/roster.ods").err().unwrap();
        assert!(matches!(err, RosterError::Workbook { .. }));
    }
}
