//! Input sources: the roster workbook and CSV exports.

pub mod rows;
pub mod sheet;
pub mod table;

pub use rows::{
    EMAIL_COLUMN, MEMBERS_SHEET, MemberRecord, VOLUNTEERS_SHEET, VolunteerRecord, parse_members,
    parse_volunteers,
};
pub use sheet::{Sheet, Workbook};
pub use table::{Table, read_csv, write_rows};

/// One row of cell text.
pub type Row = Vec<String>;
