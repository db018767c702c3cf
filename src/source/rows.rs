//! Row schemas for the `Members` and `Adult Volunteers` sheets.
//!
//! Members (0-indexed):
//! [0] "Last, First"  [1] email  [2] phone  [3] address  [4] city
//! [5] parent1 first  [6] parent1 last  [7] parent1 phone
//! [8] parent2 first  [9] parent2 last  [10] parent2 phone  [11] parent2 email
//! [12] age
//!
//! Adult volunteers:
//! [0] "Last, First"  [1] email  [2] role  [5] location ("City, State ...")

use crate::error::MalformedRow;
use crate::model::Person;
use crate::source::sheet::Sheet;
use regex::Regex;
use std::sync::LazyLock;

pub const MEMBERS_SHEET: &str = "Members";
pub const VOLUNTEERS_SHEET: &str = "Adult Volunteers";

/// Column holding the email address on both sheets.
pub const EMAIL_COLUMN: usize = 1;

const MEMBER_AGE_COLUMN: usize = 12;
const VOLUNTEER_LOCATION_COLUMN: usize = 5;

// "Last, First" with exactly one comma.
static LAST_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^,]+?)\s*,\s*([^,]+?)\s*$").expect("name pattern"));

/// One member row: the member plus up to two parents (blank parents are invalid persons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// 1-based line in the spreadsheet.
    pub line: usize,
    pub member: Person,
    pub parent1: Person,
    pub parent2: Person,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerRecord {
    pub line: usize,
    pub person: Person,
}

pub fn parse_member_row(line: usize, row: &[String]) -> Result<MemberRecord, MalformedRow> {
    if row.len() <= MEMBER_AGE_COLUMN {
        return Err(MalformedRow(format!(
            "expected {} columns, found {}",
            MEMBER_AGE_COLUMN + 1,
            row.len()
        )));
    }
    let (last, first) = split_last_first(cell(row, 0))?;
    let age_text = cell(row, MEMBER_AGE_COLUMN);
    let age: u32 = age_text
        .parse()
        .map_err(|_| MalformedRow(format!("bad age {:?}", age_text)))?;

    let member = Person::new(first, last)
        .with_email(cell(row, 1))
        .with_phone(cell(row, 2))
        .with_address(cell(row, 3))
        .with_city(cell(row, 4))
        .with_age(age);
    let parent1 = Person::new(cell(row, 5), cell(row, 6)).with_phone(cell(row, 7));
    let parent2 = Person::new(cell(row, 8), cell(row, 9))
        .with_phone(cell(row, 10))
        .with_email(cell(row, 11));

    Ok(MemberRecord {
        line,
        member,
        parent1,
        parent2,
    })
}

pub fn parse_volunteer_row(line: usize, row: &[String]) -> Result<VolunteerRecord, MalformedRow> {
    if row.len() <= VOLUNTEER_LOCATION_COLUMN {
        return Err(MalformedRow(format!(
            "expected at least {} columns, found {}",
            VOLUNTEER_LOCATION_COLUMN + 1,
            row.len()
        )));
    }
    let (last, first) = split_last_first(cell(row, 0))?;
    let city = cell(row, VOLUNTEER_LOCATION_COLUMN)
        .split(',')
        .next()
        .unwrap_or("")
        .trim();

    let person = Person::new(first, last)
        .with_email(cell(row, 1))
        .with_role(cell(row, 2))
        .with_city(city);
    Ok(VolunteerRecord { line, person })
}

/// Parse every data row of the `Members` sheet, skipping malformed rows.
pub fn parse_members(sheet: &Sheet) -> Vec<MemberRecord> {
    parse_all(sheet, parse_member_row)
}

/// Parse every data row of the `Adult Volunteers` sheet, skipping malformed rows.
pub fn parse_volunteers(sheet: &Sheet) -> Vec<VolunteerRecord> {
    parse_all(sheet, parse_volunteer_row)
}

fn parse_all<T>(sheet: &Sheet, parse: fn(usize, &[String]) -> Result<T, MalformedRow>) -> Vec<T> {
    let mut out = Vec::with_capacity(sheet.rows.len());
    for (idx, row) in sheet.rows.iter().enumerate() {
        let line = sheet.line_of(idx);
        match parse(line, row) {
            Ok(record) => out.push(record),
            Err(e) => tracing::debug!("skipping {} line {}: {}", sheet.name, line, e),
        }
    }
    tracing::info!(
        "parsed {} of {} rows from '{}'",
        out.len(),
        sheet.rows.len(),
        sheet.name
    );
    out
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn split_last_first(text: &str) -> Result<(&str, &str), MalformedRow> {
    let caps = LAST_FIRST_RE
        .captures(text)
        .ok_or_else(|| MalformedRow(format!("name {:?} is not \"Last, First\"", text)))?;
    match (caps.get(1), caps.get(2)) {
        (Some(last), Some(first)) => Ok((last.as_str(), first.as_str())),
        _ => Err(MalformedRow(format!("name {:?} is not \"Last, First\"", text))),
    }
}
