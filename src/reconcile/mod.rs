//! Email-keyed set differences between the roster and outside lists.

pub mod users;

use crate::source::Row;
use std::collections::HashMap;

/// Rows keyed by normalized email, iterated in first-insertion order.
///
/// Re-inserting a key replaces its row but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailIndex {
    order: Vec<String>,
    rows: HashMap<String, Row>,
}

/// Emails compare trimmed and lowercased on every side.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl EmailIndex {
    /// Index `rows` by the email in `column`. Rows without an email are skipped.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>, column: usize) -> Self {
        let mut index = Self::default();
        for row in rows {
            let key = row.get(column).map(|e| normalize_email(e)).unwrap_or_default();
            if key.is_empty() {
                continue;
            }
            index.insert(key, row);
        }
        index
    }

    pub fn insert(&mut self, email: impl AsRef<str>, row: Row) {
        let key = normalize_email(email.as_ref());
        if self.rows.insert(key.clone(), row).is_none() {
            self.order.push(key);
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.rows.contains_key(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.order
            .iter()
            .filter_map(|k| self.rows.get(k).map(|row| (k.as_str(), row)))
    }
}

/// Mailing-list rows whose email belongs to no member or adult volunteer.
pub fn extra_in_mailing_list<'a>(
    mailing: &'a EmailIndex,
    members: &EmailIndex,
    adults: &EmailIndex,
) -> Vec<&'a Row> {
    mailing
        .iter()
        .filter(|(email, _)| !members.contains(email) && !adults.contains(email))
        .map(|(_, row)| row)
        .collect()
}

/// Member rows and adult rows (kept apart) whose email is not on the mailing list.
pub fn missing_from_mailing_list<'a>(
    mailing: &EmailIndex,
    members: &'a EmailIndex,
    adults: &'a EmailIndex,
) -> (Vec<&'a Row>, Vec<&'a Row>) {
    let missing = |index: &'a EmailIndex| -> Vec<&'a Row> {
        index
            .iter()
            .filter(|(email, _)| !mailing.contains(email))
            .map(|(_, row)| row)
            .collect()
    };
    (missing(members), missing(adults))
}
