//! Website account upkeep: which club members need an account, and which
//! accounts no longer belong to a member.

use crate::error::RosterResult;
use crate::reconcile::EmailIndex;
use crate::source::Table;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const WEBSITE_EMAIL: &str = "Email";
const WEBSITE_ACTIVATED: &str = "Activated?";
const WEBSITE_USERNAME: &str = "Choose a Username";
const ROSTER_EMAIL: &str = "Family: Family Email";
const ROSTER_LAST_NAME: &str = "Member: Last Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub new_users: Vec<NewUser>,
    pub removed_emails: Vec<String>,
}

/// Compare a website user export with a club roster export.
///
/// When `activated` is set, only website rows whose activation column equals
/// it are considered. Roster entries whose last name is already taken as a
/// website username are not proposed.
pub fn user_changes(
    website: &Table,
    roster: &Table,
    activated: Option<&str>,
) -> RosterResult<UserChanges> {
    let web_email = website.column(WEBSITE_EMAIL)?;
    let web_username = website.column(WEBSITE_USERNAME)?;
    let roster_email = roster.column(ROSTER_EMAIL)?;
    let roster_last = roster.column(ROSTER_LAST_NAME)?;

    let website_rows: Vec<_> = match activated {
        Some(wanted) => {
            let col = website.column(WEBSITE_ACTIVATED)?;
            website
                .rows
                .iter()
                .filter(|r| r.get(col).map(String::as_str) == Some(wanted))
                .cloned()
                .collect()
        }
        None => website.rows.clone(),
    };
    let web = EmailIndex::from_rows(website_rows, web_email);
    let club = EmailIndex::from_rows(roster.rows.iter().cloned(), roster_email);

    let usernames: HashSet<String> = web
        .iter()
        .filter_map(|(_, row)| row.get(web_username))
        .map(|u| u.to_lowercase())
        .collect();

    let new_users = club
        .iter()
        .filter(|(email, _)| !web.contains(email))
        .filter_map(|(email, row)| {
            let username = row.get(roster_last).cloned().unwrap_or_default();
            if usernames.contains(&username.to_lowercase()) {
                tracing::debug!("{} already has username {}", email, username);
                return None;
            }
            Some(NewUser {
                username,
                email: email.to_string(),
            })
        })
        .collect();

    let removed_emails = web
        .iter()
        .filter(|(email, _)| !club.contains(email))
        .map(|(email, _)| email.to_string())
        .collect();

    Ok(UserChanges {
        new_users,
        removed_emails,
    })
}

/// Write "username, email" lines and bare removal emails to two files.
pub fn write_user_changes(
    changes: &UserChanges,
    new_users_path: impl AsRef<Path>,
    remove_users_path: impl AsRef<Path>,
) -> RosterResult<()> {
    {
        let mut out = BufWriter::new(File::create(new_users_path)?);
        for user in &changes.new_users {
            writeln!(out, "{}, {}", user.username, user.email)?;
        }
        out.flush()?;
    }
    let mut out = BufWriter::new(File::create(remove_users_path)?);
    for email in &changes.removed_emails {
        writeln!(out, "{}", email)?;
    }
    out.flush()?;
    Ok(())
}
