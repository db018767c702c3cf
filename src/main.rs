use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use roster_mangler::build::{build_families, filter_min_age};
use roster_mangler::reconcile::users::{user_changes, write_user_changes};
use roster_mangler::reconcile::{EmailIndex, extra_in_mailing_list, missing_from_mailing_list};
use roster_mangler::render;
use roster_mangler::source::{
    EMAIL_COLUMN, MEMBERS_SHEET, VOLUNTEERS_SHEET, Workbook, parse_members, parse_volunteers,
    read_csv, write_rows,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "roster-mangler")]
#[command(about = "Mangle club roster exports and mailing lists", long_about = None)]
struct Cli {
    /// More logging on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the roster export with a mailing-list export and write add/remove lists.
    Merge {
        /// Roster workbook (ODS/XLSX) with "Members" and "Adult Volunteers" sheets.
        roster: PathBuf,

        /// Mailing-list CSV export (email in the first column).
        mailing_list: PathBuf,

        #[arg(long, default_value = "possible_remove.csv")]
        remove_out: PathBuf,

        #[arg(long, default_value = "possible_add.csv")]
        add_out: PathBuf,
    },

    /// Print a family roster built from the roster export.
    Roster {
        roster: PathBuf,

        /// Only keep members at least this old; families without such members are dropped.
        #[arg(long)]
        age_filter: Option<u32>,

        /// Wrap HTML output in a full document.
        #[arg(short = 'b', long)]
        html: bool,

        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },

    /// Compare a website user export with a club member CSV and write add/remove lists.
    Users {
        website_users: PathBuf,
        members: PathBuf,
        new_users_out: PathBuf,
        remove_users_out: PathBuf,

        /// Only consider website users whose "Activated?" column equals this value.
        #[arg(long)]
        activated: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Merge {
            roster,
            mailing_list,
            remove_out,
            add_out,
        } => merge(&roster, &mailing_list, &remove_out, &add_out)?,
        Commands::Roster {
            roster,
            age_filter,
            html,
            format,
        } => {
            let report = roster_report(&roster, age_filter, html, format)?;
            print!("{}", report);
        }
        Commands::Users {
            website_users,
            members,
            new_users_out,
            remove_users_out,
            activated,
        } => {
            let website = read_csv(&website_users)
                .with_context(|| format!("read website users {}", website_users.display()))?;
            let club = read_csv(&members)
                .with_context(|| format!("read members {}", members.display()))?;
            let changes = user_changes(&website, &club, activated.as_deref())?;
            write_user_changes(&changes, &new_users_out, &remove_users_out)
                .context("write user lists")?;
            info!(
                "{} new users, {} users to remove",
                changes.new_users.len(),
                changes.removed_emails.len()
            );
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the report.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn merge(roster: &Path, mailing_list: &Path, remove_out: &Path, add_out: &Path) -> Result<()> {
    // 1) Index roster rows by email.
    let mut book = Workbook::open(roster)?;
    let members = EmailIndex::from_rows(book.sheet(MEMBERS_SHEET)?.rows, EMAIL_COLUMN);
    let adults = EmailIndex::from_rows(book.sheet(VOLUNTEERS_SHEET)?.rows, EMAIL_COLUMN);

    // 2) Index the mailing list.
    let mailing = read_csv(mailing_list)
        .with_context(|| format!("read mailing list {}", mailing_list.display()))?;
    let mailing = EmailIndex::from_rows(mailing.rows, 0);
    info!(
        "{} member, {} adult and {} mailing-list addresses",
        members.len(),
        adults.len(),
        mailing.len()
    );

    // 3) Rows only on the mailing list.
    let extra = extra_in_mailing_list(&mailing, &members, &adults);
    let n = write_rows(remove_out, extra)
        .with_context(|| format!("write {}", remove_out.display()))?;
    info!("wrote {} rows to {}", n, remove_out.display());

    // 4) Roster rows missing from the mailing list, members first.
    let (missing_members, missing_adults) = missing_from_mailing_list(&mailing, &members, &adults);
    let n = write_rows(add_out, missing_members.into_iter().chain(missing_adults))
        .with_context(|| format!("write {}", add_out.display()))?;
    info!("wrote {} rows to {}", n, add_out.display());

    Ok(())
}

fn roster_report(
    roster: &Path,
    age_filter: Option<u32>,
    full_html: bool,
    format: Format,
) -> Result<String> {
    let mut book = Workbook::open(roster)?;
    let members = parse_members(&book.sheet(MEMBERS_SHEET)?);
    let volunteers = parse_volunteers(&book.sheet(VOLUNTEERS_SHEET)?);
    let mut families = build_families(members, volunteers)
        .with_context(|| format!("build families from {}", roster.display()))?;

    if let Some(min_age) = age_filter.filter(|age| *age > 0) {
        let (filtered, num_members) = filter_min_age(families, min_age);
        info!(
            "{} members in {} families after filter",
            num_members,
            filtered.len()
        );
        families = filtered;
    }

    match format {
        Format::Html => render::render_roster_html(&families, full_html),
        Format::Text => render::render_roster_text(&families),
        Format::Json => render::render_roster_json(&families),
    }
}
