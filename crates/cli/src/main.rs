// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use roster_import::{
    AuditResult, FloorRecord, LookupIndex, LookupStore, ReferenceData, SiteRecord, SpaceRecord,
    UserRecord, ValidationOptions, audit_with_store,
};
use roster_import_api::{
    PayloadOptions, PayloadRecord, RowIngest, build_payload, preview_line, read_job_rows,
    write_issue_report,
};
use roster_import_domain::{Issue, ReferenceClock};
use roster_import_runner::Feed;
use serde::Deserialize;
use tracing::info;

/// Roster Import - validate job spreadsheets and prepare creation payloads
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every row and print the issue report as CSV
    Audit(CommonArgs),
    /// Print the creation payloads of the importable rows as JSON
    Payloads {
        #[command(flatten)]
        common: CommonArgs,

        /// First part of the traceability label added to every job
        #[arg(long, default_value = "roster-import")]
        trace_prefix: String,

        /// Fixed batch tag; a random one is generated when omitted
        #[arg(long)]
        batch_tag: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the rows CSV file
    #[arg(short, long)]
    rows: PathBuf,

    /// Path to the reference data JSON file (sites, floors, spaces, users)
    #[arg(long)]
    reference: PathBuf,

    /// IANA time zone that defines "today"
    #[arg(long, default_value = "Europe/London")]
    timezone: String,

    /// Civil date to validate against instead of the current one
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Resolve floor and space names outside the row's site or floor when unique
    #[arg(long)]
    unscoped_fallback: bool,
}

/// The reference data file; each feed may be a bare list or `{"data": [...]}`.
#[derive(Debug, Default, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    sites: Feed<SiteRecord>,
    #[serde(default)]
    floors: Feed<FloorRecord>,
    #[serde(default)]
    spaces: Feed<SpaceRecord>,
    #[serde(default)]
    users: Feed<UserRecord>,
}

impl ReferenceFile {
    fn into_data(self) -> ReferenceData {
        ReferenceData {
            sites: self.sites.into_records(),
            floors: self.floors.into_records(),
            spaces: self.spaces.into_records(),
            users: self.users.into_records(),
        }
    }
}

/// Issues and ready rows of one audited file.
struct AuditedBatch {
    issues: Vec<Issue>,
    result: AuditResult,
}

fn load_reference(path: &Path) -> Result<LookupStore> {
    let body: String = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read reference data from {}", path.display()))?;
    let file: ReferenceFile = serde_json::from_str(&body)
        .wrap_err_with(|| format!("Invalid reference data in {}", path.display()))?;

    let store: LookupStore = LookupStore::new();
    store.replace(LookupIndex::build(&file.into_data()));
    Ok(store)
}

fn run_audit(args: &CommonArgs) -> Result<AuditedBatch> {
    let today: NaiveDate = match args.today {
        Some(today) => today,
        None => ReferenceClock::new(&args.timezone)?.today(),
    };
    info!(%today, timezone = %args.timezone, "Auditing rows");

    let store: LookupStore = load_reference(&args.reference)?;
    let csv_content: String = std::fs::read_to_string(&args.rows)
        .wrap_err_with(|| format!("Failed to read rows from {}", args.rows.display()))?;
    let RowIngest { mut rows, issues } = read_job_rows(&csv_content)?;

    let options: ValidationOptions =
        ValidationOptions::default().with_unscoped_fallback(args.unscoped_fallback);
    let result: AuditResult = audit_with_store(&mut rows, &store, today, &options)?;

    Ok(AuditedBatch {
        issues: merge_issues(issues, &result.issues),
        result,
    })
}

/// Interleaves unreadable-record issues with audit issues by row number.
fn merge_issues(mut ingest_issues: Vec<Issue>, audit_issues: &[Issue]) -> Vec<Issue> {
    ingest_issues.extend_from_slice(audit_issues);
    ingest_issues.sort_by_key(|issue| issue.row_number);
    ingest_issues
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli: Cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    match cli.command {
        Command::Audit(args) => {
            let batch: AuditedBatch = run_audit(&args)?;
            write_issue_report(stdout.lock(), &batch.issues)?;
        }
        Command::Payloads {
            common,
            trace_prefix,
            batch_tag,
        } => {
            let batch: AuditedBatch = run_audit(&common)?;
            let mut options: PayloadOptions = PayloadOptions::new(trace_prefix);
            if let Some(tag) = batch_tag {
                options = options.with_batch_tag(tag);
            }

            for job in &batch.result.ready_rows {
                info!("{}", preview_line(job));
            }
            let payloads: Vec<PayloadRecord> = batch
                .result
                .ready_rows
                .iter()
                .map(|job| build_payload(job, &options))
                .collect();
            info!(
                payloads = payloads.len(),
                blocked = batch.result.blocked_rows.len(),
                batch_tag = %options.batch_tag,
                "Built payloads"
            );

            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &payloads)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
