//! One migration run: extract the guest documents, keep a json snapshot,
//! reshape them and upsert the rows.

use std::{fmt::Display, path::PathBuf};

use duckdb::Connection;
use jiff::tz::TimeZone;
use log::{error, info};

use crate::{
    db::{
        guests_archive::{read_snapshot, write_snapshot, GuestsArchive},
        supabase::SupabaseTable,
        visitors_table::VisitorsTable,
    },
    error::MigrateError,
    visitor::{GuestDocument, VisitorRow},
};

pub enum Source {
    Mongo(GuestsArchive),
    /// A json file written by an earlier run.
    Snapshot(PathBuf),
}

impl Source {
    pub async fn get_documents(&self) -> Result<Vec<GuestDocument>, MigrateError> {
        match self {
            Source::Mongo(archive) => archive.get_documents().await,
            Source::Snapshot(path) => read_snapshot(path),
        }
    }
}

pub enum Destination {
    DuckDb(VisitorsTable),
    Supabase(SupabaseTable),
}

impl Destination {
    pub async fn upsert(&self, rows: &[VisitorRow]) -> Result<usize, MigrateError> {
        match self {
            Destination::DuckDb(table) => {
                let conn = Connection::open(&table.duckdb_path)?;
                Ok(table.upsert(&conn, rows)?)
            }
            Destination::Supabase(table) => table.upsert(rows).await,
        }
    }
}

pub struct MigrateOptions {
    /// Zone the sign-in app recorded its wall clock times in.
    pub tz: TimeZone,
    /// Where to write the snapshot of the source documents, if anywhere.
    pub snapshot: Option<PathBuf>,
    pub dry_run: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            tz: TimeZone::UTC,
            snapshot: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub documents: usize,
    /// Documents without an id, which can't be upserted.
    pub skipped: usize,
    pub rows_written: usize,
    pub missing_visit_date: usize,
    pub missing_sign_in: usize,
    pub missing_sign_out: usize,
}

impl Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} documents, {} skipped, {} rows written ({} without visit date, {} without sign in, {} without sign out)",
            self.documents,
            self.skipped,
            self.rows_written,
            self.missing_visit_date,
            self.missing_sign_in,
            self.missing_sign_out
        )
    }
}

/// Reshape the documents into rows.  The report has everything but
/// `rows_written` filled in.
pub fn transform(docs: &[GuestDocument], tz: &TimeZone) -> (Vec<VisitorRow>, MigrationReport) {
    let mut report = MigrationReport {
        documents: docs.len(),
        ..Default::default()
    };
    let mut rows: Vec<VisitorRow> = Vec::with_capacity(docs.len());
    for doc in docs {
        if doc.id.trim().is_empty() {
            error!("Skipping guest document without an id: {:?}", doc);
            report.skipped += 1;
            continue;
        }
        let row = VisitorRow::from_document(doc, tz);
        report.missing_visit_date += row.visit_date.is_none() as usize;
        report.missing_sign_in += row.signed_in_at.is_none() as usize;
        report.missing_sign_out += row.signed_out_at.is_none() as usize;
        rows.push(row);
    }
    (rows, report)
}

pub async fn run(
    source: &Source,
    destination: &Destination,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrateError> {
    let docs = source.get_documents().await?;
    if let (Source::Mongo(_), Some(path)) = (source, &options.snapshot) {
        write_snapshot(path, &docs)?;
    }

    let (rows, mut report) = transform(&docs, &options.tz);
    if options.dry_run {
        info!("dry run, not writing {} rows", rows.len());
    } else {
        report.rows_written = destination.upsert(&rows).await?;
    }
    info!("{}", report);
    Ok(report)
}
