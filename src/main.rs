use std::{error::Error, path::PathBuf, process::exit};

use clap::{Parser, ValueEnum};
use jiff::tz::TimeZone;

use signin_migrate::{
    db::prod_db::ProdDb,
    migrate::{run, Destination, MigrateOptions, Source},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    Duckdb,
    Supabase,
}

/// Copy the visitor sign-in records from MongoDB into the visitors table.
/// Connection settings are read from the environment (and a `.env` file),
/// the flags below override them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MongoDB connection string, overrides MONGO_URI
    #[arg(long)]
    mongo_uri: Option<String>,

    /// Database holding the guests collection, overrides MONGO_DB
    #[arg(long)]
    mongo_db: Option<String>,

    /// Overrides MONGO_COLLECTION
    #[arg(long)]
    collection: Option<String>,

    /// Read the documents from a json snapshot instead of MongoDB
    #[arg(long, value_name = "PATH")]
    from_snapshot: Option<PathBuf>,

    /// Where to write the snapshot of the fetched documents
    #[arg(long, value_name = "PATH", default_value = "data.json")]
    snapshot: PathBuf,

    /// Don't write a snapshot
    #[arg(long)]
    no_snapshot: bool,

    #[arg(long, value_enum, default_value_t = Target::Duckdb)]
    destination: Target,

    /// Overrides DUCKDB_PATH
    #[arg(long)]
    duckdb_path: Option<String>,

    /// Destination table, overrides VISITORS_TABLE
    #[arg(long)]
    table: Option<String>,

    /// IANA time zone the sign-in times were recorded in
    #[arg(long, default_value = "UTC")]
    tz: String,

    /// Transform the records but don't write them
    #[arg(long)]
    dry_run: bool,
}

fn source(args: &Args) -> Source {
    if let Some(path) = &args.from_snapshot {
        return Source::Snapshot(path.clone());
    }
    let mut archive = ProdDb::guests();
    if let Some(uri) = &args.mongo_uri {
        archive.uri = uri.clone();
    }
    if let Some(db) = &args.mongo_db {
        archive.database = db.clone();
    }
    if let Some(collection) = &args.collection {
        archive.collection = collection.clone();
    }
    Source::Mongo(archive)
}

fn destination(args: &Args) -> Result<Destination, Box<dyn Error>> {
    let destination = match args.destination {
        Target::Duckdb => {
            let mut table = ProdDb::visitors_duckdb();
            if let Some(path) = &args.duckdb_path {
                table.duckdb_path = path.clone();
            }
            if let Some(name) = &args.table {
                table.table = name.clone();
            }
            Destination::DuckDb(table)
        }
        Target::Supabase => {
            let mut table = ProdDb::visitors_supabase()?;
            if let Some(name) = &args.table {
                table.table = name.clone();
            }
            Destination::Supabase(table)
        }
    };
    Ok(destination)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let options = MigrateOptions {
        tz: TimeZone::get(&args.tz)?,
        snapshot: (!args.no_snapshot).then(|| args.snapshot.clone()),
        dry_run: args.dry_run,
    };
    let source = source(&args);
    let destination = destination(&args)?;

    match run(&source, &destination, &options).await {
        Ok(_) => log::info!("Process completed successfully"),
        Err(e) => {
            log::error!("Error in the migration: {}", e);
            exit(1);
        }
    }
    Ok(())
}
