use std::env;

use crate::error::MigrateError;

use super::{guests_archive::GuestsArchive, supabase::SupabaseTable, visitors_table::VisitorsTable};

/// Production locations of the source and destination tables.  Values come
/// from the environment (load a `.env` file first), with local defaults.
pub struct ProdDb {}

impl ProdDb {
    pub fn guests() -> GuestsArchive {
        GuestsArchive {
            uri: env_or("MONGO_URI", "mongodb://localhost:27017"),
            database: env_or("MONGO_DB", "signin_app"),
            collection: env_or("MONGO_COLLECTION", "guests"),
        }
    }

    pub fn visitors_duckdb() -> VisitorsTable {
        VisitorsTable {
            duckdb_path: env_or("DUCKDB_PATH", "signin_app.duckdb"),
            table: env_or("VISITORS_TABLE", "signin_app_visitors"),
        }
    }

    pub fn visitors_supabase() -> Result<SupabaseTable, MigrateError> {
        Ok(SupabaseTable {
            url: env_required("SUPABASE_URL")?,
            key: env_required("SUPABASE_KEY")?,
            table: env_or("VISITORS_TABLE", "signin_app_visitors"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_required(key: &str) -> Result<String, MigrateError> {
    env::var(key).map_err(|_| MigrateError::Config(format!("{key} is not set")))
}
