use thiserror::Error;

/// Failures that abort a migration run.  Per-field normalization problems
/// never end up here, see [`crate::normalize::NormalizeError`].
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("duckdb: {0}")]
    DuckDb(#[from] duckdb::Error),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase upsert failed with status {status}: {body}")]
    Supabase { status: u16, body: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Config(String),
}
