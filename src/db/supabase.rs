use log::{error, info};
use reqwest::Client;

use crate::{error::MigrateError, visitor::VisitorRow};

/// A table behind the Supabase REST (PostgREST) interface.
#[derive(Clone, Debug)]
pub struct SupabaseTable {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl SupabaseTable {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}?on_conflict=id",
            self.url.trim_end_matches('/'),
            self.table
        )
    }

    /// Upsert all rows in one request, merging on `id`.
    pub async fn upsert(&self, rows: &[VisitorRow]) -> Result<usize, MigrateError> {
        if rows.is_empty() {
            return Ok(0);
        }
        info!("upserting {} rows into supabase table {} ...", rows.len(), self.table);
        let response = Client::new()
            .post(self.endpoint())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error upserting data to Supabase: {} {}", status, body);
            return Err(MigrateError::Supabase {
                status: status.as_u16(),
                body,
            });
        }
        info!("done");
        Ok(rows.len())
    }
}
