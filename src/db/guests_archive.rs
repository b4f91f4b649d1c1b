use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use futures::TryStreamExt;
use log::{error, info};
use mongodb::{
    bson::{doc, Document},
    Client, Collection,
};

use crate::{error::MigrateError, visitor::GuestDocument};

/// The `guests` collection in MongoDB.
#[derive(Clone, Debug)]
pub struct GuestsArchive {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl GuestsArchive {
    /// Read every document in the collection.  Documents that don't
    /// deserialize are logged and left out.
    pub async fn get_documents(&self) -> Result<Vec<GuestDocument>, MigrateError> {
        info!(
            "fetching documents from {}.{} ...",
            self.database, self.collection
        );
        let client = Client::with_uri_str(&self.uri).await?;
        let coll: Collection<Document> = client
            .database(&self.database)
            .collection(&self.collection);

        let mut cursor = coll.find(doc! {}).await?;
        let mut docs: Vec<GuestDocument> = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            let id = raw.get("_id").map(|e| e.to_string()).unwrap_or_default();
            match GuestDocument::from_document(raw) {
                Ok(guest) => docs.push(guest),
                Err(e) => error!("Skipping guest document {}: {}", id, e),
            }
        }
        info!("fetched {} documents", docs.len());
        Ok(docs)
    }
}

/// Write the fetched documents to a pretty-printed json file.
pub fn write_snapshot(path: &Path, docs: &[GuestDocument]) -> Result<(), MigrateError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, docs)?;
    info!("\"{}\" has been created", path.display());
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<GuestDocument>, MigrateError> {
    let file = BufReader::new(File::open(path)?);
    let docs: Vec<GuestDocument> = serde_json::from_reader(file)?;
    info!("read {} documents from {}", docs.len(), path.display());
    Ok(docs)
}
