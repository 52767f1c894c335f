use crate::dataset::open_reader;
use crate::error::IngestionError;
use serde::Deserialize;
use shelfwise_core::model::{BookId, BookMetadata, Catalog};
use std::io::BufRead;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct BookRecord {
    book_id: BookId,
    #[serde(flatten)]
    metadata: BookMetadata,
}

/// Keeps title, description, cover image and average rating from each
/// JSON-lines book record.
pub fn read_catalog(reader: impl BufRead) -> Result<Catalog, IngestionError> {
    let mut catalog = Catalog::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: BookRecord = serde_json::from_str(&line)
            .map_err(|source| IngestionError::MalformedRecord {
                line: idx + 1,
                source,
            })?;
        catalog.insert(record.book_id, record.metadata);
    }

    info!("read {} books", catalog.len());
    Ok(catalog)
}

pub fn read_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, IngestionError> {
    read_catalog(open_reader(path.as_ref())?)
}
