use crate::dataset::open_reader;
use crate::error::IngestionError;
use serde::Deserialize;
use shelfwise_core::model::{BookId, Interactions, Rating, UserId};
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// One line of a raw review dump. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ReviewRecord {
    user_id: UserId,
    book_id: BookId,
    rating: Rating,
}

/// Folds JSON-lines review records into user -> {book -> rating}.
/// A later review of the same book by the same user replaces the earlier one.
pub fn read_interactions(reader: impl BufRead) -> Result<Interactions, IngestionError> {
    let mut interactions = Interactions::new();
    let mut reviews = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ReviewRecord = serde_json::from_str(&line)
            .map_err(|source| IngestionError::MalformedRecord {
                line: idx + 1,
                source,
            })?;

        interactions
            .entry(record.user_id)
            .or_default()
            .insert(record.book_id, record.rating);
        reviews += 1;
    }

    info!(
        "read {} reviews from {} users",
        reviews,
        interactions.len()
    );
    Ok(interactions)
}

pub fn read_interactions_file(path: impl AsRef<Path>) -> Result<Interactions, IngestionError> {
    read_interactions(open_reader(path.as_ref())?)
}
