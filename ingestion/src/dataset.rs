use crate::error::IngestionError;
use crate::genre::Genre;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfwise_core::config::DataConfig;
use shelfwise_core::model::{Catalog, Dataset, Interactions};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>, IngestionError> {
    let file = File::open(path).map_err(|source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), IngestionError> {
    let path = path.as_ref();
    let io_err = |source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
        IngestionError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_err)?;

    debug!("saved {}", path.display());
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, IngestionError> {
    let path = path.as_ref();
    serde_json::from_reader(open_reader(path)?).map_err(|source| IngestionError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

pub fn interactions_path(config: &DataConfig, genre: Genre) -> PathBuf {
    Path::new(&config.users_read_dir).join(format!("{}.json", genre.file_stem()))
}

pub fn catalog_path(config: &DataConfig, genre: Genre) -> PathBuf {
    Path::new(&config.books_dir).join(format!("books_{}.json", genre.file_stem()))
}

/// Loads the cleaned files of every genre and merges them into one dataset.
///
/// A user present in several genres keeps the union of their ratings; on a
/// clash the later genre wins. Book metadata is identical across genres, so
/// catalog entries are simply overwritten.
pub fn load_genres(config: &DataConfig, genres: &[Genre]) -> Result<Dataset, IngestionError> {
    if genres.is_empty() {
        return Err(IngestionError::NoGenres);
    }

    let mut interactions = Interactions::new();
    let mut catalog = Catalog::new();

    for genre in genres {
        let users: Interactions = load_json(interactions_path(config, *genre))?;
        let books: Catalog = load_json(catalog_path(config, *genre))?;
        debug!(
            "genre {}: {} users, {} books",
            genre,
            users.len(),
            books.len()
        );

        for (user_id, ratings) in users {
            interactions.entry(user_id).or_default().extend(ratings);
        }
        catalog.extend(books);
    }

    info!(
        "retrieved {} users and {} books for {} genres",
        interactions.len(),
        catalog.len(),
        genres.len()
    );
    Ok(Dataset::new(interactions, catalog))
}
