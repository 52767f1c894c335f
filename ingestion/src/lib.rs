//! Turns raw Goodreads-style dumps into the normalized maps a session runs on,
//! and persists those maps as JSON.

pub mod books;
pub mod dataset;
pub mod error;
pub mod genre;
pub mod reviews;

pub use dataset::{load_genres, load_json, save_json};
pub use error::IngestionError;
pub use genre::Genre;
