use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type UserId = String;
pub type BookId = String;
pub type Rating = f64;

/// Ratings at or above this value mean the user liked the book.
pub const GOOD_RATING: Rating = 3.5;

/// user-id -> (book-id -> rating). Ordered so cohort and item traversal are stable.
pub type Interactions = BTreeMap<UserId, BTreeMap<BookId, Rating>>;

pub type Catalog = HashMap<BookId, BookMetadata>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(deserialize_with = "number_or_string")]
    pub average_rating: f64,
}

/// Everything a session needs: the rating source of truth plus display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub interactions: Interactions,
    pub catalog: Catalog,
}

impl Dataset {
    pub fn new(interactions: Interactions, catalog: Catalog) -> Self {
        Self {
            interactions,
            catalog,
        }
    }
}

// Goodreads dumps store average_rating as a string ("4.12").
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) if text.trim().is_empty() => Ok(0.0),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
