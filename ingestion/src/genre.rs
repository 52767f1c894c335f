use crate::error::IngestionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    ComicsGraphic,
    FantasyParanormal,
    MysteryThrillerCrime,
    Romance,
    YoungAdult,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::ComicsGraphic,
        Genre::FantasyParanormal,
        Genre::MysteryThrillerCrime,
        Genre::Romance,
        Genre::YoungAdult,
    ];

    /// Name shared by the genre's review and book files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Genre::ComicsGraphic => "comics_graphic",
            Genre::FantasyParanormal => "fantasy_paranormal",
            Genre::MysteryThrillerCrime => "mystery_thriller_crime",
            Genre::Romance => "romance",
            Genre::YoungAdult => "young_adult",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Genre::ComicsGraphic => "Comics and Graphic Novels",
            Genre::FantasyParanormal => "Fantasy and Paranormal",
            Genre::MysteryThrillerCrime => "Mystery, Thriller, and Crime",
            Genre::Romance => "Romance",
            Genre::YoungAdult => "Young Adult",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

impl FromStr for Genre {
    type Err = IngestionError;

    /// Accepts the file stem or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Genre::ALL
            .into_iter()
            .find(|genre| {
                genre.file_stem() == normalized || genre.label().to_lowercase() == normalized
            })
            .ok_or_else(|| IngestionError::UnknownGenre(s.to_string()))
    }
}
