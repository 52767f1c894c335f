use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::SessionError;

/// How a batch of books is picked from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Bayesian average of live mean and catalog rating.
    Rating,
    /// Most connected books first.
    Popularity,
    /// Uniform draw, no signal.
    #[default]
    Random,
}

impl SelectionMethod {
    pub const ALL: [SelectionMethod; 3] = [
        SelectionMethod::Random,
        SelectionMethod::Rating,
        SelectionMethod::Popularity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Rating => "rating",
            SelectionMethod::Popularity => "popularity",
            SelectionMethod::Random => "random",
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SelectionMethod {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SelectionMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == normalized)
            .ok_or_else(|| SessionError::UnknownMethod(s.to_string()))
    }
}
