use crate::node::BookNode;
use shelfwise_core::model::{BookId, Catalog};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_PRIOR_WEIGHT: f64 = 3.0;
pub const DEFAULT_MIN_CONNECTIONS: usize = 10;

/// Scores a book for ranking. Higher is more recommendable.
pub trait Metric {
    fn score(&self, book: &BookNode) -> f64;
}

/// Number of users currently connected to the book.
#[derive(Debug, Clone, Copy, Default)]
pub struct Popularity;

impl Metric for Popularity {
    fn score(&self, book: &BookNode) -> f64 {
        book.degree() as f64
    }
}

/// Externally known average rating for a book.
pub trait RatingPrior {
    fn prior(&self, book_id: &str) -> Option<f64>;
}

impl RatingPrior for HashMap<BookId, f64> {
    fn prior(&self, book_id: &str) -> Option<f64> {
        self.get(book_id).copied()
    }
}

impl RatingPrior for Catalog {
    fn prior(&self, book_id: &str) -> Option<f64> {
        self.get(book_id).map(|metadata| metadata.average_rating)
    }
}

/// Bayesian average of the live mean and a catalog prior:
/// `(w * m + n * r) / (w + n)`.
///
/// Books with fewer than `min_connections` raters, or without a prior,
/// score zero so a lone five-star rating never tops the list.
pub struct BayesianRating<'a, P: RatingPrior + ?Sized> {
    priors: &'a P,
    weight: f64,
    min_connections: usize,
}

impl<'a, P: RatingPrior + ?Sized> BayesianRating<'a, P> {
    pub fn new(priors: &'a P) -> Self {
        Self {
            priors,
            weight: DEFAULT_PRIOR_WEIGHT,
            min_connections: DEFAULT_MIN_CONNECTIONS,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_min_connections(mut self, min_connections: usize) -> Self {
        self.min_connections = min_connections;
        self
    }
}

impl<P: RatingPrior + ?Sized> Metric for BayesianRating<'_, P> {
    fn score(&self, book: &BookNode) -> f64 {
        let n = book.degree();
        if n < self.min_connections {
            return 0.0;
        }
        let Some(prior) = self.priors.prior(book.id()) else {
            debug!("no prior rating for book {}, scoring as 0", book.id());
            return 0.0;
        };

        let n = n as f64;
        (self.weight * prior + n * book.rating()) / (self.weight + n)
    }
}
