use crate::method::SelectionMethod;
use network::{BayesianRating, BookNetwork, NetworkError, Popularity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shelfwise_core::config::RecommendationConfig;
use shelfwise_core::error::{ErrorCode, ShelfwiseError};
use shelfwise_core::model::{BookId, BookMetadata, Catalog, Dataset, UserId};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown selection method: {0}")]
    UnknownMethod(String),
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

impl ShelfwiseError for SessionError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SessionError::UnknownMethod(_) => ErrorCode::InvalidArgument,
            SessionError::Network(err) => err.error_code(),
        }
    }
}

/// A ranked book resolved to its display data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: BookId,
    pub metadata: BookMetadata,
}

/// Verdicts collected by the presentation layer for the last batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub liked: Vec<BookId>,
    #[serde(default)]
    pub disliked: Vec<BookId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackOutcome {
    pub removed_users: Vec<UserId>,
    pub remaining_users: usize,
    pub remaining_books: usize,
}

/// One recommend/reject loop over a single network.
pub struct RecommendationSession {
    network: BookNetwork,
    catalog: Catalog,
    config: RecommendationConfig,
    liked: Vec<BookId>,
    disliked: Vec<BookId>,
}

impl RecommendationSession {
    /// Starts a session whose cohort is every user of the dataset.
    pub fn new(dataset: Dataset, config: RecommendationConfig) -> Result<Self, SessionError> {
        Self::with_cohort(dataset, Vec::new(), config)
    }

    /// Starts a session over `cohort`; an empty cohort means every user.
    pub fn with_cohort(
        dataset: Dataset,
        cohort: Vec<UserId>,
        config: RecommendationConfig,
    ) -> Result<Self, SessionError> {
        let Dataset {
            interactions,
            catalog,
        } = dataset;

        let cohort = if cohort.is_empty() {
            interactions.keys().cloned().collect()
        } else {
            cohort
        };
        let network = BookNetwork::with_threshold(cohort, interactions, config.good_rating)?;

        info!(
            "session started: {} users, {} books, {} catalog entries",
            network.user_count(),
            network.book_count(),
            catalog.len()
        );

        Ok(Self {
            network,
            catalog,
            config,
            liked: Vec::new(),
            disliked: Vec::new(),
        })
    }

    pub fn network(&self) -> &BookNetwork {
        &self.network
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn liked(&self) -> &[BookId] {
        &self.liked
    }

    pub fn disliked(&self) -> &[BookId] {
        &self.disliked
    }

    /// True once every book left in the network has been served.
    pub fn is_exhausted(&self) -> bool {
        self.network.unserved_count() == 0
    }

    pub fn recommend(&mut self, method: SelectionMethod) -> Vec<BookId> {
        self.recommend_with(method, &mut rand::thread_rng())
    }

    /// Same as [`Self::recommend`] with a caller-supplied random source.
    pub fn recommend_with<R: Rng>(
        &mut self,
        method: SelectionMethod,
        rng: &mut R,
    ) -> Vec<BookId> {
        let n = self.config.batch_size;
        let picked = match method {
            SelectionMethod::Rating => {
                let metric = BayesianRating::new(&self.catalog)
                    .with_weight(self.config.prior_weight)
                    .with_min_connections(self.config.min_connections);
                self.network.get_books_by_statistic(&metric, n)
            }
            SelectionMethod::Popularity => self.network.get_books_by_statistic(&Popularity, n),
            SelectionMethod::Random => self.network.get_books_by_random_with(rng, n),
        };

        info!("recommended {} books by {}", picked.len(), method);
        picked
    }

    /// Parses a method name coming from the presentation layer, then ranks.
    pub fn recommend_by_name(&mut self, method: &str) -> Result<Vec<BookId>, SessionError> {
        let method: SelectionMethod = method.parse()?;
        Ok(self.recommend(method))
    }

    pub fn recommend_with_metadata(&mut self, method: SelectionMethod) -> Vec<Recommendation> {
        let ids = self.recommend(method);
        self.resolve(&ids)
    }

    /// Looks up display data. Ids missing from the catalog are dropped.
    pub fn resolve(&self, ids: &[BookId]) -> Vec<Recommendation> {
        ids.iter()
            .filter_map(|id| match self.catalog.get(id) {
                Some(metadata) => Some(Recommendation {
                    id: id.clone(),
                    metadata: metadata.clone(),
                }),
                None => {
                    warn!("book {} has no catalog entry", id);
                    None
                }
            })
            .collect()
    }

    /// Records the verdicts and prunes users who liked a disliked book.
    pub fn apply_feedback(&mut self, feedback: Feedback) -> FeedbackOutcome {
        let Feedback { liked, disliked } = feedback;

        let removed_users = self.network.prune(disliked.as_slice());
        self.liked.extend(liked);
        self.disliked.extend(disliked);

        let outcome = FeedbackOutcome {
            removed_users,
            remaining_users: self.network.user_count(),
            remaining_books: self.network.book_count(),
        };
        info!(
            "feedback removed {} users, {} users remain",
            outcome.removed_users.len(),
            outcome.remaining_users
        );
        outcome
    }
}
