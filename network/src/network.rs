use crate::node::{connect, BookNode, Node, NodeKey, UserNode};
use crate::ranking::Metric;
use rand::Rng;
use shelfwise_core::error::{ErrorCode, ShelfwiseError};
use shelfwise_core::model::{BookId, Interactions, Rating, UserId, GOOD_RATING};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("user {0} has no interaction record")]
    UnknownUser(UserId),
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

impl ShelfwiseError for NetworkError {
    fn error_code(&self) -> ErrorCode {
        match self {
            NetworkError::UnknownUser(_) | NetworkError::NodeNotFound(_) => ErrorCode::NotFound,
        }
    }
}

/// Users of similar taste, the books they rated, and the edges between them.
///
/// Nodes are only added at construction. Afterwards the graph shrinks through
/// [`BookNetwork::prune`] and [`BookNetwork::disconnect`].
#[derive(Debug, Clone)]
pub struct BookNetwork {
    users: HashMap<UserId, UserNode>,
    books: HashMap<BookId, BookNode>,
    interactions: Interactions,
    served: HashSet<BookId>,
    good_rating: Rating,
}

impl BookNetwork {
    /// Builds the graph for `cohort`. Every cohort id must be a key of
    /// `interactions`; otherwise nothing is built.
    pub fn new<I, S>(cohort: I, interactions: Interactions) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        Self::with_threshold(cohort, interactions, GOOD_RATING)
    }

    pub fn with_threshold<I, S>(
        cohort: I,
        interactions: Interactions,
        good_rating: Rating,
    ) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        let cohort: Vec<UserId> = cohort.into_iter().map(Into::into).collect();
        if let Some(missing) = cohort.iter().find(|id| !interactions.contains_key(*id)) {
            return Err(NetworkError::UnknownUser(missing.clone()));
        }

        let mut users: HashMap<UserId, UserNode> = HashMap::with_capacity(cohort.len());
        let mut books: HashMap<BookId, BookNode> = HashMap::new();

        for user_id in cohort {
            if users.contains_key(&user_id) {
                debug!("user {} listed twice in cohort, skipping", user_id);
                continue;
            }
            let Some(ratings) = interactions.get(&user_id) else {
                continue;
            };

            let mut user = UserNode::new(user_id.clone(), users.len());
            for (book_id, &rating) in ratings {
                let position = books.len();
                let book = books
                    .entry(book_id.clone())
                    .or_insert_with(|| BookNode::new(book_id.clone(), position));
                connect(&mut user, book);
                book.absorb_rating(rating);
            }
            users.insert(user_id, user);
        }

        info!(
            "built book network with {} users and {} books",
            users.len(),
            books.len()
        );

        Ok(Self {
            users,
            books,
            interactions,
            served: HashSet::new(),
            good_rating,
        })
    }

    pub fn users(&self) -> &HashMap<UserId, UserNode> {
        &self.users
    }

    pub fn books(&self) -> &HashMap<BookId, BookNode> {
        &self.books
    }

    pub fn user(&self, id: &str) -> Option<&UserNode> {
        self.users.get(id)
    }

    pub fn book(&self, id: &str) -> Option<&BookNode> {
        self.books.get(id)
    }

    pub fn node(&self, key: &NodeKey) -> Option<Node<'_>> {
        match key {
            NodeKey::User(id) => self.users.get(id).map(Node::User),
            NodeKey::Book(id) => self.books.get(id).map(Node::Book),
        }
    }

    /// Full rating history the graph was built from. Never mutated.
    pub fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    /// Books already handed out by a ranking call, including since-removed ones.
    pub fn served(&self) -> &HashSet<BookId> {
        &self.served
    }

    pub fn is_served(&self, book_id: &str) -> bool {
        self.served.contains(book_id)
    }

    pub fn good_rating(&self) -> Rating {
        self.good_rating
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.books.is_empty()
    }

    /// Books still in the graph that were never served.
    pub fn unserved_count(&self) -> usize {
        self.books
            .keys()
            .filter(|id| !self.served.contains(*id))
            .count()
    }

    /// Top `n` unserved books by `metric`, ties broken by insertion order.
    /// Returned books are marked served.
    pub fn get_books_by_statistic(&mut self, metric: &dyn Metric, n: usize) -> Vec<BookId> {
        if self.unserved_count() <= n {
            return self.serve_remaining();
        }

        let mut ranked: Vec<(&BookNode, f64)> = self
            .books
            .values()
            .map(|book| (book, metric.score(book)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.position.cmp(&b.0.position)));

        let picked: Vec<BookId> = ranked
            .into_iter()
            .filter(|(book, _)| !self.served.contains(&book.id))
            .take(n)
            .map(|(book, _)| book.id.clone())
            .collect();

        self.served.extend(picked.iter().cloned());
        debug!("served {} books by statistic", picked.len());
        picked
    }

    /// `n` unserved books drawn uniformly from the current book set.
    pub fn get_books_by_random(&mut self, n: usize) -> Vec<BookId> {
        self.get_books_by_random_with(&mut rand::thread_rng(), n)
    }

    pub fn get_books_by_random_with<R: Rng>(
        &mut self,
        rng: &mut R,
        n: usize,
    ) -> Vec<BookId> {
        // Must stay ahead of the draw loop: with n or fewer unserved books
        // left the loop could never finish.
        if self.unserved_count() <= n {
            return self.serve_remaining();
        }

        let candidates: Vec<BookId> = self
            .books_in_order()
            .into_iter()
            .map(|book| book.id.clone())
            .collect();

        let mut picked = Vec::with_capacity(n);
        while picked.len() < n {
            let choice = &candidates[rng.gen_range(0..candidates.len())];
            if self.served.insert(choice.clone()) {
                picked.push(choice.clone());
            }
        }

        debug!("served {} random books", picked.len());
        picked
    }

    /// Disconnects every user who rated any of `rejected` at or above the
    /// good-rating threshold, judged on the full interaction history.
    /// Returns the removed users in cohort order.
    pub fn prune<S: AsRef<str>>(&mut self, rejected: &[S]) -> Vec<UserId> {
        if rejected.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<&UserNode> = self.users.values().collect();
        candidates.sort_by_key(|user| user.position);

        let dissimilar: Vec<UserId> = candidates
            .into_iter()
            .filter(|user| {
                let Some(ratings) = self.interactions.get(&user.id) else {
                    return false;
                };
                rejected.iter().any(|book_id| {
                    ratings
                        .get(book_id.as_ref())
                        .is_some_and(|rating| *rating >= self.good_rating)
                })
            })
            .map(|user| user.id.clone())
            .collect();

        for user_id in &dissimilar {
            self.disconnect_user(user_id);
        }

        info!(
            "pruned {} users, {} users and {} books remain",
            dissimilar.len(),
            self.users.len(),
            self.books.len()
        );
        dissimilar
    }

    /// Removes a node and its edges. Returns every user that left the graph:
    /// the user itself, or the users stranded by a book removal.
    pub fn disconnect(&mut self, key: &NodeKey) -> Result<Vec<UserId>, NetworkError> {
        match key {
            NodeKey::User(id) => {
                if !self.users.contains_key(id) {
                    return Err(NetworkError::NodeNotFound(id.clone()));
                }
                self.disconnect_user(id);
                Ok(vec![id.clone()])
            }
            NodeKey::Book(id) => self.remove_book(id),
        }
    }

    /// Removes a book. Users left without any book are removed as well and
    /// returned.
    pub fn remove_book(&mut self, book_id: &str) -> Result<Vec<UserId>, NetworkError> {
        let book = self
            .books
            .remove(book_id)
            .ok_or_else(|| NetworkError::NodeNotFound(book_id.to_string()))?;

        let mut stranded = Vec::new();
        for user_id in &book.connections {
            let now_empty = match self.users.get_mut(user_id) {
                Some(user) => {
                    user.connections.remove(book_id);
                    user.connections.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.users.remove(user_id);
                stranded.push(user_id.clone());
            }
        }

        debug!(
            "removed book {}, {} stranded users dropped",
            book_id,
            stranded.len()
        );
        Ok(stranded)
    }

    fn disconnect_user(&mut self, user_id: &str) {
        let Some(user) = self.users.remove(user_id) else {
            return;
        };
        let ratings = self.interactions.get(user_id);

        for book_id in &user.connections {
            let Some(book) = self.books.get_mut(book_id) else {
                continue;
            };
            if let Some(rating) = ratings.and_then(|ratings| ratings.get(book_id)) {
                book.retract_rating(*rating);
            }
            book.connections.remove(user_id);
        }

        debug!(
            "disconnected user {} from {} books",
            user_id,
            user.connections.len()
        );
    }

    fn books_in_order(&self) -> Vec<&BookNode> {
        let mut books: Vec<&BookNode> = self.books.values().collect();
        books.sort_by_key(|book| book.position);
        books
    }

    fn serve_remaining(&mut self) -> Vec<BookId> {
        let remaining: Vec<BookId> = self
            .books_in_order()
            .into_iter()
            .filter(|book| !self.served.contains(&book.id))
            .map(|book| book.id.clone())
            .collect();
        self.served.extend(remaining.iter().cloned());
        remaining
    }
}

impl fmt::Display for BookNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BookNetwork(users: {}, books: {}, served: {})",
            self.users.len(),
            self.books.len(),
            self.served.len()
        )
    }
}
