use serde::Serialize;
use shelfwise_core::model::{BookId, Rating, UserId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    User,
    Book,
}

/// Addresses a node inside a [`crate::BookNetwork`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    User(UserId),
    Book(BookId),
}

impl NodeKey {
    pub fn user(id: impl Into<UserId>) -> Self {
        Self::User(id.into())
    }

    pub fn book(id: impl Into<BookId>) -> Self {
        Self::Book(id.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeKey::User(_) => NodeKind::User,
            NodeKey::Book(_) => NodeKind::Book,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            NodeKey::User(id) | NodeKey::Book(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserNode {
    pub(crate) id: UserId,
    pub(crate) connections: BTreeSet<BookId>,
    pub(crate) position: usize,
}

impl UserNode {
    pub(crate) fn new(id: UserId, position: usize) -> Self {
        Self {
            id,
            connections: BTreeSet::new(),
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ids of the books this user is connected to.
    pub fn connections(&self) -> &BTreeSet<BookId> {
        &self.connections
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookNode {
    pub(crate) id: BookId,
    pub(crate) connections: BTreeSet<UserId>,
    pub(crate) rating: Rating,
    pub(crate) position: usize,
}

impl BookNode {
    pub(crate) fn new(id: BookId, position: usize) -> Self {
        Self {
            id,
            connections: BTreeSet::new(),
            rating: 0.0,
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ids of the users connected to this book.
    pub fn connections(&self) -> &BTreeSet<UserId> {
        &self.connections
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Mean rating over the connected users.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Order in which the book entered the graph.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Folds a rating into the mean. Call after the rater's edge is inserted.
    pub(crate) fn absorb_rating(&mut self, rating: Rating) {
        let n = self.connections.len() as f64;
        if n <= 1.0 {
            self.rating = rating;
        } else {
            self.rating = self.rating * ((n - 1.0) / n) + rating / n;
        }
    }

    /// Removes a rating from the mean. Call before the rater's edge is removed.
    /// With a single rater left the mean is kept as is.
    pub(crate) fn retract_rating(&mut self, rating: Rating) {
        let n = self.connections.len() as f64;
        if n > 1.0 {
            self.rating = self.rating * (n / (n - 1.0)) - rating / (n - 1.0);
        }
    }
}

/// Links a user and a book in both directions. Re-linking is a no-op.
pub(crate) fn connect(user: &mut UserNode, book: &mut BookNode) {
    user.connections.insert(book.id.clone());
    book.connections.insert(user.id.clone());
}

/// Borrowed view of either kind of node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    User(&'a UserNode),
    Book(&'a BookNode),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match *self {
            Node::User(_) => NodeKind::User,
            Node::Book(_) => NodeKind::Book,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            Node::User(user) => user.id(),
            Node::Book(book) => book.id(),
        }
    }

    pub fn connections(&self) -> &'a BTreeSet<String> {
        match *self {
            Node::User(user) => user.connections(),
            Node::Book(book) => book.connections(),
        }
    }

    pub fn rating(&self) -> Option<Rating> {
        match *self {
            Node::User(_) => None,
            Node::Book(book) => Some(book.rating()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_is_bidirectional_and_idempotent() {
        let mut user = UserNode::new("u1".into(), 0);
        let mut book = BookNode::new("b1".into(), 0);

        connect(&mut user, &mut book);
        connect(&mut user, &mut book);

        assert_eq!(user.degree(), 1);
        assert_eq!(book.degree(), 1);
        assert!(user.connections().contains("b1"));
        assert!(book.connections().contains("u1"));
    }

    #[test]
    fn absorb_then_retract_restores_mean() {
        let mut book = BookNode::new("b1".into(), 0);
        for (idx, rating) in [4.0, 2.0, 3.0].into_iter().enumerate() {
            book.connections.insert(format!("u{idx}"));
            book.absorb_rating(rating);
        }
        assert!((book.rating() - 3.0).abs() < 1e-9);

        book.retract_rating(2.0);
        book.connections.remove("u1");
        assert!((book.rating() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn retract_keeps_mean_of_last_rater() {
        let mut book = BookNode::new("b1".into(), 0);
        book.connections.insert("u1".into());
        book.absorb_rating(4.5);

        book.retract_rating(4.5);
        assert_eq!(book.rating(), 4.5);
    }

    #[test]
    fn node_view_exposes_kind_specific_fields() {
        let user = UserNode::new("u1".into(), 0);
        let mut book = BookNode::new("b1".into(), 0);
        book.rating = 4.0;

        assert_eq!(Node::User(&user).kind(), NodeKind::User);
        assert_eq!(Node::User(&user).rating(), None);
        assert_eq!(Node::Book(&book).rating(), Some(4.0));
        assert_eq!(NodeKey::book("b1").kind(), NodeKind::Book);
        assert_eq!(NodeKey::user("u1").id(), "u1");
    }

    #[test]
    fn book_node_serializes_for_inspection() {
        let mut user = UserNode::new("u1".into(), 0);
        let mut book = BookNode::new("b1".into(), 3);
        connect(&mut user, &mut book);
        book.absorb_rating(4.0);

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["id"], "b1");
        assert_eq!(json["rating"], 4.0);
        assert_eq!(json["connections"], serde_json::json!(["u1"]));
    }
}
