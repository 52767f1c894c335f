//! Bipartite user/book graph that backs an interactive recommendation session.
//!
//! Users and books live in two id-keyed arenas inside [`BookNetwork`]; edges
//! are stored as id sets on both endpoints. Every mutation keeps each book's
//! mean rating equal to the mean over its currently connected users.

pub mod network;
pub mod node;
pub mod ranking;

pub use network::{BookNetwork, NetworkError};
pub use node::{BookNode, Node, NodeKey, NodeKind, UserNode};
pub use ranking::{BayesianRating, Metric, Popularity, RatingPrior};
