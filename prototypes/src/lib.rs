use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shelfwise_core::model::{BookId, BookMetadata, Catalog, Dataset, Interactions, Rating};
use std::collections::BTreeMap;

/// Shape of a generated dataset.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSpec {
    pub users: usize,
    pub books: usize,
    pub ratings_per_user: usize,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            users: 1_000,
            books: 400,
            ratings_per_user: 12,
            seed: 42,
        }
    }
}

/// Builds a reproducible dataset. Book popularity is skewed toward low ids
/// so rankings have a clear head and a long tail.
pub fn synthetic_dataset(spec: SyntheticSpec) -> Dataset {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let per_user = spec.ratings_per_user.min(spec.books);

    let mut interactions = Interactions::new();
    for user in 0..spec.users {
        let mut ratings: BTreeMap<BookId, Rating> = BTreeMap::new();
        while ratings.len() < per_user {
            let skewed = rng.gen::<f64>().powi(2);
            let book = (skewed * spec.books as f64) as usize;
            let rating = rng.gen_range(1..=5) as Rating;
            ratings.insert(book_id(book), rating);
        }
        interactions.insert(format!("user-{user:06}"), ratings);
    }

    let catalog: Catalog = (0..spec.books)
        .map(|book| {
            let metadata = BookMetadata {
                title: format!("Book {book}"),
                description: String::new(),
                image_url: String::new(),
                average_rating: rng.gen_range(2.5..4.8),
            };
            (book_id(book), metadata)
        })
        .collect();

    Dataset::new(interactions, catalog)
}

fn book_id(book: usize) -> BookId {
    format!("book-{book:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        let spec = SyntheticSpec {
            users: 20,
            books: 15,
            ratings_per_user: 4,
            seed: 3,
        };
        assert_eq!(synthetic_dataset(spec), synthetic_dataset(spec));
    }

    #[test]
    fn respects_requested_shape() {
        let spec = SyntheticSpec {
            users: 30,
            books: 5,
            ratings_per_user: 8,
            seed: 1,
        };
        let dataset = synthetic_dataset(spec);

        assert_eq!(dataset.interactions.len(), 30);
        assert_eq!(dataset.catalog.len(), 5);
        assert!(dataset.interactions.values().all(|ratings| ratings.len() == 5));
        assert!(dataset
            .interactions
            .values()
            .flat_map(|ratings| ratings.values())
            .all(|rating| (1.0..=5.0).contains(rating)));
    }
}
