use std::cmp::Ordering;

use crate::{catalog::Catalog, models::Movie};

/// Number of movies in the default "popular" view
pub const POPULAR_COUNT: usize = 10;

/// Highest-rated movies, best first
///
/// Stable: equal scores keep catalog order. Movies without a usable vote
/// average come after all scored ones.
pub fn top_popular(catalog: &Catalog, n: usize) -> Vec<&Movie> {
    let mut movies: Vec<&Movie> = catalog.movies().iter().collect();
    movies.sort_by(|a, b| match (a.vote_average, b.vote_average) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    movies.truncate(n);
    movies
}
