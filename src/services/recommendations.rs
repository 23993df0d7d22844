use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
};

/// Ranks every other movie by content similarity to the movie at `index`
///
/// Scores come from the linear kernel over the precomputed term-weight rows.
/// The sort is a stable sort on the negated score, so equally similar movies
/// keep their catalog order. The movie itself is never part of the result.
///
/// An out-of-range `index` can only come from a bug upstream of the resolver
/// and is reported as an invariant violation.
pub fn rank_similar(catalog: &Catalog, index: usize) -> AppResult<Vec<usize>> {
    let scores = catalog.matrix().linear_kernel(index).ok_or_else(|| {
        AppError::InvariantViolation(format!(
            "rank requested for row {} of a {}-row catalog",
            index,
            catalog.len()
        ))
    })?;

    let mut ranked: Vec<usize> = (0..scores.len()).filter(|&i| i != index).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    tracing::debug!(
        index,
        candidates = ranked.len(),
        "Ranked catalog by similarity"
    );

    Ok(ranked)
}
