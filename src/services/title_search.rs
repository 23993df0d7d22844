use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
};

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Resolves a free-text title to a catalog row
///
/// Matching is exact after trimming and lower-casing both sides. When several
/// rows share a title the first in catalog order wins.
pub fn resolve_title(catalog: &Catalog, query: &str) -> AppResult<usize> {
    let wanted = normalize(query);
    if wanted.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    catalog
        .movies()
        .iter()
        .position(|movie| normalize(&movie.title) == wanted)
        .ok_or_else(|| AppError::NotFound(query.to_string()))
}
