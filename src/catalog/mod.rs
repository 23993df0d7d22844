//! Catalog store: the movie table and its parallel similarity matrix.
//!
//! Both are loaded once from a single JSON artifact and are read-only
//! afterwards. Row `i` of the matrix describes movie `i`; that alignment is
//! checked here, at the load boundary, and trusted everywhere else.

mod matrix;

#[cfg(test)]
pub(crate) mod fixtures;

pub use matrix::{SimilarityMatrix, SparseRow};

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{error::CatalogError, models::Movie};

/// On-disk layout of the precomputed artifact
#[derive(Debug, Deserialize)]
pub struct Artifact {
    pub movies: Vec<Movie>,
    pub matrix: SimilarityMatrix,
}

#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
    matrix: SimilarityMatrix,
}

impl Catalog {
    /// Builds a catalog, refusing mismatched or structurally invalid matrices
    pub fn new(movies: Vec<Movie>, matrix: SimilarityMatrix) -> Result<Self, CatalogError> {
        if movies.len() != matrix.row_count() {
            return Err(CatalogError::RowCountMismatch {
                catalog: movies.len(),
                matrix: matrix.row_count(),
            });
        }

        matrix
            .validate()
            .map_err(|(row, reason)| CatalogError::InvalidRow { row, reason })?;

        Ok(Self { movies, matrix })
    }

    pub fn from_artifact(artifact: Artifact) -> Result<Self, CatalogError> {
        Self::new(artifact.movies, artifact.matrix)
    }

    /// Loads and validates the artifact at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let artifact: Artifact = serde_json::from_reader(reader)?;
        let catalog = Self::from_artifact(artifact)?;

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            vocabulary = catalog.matrix.vocabulary_size(),
            "Loaded catalog artifact"
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}
