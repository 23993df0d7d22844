use serde::Deserialize;
use std::cmp::Ordering;

/// One sparse term-weight vector, column indices strictly increasing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SparseRow {
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseRow {
    pub fn new(indices: Vec<u32>, values: Vec<f64>) -> Self {
        Self { indices, values }
    }

    /// Linear kernel: dot product over shared columns
    ///
    /// Accumulates in ascending column order, so `a.dot(b)` and `b.dot(a)`
    /// are bit-identical.
    pub fn dot(&self, other: &SparseRow) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }

    fn validate(&self, vocabulary_size: usize) -> Result<(), String> {
        if self.indices.len() != self.values.len() {
            return Err(format!(
                "{} indices but {} values",
                self.indices.len(),
                self.values.len()
            ));
        }

        if let Some(pair) = self.indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "column {} follows column {}, indices must be strictly increasing",
                pair[1], pair[0]
            ));
        }

        if let Some(&last) = self.indices.last() {
            if last as usize >= vocabulary_size {
                return Err(format!(
                    "column {} outside vocabulary of {}",
                    last, vocabulary_size
                ));
            }
        }

        if let Some(bad) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(format!("non-finite weight {}", bad));
        }

        Ok(())
    }
}

/// Precomputed document-term matrix, one row per catalog record
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityMatrix {
    vocabulary_size: usize,
    rows: Vec<SparseRow>,
}

impl SimilarityMatrix {
    pub fn new(vocabulary_size: usize, rows: Vec<SparseRow>) -> Self {
        Self {
            vocabulary_size,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Similarity of row `index` against every row, in row order
    ///
    /// Returns `None` when `index` is not a row of this matrix.
    pub fn linear_kernel(&self, index: usize) -> Option<Vec<f64>> {
        let query = self.rows.get(index)?;
        Some(self.rows.iter().map(|row| query.dot(row)).collect())
    }

    /// Checks every row's structure, reporting the first offending row
    pub(crate) fn validate(&self) -> Result<(), (usize, String)> {
        self.rows
            .iter()
            .enumerate()
            .try_for_each(|(i, row)| row.validate(self.vocabulary_size).map_err(|e| (i, e)))
    }
}
