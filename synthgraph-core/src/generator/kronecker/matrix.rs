//! Kronecker seed matrix loading and digit-wise edge probabilities.

use std::{fs, path::Path, str::FromStr, sync::Arc};

use crate::error::SeedMatrixError;

/// Square matrix of edge probabilities in `[0, 1]`.
///
/// # Examples
/// ```
/// use synthgraph_core::SeedMatrix;
///
/// let matrix: SeedMatrix = "0.9 0.5\n0.5 0.1\n".parse()?;
/// assert_eq!(matrix.dimension(), 2);
/// assert_eq!(matrix.get(1, 0), 0.5);
/// // Vertex 3 is digits (1, 1) and vertex 0 is (0, 0) at depth 2.
/// assert!((matrix.edge_probability(2, 3, 0) - 0.25).abs() < 1e-12);
/// # Ok::<(), synthgraph_core::SeedMatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeedMatrix {
    dimension: usize,
    cells: Arc<[f64]>,
}

impl SeedMatrix {
    /// Validates `rows` and builds the matrix.
    ///
    /// # Errors
    /// Returns [`SeedMatrixError::Empty`] without rows,
    /// [`SeedMatrixError::NotSquare`] when a row length differs from the row
    /// count and [`SeedMatrixError::ProbabilityOutOfRange`] for entries outside
    /// `[0, 1]` (including NaN).
    pub fn try_from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SeedMatrixError> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(SeedMatrixError::Empty);
        }
        let mut cells = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(SeedMatrixError::NotSquare {
                    row,
                    expected: dimension,
                    actual: values.len(),
                });
            }
            for (column, value) in values.into_iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(SeedMatrixError::ProbabilityOutOfRange { row, column, value });
                }
                cells.push(value);
            }
        }
        Ok(Self {
            dimension,
            cells: cells.into(),
        })
    }

    /// Parses whitespace-separated rows. Blank lines and `#` comments are
    /// ignored.
    ///
    /// # Errors
    /// Returns [`SeedMatrixError::Parse`] with the one-based line number of an
    /// unparsable token, or any validation error of [`Self::try_from_rows`].
    pub fn parse(text: &str) -> Result<Self, SeedMatrixError> {
        let mut rows = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let content = raw.split_once('#').map_or(raw, |(before, _)| before);
            if content.trim().is_empty() {
                continue;
            }
            let row = content
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| SeedMatrixError::Parse {
                        line: index + 1,
                        token: token.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::try_from_rows(rows)
    }

    /// Reads and parses the matrix stored at `path`.
    ///
    /// # Errors
    /// Returns [`SeedMatrixError::Io`] when the file cannot be read, or any
    /// error of [`Self::parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedMatrixError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| SeedMatrixError::Io {
            path: path.to_path_buf(),
            message: Arc::from(error.to_string()),
        })?;
        Self::parse(&text)
    }

    /// Returns `k`, the number of rows and columns.
    #[rustfmt::skip]
    #[must_use]
    pub fn dimension(&self) -> usize { self.dimension }

    /// Returns entry `(row, column)`, or `0.0` outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        if row >= self.dimension || column >= self.dimension {
            return 0.0;
        }
        self.cells.get(row * self.dimension + column).copied().unwrap_or(0.0)
    }

    /// Returns the row-major cells.
    #[rustfmt::skip]
    #[must_use]
    pub fn cells(&self) -> &[f64] { &self.cells }

    /// Returns the sum of all entries, the expected edge count at depth 1.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Returns `k^depth`, or `None` when it overflows `u64`.
    #[must_use]
    pub fn vertex_count(&self, depth: u32) -> Option<u64> {
        u64::try_from(self.dimension).ok()?.checked_pow(depth)
    }

    /// Probability of edge `source -> target` in the depth-`depth` expansion:
    /// the product over base-`k` digit pairs of the matching seed entries.
    #[must_use]
    pub fn edge_probability(&self, depth: u32, source: u64, target: u64) -> f64 {
        let Ok(base) = u64::try_from(self.dimension) else {
            return 0.0;
        };
        let (mut source, mut target) = (source, target);
        let mut probability = 1.0;
        for _ in 0..depth {
            let row = usize::try_from(source % base).unwrap_or(usize::MAX);
            let column = usize::try_from(target % base).unwrap_or(usize::MAX);
            probability *= self.get(row, column);
            source /= base;
            target /= base;
        }
        if source != 0 || target != 0 {
            return 0.0;
        }
        probability
    }
}

impl FromStr for SeedMatrix {
    type Err = SeedMatrixError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
