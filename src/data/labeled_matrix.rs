//! Expression matrix paired with its row and column identifiers

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{CoxpressError, Result};

/// Log a warning for each identifier that appears more than once.
/// Feature IDs are sometimes listed twice; lookups resolve to the first hit.
fn warn_duplicate_ids(ids: &[String], kind: &str) {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            log::warn!("Duplicate {} ID detected: '{}'", kind, id);
        }
    }
}

/// A numeric matrix whose rows are features (genes, array spots) and whose
/// columns are samples.
///
/// `row_ids[i]` always names the feature stored in `values.row(i)`, and
/// `sample_ids[j]` names the sample stored in `values.column(j)`. Every
/// operation in this crate that reorders or subsets the matrix returns a
/// new `LabeledMatrix` so the identifiers never drift from the values.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    /// Expression values (features x samples)
    values: Array2<f64>,
    /// Feature identifiers, one per row
    row_ids: Vec<String>,
    /// Sample identifiers, one per column
    sample_ids: Vec<String>,
}

impl LabeledMatrix {
    /// Create a new labeled matrix, checking that identifiers line up with the values
    pub fn new(values: Array2<f64>, row_ids: Vec<String>, sample_ids: Vec<String>) -> Result<Self> {
        let (n_rows, n_cols) = values.dim();

        if row_ids.len() != n_rows {
            return Err(CoxpressError::DimensionMismatch {
                expected: format!("{} row IDs", n_rows),
                got: format!("{} row IDs", row_ids.len()),
            });
        }

        if sample_ids.len() != n_cols {
            return Err(CoxpressError::DimensionMismatch {
                expected: format!("{} sample IDs", n_cols),
                got: format!("{} sample IDs", sample_ids.len()),
            });
        }

        warn_duplicate_ids(&row_ids, "row");

        Ok(Self {
            values,
            row_ids,
            sample_ids,
        })
    }

    /// Create a matrix with generated sample names (`S1`, `S2`, ...)
    pub fn with_row_ids(values: Array2<f64>, row_ids: Vec<String>) -> Result<Self> {
        let sample_ids = (1..=values.ncols()).map(|j| format!("S{}", j)).collect();
        Self::new(values, row_ids, sample_ids)
    }

    /// Number of rows (features)
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (samples)
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// View of the numeric values
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Mutable access to the values. The shape cannot change through this
    /// reference, so identifier alignment is preserved.
    pub fn values_mut(&mut self) -> ndarray::ArrayViewMut2<'_, f64> {
        self.values.view_mut()
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Values of a single feature across all samples
    pub fn row(&self, row_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(row_idx)
    }

    /// Values of a single sample across all features
    pub fn column(&self, col_idx: usize) -> ArrayView1<'_, f64> {
        self.values.column(col_idx)
    }

    /// Index of the first row with the given identifier
    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.row_ids.iter().position(|id| id == row_id)
    }

    /// Index of the first column with the given sample identifier
    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|id| id == sample_id)
    }

    /// Replace the values with a matrix of identical shape
    pub fn with_values(self, values: Array2<f64>) -> Result<Self> {
        if values.dim() != self.values.dim() {
            return Err(CoxpressError::DimensionMismatch {
                expected: format!("{:?}", self.values.dim()),
                got: format!("{:?}", values.dim()),
            });
        }
        Ok(Self { values, ..self })
    }

    /// Keep only the given columns, in the given order
    pub fn subset_columns(&self, col_indices: &[usize]) -> Result<Self> {
        let n_cols = self.n_cols();
        if let Some(&bad) = col_indices.iter().find(|&&j| j >= n_cols) {
            return Err(CoxpressError::IndexOutOfBounds {
                index: bad,
                len: n_cols,
                axis: "Column",
            });
        }

        let values = self.values.select(Axis(1), col_indices);
        let sample_ids = col_indices
            .iter()
            .map(|&j| self.sample_ids[j].clone())
            .collect();

        Ok(Self {
            values,
            row_ids: self.row_ids.clone(),
            sample_ids,
        })
    }

    /// Keep only the given rows, in the given order
    pub fn subset_rows(&self, row_indices: &[usize]) -> Result<Self> {
        let n_rows = self.n_rows();
        if let Some(&bad) = row_indices.iter().find(|&&i| i >= n_rows) {
            return Err(CoxpressError::IndexOutOfBounds {
                index: bad,
                len: n_rows,
                axis: "Row",
            });
        }

        let values = self.values.select(Axis(0), row_indices);
        let row_ids = row_indices
            .iter()
            .map(|&i| self.row_ids[i].clone())
            .collect();

        Ok(Self {
            values,
            row_ids,
            sample_ids: self.sample_ids.clone(),
        })
    }

    /// Split into values, row IDs and sample IDs
    pub fn into_parts(self) -> (Array2<f64>, Vec<String>, Vec<String>) {
        (self.values, self.row_ids, self.sample_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_labeled_matrix_creation() {
        let values = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let matrix = LabeledMatrix::new(values, ids(&["g1", "g2"]), ids(&["a", "b", "c"])).unwrap();
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.n_cols(), 3);
        assert_eq!(matrix.row_index("g2"), Some(1));
        assert_eq!(matrix.sample_index("c"), Some(2));

        let (values, row_ids, sample_ids) = matrix.into_parts();
        assert_eq!(values.dim(), (2, 3));
        assert_eq!(row_ids, ids(&["g1", "g2"]));
        assert_eq!(sample_ids.len(), 3);
    }

    #[test]
    fn test_row_id_count_mismatch_rejected() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let result = LabeledMatrix::new(values, ids(&["g1"]), ids(&["a", "b"]));
        assert!(matches!(result, Err(CoxpressError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_sample_id_count_mismatch_rejected() {
        let values = array![[1.0, 2.0]];
        let result = LabeledMatrix::new(values, ids(&["g1"]), ids(&["a", "b", "c"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_sample_ids() {
        let matrix = LabeledMatrix::with_row_ids(array![[1.0, 2.0]], ids(&["g1"])).unwrap();
        assert_eq!(matrix.sample_ids(), &ids(&["S1", "S2"])[..]);
    }

    #[test]
    fn test_subset_columns_keeps_ids_aligned() {
        let values = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let matrix = LabeledMatrix::new(values, ids(&["g1", "g2"]), ids(&["a", "b", "c"])).unwrap();

        let sub = matrix.subset_columns(&[2, 0]).unwrap();
        assert_eq!(sub.values(), array![[3.0, 1.0], [6.0, 4.0]]);
        assert_eq!(sub.sample_ids(), &ids(&["c", "a"])[..]);
        assert_eq!(sub.row_ids(), matrix.row_ids());
    }

    #[test]
    fn test_subset_columns_out_of_bounds() {
        let matrix = LabeledMatrix::with_row_ids(array![[1.0, 2.0]], ids(&["g1"])).unwrap();
        let err = matrix.subset_columns(&[0, 5]).unwrap_err();
        assert!(matches!(
            err,
            CoxpressError::IndexOutOfBounds { index: 5, len: 2, .. }
        ));
    }

    #[test]
    fn test_with_values_shape_checked() {
        let matrix = LabeledMatrix::with_row_ids(array![[1.0, 2.0]], ids(&["g1"])).unwrap();
        assert!(matrix.clone().with_values(array![[1.0], [2.0]]).is_err());
        let replaced = matrix.with_values(array![[7.0, 8.0]]).unwrap();
        assert_eq!(replaced.row(0).to_vec(), vec![7.0, 8.0]);
    }
}
