//! Row removal

use crate::data::LabeledMatrix;
use crate::error::{CoxpressError, Result};

/// Remove one row. Later rows shift up by one; the row ID goes with its row.
pub fn remove_row(matrix: &LabeledMatrix, index: usize) -> Result<LabeledMatrix> {
    remove_rows(matrix, &[index])
}

/// Remove a set of rows, keeping the remaining rows in their original order.
/// Duplicate indices are removed once.
pub fn remove_rows(matrix: &LabeledMatrix, indices: &[usize]) -> Result<LabeledMatrix> {
    let n_rows = matrix.n_rows();
    if let Some(&bad) = indices.iter().find(|&&i| i >= n_rows) {
        return Err(CoxpressError::IndexOutOfBounds {
            index: bad,
            len: n_rows,
            axis: "Row",
        });
    }

    let mut drop = vec![false; n_rows];
    for &i in indices {
        drop[i] = true;
    }
    let keep: Vec<usize> = (0..n_rows).filter(|&i| !drop[i]).collect();

    log::debug!("Removing {} of {} rows", n_rows - keep.len(), n_rows);
    matrix.subset_rows(&keep)
}

/// Remove the first row with the given identifier
pub fn remove_row_by_id(matrix: &LabeledMatrix, row_id: &str) -> Result<LabeledMatrix> {
    let index = matrix
        .row_index(row_id)
        .ok_or_else(|| CoxpressError::InvalidInput {
            reason: format!("Row '{}' not found", row_id),
        })?;
    remove_row(matrix, index)
}
