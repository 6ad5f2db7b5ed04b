//! Column-wise normalization
//!
//! Two distinct procedures live here and must not be confused:
//!
//! * [`sort_and_center`] sorts every column on its own and subtracts the
//!   column mean. Rows are permuted independently per column, so after this
//!   step row `i` no longer corresponds to a single feature. The row IDs of
//!   the result are kept only so the matrix stays writable; they describe
//!   the input, not the sorted values.
//! * [`quantile_normalize`] is standard quantile normalization: the mean of
//!   each rank across columns replaces the value at that rank, scattered back
//!   to the original row positions, so rows stay aligned with their IDs.
//!
//! Per-column work runs in parallel. Each task owns a copy of one column and
//! the results are written back on the calling thread.

use std::str::FromStr;

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::LabeledMatrix;
use crate::error::{CoxpressError, Result};
use crate::stats::{argsort, mean, sort_ascending};

/// Column normalization procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMethod {
    /// Leave values untouched
    #[default]
    None,
    /// Sort each column ascending, then subtract its mean
    SortAndCenter,
    /// Standard quantile normalization
    Quantile,
    /// Quantile normalization followed by mean-centering of each column
    QuantileCentered,
}

impl FromStr for NormalizationMethod {
    type Err = CoxpressError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "sort-and-center" => Ok(Self::SortAndCenter),
            "quantile" => Ok(Self::Quantile),
            "quantile-centered" => Ok(Self::QuantileCentered),
            other => Err(CoxpressError::InvalidInput {
                reason: format!(
                    "Unknown normalization method '{}' (expected none, sort-and-center, quantile or quantile-centered)",
                    other
                ),
            }),
        }
    }
}

/// Apply the chosen normalization
pub fn normalize(matrix: &LabeledMatrix, method: NormalizationMethod) -> Result<LabeledMatrix> {
    log::debug!("Normalizing columns: {:?}", method);
    match method {
        NormalizationMethod::None => Ok(matrix.clone()),
        NormalizationMethod::SortAndCenter => sort_and_center(matrix),
        NormalizationMethod::Quantile => quantile_normalize(matrix),
        NormalizationMethod::QuantileCentered => center_columns(&quantile_normalize(matrix)?),
    }
}

/// Run `f` on a copy of every column in parallel and assemble the results
fn map_columns<F>(values: &Array2<f64>, f: F) -> Array2<f64>
where
    F: Fn(Vec<f64>) -> Vec<f64> + Sync,
{
    let columns: Vec<Vec<f64>> = (0..values.ncols())
        .into_par_iter()
        .map(|j| f(values.column(j).to_vec()))
        .collect();

    let mut out = Array2::zeros(values.dim());
    for (mut dst, src) in out.axis_iter_mut(Axis(1)).zip(columns) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s;
        }
    }
    out
}

fn center(mut col: Vec<f64>) -> Vec<f64> {
    let m = mean(&col);
    for v in col.iter_mut() {
        *v -= m;
    }
    col
}

/// Sort each column ascending, then subtract the column mean.
///
/// Every output column is non-decreasing and has zero mean. This is not
/// quantile normalization; see [`quantile_normalize`] for that.
pub fn sort_and_center(matrix: &LabeledMatrix) -> Result<LabeledMatrix> {
    let values = matrix.values().to_owned();
    let out = map_columns(&values, |mut col| {
        sort_ascending(&mut col);
        center(col)
    });
    matrix.clone().with_values(out)
}

/// Subtract each column's mean without reordering
pub fn center_columns(matrix: &LabeledMatrix) -> Result<LabeledMatrix> {
    let values = matrix.values().to_owned();
    let out = map_columns(&values, center);
    matrix.clone().with_values(out)
}

/// Standard quantile normalization.
///
/// For each rank `r`, the reference value is the mean over columns of the
/// `r`-th smallest value. Each cell is then replaced by the reference value
/// of its rank within its column. Ties are ranked by row order.
pub fn quantile_normalize(matrix: &LabeledMatrix) -> Result<LabeledMatrix> {
    let (n_rows, n_cols) = matrix.values().dim();
    if n_cols == 0 || n_rows == 0 {
        return Ok(matrix.clone());
    }
    let values = matrix.values().to_owned();

    let orders: Vec<Vec<usize>> = (0..n_cols)
        .into_par_iter()
        .map(|j| argsort(&values.column(j).to_vec()))
        .collect();

    let mut reference = vec![0.0; n_rows];
    for (j, order) in orders.iter().enumerate() {
        for (rank, &row) in order.iter().enumerate() {
            reference[rank] += values[[row, j]];
        }
    }
    for r in reference.iter_mut() {
        *r /= n_cols as f64;
    }

    let mut out = Array2::zeros((n_rows, n_cols));
    for (j, order) in orders.iter().enumerate() {
        for (rank, &row) in order.iter().enumerate() {
            out[[row, j]] = reference[rank];
        }
    }
    matrix.clone().with_values(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labeled(values: Array2<f64>) -> LabeledMatrix {
        let ids = (0..values.nrows()).map(|i| format!("g{}", i)).collect();
        LabeledMatrix::with_row_ids(values, ids).unwrap()
    }

    #[test]
    fn test_sort_and_center_properties() {
        let matrix = labeled(array![
            [5.0, -1.0, 0.0],
            [1.0, 7.5, 0.0],
            [3.0, 2.0, 12.0],
            [-4.0, 0.25, 3.0],
        ]);
        let out = sort_and_center(&matrix).unwrap();

        for j in 0..out.n_cols() {
            let col = out.column(j);
            for i in 1..col.len() {
                assert!(col[i - 1] <= col[i], "column {} not sorted", j);
            }
            let mean = col.sum() / (col.len() as f64);
            assert!(mean.abs() < 1e-9, "column {} not centered", j);
        }
    }

    #[test]
    fn test_sort_and_center_values() {
        let matrix = labeled(array![[3.0, 10.0], [1.0, 30.0], [2.0, 20.0]]);
        let out = sort_and_center(&matrix).unwrap();
        assert_eq!(out.values(), array![[-1.0, -10.0], [0.0, 0.0], [1.0, 10.0]]);
    }

    #[test]
    fn test_quantile_normalize_textbook_example() {
        let matrix = labeled(array![
            [5.0, 4.0, 3.0],
            [2.0, 1.0, 4.0],
            [3.0, 4.5, 6.0],
            [4.0, 2.0, 8.0],
        ]);
        let out = quantile_normalize(&matrix).unwrap();

        // rank means: (2+1+3)/3, (3+2+4)/3, (4+4+6)/3, (5+4.5+8)/3
        let r = [2.0, 3.0, 14.0 / 3.0, 17.5 / 3.0];
        let expected = array![
            [r[3], r[2], r[0]],
            [r[0], r[0], r[1]],
            [r[1], r[3], r[2]],
            [r[2], r[1], r[3]],
        ];
        for (a, b) in out.values().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(out.row_ids(), matrix.row_ids());
    }

    #[test]
    fn test_quantile_columns_share_distribution() {
        let matrix = labeled(array![[1.0, 100.0], [9.0, 50.0], [4.0, 75.0]]);
        let out = quantile_normalize(&matrix).unwrap();

        let mut a = out.column(0).to_vec();
        let mut b = out.column(1).to_vec();
        sort_ascending(&mut a);
        sort_ascending(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_center_columns_keeps_order() {
        let matrix = labeled(array![[3.0], [1.0], [2.0]]);
        let out = center_columns(&matrix).unwrap();
        assert_eq!(out.values(), array![[1.0], [-1.0], [0.0]]);
    }

    #[test]
    fn test_quantile_centered() {
        let matrix = labeled(array![[1.0, 2.0], [3.0, 6.0]]);
        let out = normalize(&matrix, NormalizationMethod::QuantileCentered).unwrap();
        for j in 0..2 {
            assert!(out.column(j).sum().abs() < 1e-12);
        }
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("sort-and-center".parse::<NormalizationMethod>().unwrap(), NormalizationMethod::SortAndCenter);
        assert_eq!("quantile".parse::<NormalizationMethod>().unwrap(), NormalizationMethod::Quantile);
        assert!("median".parse::<NormalizationMethod>().is_err());
    }
}
