//! Transformations of expression matrices
//!
//! Row removal, the floored log2 transform and column normalization.
//! Every function takes the matrix by reference and returns a new one.

mod log2;
mod normalize;
mod rows;

pub use log2::{floored_log2, log2_transform};
pub use normalize::{center_columns, normalize, quantile_normalize, sort_and_center, NormalizationMethod};
pub use rows::{remove_row, remove_row_by_id, remove_rows};
