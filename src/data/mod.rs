//! Data structures for expression matrices and dataset layouts

mod labeled_matrix;
mod layout;

pub use labeled_matrix::LabeledMatrix;
pub use layout::{ColumnRange, DatasetLayout, SampleGroup};
