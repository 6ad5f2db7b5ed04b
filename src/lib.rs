//! rust_coxpress: expression matrix preprocessing
//!
//! Reads tab-delimited gene-expression tables (plain headered tables or
//! sentinel-bounded dataset tables), extracts sample groups by column
//! position, applies a floored log2 transform and column normalization,
//! and writes the result with the feature identifiers alongside.
//!
//! # Example
//!
//! ```ignore
//! use rust_coxpress::prelude::*;
//!
//! let matrix = read_plain_table_file("golub.tsv", &ReadOptions::default())?;
//! let all = extract_group(&matrix, &DatasetLayout::golub(), "ALL")?;
//! let normalized = sort_and_center(&log2_transform(&all))?;
//! write_labeled_matrix_file("all.csv", &normalized, &WriteOptions::default())?;
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod select;
pub mod stats;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{ColumnRange, DatasetLayout, LabeledMatrix, SampleGroup};
    pub use crate::error::{CoxpressError, Result};
    pub use crate::io::{
        read_dataset_table, read_dataset_table_file, read_plain_table, read_plain_table_file,
        write_labeled_matrix, write_labeled_matrix_file, DatasetTableOptions, ReadOptions, WriteOptions,
    };
    pub use crate::pipeline::{load_matrix, run_pipeline, run_pipeline_file, InputFormat, PipelineConfig};
    pub use crate::select::{extract_conditions, extract_group, select_columns, select_range, select_ranges};
    pub use crate::transform::{
        center_columns, log2_transform, normalize, quantile_normalize, remove_row, remove_row_by_id,
        remove_rows, sort_and_center, NormalizationMethod,
    };
}
