//! Column selection: sample subsets and condition groups
//!
//! Selection is a pure projection. Output column `j` is input column
//! `indices[j]`, values are copied unchanged, and the row IDs and the
//! selected sample IDs travel with the values.

use crate::data::{ColumnRange, DatasetLayout, LabeledMatrix};
use crate::error::{CoxpressError, Result};

/// Select columns by explicit index, in the given order
pub fn select_columns(matrix: &LabeledMatrix, indices: &[usize]) -> Result<LabeledMatrix> {
    if indices.is_empty() {
        return Err(CoxpressError::InvalidInput {
            reason: "Column selection is empty".to_string(),
        });
    }
    matrix.subset_columns(indices)
}

/// Select `count` contiguous columns starting at `start`
pub fn select_range(matrix: &LabeledMatrix, start: usize, count: usize) -> Result<LabeledMatrix> {
    select_ranges(matrix, &[ColumnRange::new(start, count)])
}

/// Select several column ranges, concatenated in the listed order
pub fn select_ranges(matrix: &LabeledMatrix, ranges: &[ColumnRange]) -> Result<LabeledMatrix> {
    let n_cols = matrix.n_cols();
    if let Some(r) = ranges
        .iter()
        .find(|r| !r.is_representable() || r.end() > n_cols)
    {
        return Err(CoxpressError::IndexOutOfBounds {
            index: r.start.max(n_cols),
            len: n_cols,
            axis: "Column",
        });
    }

    let indices: Vec<usize> = ranges.iter().flat_map(|r| r.indices()).collect();
    select_columns(matrix, &indices)
}

/// Select the columns of a named group of a layout
pub fn extract_group(
    matrix: &LabeledMatrix,
    layout: &DatasetLayout,
    group_name: &str,
) -> Result<LabeledMatrix> {
    let group = layout
        .group(group_name)
        .ok_or_else(|| CoxpressError::InvalidLayout {
            reason: format!(
                "layout '{}' has no group '{}' (available: {})",
                layout.name,
                group_name,
                layout.group_names().join(", ")
            ),
        })?;

    let selected = select_ranges(matrix, &group.ranges)?;
    log::debug!(
        "Extracted group '{}': {} of {} columns",
        group_name,
        selected.n_cols(),
        matrix.n_cols()
    );
    Ok(selected)
}

/// Split a matrix into two condition groups of a layout.
/// The layout is checked against the matrix before anything is copied.
pub fn extract_conditions(
    matrix: &LabeledMatrix,
    layout: &DatasetLayout,
    first: &str,
    second: &str,
) -> Result<(LabeledMatrix, LabeledMatrix)> {
    layout.validate_against(matrix)?;
    let c1 = extract_group(matrix, layout, first)?;
    let c2 = extract_group(matrix, layout, second)?;
    Ok((c1, c2))
}
