//! Dataset layouts: named column groups and expected dimensions
//!
//! Microarray series are distributed with samples in a fixed column order,
//! so experimental groups are addressed by column position. A layout
//! records those positions as data instead of literals, which lets the
//! same preprocessing code serve any series.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LabeledMatrix;
use crate::error::{CoxpressError, Result};

/// A contiguous run of columns `[start, start + count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub start: usize,
    pub count: usize,
}

impl ColumnRange {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// Build a range from half-open bounds `[start, end)`
    pub fn span(start: usize, end: usize) -> Self {
        Self {
            start,
            count: end.saturating_sub(start),
        }
    }

    /// One past the last column of the range, saturating at `usize::MAX`
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count)
    }

    /// False when `start + count` does not fit in a `usize`
    pub fn is_representable(&self) -> bool {
        self.start.checked_add(self.count).is_some()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..self.end()
    }
}

/// A named set of sample columns, assembled from one or more ranges in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub name: String,
    pub ranges: Vec<ColumnRange>,
}

impl SampleGroup {
    pub fn new(name: &str, ranges: Vec<ColumnRange>) -> Self {
        Self {
            name: name.to_string(),
            ranges,
        }
    }

    /// Column indices in selection order
    pub fn indices(&self) -> Vec<usize> {
        self.ranges.iter().flat_map(|r| r.indices()).collect()
    }

    /// Number of columns the group selects
    pub fn width(&self) -> usize {
        self.ranges.iter().map(|r| r.count).sum()
    }
}

/// Column layout of one expression dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetLayout {
    pub name: String,
    /// Expected number of feature rows, if known
    #[serde(default)]
    pub expected_rows: Option<usize>,
    /// Expected number of sample columns, if known
    #[serde(default)]
    pub expected_cols: Option<usize>,
    #[serde(default)]
    pub groups: Vec<SampleGroup>,
}

impl DatasetLayout {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            expected_rows: None,
            expected_cols: None,
            groups: Vec::new(),
        }
    }

    /// Add a group, builder style
    pub fn with_group(mut self, name: &str, ranges: Vec<ColumnRange>) -> Self {
        self.groups.push(SampleGroup::new(name, ranges));
        self
    }

    /// Golub et al. leukemia training set: 27 ALL samples followed by 11 AML samples
    pub fn golub() -> Self {
        let mut layout = Self::new("golub")
            .with_group("ALL", vec![ColumnRange::new(0, 27)])
            .with_group("AML", vec![ColumnRange::new(27, 11)]);
        layout.expected_cols = Some(38);
        layout
    }

    /// Eker rat series: condition 1 (Eker mutants) spans three blocks,
    /// condition 2 (wild type) is the trailing 36 columns
    pub fn eker() -> Self {
        let mut layout = Self::new("eker")
            .with_group(
                "condition1",
                vec![
                    ColumnRange::span(0, 12),
                    ColumnRange::span(24, 36),
                    ColumnRange::span(36, 48),
                ],
            )
            .with_group("condition2", vec![ColumnRange::span(48, 84)]);
        layout.expected_rows = Some(15923);
        layout.expected_cols = Some(84);
        layout
    }

    /// Look up a built-in layout by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "golub" => Some(Self::golub()),
            "eker" => Some(Self::eker()),
            _ => None,
        }
    }

    /// Load and validate a layout from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(text)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Resolve a built-in layout name or a path to a JSON layout file
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        match Self::builtin(name_or_path) {
            Some(layout) => Ok(layout),
            None => Self::from_json_file(name_or_path),
        }
    }

    pub fn group(&self, name: &str) -> Option<&SampleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Check the layout on its own: unique, non-empty groups of non-empty ranges
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(CoxpressError::InvalidLayout {
                    reason: format!("layout '{}' has a group with an empty name", self.name),
                });
            }
            if !seen.insert(group.name.as_str()) {
                return Err(CoxpressError::InvalidLayout {
                    reason: format!("duplicate group '{}'", group.name),
                });
            }
            if group.ranges.is_empty() {
                return Err(CoxpressError::InvalidLayout {
                    reason: format!("group '{}' has no column ranges", group.name),
                });
            }
            if let Some(r) = group.ranges.iter().find(|r| !r.is_representable()) {
                return Err(CoxpressError::InvalidLayout {
                    reason: format!(
                        "group '{}' range starting at column {} with {} columns overflows",
                        group.name, r.start, r.count
                    ),
                });
            }
            if let Some(r) = group.ranges.iter().find(|r| r.count == 0) {
                return Err(CoxpressError::InvalidLayout {
                    reason: format!(
                        "group '{}' has an empty range starting at column {}",
                        group.name, r.start
                    ),
                });
            }
            if let Some(cols) = self.expected_cols {
                if let Some(r) = group.ranges.iter().find(|r| r.end() > cols) {
                    return Err(CoxpressError::InvalidLayout {
                        reason: format!(
                            "group '{}' range [{}, {}) exceeds the expected {} columns",
                            group.name,
                            r.start,
                            r.end(),
                            cols
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check the layout against a parsed matrix
    pub fn validate_against(&self, matrix: &LabeledMatrix) -> Result<()> {
        self.validate()?;

        if let Some(rows) = self.expected_rows {
            if rows != matrix.n_rows() {
                return Err(CoxpressError::DimensionMismatch {
                    expected: format!("{} rows for layout '{}'", rows, self.name),
                    got: format!("{} rows", matrix.n_rows()),
                });
            }
        }
        if let Some(cols) = self.expected_cols {
            if cols != matrix.n_cols() {
                return Err(CoxpressError::DimensionMismatch {
                    expected: format!("{} columns for layout '{}'", cols, self.name),
                    got: format!("{} columns", matrix.n_cols()),
                });
            }
        }

        for group in &self.groups {
            if let Some(r) = group.ranges.iter().find(|r| r.end() > matrix.n_cols()) {
                return Err(CoxpressError::IndexOutOfBounds {
                    index: r.end() - 1,
                    len: matrix.n_cols(),
                    axis: "Column",
                });
            }
        }
        Ok(())
    }
}
