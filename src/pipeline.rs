//! End-to-end preprocessing: parse, select, drop rows, log2, normalize, write

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::{DatasetLayout, LabeledMatrix};
use crate::error::{CoxpressError, Result};
use crate::io::{
    read_dataset_table_file, read_plain_table_file, write_labeled_matrix_file, DatasetTableOptions,
    ReadOptions, WriteOptions,
};
use crate::select::extract_group;
use crate::transform::{log2_transform, normalize, remove_rows, NormalizationMethod};

/// Shape of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Header line followed by `ID<TAB>values...`
    #[default]
    Plain,
    /// Metadata preamble with a sentinel-bounded `ID<TAB>description<TAB>values...` block
    Dataset,
}

impl FromStr for InputFormat {
    type Err = CoxpressError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Self::Plain),
            "dataset" => Ok(Self::Dataset),
            other => Err(CoxpressError::InvalidInput {
                reason: format!("Unknown input format '{}' (expected plain or dataset)", other),
            }),
        }
    }
}

/// Full description of one preprocessing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub format: InputFormat,
    pub read: ReadOptions,
    pub dataset: DatasetTableOptions,
    /// Column layout; required when `group` is set
    pub layout: Option<DatasetLayout>,
    /// Layout group to keep
    pub group: Option<String>,
    /// Row indices to drop, counted after group selection
    pub drop_rows: Vec<usize>,
    pub log2: bool,
    pub normalization: NormalizationMethod,
    pub write: WriteOptions,
}

impl PipelineConfig {
    /// Load a pipeline configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that do not depend on the data
    pub fn validate(&self) -> Result<()> {
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }
        if let Some(group) = &self.group {
            match &self.layout {
                None => {
                    return Err(CoxpressError::InvalidLayout {
                        reason: format!("group '{}' requested without a layout", group),
                    })
                }
                Some(layout) if layout.group(group).is_none() => {
                    return Err(CoxpressError::InvalidLayout {
                        reason: format!("layout '{}' has no group '{}'", layout.name, group),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Read the input file in the configured format
pub fn load_matrix<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<LabeledMatrix> {
    let matrix = match config.format {
        InputFormat::Plain => read_plain_table_file(path, &config.read)?,
        InputFormat::Dataset => read_dataset_table_file(path, &config.dataset)?,
    };
    log::info!("  {} rows, {} samples", matrix.n_rows(), matrix.n_cols());
    Ok(matrix)
}

/// Apply the configured transforms to an in-memory matrix
pub fn run_pipeline(matrix: LabeledMatrix, config: &PipelineConfig) -> Result<LabeledMatrix> {
    config.validate()?;

    let mut matrix = matrix;

    if let Some(layout) = &config.layout {
        layout.validate_against(&matrix)?;
        if let Some(group) = &config.group {
            log::info!("Selecting group '{}' of layout '{}'", group, layout.name);
            matrix = extract_group(&matrix, layout, group)?;
        }
    }

    if !config.drop_rows.is_empty() {
        log::info!("Dropping {} rows", config.drop_rows.len());
        matrix = remove_rows(&matrix, &config.drop_rows)?;
    }

    if config.log2 {
        log::info!("Applying log2 transform");
        matrix = log2_transform(&matrix);
    }

    if config.normalization != NormalizationMethod::None {
        log::info!("Normalizing columns ({:?})", config.normalization);
        matrix = normalize(&matrix, config.normalization)?;
    }

    Ok(matrix)
}

/// Read, transform and write in one call; returns the written matrix
pub fn run_pipeline_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &PipelineConfig,
) -> Result<LabeledMatrix> {
    config.validate()?;
    let matrix = load_matrix(input, config)?;
    let result = run_pipeline(matrix, config)?;
    write_labeled_matrix_file(output, &result, &config.write)?;
    Ok(result)
}
