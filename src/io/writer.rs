//! Delimited writer for labeled matrices

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::LabeledMatrix;
use crate::error::Result;

/// Options for writing a labeled matrix
///
/// The output delimiter is independent of the one used for reading; the
/// default writes comma-separated records with no header line.
///
/// The plain table reader always consumes the first line as a header, so
/// output meant to be read back must set `include_header` (for example via
/// [`WriteOptions::tsv_with_header`]). Reading headerless output drops the
/// first data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    pub delimiter: u8,
    /// Emit a header line of `id_header` followed by the sample IDs
    pub include_header: bool,
    pub id_header: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: false,
            id_header: "ID".to_string(),
        }
    }
}

impl WriteOptions {
    /// Tab-separated output with a header, readable by the plain table reader
    pub fn tsv_with_header() -> Self {
        Self {
            delimiter: b'\t',
            include_header: true,
            ..Default::default()
        }
    }
}

/// Shortest decimal text that parses back to the same `f64`
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Write one record per row: the row ID followed by the row's values
pub fn write_labeled_matrix<W: Write>(
    writer: W,
    matrix: &LabeledMatrix,
    options: &WriteOptions,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .flexible(false)
        .from_writer(writer);

    if options.include_header {
        let mut header = Vec::with_capacity(matrix.n_cols() + 1);
        header.push(options.id_header.as_str());
        header.extend(matrix.sample_ids().iter().map(String::as_str));
        csv_writer.write_record(&header)?;
    }

    let mut record: Vec<String> = Vec::with_capacity(matrix.n_cols() + 1);
    for (row_id, row) in matrix.row_ids().iter().zip(matrix.values().rows()) {
        record.clear();
        record.push(row_id.clone());
        record.extend(row.iter().map(|&v| format_value(v)));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a labeled matrix to a file, creating or truncating it
pub fn write_labeled_matrix_file<P: AsRef<Path>>(
    path: P,
    matrix: &LabeledMatrix,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    log::info!(
        "Writing {} x {} matrix to: {}",
        matrix.n_rows(),
        matrix.n_cols(),
        path.display()
    );
    let file = File::create(path)?;
    write_labeled_matrix(file, matrix, options)
}
