//! Delimited table readers for expression matrices
//!
//! Two input shapes are supported:
//! * plain tables: a header line (`ID<TAB>sample1<TAB>...`) followed by one
//!   line per feature;
//! * dataset tables: a free-form metadata preamble, then a data block bounded
//!   by `!dataset_table_begin` / `!dataset_table_end` sentinel lines, where
//!   each data line carries an identifier and a description before the values.
//!
//! Numeric cells that fail to parse are read as 0.0. The number of coerced
//! cells is reported once per table as a warning. Cells are parsed exactly as
//! written: surrounding whitespace makes a cell unparsable, so `" 5"` reads
//! as 0.0.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::LabeledMatrix;
use crate::error::{CoxpressError, Result};

pub const DATASET_TABLE_BEGIN: &str = "!dataset_table_begin";
pub const DATASET_TABLE_END: &str = "!dataset_table_end";

/// Options for reading a plain headered table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Field delimiter byte (tab by default)
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

/// Options for reading a sentinel-bounded dataset table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetTableOptions {
    pub delimiter: u8,
    /// First field of the line that opens the data block
    pub begin_sentinel: String,
    /// First field of the line that closes the data block
    pub end_sentinel: String,
    /// When set, the data block must contain exactly this many rows
    pub expected_rows: Option<usize>,
}

impl Default for DatasetTableOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            begin_sentinel: DATASET_TABLE_BEGIN.to_string(),
            end_sentinel: DATASET_TABLE_END.to_string(),
            expected_rows: None,
        }
    }
}

/// Accumulates data lines into a row-major buffer of fixed width
struct TableBuilder {
    n_cols: usize,
    /// Index of the first numeric field in each record
    value_offset: usize,
    row_ids: Vec<String>,
    data: Vec<f64>,
    coerced: usize,
    short_rows: usize,
    long_rows: usize,
}

impl TableBuilder {
    fn new(n_cols: usize, value_offset: usize) -> Self {
        Self {
            n_cols,
            value_offset,
            row_ids: Vec::new(),
            data: Vec::new(),
            coerced: 0,
            short_rows: 0,
            long_rows: 0,
        }
    }

    fn push(&mut self, record: &StringRecord) {
        self.row_ids.push(record.get(0).unwrap_or("").to_string());

        let n_fields = record.len().saturating_sub(self.value_offset);
        if n_fields < self.n_cols {
            self.short_rows += 1;
        } else if n_fields > self.n_cols {
            self.long_rows += 1;
        }

        for j in 0..self.n_cols {
            let value = match record.get(j + self.value_offset) {
                Some(field) => field.parse::<f64>().unwrap_or_else(|_| {
                    self.coerced += 1;
                    0.0
                }),
                None => 0.0,
            };
            self.data.push(value);
        }
    }

    fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    fn finish(self, sample_ids: Vec<String>) -> Result<LabeledMatrix> {
        if self.coerced > 0 {
            log::warn!("{} non-numeric cells were read as 0", self.coerced);
        }
        if self.short_rows > 0 {
            log::warn!(
                "{} rows had fewer than {} values; missing cells were filled with 0",
                self.short_rows,
                self.n_cols
            );
        }
        if self.long_rows > 0 {
            log::warn!(
                "{} rows had more than {} values; extra cells were ignored",
                self.long_rows,
                self.n_cols
            );
        }

        let n_rows = self.n_rows();
        let values = Array2::from_shape_vec((n_rows, self.n_cols), self.data).map_err(|e| {
            CoxpressError::InvalidInput {
                reason: format!("could not shape table values: {}", e),
            }
        })?;

        LabeledMatrix::new(values, self.row_ids, sample_ids)
    }
}

fn header_names(header: &StringRecord, skip: usize) -> Vec<String> {
    header.iter().skip(skip).map(|s| s.trim().to_string()).collect()
}

fn first_field_is(record: &StringRecord, token: &str) -> bool {
    record.get(0).map_or(false, |f| f == token)
}

/// Read a plain headered table
///
/// The first line names the identifier column followed by one name per
/// sample; it fixes the number of columns. Every following line yields one
/// row: field 0 is the identifier, fields 1..=N are the values.
pub fn read_plain_table<R: Read>(reader: R, options: &ReadOptions) -> Result<LabeledMatrix> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let header = records.next().ok_or_else(|| CoxpressError::Parse {
        reason: "Empty input: missing header line".to_string(),
    })??;

    if header.len() < 2 {
        return Err(CoxpressError::Parse {
            reason: "Header has no sample columns".to_string(),
        });
    }

    let sample_ids = header_names(&header, 1);
    let mut builder = TableBuilder::new(sample_ids.len(), 1);

    for record in records {
        builder.push(&record?);
    }

    log::debug!(
        "Parsed plain table: {} rows, {} columns",
        builder.n_rows(),
        sample_ids.len()
    );
    builder.finish(sample_ids)
}

/// Read a metadata-wrapped dataset table
///
/// Lines are skipped until one whose first field is the begin sentinel. The
/// next line is the header (`ID_REF<TAB>IDENTIFIER<TAB>sample1...`); data
/// lines follow until the end sentinel or end of input. Field 0 is kept as
/// the row identifier, field 1 (a description) is dropped, and fields 2.. are
/// the values.
pub fn read_dataset_table<R: Read>(reader: R, options: &DatasetTableOptions) -> Result<LabeledMatrix> {
    // Preamble lines carry free text with unbalanced quotes, so quoting is off.
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let mut preamble_lines = 0usize;
    loop {
        match records.next() {
            Some(record) => {
                if first_field_is(&record?, &options.begin_sentinel) {
                    break;
                }
                preamble_lines += 1;
            }
            None => {
                return Err(CoxpressError::Parse {
                    reason: format!(
                        "Malformed dataset: '{}' not found after {} lines",
                        options.begin_sentinel, preamble_lines
                    ),
                });
            }
        }
    }
    log::debug!("Skipped {} metadata lines", preamble_lines);

    let header = records.next().ok_or_else(|| CoxpressError::Parse {
        reason: format!("Malformed dataset: no header after '{}'", options.begin_sentinel),
    })??;

    let sample_ids = header_names(&header, 2);
    let mut builder = TableBuilder::new(sample_ids.len(), 2);

    let mut terminated = false;
    for record in records {
        let record = record?;
        if first_field_is(&record, &options.end_sentinel) {
            terminated = true;
            break;
        }
        builder.push(&record);
    }
    if !terminated {
        log::debug!("'{}' not found; read data to end of input", options.end_sentinel);
    }

    if let Some(expected) = options.expected_rows {
        if expected != builder.n_rows() {
            return Err(CoxpressError::DimensionMismatch {
                expected: format!("{} data rows", expected),
                got: format!("{} data rows", builder.n_rows()),
            });
        }
    }

    log::debug!(
        "Parsed dataset table: {} rows, {} columns",
        builder.n_rows(),
        sample_ids.len()
    );
    builder.finish(sample_ids)
}

/// Read a plain headered table from a file
pub fn read_plain_table_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<LabeledMatrix> {
    let path = path.as_ref();
    log::info!("Reading plain table from: {}", path.display());
    let file = File::open(path)?;
    read_plain_table(BufReader::new(file), options)
}

/// Read a metadata-wrapped dataset table from a file
pub fn read_dataset_table_file<P: AsRef<Path>>(
    path: P,
    options: &DatasetTableOptions,
) -> Result<LabeledMatrix> {
    let path = path.as_ref();
    log::info!("Reading dataset table from: {}", path.display());
    let file = File::open(path)?;
    read_dataset_table(BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DATASET: &str = "^DATASET = GDS0001\n\
        !dataset_title = \"toy series\n\
        !dataset_value_type = count\n\
        !dataset_table_begin\n\
        ID_REF\tIDENTIFIER\tGSM1\tGSM2\n\
        p1\tGeneA\t10\t20\n\
        p2\tGeneB\tnull\t40.5\n\
        !dataset_table_end\n\
        trailing\tjunk\t1\t2\n";

    #[test]
    fn test_plain_table_scenario() {
        let input = "Gene\tS1\tS2\tS3\ng1\t1\t2\t3\ng2\t0\t-5\t10\n";
        let matrix = read_plain_table(input.as_bytes(), &ReadOptions::default()).unwrap();

        assert_eq!(matrix.values(), array![[1.0, 2.0, 3.0], [0.0, -5.0, 10.0]]);
        assert_eq!(matrix.row_ids(), &["g1".to_string(), "g2".to_string()][..]);
        assert_eq!(matrix.sample_ids(), &["S1", "S2", "S3"].map(String::from)[..]);
    }

    #[test]
    fn test_plain_table_dimensions_and_order() {
        let mut input = String::from("ID\ta\tb\n");
        for i in 0..25 {
            input.push_str(&format!("gene{}\t{}\t{}\n", i, i, i * 2));
        }
        let matrix = read_plain_table(input.as_bytes(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.n_rows(), 25);
        assert_eq!(matrix.n_cols(), 2);
        for i in 0..25 {
            assert_eq!(matrix.row_ids()[i], format!("gene{}", i));
            assert_eq!(matrix.values()[[i, 1]], (i * 2) as f64);
        }
    }

    #[test]
    fn test_malformed_cells_read_as_zero() {
        let input = "Gene\tS1\tS2\ng1\tNA\t2\ng2\t3\t\n";
        let matrix = read_plain_table(input.as_bytes(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.values(), array![[0.0, 2.0], [3.0, 0.0]]);
    }

    #[test]
    fn test_padded_cells_read_as_zero() {
        let input = "Gene\tS1\tS2\ng1\t 5\t5 \n";
        let matrix = read_plain_table(input.as_bytes(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.values(), array![[0.0, 0.0]]);
    }

    #[test]
    fn test_ragged_rows_are_padded_and_truncated() {
        let input = "Gene\tS1\tS2\ng1\t1\ng2\t3\t4\t5\n";
        let matrix = read_plain_table(input.as_bytes(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.values(), array![[1.0, 0.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_plain_table_empty_input() {
        let result = read_plain_table("".as_bytes(), &ReadOptions::default());
        assert!(matches!(result, Err(CoxpressError::Parse { .. })));
    }

    #[test]
    fn test_plain_table_custom_delimiter() {
        let input = "Gene,S1\ng1,2.5\n";
        let options = ReadOptions { delimiter: b',' };
        let matrix = read_plain_table(input.as_bytes(), &options).unwrap();
        assert_eq!(matrix.values(), array![[2.5]]);
    }

    #[test]
    fn test_dataset_table() {
        let matrix = read_dataset_table(DATASET.as_bytes(), &DatasetTableOptions::default()).unwrap();

        assert_eq!(matrix.row_ids(), &["p1".to_string(), "p2".to_string()][..]);
        assert_eq!(matrix.sample_ids(), &["GSM1".to_string(), "GSM2".to_string()][..]);
        assert_eq!(matrix.values(), array![[10.0, 20.0], [0.0, 40.5]]);
    }

    #[test]
    fn test_dataset_table_without_end_sentinel() {
        let input = "!dataset_table_begin\nID_REF\tIDENTIFIER\tA\np1\tx\t1\np2\ty\t2\n";
        let matrix = read_dataset_table(input.as_bytes(), &DatasetTableOptions::default()).unwrap();
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.values(), array![[1.0], [2.0]]);
    }

    #[test]
    fn test_dataset_table_missing_begin_sentinel() {
        let input = "!dataset_title = x\nID_REF\tIDENTIFIER\tA\np1\tx\t1\n";
        let result = read_dataset_table(input.as_bytes(), &DatasetTableOptions::default());
        assert!(matches!(result, Err(CoxpressError::Parse { .. })));
    }

    #[test]
    fn test_dataset_table_missing_header() {
        let input = "!dataset_title = x\n!dataset_table_begin\n";
        let result = read_dataset_table(input.as_bytes(), &DatasetTableOptions::default());
        match result {
            Err(CoxpressError::Parse { reason }) => assert!(reason.contains("no header")),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_table_expected_rows() {
        let matching = DatasetTableOptions {
            expected_rows: Some(2),
            ..Default::default()
        };
        assert!(read_dataset_table(DATASET.as_bytes(), &matching).is_ok());

        let mismatched = DatasetTableOptions {
            expected_rows: Some(15923),
            ..Default::default()
        };
        let result = read_dataset_table(DATASET.as_bytes(), &mismatched);
        assert!(matches!(result, Err(CoxpressError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_read_plain_table_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene_id\ts1\ts2\ts3").unwrap();
        writeln!(file, "gene1\t100\t200\t150").unwrap();
        writeln!(file, "gene2\t50\t75\t60").unwrap();

        let matrix = read_plain_table_file(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.n_cols(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_dataset_table_file("/nonexistent/GDS0000.soft", &DatasetTableOptions::default());
        assert!(matches!(result, Err(CoxpressError::IoError(_))));
    }
}
