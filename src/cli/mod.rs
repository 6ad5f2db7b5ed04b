//! Command-line interface for rust_coxpress

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rust_coxpress")]
#[command(version)]
#[command(about = "Expression matrix preprocessing: parse, extract samples, log2, normalize")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse, select, transform and write an expression table
    #[command(
        long_about = "Parse an expression table, optionally keep one sample group,\n\
            drop rows, apply log2 and normalize columns, then write the result.\n\n\
            Normalization methods:\n\
            \x20 none:              leave values as they are\n\
            \x20 sort-and-center:   sort each column, then subtract its mean\n\
            \x20                    (row alignment is lost)\n\
            \x20 quantile:          standard quantile normalization\n\
            \x20 quantile-centered: quantile normalization, then mean-centering",
        after_long_help = "\
Examples:
  # ALL samples of the Golub training set, log2 and sort-and-center
  rust_coxpress preprocess -i golub.tsv --layout golub --group ALL \\
    --log2 --normalize sort-and-center -o all.csv

  # Dataset (SOFT) table with a known row count, tab-separated output
  rust_coxpress preprocess -i GDS1234.soft --format dataset --expected-rows 15923 \\
    --log2 --normalize quantile --out-delimiter tab --header -o norm.tsv

  # Everything from a JSON pipeline configuration
  rust_coxpress preprocess -i golub.tsv --config pipeline.json -o out.csv"
    )]
    Preprocess {
        /// Path to input table
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long, default_value = "preprocessed.csv")]
        output: String,

        /// JSON pipeline configuration (overrides the options below)
        #[arg(long)]
        config: Option<String>,

        /// Input format: plain or dataset
        #[arg(long, default_value = "plain")]
        format: String,

        /// Input delimiter: tab, comma or a single character
        #[arg(long, default_value = "tab")]
        delimiter: String,

        /// Required number of data rows (dataset format only)
        #[arg(long)]
        expected_rows: Option<usize>,

        /// Layout: built-in name (golub, eker) or path to a JSON layout
        #[arg(long)]
        layout: Option<String>,

        /// Layout group to keep
        #[arg(short, long, requires = "layout")]
        group: Option<String>,

        /// Row index to drop (0-based, may be repeated)
        #[arg(long = "drop-row", value_name = "INDEX")]
        drop_rows: Vec<usize>,

        /// Apply log2 (non-positive values become 0)
        #[arg(long)]
        log2: bool,

        /// Column normalization [default: none]
        #[arg(short, long, default_value = "none")]
        normalize: String,

        /// Output delimiter: tab, comma or a single character
        #[arg(long, default_value = "comma")]
        out_delimiter: String,

        /// Write a header line with sample IDs
        #[arg(long)]
        header: bool,

        /// Number of worker threads (0 = all cores)
        #[arg(long, default_value = "0")]
        threads: usize,
    },

    /// Report the dimensions of an expression table
    #[command(after_long_help = "\
Examples:
  rust_coxpress inspect -i golub.tsv --layout golub
  rust_coxpress inspect -i GDS1234.soft --format dataset")]
    Inspect {
        /// Path to input table
        #[arg(short, long)]
        input: String,

        /// Input format: plain or dataset
        #[arg(long, default_value = "plain")]
        format: String,

        /// Layout to check against the table
        #[arg(long)]
        layout: Option<String>,
    },

    /// Split a table into two condition groups and write one file per group
    #[command(after_long_help = "\
Examples:
  rust_coxpress conditions -i GDS1234.soft --format dataset --layout eker \\
    --first condition1 --second condition2 -p eker")]
    Conditions {
        /// Path to input table
        #[arg(short, long)]
        input: String,

        /// Input format: plain or dataset
        #[arg(long, default_value = "dataset")]
        format: String,

        /// Layout: built-in name (golub, eker) or path to a JSON layout
        #[arg(long)]
        layout: String,

        /// First group name
        #[arg(long, default_value = "condition1")]
        first: String,

        /// Second group name
        #[arg(long, default_value = "condition2")]
        second: String,

        /// Output prefix; files are written as <prefix>_<group>.csv
        #[arg(short, long, default_value = "conditions")]
        prefix: String,

        /// Write a header line with sample IDs
        #[arg(long)]
        header: bool,
    },
}

/// Parse a delimiter name or single character into a byte
pub fn parse_delimiter(name: &str) -> Option<u8> {
    match name {
        "tab" | "\\t" => Some(b'\t'),
        "comma" => Some(b','),
        "space" => Some(b' '),
        "semicolon" => Some(b';'),
        other if other.len() == 1 => other.bytes().next(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("tab"), Some(b'\t'));
        assert_eq!(parse_delimiter(","), Some(b','));
        assert_eq!(parse_delimiter("|"), Some(b'|'));
        assert_eq!(parse_delimiter("pipe"), None);
    }

    #[test]
    fn test_preprocess_args() {
        let cli = Cli::try_parse_from([
            "rust_coxpress",
            "preprocess",
            "-i",
            "in.tsv",
            "--layout",
            "golub",
            "--group",
            "AML",
            "--drop-row",
            "3",
            "--drop-row",
            "7",
            "--log2",
        ])
        .unwrap();

        match cli.command {
            Commands::Preprocess {
                group,
                drop_rows,
                log2,
                normalize,
                ..
            } => {
                assert_eq!(group.as_deref(), Some("AML"));
                assert_eq!(drop_rows, vec![3, 7]);
                assert!(log2);
                assert_eq!(normalize, "none");
            }
            _ => panic!("expected preprocess"),
        }
    }

    #[test]
    fn test_group_requires_layout() {
        let result = Cli::try_parse_from(["rust_coxpress", "preprocess", "-i", "in.tsv", "--group", "ALL"]);
        assert!(result.is_err());
    }
}
