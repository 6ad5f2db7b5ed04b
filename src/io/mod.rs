//! Input/Output for expression tables

mod table;
mod writer;

pub use table::{
    read_dataset_table, read_dataset_table_file, read_plain_table, read_plain_table_file,
    DatasetTableOptions, ReadOptions, DATASET_TABLE_BEGIN, DATASET_TABLE_END,
};
pub use writer::{format_value, write_labeled_matrix, write_labeled_matrix_file, WriteOptions};
