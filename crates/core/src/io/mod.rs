//! I/O for unit tables and analysis results
//!
//! Inputs and outputs are delimited text files with a header row:
//! - [`read_unit_table`]: id, centroid coordinates and group counts
//! - [`write_result_table`]: the assembled per-unit result table
//! - [`write_summary`]: the four-line global summary

mod delimited;

pub use delimited::{
    read_unit_table, read_unit_table_from_reader, write_result_table,
    write_result_table_to_writer, write_summary, UnitTableSpec,
};
