//! Error types for Segreg

use thiserror::Error;

/// Main error type for Segreg operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No spatial units provided")]
    EmptyInput,

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite {what} for unit {unit}")]
    NonFiniteValue { what: &'static str, unit: usize },

    #[error("No population groups selected")]
    NoGroupsSelected,

    #[error("Invalid bandwidth: {0} (must be a finite value > 0)")]
    InvalidBandwidth(f64),

    #[error("Unknown kernel: {0}. Use gaussian, bisquare, or moving-window.")]
    InvalidKernel(String),

    #[error("Field not found in input: {0}")]
    MissingField(String),

    #[error("Invalid value in field '{field}' at row {row}: {value:?}")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
    },

    #[error("Result assembly failed: {0}")]
    Assembly(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Segreg operations
pub type Result<T> = std::result::Result<T, Error>;
