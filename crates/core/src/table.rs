//! Flat result table and global summary produced by an analysis

use std::fmt;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label of the identifier column, always first.
pub const ID_LABEL: &str = "id";

/// One row per unit: the id plus numeric columns.
///
/// `labels[0]` is always [`ID_LABEL`]; `labels[1..]` name the columns of
/// `values` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    labels: Vec<String>,
    ids: Vec<String>,
    values: Array2<f64>,
}

impl ResultTable {
    /// Build a table, checking that labels, ids and values agree in shape.
    pub fn new(labels: Vec<String>, ids: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if labels.first().map(String::as_str) != Some(ID_LABEL) {
            return Err(Error::Assembly(format!(
                "first column must be '{}'",
                ID_LABEL
            )));
        }
        if labels.len() != values.ncols() + 1 {
            return Err(Error::Assembly(format!(
                "{} labels for {} numeric columns",
                labels.len(),
                values.ncols()
            )));
        }
        if ids.len() != values.nrows() {
            return Err(Error::Assembly(format!(
                "{} ids for {} rows",
                ids.len(),
                values.nrows()
            )));
        }
        Ok(Self { labels, ids, values })
    }

    /// Column labels, starting with `id`
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Numeric columns (everything after `id`)
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Numeric column by position among the numeric columns
    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    /// Total column count including `id`
    pub fn n_columns(&self) -> usize {
        self.labels.len()
    }
}

/// Region-wide values of each measure that was computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub dissimilarity: Option<f64>,
    pub entropy: Option<f64>,
    pub index_h: Option<f64>,
    /// `n_groups × n_groups`, row `g` column `h`
    pub exposure: Option<Vec<Vec<f64>>>,
}

struct Value(Option<f64>);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("NA"),
        }
    }
}

impl fmt::Display for GlobalSummary {
    /// Four labelled lines; the exposure matrix follows its label, one
    /// row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Global dissimilarity: {}", Value(self.dissimilarity))?;
        writeln!(f, "Global entropy: {}", Value(self.entropy))?;
        writeln!(f, "Global Index H: {}", Value(self.index_h))?;
        writeln!(f, "Global isolation/exposure: ")?;
        match &self.exposure {
            Some(matrix) => {
                for row in matrix {
                    let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                    writeln!(f, "[{}]", cells.join(" "))?;
                }
                Ok(())
            }
            None => writeln!(f, "NA"),
        }
    }
}
