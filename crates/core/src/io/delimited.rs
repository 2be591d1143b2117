//! Delimited-text reading and writing
//!
//! Uses the `csv` crate; any single-byte delimiter is accepted.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::table::{GlobalSummary, ResultTable};
use crate::vector::UnitLayer;

/// Which columns of a unit table hold the id, the centroid and the
/// group counts.
#[derive(Debug, Clone)]
pub struct UnitTableSpec {
    /// Identifier column (kept as text)
    pub id_field: String,
    /// Projected x coordinate of the unit centroid
    pub x_field: String,
    /// Projected y coordinate of the unit centroid
    pub y_field: String,
    /// One column per population group, in output order
    pub group_fields: Vec<String>,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for UnitTableSpec {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            x_field: "x".to_string(),
            y_field: "y".to_string(),
            group_fields: Vec::new(),
            delimiter: b',',
        }
    }
}

/// Read a delimited unit table from a file.
pub fn read_unit_table<P: AsRef<Path>>(path: P, spec: &UnitTableSpec) -> Result<UnitLayer> {
    let file = File::open(path.as_ref())?;
    read_unit_table_from_reader(file, spec)
}

/// Read a delimited unit table from any reader.
///
/// Empty group cells are read as zero. Negative counts are clamped to zero
/// by [`UnitLayer::new`]. `NaN` and infinite values are rejected as
/// [`Error::InvalidValue`].
pub fn read_unit_table_from_reader<R: Read>(reader: R, spec: &UnitTableSpec) -> Result<UnitLayer> {
    if spec.group_fields.is_empty() {
        return Err(Error::NoGroupsSelected);
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(spec.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let id_col = field_index(&headers, &spec.id_field)?;
    let x_col = field_index(&headers, &spec.x_field)?;
    let y_col = field_index(&headers, &spec.y_field)?;
    let group_cols = spec
        .group_fields
        .iter()
        .map(|name| field_index(&headers, name))
        .collect::<Result<Vec<_>>>()?;

    let n_groups = group_cols.len();
    let mut ids = Vec::new();
    let mut coordinates = Vec::new();
    let mut counts = Vec::new();

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let row = row + 1;

        ids.push(record.get(id_col).unwrap_or_default().to_string());
        let x = parse_number(&record, x_col, &spec.x_field, row, false)?;
        let y = parse_number(&record, y_col, &spec.y_field, row, false)?;
        coordinates.push((x, y));

        for (&col, name) in group_cols.iter().zip(&spec.group_fields) {
            counts.push(parse_number(&record, col, name, row, true)?);
        }
    }

    let population = Array2::from_shape_vec((ids.len(), n_groups), counts)
        .map_err(|e| Error::Other(e.to_string()))?;

    UnitLayer::new(ids, coordinates, population)
}

fn field_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingField(name.to_string()))
}

fn parse_number(
    record: &StringRecord,
    col: usize,
    field: &str,
    row: usize,
    empty_is_zero: bool,
) -> Result<f64> {
    let raw = record.get(col).unwrap_or_default();
    if raw.is_empty() && empty_is_zero {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidValue {
            field: field.to_string(),
            row,
            value: raw.to_string(),
        }),
    }
}

/// Write the result table to a file: header of column labels, then one row
/// per unit.
pub fn write_result_table<P: AsRef<Path>>(
    table: &ResultTable,
    path: P,
    delimiter: u8,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_result_table_to_writer(table, BufWriter::new(file), delimiter)
}

/// Write the result table to any writer.
///
/// Floats use the shortest representation that round-trips exactly.
pub fn write_result_table_to_writer<W: Write>(
    table: &ResultTable,
    writer: W,
    delimiter: u8,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    wtr.write_record(table.labels())?;

    let mut record = Vec::with_capacity(table.n_columns());
    for (id, row) in table.ids().iter().zip(table.values().rows()) {
        record.clear();
        record.push(id.clone());
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the plain-text global summary.
pub fn write_summary<P: AsRef<Path>>(summary: &GlobalSummary, path: P) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write!(out, "{}", summary)?;
    out.flush()?;
    Ok(())
}
