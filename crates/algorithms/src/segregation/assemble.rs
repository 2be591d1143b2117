//! Result table assembly
//!
//! Column layout, in fixed order:
//!
//! ```text
//! id, x, y, group_0..group_{m-1}
//! [intens_0..intens_{m-1}]      when a locality matrix exists
//! [iso_gh / exp_gh ...]         exposure, m² columns, g-major
//! [dissimil] [entropy] [indexh]
//! ```

use std::collections::BTreeSet;

use ndarray::{Array1, Array2, ArrayView1};
use segreg_core::table::ID_LABEL;
use segreg_core::{Error, GroupCounts, LocalityMatrix, ResultTable, Result, UnitLayer};

use super::exposure::exposure_column;
use super::measure::MeasureKind;

/// Local results available for assembly. `None` means not computed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputedLocals<'a> {
    pub exposure: Option<&'a Array2<f64>>,
    pub dissimilarity: Option<&'a Array1<f64>>,
    pub entropy: Option<&'a Array1<f64>>,
    pub index_h: Option<&'a Array1<f64>>,
}

impl ComputedLocals<'_> {
    /// Kinds that have results, in column order
    pub fn kinds(&self) -> Vec<MeasureKind> {
        MeasureKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                MeasureKind::Exposure => self.exposure.is_some(),
                MeasureKind::Dissimilarity => self.dissimilarity.is_some(),
                MeasureKind::Entropy => self.entropy.is_some(),
                MeasureKind::IndexH => self.index_h.is_some(),
            })
            .collect()
    }
}

/// Column labels for a set of measures.
///
/// Duplicates in `measures` are ignored and order follows [`MeasureKind`].
pub fn labels_for(measures: &[MeasureKind], n_groups: usize, spatial: bool) -> Vec<String> {
    let kinds: BTreeSet<MeasureKind> = measures.iter().copied().collect();
    let mut labels = vec![ID_LABEL.to_string(), "x".to_string(), "y".to_string()];

    labels.extend((0..n_groups).map(|g| format!("group_{}", g)));
    if spatial {
        labels.extend((0..n_groups).map(|g| format!("intens_{}", g)));
    }

    for kind in kinds {
        match kind {
            MeasureKind::Exposure => {
                for g in 0..n_groups {
                    for h in 0..n_groups {
                        let prefix = if g == h { "iso" } else { "exp" };
                        labels.push(format!("{}_{}{}", prefix, g, h));
                    }
                }
            }
            MeasureKind::Dissimilarity => labels.push("dissimil".to_string()),
            MeasureKind::Entropy => labels.push("entropy".to_string()),
            MeasureKind::IndexH => labels.push("indexh".to_string()),
        }
    }

    labels
}

/// Join the unit attributes, the locality matrix and every computed local
/// measure into one table.
///
/// # Errors
/// [`Error::Assembly`] if any input disagrees with the layer's unit count.
pub fn assemble(
    layer: &UnitLayer,
    locality: Option<&LocalityMatrix>,
    locals: &ComputedLocals<'_>,
) -> Result<ResultTable> {
    let n = layer.len();
    let m = layer.n_groups();
    let mut columns: Vec<Array1<f64>> = Vec::new();

    columns.push(layer.units().iter().map(|u| u.x).collect());
    columns.push(layer.units().iter().map(|u| u.y).collect());
    let population = layer.population().counts();
    for g in 0..m {
        columns.push(population.column(g).to_owned());
    }

    if let Some(locality) = locality {
        check_rows("locality", locality.n_units(), n)?;
        for g in 0..m {
            columns.push(locality.counts().column(g).to_owned());
        }
    }

    if let Some(exposure) = locals.exposure {
        check_rows("exposure", exposure.nrows(), n)?;
        if exposure.ncols() != m * m {
            return Err(Error::Assembly(format!(
                "exposure has {} columns, expected {}",
                exposure.ncols(),
                m * m
            )));
        }
        for g in 0..m {
            for h in 0..m {
                columns.push(exposure.column(exposure_column(g, h, m)).to_owned());
            }
        }
    }

    for (name, values) in [
        ("dissimilarity", locals.dissimilarity),
        ("entropy", locals.entropy),
        ("index H", locals.index_h),
    ] {
        if let Some(values) = values {
            push_vector(&mut columns, name, values.view(), n)?;
        }
    }

    let labels = labels_for(&locals.kinds(), m, locality.is_some());
    let values = Array2::from_shape_fn((n, columns.len()), |(i, k)| columns[k][i]);
    let ids = layer.units().iter().map(|u| u.id.clone()).collect();

    ResultTable::new(labels, ids, values)
}

fn check_rows(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::Assembly(format!(
            "{} has {} rows, expected {}",
            what, actual, expected
        )))
    }
}

fn push_vector(
    columns: &mut Vec<Array1<f64>>,
    what: &str,
    values: ArrayView1<'_, f64>,
    n: usize,
) -> Result<()> {
    check_rows(what, values.len(), n)?;
    columns.push(values.to_owned());
    Ok(())
}
