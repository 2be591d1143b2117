//! Analysis session: input layer, computation mode and memoized results
//!
//! A session owns an immutable [`UnitLayer`] and a [`Mode`]. Every measure
//! reads the counts the mode selects; estimating locality switches the
//! session to spatial mode and drops cached results.
//!
//! Results are memoized per measure kind. Global values are derived from
//! the cached local values, and index H reuses the cached entropy.

use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use segreg_core::{GlobalSummary, LocalityMatrix, Result, ResultTable, UnitLayer};

use super::assemble::{assemble, ComputedLocals};
use super::measure::{GlobalValue, LocalValues, MeasureKind, MeasureResult, Scope};
use super::source::Source;
use super::{dissimilarity, entropy, exposure, index_h};
use crate::spatial::{estimate_locality, KernelKind, LocalityParams};

/// Which counts the measures are computed on
#[derive(Debug, Clone)]
pub enum Mode {
    /// Raw population counts
    Raw,
    /// Kernel-smoothed population intensity
    Smoothed {
        locality: LocalityMatrix,
        params: LocalityParams,
    },
}

/// A local result and, once requested, its global aggregate
#[derive(Debug, Clone)]
struct Memo<L, G> {
    local: L,
    global: Option<G>,
}

impl<L, G> Memo<L, G> {
    fn global_or_insert_with(&mut self, f: impl FnOnce(&L) -> G) -> &G {
        let Memo { local, global } = self;
        global.get_or_insert_with(|| f(local))
    }
}

/// Get the memo in `slot`, computing its local value on a miss.
fn memoize<L, G>(
    slot: &mut Option<Memo<L, G>>,
    kind: MeasureKind,
    compute: impl FnOnce() -> L,
) -> &mut Memo<L, G> {
    if slot.is_some() {
        debug!(%kind, "local measure cache hit");
    }
    slot.get_or_insert_with(|| {
        debug!(%kind, "computing local measure");
        Memo {
            local: compute(),
            global: None,
        }
    })
}

#[derive(Debug, Clone, Default)]
struct MeasureCache {
    exposure: Option<Memo<Array2<f64>, Array2<f64>>>,
    dissimilarity: Option<Memo<Array1<f64>, f64>>,
    entropy: Option<Memo<Array1<f64>, f64>>,
    index_h: Option<Memo<Array1<f64>, f64>>,
}

impl MeasureCache {
    fn exposure(&mut self, source: Source<'_>) -> &mut Memo<Array2<f64>, Array2<f64>> {
        memoize(&mut self.exposure, MeasureKind::Exposure, || {
            exposure::local_exposure(source)
        })
    }

    fn dissimilarity(&mut self, source: Source<'_>) -> &mut Memo<Array1<f64>, f64> {
        memoize(&mut self.dissimilarity, MeasureKind::Dissimilarity, || {
            dissimilarity::local_dissimilarity(source)
        })
    }

    fn entropy(&mut self, source: Source<'_>) -> &mut Memo<Array1<f64>, f64> {
        memoize(&mut self.entropy, MeasureKind::Entropy, || {
            entropy::local_entropy(source)
        })
    }

    /// Index H memo; entropy (local and global) is computed or reused first.
    fn index_h(&mut self, source: Source<'_>) -> &mut Memo<Array1<f64>, f64> {
        let MeasureCache {
            entropy: entropy_slot,
            index_h: index_h_slot,
            ..
        } = self;
        memoize(index_h_slot, MeasureKind::IndexH, move || {
            let memo = memoize(entropy_slot, MeasureKind::Entropy, || {
                entropy::local_entropy(source)
            });
            let global_entropy = *memo.global_or_insert_with(|_| entropy::global_entropy(source));
            index_h::local_index_h(source, &memo.local, global_entropy)
        })
    }

    fn local(&mut self, kind: MeasureKind, source: Source<'_>) -> LocalValues {
        match kind {
            MeasureKind::Exposure => LocalValues::Matrix(self.exposure(source).local.clone()),
            MeasureKind::Dissimilarity => {
                LocalValues::Vector(self.dissimilarity(source).local.clone())
            }
            MeasureKind::Entropy => LocalValues::Vector(self.entropy(source).local.clone()),
            MeasureKind::IndexH => LocalValues::Vector(self.index_h(source).local.clone()),
        }
    }

    fn global(&mut self, kind: MeasureKind, source: Source<'_>) -> GlobalValue {
        match kind {
            MeasureKind::Exposure => {
                let n_groups = source.n_groups();
                GlobalValue::Matrix(
                    self.exposure(source)
                        .global_or_insert_with(|local| exposure::global_exposure(local, n_groups))
                        .clone(),
                )
            }
            MeasureKind::Dissimilarity => GlobalValue::Scalar(
                *self
                    .dissimilarity(source)
                    .global_or_insert_with(dissimilarity::global_dissimilarity),
            ),
            MeasureKind::Entropy => GlobalValue::Scalar(
                *self
                    .entropy(source)
                    .global_or_insert_with(|_| entropy::global_entropy(source)),
            ),
            MeasureKind::IndexH => GlobalValue::Scalar(
                *self
                    .index_h(source)
                    .global_or_insert_with(index_h::global_index_h),
            ),
        }
    }

    fn locals(&self) -> ComputedLocals<'_> {
        ComputedLocals {
            exposure: self.exposure.as_ref().map(|m| &m.local),
            dissimilarity: self.dissimilarity.as_ref().map(|m| &m.local),
            entropy: self.entropy.as_ref().map(|m| &m.local),
            index_h: self.index_h.as_ref().map(|m| &m.local),
        }
    }

    fn summary(&self) -> GlobalSummary {
        GlobalSummary {
            dissimilarity: self.dissimilarity.as_ref().and_then(|m| m.global),
            entropy: self.entropy.as_ref().and_then(|m| m.global),
            index_h: self.index_h.as_ref().and_then(|m| m.global),
            exposure: self
                .exposure
                .as_ref()
                .and_then(|m| m.global.as_ref())
                .map(|g| g.rows().into_iter().map(|row| row.to_vec()).collect()),
        }
    }
}

/// One analysis over one unit layer.
#[derive(Debug, Clone)]
pub struct Session {
    layer: UnitLayer,
    mode: Mode,
    cache: MeasureCache,
}

impl Session {
    /// Start a non-spatial session over a validated layer.
    pub fn new(layer: UnitLayer) -> Self {
        if layer.looks_geographic() {
            warn!(
                "unit coordinates look like longitude/latitude; \
                 distances assume projected planar coordinates"
            );
        }
        debug!(units = layer.len(), groups = layer.n_groups(), "session loaded");
        Self {
            layer,
            mode: Mode::Raw,
            cache: MeasureCache::default(),
        }
    }

    /// Validate ids, coordinates and population and start a session.
    ///
    /// # Errors
    /// `EmptyInput`, `DimensionMismatch` or `NoGroupsSelected`, see
    /// [`UnitLayer::new`].
    pub fn load_attributes(
        ids: Vec<String>,
        coordinates: Vec<(f64, f64)>,
        population: Array2<f64>,
    ) -> Result<Self> {
        Ok(Self::new(UnitLayer::new(ids, coordinates, population)?))
    }

    pub fn layer(&self) -> &UnitLayer {
        &self.layer
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Locality matrix, if one has been estimated
    pub fn locality(&self) -> Option<&LocalityMatrix> {
        match &self.mode {
            Mode::Raw => None,
            Mode::Smoothed { locality, .. } => Some(locality),
        }
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self.mode, Mode::Smoothed { .. })
    }

    /// Estimate locality with a bandwidth and kernel, pruning enabled.
    pub fn estimate_locality(&mut self, bandwidth: f64, kernel: KernelKind) -> Result<()> {
        self.estimate_locality_with(LocalityParams {
            bandwidth,
            kernel,
            ..Default::default()
        })
    }

    /// Estimate locality and switch to spatial mode.
    ///
    /// Replaces any previous locality matrix and clears every cached
    /// measure. On error the session is left unchanged.
    pub fn estimate_locality_with(&mut self, params: LocalityParams) -> Result<()> {
        let locality = estimate_locality(&self.layer, &params)?;
        self.mode = Mode::Smoothed { locality, params };
        self.clear_measures();
        Ok(())
    }

    /// Compute (or fetch) a measure. Prerequisites are computed as needed.
    pub fn compute_measure(&mut self, kind: MeasureKind, scope: Scope) -> MeasureResult {
        let source = match &self.mode {
            Mode::Raw => Source::Raw(self.layer.population()),
            Mode::Smoothed { locality, .. } => Source::Smoothed {
                population: self.layer.population(),
                locality,
            },
        };
        match scope {
            Scope::Local => MeasureResult::Local(self.cache.local(kind, source)),
            Scope::Global => MeasureResult::Global(self.cache.global(kind, source)),
        }
    }

    /// Measure kinds with cached local results, in column order
    pub fn computed_measures(&self) -> Vec<MeasureKind> {
        self.cache.locals().kinds()
    }

    /// Global values computed so far
    pub fn summary(&self) -> GlobalSummary {
        self.cache.summary()
    }

    /// Join unit attributes, locality and every computed local measure.
    pub fn assemble_results(&self) -> Result<ResultTable> {
        assemble(&self.layer, self.locality(), &self.cache.locals())
    }

    /// Drop cached measures, keeping the mode.
    pub fn clear_measures(&mut self) {
        debug!("clearing measure cache");
        self.cache = MeasureCache::default();
    }

    /// Back to non-spatial mode with no cached measures.
    pub fn reset(&mut self) {
        self.mode = Mode::Raw;
        self.clear_measures();
    }
}
