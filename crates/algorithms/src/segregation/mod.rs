//! Segregation measures over spatial units
//!
//! Four measure families, each with per-unit (local) and region-wide
//! (global) values:
//! - **Dissimilarity**: uneven distribution of groups across units
//! - **Exposure / isolation**: P* co-location between and within groups
//! - **Entropy**: diversity of each unit and of the region
//! - **Index H**: each unit's share of the region's diversity loss
//!
//! Every measure reads a [`Source`]: raw population counts, or the
//! locality matrix once one has been estimated. [`Session`] owns that
//! choice and memoizes results.

pub mod assemble;
pub mod dissimilarity;
pub mod entropy;
pub mod exposure;
pub mod index_h;
mod measure;
mod session;
mod source;

pub use assemble::{assemble, labels_for, ComputedLocals};
pub use dissimilarity::{global_dissimilarity, local_dissimilarity};
pub use entropy::{global_entropy, local_entropy};
pub use exposure::{exposure_column, global_exposure, local_exposure};
pub use index_h::{global_index_h, local_index_h};
pub use measure::{GlobalValue, LocalValues, MeasureKind, MeasureResult, Scope};
pub use session::{Mode, Session};
pub use source::Source;
pub(crate) use source::ratio;
