//! Per-unit loops run sequentially by default.
//!
//! With the `parallel` feature the locality pass fans out over rayon's
//! thread pool; rows are still collected in unit order, so results are
//! identical either way.

#[cfg(feature = "parallel")]
pub(crate) use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// `into_par_iter()` resolving to plain `into_iter()`, so the
    /// `.map(..).collect()` chain after it uses `Iterator`.
    pub(crate) trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}

#[cfg(not(feature = "parallel"))]
pub(crate) use sequential::*;
