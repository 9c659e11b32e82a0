#![deny(missing_docs)]

//! Decide whether collections of [polyominoes](https://en.wikipedia.org/wiki/Polyomino)
//! can be packed, without overlap, into rectangular regions.
//!
//! Each region asks for a number of copies of shapes from a catalog. A region
//! fits if there is some choice of orientation (any rotation or reflection)
//! and position for every requested copy such that no two copies share a cell
//! and every cell lies inside the region. Cells of the region may be left
//! empty.
//!
//! ```
//! use shape_packing::{PackingOrchestrator, RegionRequest, Shape};
//!
//! let catalog = vec![Shape::from([[1, 1, 1]]), Shape::from([[1], [1]])];
//! let regions = vec![
//!     RegionRequest::new(3, 2, vec![1, 1]),
//!     RegionRequest::new(2, 2, vec![1, 0]),
//! ];
//!
//! let orchestrator = PackingOrchestrator::default();
//! assert_eq!(orchestrator.solve(&catalog, &regions), 1);
//! ```

pub mod backtracking;
pub mod cache;
pub mod coordinate;
pub mod packing;
pub mod parse;
pub mod shape;

pub use backtracking::{BacktrackingFitter, FitOutcome, OccupiedSet, Placement, SearchBudget};
pub use cache::{CacheStats, VariantCache};
pub use coordinate::Coordinate;
pub use packing::{PackingConfig, PackingOrchestrator, PackingReport, RegionRequest, RegionVerdict};
pub use parse::{parse_puzzle, ParseError, Puzzle};
pub use shape::{Shape, VariantSet};

use std::sync::Arc;

/// A method of deciding whether shape instances can be placed in a region.
pub trait FittingStrategy {
    /// Return true if one orientation from each entry of `required` can be
    /// placed in a `width` by `height` region, with every cell inside
    /// `[0, width) x [0, height)` and no cell shared between instances.
    ///
    /// `required[i]` holds the allowed orientations of the `i`th instance; a
    /// shape requested `n` times appears `n` times. A region with a zero
    /// dimension never fits.
    fn can_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> bool;

    /// Like `can_fit`, but allowed to give up and report
    /// [`FitOutcome::Unknown`].
    ///
    /// Strategies without a notion of giving up only need to implement
    /// `can_fit`.
    fn try_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> FitOutcome {
        if self.can_fit(width, height, required) {
            FitOutcome::Fits
        } else {
            FitOutcome::DoesNotFit
        }
    }
}

impl<S> FittingStrategy for &S
where
    S: FittingStrategy,
{
    fn can_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> bool {
        <S as FittingStrategy>::can_fit(self, width, height, required)
    }

    fn try_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> FitOutcome {
        <S as FittingStrategy>::try_fit(self, width, height, required)
    }
}
