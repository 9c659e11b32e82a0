//! Evaluation of many region requests against one shape catalog.
//!
//! Each region is handled independently: its shape counts are expanded into
//! one entry per required copy, regions whose copies cover more cells than the
//! region holds are rejected up front, and the rest are handed to a
//! [`FittingStrategy`] with orientation sets drawn from a shared
//! [`VariantCache`]. Regions are evaluated in parallel on the `rayon` pool
//! unless [`PackingConfig::parallel`] is cleared.

use crate::{
    BacktrackingFitter, FitOutcome, FittingStrategy, SearchBudget, Shape, VariantCache,
    VariantSet,
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{fmt, sync::Arc};

/// A rectangular region and the number of copies of each catalog shape it
/// must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionRequest {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// `counts[i]` is the number of copies of catalog shape `i`. Missing
    /// trailing entries count as zero.
    pub counts: Vec<usize>,
}

impl RegionRequest {
    /// Create a new region request.
    pub fn new(width: usize, height: usize, counts: Vec<usize>) -> Self {
        RegionRequest {
            width,
            height,
            counts,
        }
    }

    /// Number of cells in the region.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Number of copies required of the shape at `index`.
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Total number of shape copies required, saturating at `usize::MAX`.
    pub fn instance_count(&self) -> usize {
        self.counts
            .iter()
            .fold(0usize, |total, count| total.saturating_add(*count))
    }

    /// Number of cells covered by every required copy, saturating at
    /// `usize::MAX`, or `None` if a non-zero count names a shape missing from
    /// `catalog`.
    pub fn required_cells(&self, catalog: &[Shape]) -> Option<usize> {
        let mut total = 0usize;

        for (index, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }

            let shape = catalog.get(index)?;
            total = total.saturating_add(count.saturating_mul(shape.len()));
        }

        Some(total)
    }
}

impl fmt::Display for RegionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}:", self.width, self.height)?;
        for count in &self.counts {
            write!(f, " {count}")?;
        }
        Ok(())
    }
}

/// How a single region was decided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegionVerdict {
    /// Every required copy was placed.
    Fits,
    /// The required copies cover more cells than the region has, so no search
    /// was run.
    AreaExceeded,
    /// The search proved there is no placement, or the request names a shape
    /// missing from the catalog.
    DoesNotFit,
    /// The search gave up before reaching an answer.
    Unknown,
}

impl RegionVerdict {
    /// Return true if the region was shown to fit.
    pub fn fits(self) -> bool {
        self == RegionVerdict::Fits
    }
}

impl From<FitOutcome> for RegionVerdict {
    fn from(outcome: FitOutcome) -> Self {
        match outcome {
            FitOutcome::Fits => RegionVerdict::Fits,
            FitOutcome::DoesNotFit => RegionVerdict::DoesNotFit,
            FitOutcome::Unknown => RegionVerdict::Unknown,
        }
    }
}

/// Per-region verdicts from one call to [`PackingOrchestrator::solve_report`],
/// in the same order as the regions were given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackingReport {
    verdicts: Vec<RegionVerdict>,
}

impl PackingReport {
    /// The verdict of every region, in input order.
    pub fn verdicts(&self) -> &[RegionVerdict] {
        &self.verdicts
    }

    /// Number of regions evaluated.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Return true if no regions were evaluated.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Number of regions with the given verdict.
    pub fn count(&self, verdict: RegionVerdict) -> usize {
        self.verdicts.iter().filter(|v| **v == verdict).count()
    }

    /// Number of regions that fit.
    pub fn fitted(&self) -> usize {
        self.count(RegionVerdict::Fits)
    }

    /// Number of regions rejected by the area check.
    pub fn area_exceeded(&self) -> usize {
        self.count(RegionVerdict::AreaExceeded)
    }

    /// Number of regions the search proved infeasible.
    pub fn does_not_fit(&self) -> usize {
        self.count(RegionVerdict::DoesNotFit)
    }

    /// Number of regions left undecided by the search budget.
    pub fn unknown(&self) -> usize {
        self.count(RegionVerdict::Unknown)
    }
}

impl fmt::Display for PackingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} regions fit ({} over area, {} infeasible, {} unknown)",
            self.fitted(),
            self.len(),
            self.area_exceeded(),
            self.does_not_fit(),
            self.unknown()
        )
    }
}

/// Knobs for a [`PackingOrchestrator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PackingConfig {
    /// Evaluate regions on the `rayon` thread pool.
    pub parallel: bool,
    /// Limit on placements per region search; `None` searches to completion.
    pub node_budget: Option<u64>,
}

impl Default for PackingConfig {
    fn default() -> Self {
        PackingConfig {
            parallel: true,
            node_budget: None,
        }
    }
}

impl PackingConfig {
    /// Set whether regions are evaluated in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the per-region node budget.
    pub fn with_node_budget(mut self, node_budget: Option<u64>) -> Self {
        self.node_budget = node_budget;
        self
    }

    /// The search budget this configuration describes.
    pub fn search_budget(&self) -> SearchBudget {
        self.node_budget
            .map_or(SearchBudget::unlimited(), SearchBudget::nodes)
    }
}

/// Counts how many regions can hold their required shapes.
#[derive(Debug)]
pub struct PackingOrchestrator<S = BacktrackingFitter> {
    strategy: S,
    cache: VariantCache,
    config: PackingConfig,
}

impl PackingOrchestrator<BacktrackingFitter> {
    /// Create an orchestrator backed by a [`BacktrackingFitter`] that honors
    /// the configured node budget.
    pub fn from_config(config: PackingConfig) -> Self {
        let strategy = BacktrackingFitter::with_budget(config.search_budget());
        Self::with_config(strategy, config)
    }
}

impl Default for PackingOrchestrator<BacktrackingFitter> {
    fn default() -> Self {
        Self::from_config(PackingConfig::default())
    }
}

impl<S> PackingOrchestrator<S>
where
    S: FittingStrategy,
{
    /// Create an orchestrator using `strategy` and the default configuration.
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, PackingConfig::default())
    }

    /// Create an orchestrator using `strategy` and `config`.
    ///
    /// The node budget in `config` only applies to strategies built by
    /// [`from_config`](PackingOrchestrator::from_config).
    pub fn with_config(strategy: S, config: PackingConfig) -> Self {
        PackingOrchestrator {
            strategy,
            cache: VariantCache::new(),
            config,
        }
    }

    /// The strategy used to decide each region.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The configuration in use.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// The orientation cache, shared by every region this orchestrator has
    /// evaluated.
    pub fn cache(&self) -> &VariantCache {
        &self.cache
    }

    /// Expand the counts of `region` into one catalog shape per required copy,
    /// in catalog order.
    ///
    /// Returns `None` if the region asks for a non-zero number of copies of a
    /// shape beyond the end of the catalog, or for more copies than can be
    /// allocated.
    pub fn expand<'c>(catalog: &'c [Shape], region: &RegionRequest) -> Option<Vec<&'c Shape>> {
        let mut instances = Vec::new();
        instances.try_reserve_exact(region.instance_count()).ok()?;

        for (index, &count) in region.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }

            let shape = catalog.get(index)?;
            instances.extend(std::iter::repeat(shape).take(count));
        }

        Some(instances)
    }

    /// Decide a single region.
    ///
    /// Requests are checked against the region's area before any copy is
    /// expanded, so a huge count is rejected without allocating for it.
    pub fn evaluate(&self, catalog: &[Shape], region: &RegionRequest) -> RegionVerdict {
        let Some(total_points) = region.required_cells(catalog) else {
            log::debug!(
                "Region [{}] requires shapes missing from a catalog of [{}].",
                region,
                catalog.len()
            );
            return RegionVerdict::DoesNotFit;
        };

        if total_points > region.area() {
            log::debug!(
                "Region [{}] rejected: [{}] cells required but only [{}] available.",
                region,
                total_points,
                region.area()
            );
            return RegionVerdict::AreaExceeded;
        }

        // Every shape has a cell, so the copies number at most the region's area.
        let Some(instances) = Self::expand(catalog, region) else {
            log::warn!(
                "Region [{}] asks for [{}] copies, too many to search.",
                region,
                region.instance_count()
            );
            return RegionVerdict::Unknown;
        };

        let required: Vec<Arc<VariantSet>> = instances
            .into_iter()
            .map(|shape| self.cache.get_or_compute(shape))
            .collect();

        let verdict = RegionVerdict::from(self.strategy.try_fit(
            region.width,
            region.height,
            &required,
        ));
        log::debug!(
            "Region [{}] with [{}] instances covering [{}] of [{}] cells: {:?}.",
            region,
            required.len(),
            total_points,
            region.area(),
            verdict
        );

        verdict
    }

    /// Count the regions whose required shapes can all be placed.
    ///
    /// Regions left undecided by a search budget are not counted.
    pub fn solve(&self, catalog: &[Shape], regions: &[RegionRequest]) -> usize
    where
        S: Sync,
    {
        self.solve_report(catalog, regions).fitted()
    }

    /// Decide every region and report the verdicts in input order.
    pub fn solve_report(&self, catalog: &[Shape], regions: &[RegionRequest]) -> PackingReport
    where
        S: Sync,
    {
        let verdicts: Vec<RegionVerdict> = if self.config.parallel {
            regions
                .par_iter()
                .map(|region| self.evaluate(catalog, region))
                .collect()
        } else {
            regions
                .iter()
                .map(|region| self.evaluate(catalog, region))
                .collect()
        };

        let report = PackingReport { verdicts };
        log::info!("{report}; variant cache {:?}.", self.cache.stats());

        report
    }
}
