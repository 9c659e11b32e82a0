//! Exhaustive depth-first placement search.
//!
//! The search places required instances in order. For instance `i` it tries
//! every orientation and every anchor cell of the region, in row-major order,
//! and recurses into instance `i + 1` after each placement that stays in
//! bounds and overlaps nothing placed so far. A failed recursion removes
//! exactly the cells it added before trying the next choice.
//!
//! The worst case is exponential in the number of instances, so the search
//! can optionally be bounded by a [`SearchBudget`].

use crate::{Coordinate, FittingStrategy, Shape, VariantSet};
use std::{collections::HashSet, fmt, sync::Arc};

/// Result of a search which may give up before finishing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FitOutcome {
    /// Every instance was placed.
    Fits,
    /// The whole search space was explored without placing every instance.
    DoesNotFit,
    /// The search budget ran out first.
    Unknown,
}

/// Upper bound on the work a single search may do.
///
/// Work is counted in nodes, where each successful placement of an instance
/// is one node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchBudget {
    max_nodes: Option<u64>,
}

impl SearchBudget {
    /// A budget that never runs out.
    pub const fn unlimited() -> Self {
        SearchBudget { max_nodes: None }
    }

    /// A budget of at most `max_nodes` placements.
    pub const fn nodes(max_nodes: u64) -> Self {
        SearchBudget {
            max_nodes: Some(max_nodes),
        }
    }

    /// The node limit, if any.
    pub const fn max_nodes(self) -> Option<u64> {
        self.max_nodes
    }

    fn allows(self, nodes_used: u64) -> bool {
        self.max_nodes.map_or(true, |max| nodes_used < max)
    }
}

/// Regions with more cells than this track occupancy in a hash set instead of
/// a flag per cell.
const DENSE_CELL_LIMIT: usize = 1 << 20;

/// Longest region side the search represents; cells are `i32` coordinates.
const MAX_SIDE: usize = i32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cells {
    Dense(Vec<bool>),
    Sparse(HashSet<Coordinate>),
}

/// The cells covered so far during one search of a `width` by `height` region.
///
/// Small regions keep one flag per cell. Large regions only store the
/// covered cells, so the memory used follows the shapes placed rather than
/// the size of the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedSet {
    width: usize,
    height: usize,
    cells: Cells,
    len: usize,
}

impl OccupiedSet {
    /// Create an empty set for a region of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        let cells = match width.checked_mul(height) {
            Some(area) if area <= DENSE_CELL_LIMIT => Cells::Dense(vec![false; area]),
            _ => Cells::Sparse(HashSet::new()),
        };

        OccupiedSet {
            width,
            height,
            cells,
            len: 0,
        }
    }

    /// Width of the region.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the region.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return true if `point` lies inside the region.
    pub fn in_bounds(&self, point: Coordinate) -> bool {
        match (usize::try_from(point.x), usize::try_from(point.y)) {
            (Ok(x), Ok(y)) => x < self.width && y < self.height,
            _ => false,
        }
    }

    /// Return true if `point` is inside the region and occupied.
    pub fn contains(&self, point: Coordinate) -> bool {
        if !self.in_bounds(point) {
            return false;
        }

        match &self.cells {
            Cells::Dense(flags) => flags[self.dense_index(point)],
            Cells::Sparse(covered) => covered.contains(&point),
        }
    }

    /// Return true if every cell of `shape` moved by `anchor` lands inside the
    /// region on an unoccupied cell.
    pub fn can_place(&self, shape: &Shape, anchor: Coordinate) -> bool {
        shape.iter().all(|point| {
            let point = point.translate(anchor.x, anchor.y);
            self.in_bounds(point) && !self.contains(point)
        })
    }

    /// Mark every cell of `shape` moved by `anchor` as occupied.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if [`can_place`](Self::can_place) would return
    /// false.
    pub fn place(&mut self, shape: &Shape, anchor: Coordinate) {
        debug_assert!(
            self.can_place(shape, anchor),
            "Placement at {anchor} is out of bounds or overlaps."
        );

        for point in shape {
            self.mark(point.translate(anchor.x, anchor.y), true);
        }
        self.len += shape.len();
    }

    /// Undo an earlier [`place`](Self::place) of the same shape and anchor.
    pub fn remove(&mut self, shape: &Shape, anchor: Coordinate) {
        for point in shape {
            let point = point.translate(anchor.x, anchor.y);
            debug_assert!(self.contains(point), "Removing a cell that is not occupied.");
            self.mark(point, false);
        }
        self.len -= shape.len();
    }

    fn mark(&mut self, point: Coordinate, occupied: bool) {
        if !self.in_bounds(point) {
            return;
        }

        let index = self.dense_index(point);
        match &mut self.cells {
            Cells::Dense(flags) => flags[index] = occupied,
            Cells::Sparse(covered) if occupied => {
                covered.insert(point);
            }
            Cells::Sparse(covered) => {
                covered.remove(&point);
            }
        }
    }

    // Only meaningful for dense storage, where `width * height` fits.
    fn dense_index(&self, point: Coordinate) -> usize {
        (point.y as usize)
            .wrapping_mul(self.width)
            .wrapping_add(point.x as usize)
    }
}

/// Where one required instance ended up in a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Position of the instance in the `required` list.
    pub instance: usize,
    /// Index of the chosen orientation in the instance's [`VariantSet`].
    pub variant: usize,
    /// Offset applied to the orientation.
    pub anchor: Coordinate,
    /// The cells covered, in region coordinates.
    pub cells: Shape,
}

/// Exhaustive backtracking implementation of [`FittingStrategy`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BacktrackingFitter {
    budget: SearchBudget,
}

impl BacktrackingFitter {
    /// Create a fitter that searches until it reaches an answer.
    pub const fn new() -> Self {
        BacktrackingFitter {
            budget: SearchBudget::unlimited(),
        }
    }

    /// Create a fitter that gives up once `budget` is spent.
    pub const fn with_budget(budget: SearchBudget) -> Self {
        BacktrackingFitter { budget }
    }

    /// The budget applied to every search.
    pub const fn budget(&self) -> SearchBudget {
        self.budget
    }

    /// Search for a placement and return it, or `None` if there is none or
    /// the budget ran out.
    pub fn find_placement(
        &self,
        width: usize,
        height: usize,
        required: &[Arc<VariantSet>],
    ) -> Option<Vec<Placement>> {
        let mut search = Search::new(width, height, required, self.budget);
        match search.run() {
            FitOutcome::Fits => Some(search.into_placements()),
            FitOutcome::DoesNotFit | FitOutcome::Unknown => None,
        }
    }
}

impl FittingStrategy for BacktrackingFitter {
    fn can_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> bool {
        self.try_fit(width, height, required) == FitOutcome::Fits
    }

    fn try_fit(&self, width: usize, height: usize, required: &[Arc<VariantSet>]) -> FitOutcome {
        Search::new(width, height, required, self.budget).run()
    }
}

/// State of one in-flight search. Never shared between threads.
struct Search<'r> {
    required: &'r [Arc<VariantSet>],
    occupied: OccupiedSet,
    // (variant index, anchor) per placed instance
    stack: Vec<(usize, Coordinate)>,
    budget: SearchBudget,
    nodes: u64,
    // A side was longer than `MAX_SIDE` and only part of the region is searched.
    truncated: bool,
}

impl<'r> Search<'r> {
    fn new(
        width: usize,
        height: usize,
        required: &'r [Arc<VariantSet>],
        budget: SearchBudget,
    ) -> Self {
        Search {
            required,
            occupied: OccupiedSet::new(width.min(MAX_SIDE), height.min(MAX_SIDE)),
            stack: Vec::with_capacity(required.len()),
            budget,
            nodes: 0,
            truncated: width > MAX_SIDE || height > MAX_SIDE,
        }
    }

    fn run(&mut self) -> FitOutcome {
        if self.occupied.width() == 0 || self.occupied.height() == 0 {
            return FitOutcome::DoesNotFit;
        }

        let outcome = match self.place_from(0) {
            FitOutcome::DoesNotFit if self.truncated => {
                log::debug!(
                    "No placement within the first [{}x{}] cells of an oversized region.",
                    self.occupied.width(),
                    self.occupied.height()
                );
                FitOutcome::Unknown
            }
            outcome => outcome,
        };

        if outcome == FitOutcome::Unknown {
            log::trace!(
                "Search gave up with a budget of [{:?}] nodes after placing [{}] of [{}] instances.",
                self.budget.max_nodes(),
                self.stack.len(),
                self.required.len()
            );
        }

        outcome
    }

    fn place_from(&mut self, index: usize) -> FitOutcome {
        let required = self.required;
        let Some(variants) = required.get(index) else {
            return FitOutcome::Fits;
        };

        for (variant_index, variant) in variants.iter().enumerate() {
            // Variants are normalized, so later anchors push a cell past the edge.
            let (Some(columns), Some(rows)) = (
                anchor_count(self.occupied.width(), variant.width()),
                anchor_count(self.occupied.height(), variant.height()),
            ) else {
                continue;
            };

            for y in 0..rows {
                for x in 0..columns {
                    let anchor = Coordinate::new(x as i32, y as i32);
                    if !self.occupied.can_place(variant, anchor) {
                        continue;
                    }

                    if !self.budget.allows(self.nodes) {
                        return FitOutcome::Unknown;
                    }
                    self.nodes += 1;

                    self.occupied.place(variant, anchor);
                    self.stack.push((variant_index, anchor));

                    match self.place_from(index + 1) {
                        FitOutcome::DoesNotFit => {}
                        // The occupied cells are left as-is, they describe the answer.
                        outcome => return outcome,
                    }

                    self.stack.pop();
                    self.occupied.remove(variant, anchor);
                }
            }
        }

        FitOutcome::DoesNotFit
    }

    fn into_placements(self) -> Vec<Placement> {
        self.stack
            .into_iter()
            .zip(self.required)
            .enumerate()
            .map(|(instance, ((variant, anchor), variants))| Placement {
                instance,
                variant,
                anchor,
                cells: variants.as_slice()[variant].translate(anchor.x, anchor.y),
            })
            .collect()
    }
}

/// Number of offsets along a side of length `side` at which a normalized
/// variant spanning `extent` cells stays inside the region.
fn anchor_count(side: usize, extent: i32) -> Option<usize> {
    let extent = usize::try_from(extent).ok()?;
    (side + 1).checked_sub(extent).filter(|count| *count > 0)
}

/// Render placements as a `width` by `height` grid of characters, one row per
/// line. Instances are labelled `A` to `Z` then `a` to `z`, later instances
/// with `*`, and empty cells with `.`.
pub fn render_placements(width: usize, height: usize, placements: &[Placement]) -> String {
    let mut grid = vec![vec!['.'; width]; height];

    for placement in placements {
        let label = match placement.instance {
            i @ 0..=25 => char::from(b'A' + i as u8),
            i @ 26..=51 => char::from(b'a' + (i - 26) as u8),
            _ => '*',
        };

        for point in &placement.cells {
            let cell = usize::try_from(point.y)
                .ok()
                .zip(usize::try_from(point.x).ok())
                .and_then(|(y, x)| grid.get_mut(y).and_then(|row| row.get_mut(x)));
            if let Some(cell) = cell {
                *cell = label;
            }
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for FitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FitOutcome::Fits => "fits",
            FitOutcome::DoesNotFit => "does not fit",
            FitOutcome::Unknown => "unknown",
        };
        f.write_str(text)
    }
}
