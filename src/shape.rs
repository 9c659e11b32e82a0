//! Polyomino shapes and the set of orientations reachable by rotating and
//! reflecting them.
//!
//! A [`Shape`] stores its cells as a sorted, de-duplicated list of
//! [`Coordinate`]s, so two shapes built from the same cells compare and hash
//! equal no matter what order the cells were supplied in. Shapes are compared
//! by their absolute cells; call [`Shape::normalize`] first to compare
//! geometry independent of position.

use crate::{parse::ParseError, Coordinate};
use std::{collections::BTreeSet, fmt, slice};

/// A set of grid cells forming one puzzle piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    points: Vec<Coordinate>,
}

impl Shape {
    /// Create a shape from a collection of cells. Duplicate cells are merged.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    pub fn new(points: impl IntoIterator<Item = Coordinate>) -> Self {
        match Self::try_from_points(points) {
            Some(shape) => shape,
            None => panic!("Shape must contain at least one point."),
        }
    }

    /// Create a shape from a collection of cells, returning `None` if there are
    /// no cells.
    pub fn try_from_points(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut points: Vec<_> = points.into_iter().collect();
        if points.is_empty() {
            return None;
        }

        points.sort_unstable();
        points.dedup();

        Some(Shape { points })
    }

    /// Parse a shape from rows of `#` (filled) and `.` (empty) characters.
    ///
    /// Rows may be indented; leading and trailing whitespace on each row is
    /// ignored, and blank rows are skipped. The result is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if a row contains any other character, or if no cell
    /// is filled.
    pub fn from_ascii(grid: &str) -> Result<Self, ParseError> {
        let mut points = Vec::new();
        let mut y = 0;

        for (index, line) in grid.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            crate::parse::parse_shape_row(line, y, index + 1, &mut points)?;
            y += 1;
        }

        Self::try_from_points(points)
            .map(|shape| shape.normalize())
            .ok_or(ParseError::EmptyShape { line: 1 })
    }

    /// The cells of this shape, in ascending `(x, y)` order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Iterate over the cells of this shape.
    pub fn iter(&self) -> slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    /// Number of cells covered by this shape.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a shape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The smallest `x` and the smallest `y` over all cells.
    pub fn min_corner(&self) -> Coordinate {
        let min_x = self.points.iter().map(|p| p.x).min().unwrap_or(0);
        let min_y = self.points.iter().map(|p| p.y).min().unwrap_or(0);

        Coordinate::new(min_x, min_y)
    }

    /// The largest `x` and the largest `y` over all cells.
    pub fn max_corner(&self) -> Coordinate {
        let max_x = self.points.iter().map(|p| p.x).max().unwrap_or(0);
        let max_y = self.points.iter().map(|p| p.y).max().unwrap_or(0);

        Coordinate::new(max_x, max_y)
    }

    /// Number of columns spanned by the bounding box.
    pub fn width(&self) -> i32 {
        self.max_corner().x - self.min_corner().x + 1
    }

    /// Number of rows spanned by the bounding box.
    pub fn height(&self) -> i32 {
        self.max_corner().y - self.min_corner().y + 1
    }

    /// Return true if the bounding box starts at the origin.
    pub fn is_normalized(&self) -> bool {
        self.min_corner() == Coordinate::new(0, 0)
    }

    /// Translate the shape so the minimum `x` and minimum `y` are both zero.
    pub fn normalize(&self) -> Shape {
        let min = self.min_corner();
        self.translate(-min.x, -min.y)
    }

    /// Shift every cell by the given offsets.
    pub fn translate(&self, dx: i32, dy: i32) -> Shape {
        // Translation preserves the ordering, so no re-sort is needed.
        Shape {
            points: self.points.iter().map(|p| p.translate(dx, dy)).collect(),
        }
    }

    /// Rotate a quarter turn clockwise about this shape's own bounding box.
    ///
    /// The result is not normalized when `self` is not.
    pub fn rotate(&self) -> Shape {
        let height = self.height();
        Shape::new(self.points.iter().map(|p| p.rotate(height)))
    }

    /// Mirror left to right within this shape's own bounding box.
    ///
    /// The result is not normalized when `self` is not.
    pub fn reflect(&self) -> Shape {
        let width = self.width();
        Shape::new(self.points.iter().map(|p| p.reflect(width)))
    }

    /// Compute every distinct normalized orientation of this shape under the
    /// eight rotations and reflections of the square.
    pub fn variants(&self) -> VariantSet {
        let mut variants = BTreeSet::new();
        let mut current = self.normalize();

        for _ in 0..4 {
            variants.insert(current.reflect().normalize());
            let next = current.rotate().normalize();
            variants.insert(current);
            current = next;
        }

        VariantSet {
            variants: variants.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Shape {
    type IntoIter = slice::Iter<'a, Coordinate>;
    type Item = &'a Coordinate;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const W: usize, const H: usize> From<[[u8; W]; H]> for Shape {
    /// Build a normalized shape from a row-major mask, where any non-zero entry
    /// is a filled cell.
    ///
    /// # Panics
    ///
    /// Panics if every entry of the mask is zero.
    fn from(arr: [[u8; W]; H]) -> Self {
        let points = arr.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell != 0)
                .map(move |(x, _)| Coordinate::new(x as i32, y as i32))
        });

        Shape::new(points).normalize()
    }
}

impl fmt::Display for Shape {
    /// Render the bounding box as rows of `#` and `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.min_corner();
        let max = self.max_corner();

        for y in min.y..=max.y {
            if y != min.y {
                writeln!(f)?;
            }
            for x in min.x..=max.x {
                let filled = self.points.binary_search(&Coordinate::new(x, y)).is_ok();
                write!(f, "{}", if filled { '#' } else { '.' })?;
            }
        }

        Ok(())
    }
}

/// The distinct normalized orientations of one shape.
///
/// Holds between one and eight shapes, in ascending order, each of which is
/// its own normalized form. All members cover the same number of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantSet {
    variants: Vec<Shape>,
}

impl VariantSet {
    /// A set holding only the normalized form of `shape`, for pieces that may
    /// be moved but not turned over or rotated.
    pub fn fixed(shape: &Shape) -> Self {
        VariantSet {
            variants: vec![shape.normalize()],
        }
    }

    /// The orientations, in ascending order.
    pub fn as_slice(&self) -> &[Shape] {
        &self.variants
    }

    /// Iterate over the orientations.
    pub fn iter(&self) -> slice::Iter<'_, Shape> {
        self.variants.iter()
    }

    /// Number of distinct orientations, between 1 and 8.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false, a variant set holds at least the base orientation.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Return true if `shape`, once normalized, is one of the orientations.
    pub fn contains(&self, shape: &Shape) -> bool {
        self.variants.binary_search(&shape.normalize()).is_ok()
    }

    /// Number of cells covered by any single orientation.
    pub fn cell_count(&self) -> usize {
        self.variants.first().map_or(0, Shape::len)
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type IntoIter = slice::Iter<'a, Shape>;
    type Item = &'a Shape;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(points: &[(i32, i32)]) -> Shape {
        Shape::new(points.iter().copied().map(Coordinate::from))
    }

    #[test]
    fn new_sorts_and_dedups() {
        let a = shape(&[(1, 0), (0, 0), (1, 0), (0, 1)]);
        let b = shape(&[(0, 1), (1, 0), (0, 0)]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(
            a.points(),
            &[
                Coordinate::new(0, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 0)
            ]
        );
    }

    #[test]
    #[should_panic(expected = "Shape must contain at least one point.")]
    fn new_empty_shape_panics() {
        let _shape = Shape::new(Vec::new());
    }

    #[test]
    fn try_from_points_empty() {
        assert!(Shape::try_from_points(Vec::new()).is_none());
    }

    #[test]
    fn normalize_moves_to_origin() {
        let s = shape(&[(5, 5), (5, 6), (6, 6)]).normalize();

        assert!(s.is_normalized());
        assert_eq!(s, shape(&[(0, 0), (0, 1), (1, 1)]));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            shape(&[(-3, 2), (-2, 2), (-2, 3)]),
            shape(&[(7, 1)]),
            shape(&[(0, 0), (4, 9), (2, 2)]),
        ] {
            let once = s.normalize();
            assert_eq!(once.normalize(), once);
            assert_eq!(once.min_corner(), Coordinate::new(0, 0));
        }
    }

    #[test]
    fn bounding_box_dimensions() {
        let s = shape(&[(2, 3), (4, 3), (2, 7)]);

        assert_eq!(s.width(), 3);
        assert_eq!(s.height(), 5);
        assert_eq!(s.min_corner(), Coordinate::new(2, 3));
        assert_eq!(s.max_corner(), Coordinate::new(4, 7));
    }

    #[test]
    fn rotate_l_shape() {
        let s = Shape::from([[1, 0, 0], [1, 1, 1]]);
        let expected = Shape::from([[1, 1], [1, 0], [1, 0]]);

        assert_eq!(s.rotate().normalize(), expected);
    }

    #[test]
    fn rotate_uses_own_bounding_box() {
        // Wider than three cells, which a fixed frame would mangle.
        let bar = Shape::from([[1, 1, 1, 1, 1]]);
        let rotated = bar.rotate();

        assert!(rotated.is_normalized());
        assert_eq!(rotated, Shape::from([[1], [1], [1], [1], [1]]));
    }

    #[test]
    fn reflect_l_shape() {
        let s = Shape::from([[1, 0, 0], [1, 1, 1]]);
        let expected = Shape::from([[0, 0, 1], [1, 1, 1]]);

        assert_eq!(s.reflect().normalize(), expected);
    }

    #[test]
    fn from_array_normalizes() {
        let s = Shape::from([[0, 0, 0], [0, 1, 1], [0, 0, 1]]);

        assert_eq!(s, shape(&[(0, 0), (1, 0), (1, 1)]));
    }

    #[test]
    fn from_ascii() {
        let s = Shape::from_ascii("###\n#..\n").unwrap();

        assert_eq!(s, Shape::from([[1, 1, 1], [1, 0, 0]]));
    }

    #[test]
    fn from_ascii_rejects_unknown_character() {
        let err = Shape::from_ascii("#.\n#x").unwrap_err();

        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                line: 2,
                column: 2,
                found: 'x'
            }
        );
    }

    #[test]
    fn from_ascii_rejects_empty_grid() {
        assert_eq!(
            Shape::from_ascii("...\n...").unwrap_err(),
            ParseError::EmptyShape { line: 1 }
        );
    }

    #[test]
    fn display_renders_grid() {
        let s = Shape::from([[1, 1, 0], [0, 1, 1]]);

        assert_eq!(s.to_string(), "##.\n.##");
    }

    #[test]
    fn variants_of_l_shape() {
        let s = Shape::from([[1, 0, 0], [1, 1, 1]]);
        let variants = s.variants();

        assert_eq!(variants.len(), 8);
        for expected in [
            Shape::from([[1, 0, 0], [1, 1, 1]]),
            Shape::from([[1, 1], [1, 0], [1, 0]]),
            Shape::from([[1, 1, 1], [0, 0, 1]]),
            Shape::from([[0, 1], [0, 1], [1, 1]]),
            Shape::from([[1, 1, 1], [1, 0, 0]]),
            Shape::from([[1, 0], [1, 0], [1, 1]]),
            Shape::from([[0, 0, 1], [1, 1, 1]]),
            Shape::from([[1, 1], [0, 1], [0, 1]]),
        ] {
            assert!(variants.contains(&expected), "missing\n{expected}");
        }
    }

    #[test]
    fn variants_collapse_under_symmetry() {
        assert_eq!(Shape::from([[1, 1], [1, 1]]).variants().len(), 1);
        assert_eq!(Shape::from([[1]]).variants().len(), 1);
        assert_eq!(Shape::from([[1, 1]]).variants().len(), 2);
        assert_eq!(Shape::from([[0, 1, 0], [1, 1, 1], [0, 1, 0]]).variants().len(), 1);
        // T tetromino: four rotations, each its own mirror image.
        assert_eq!(Shape::from([[1, 1, 1], [0, 1, 0]]).variants().len(), 4);
        // S tetromino: two rotations, doubled by reflection.
        assert_eq!(Shape::from([[0, 1, 1], [1, 1, 0]]).variants().len(), 4);
        // F pentomino has no symmetry at all.
        assert_eq!(Shape::from([[0, 1, 1], [1, 1, 0], [0, 1, 0]]).variants().len(), 8);
    }

    #[test]
    fn variants_are_normalized_and_same_size() {
        let s = shape(&[(10, 10), (11, 10), (12, 10), (12, 11), (12, 12)]);
        let variants = s.variants();

        assert!(!variants.is_empty());
        for variant in &variants {
            assert!(variant.is_normalized());
            assert_eq!(variant.len(), s.len());
        }
        assert_eq!(variants.cell_count(), 5);
        assert!(variants.contains(&s));
    }

    #[test]
    fn fixed_variant_set() {
        let s = Shape::from([[1, 1, 1]]).translate(2, 2);
        let fixed = VariantSet::fixed(&s);

        assert_eq!(fixed.len(), 1);
        assert!(fixed.contains(&s));
        assert!(!fixed.contains(&s.rotate()));
    }

    #[test]
    fn variants_independent_of_position_and_orientation() {
        let s = Shape::from([[0, 1, 1], [1, 1, 0], [0, 1, 0]]);
        let moved = s.translate(-4, 9);

        assert_eq!(s.variants(), moved.variants());
        assert_eq!(s.variants(), s.rotate().reflect().variants());
    }
}
