use shape_packing::{Placement, Shape, VariantSet};
use std::{collections::HashSet, sync::Arc};

/// The six-shape, three-region sample puzzle used across the integration
/// tests.
#[allow(dead_code)]
pub const SAMPLE_PUZZLE: &str = "0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###

4x4: 0 0 0 0 2 0
12x5: 1 0 1 0 2 2
";

/// Install a logger for the test binary, ignoring repeat calls.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a shape from `(x, y)` pairs.
#[allow(dead_code)]
pub fn shape(points: &[(i32, i32)]) -> Shape {
    Shape::new(points.iter().copied().map(Into::into))
}

/// One shared variant set per required instance, `count` copies of each
/// shape.
#[allow(dead_code)]
pub fn required(shapes: &[(Shape, usize)]) -> Vec<Arc<VariantSet>> {
    shapes
        .iter()
        .flat_map(|(shape, count)| {
            let variants = Arc::new(shape.variants());
            std::iter::repeat(variants).take(*count)
        })
        .collect()
}

/// Check that `placements` is a valid witness for `required` in a `width` by
/// `height` region.
///
/// # Panics
///  - If any instance is missing, or placed with an orientation it does not
///    allow.
///  - If any cell is out of bounds, or covered twice.
#[allow(dead_code)]
pub fn assert_valid_placement(
    width: usize,
    height: usize,
    required: &[Arc<VariantSet>],
    placements: &[Placement],
) {
    assert_eq!(placements.len(), required.len(), "every instance is placed");

    let mut covered = HashSet::new();
    for (placement, variants) in placements.iter().zip(required) {
        assert!(
            variants.contains(&placement.cells),
            "instance [{}] placed as a shape outside its variant set",
            placement.instance
        );
        assert_eq!(
            placement.cells,
            variants.as_slice()[placement.variant]
                .translate(placement.anchor.x, placement.anchor.y)
        );

        for point in &placement.cells {
            assert!(
                point.x >= 0 && point.y >= 0,
                "point [{point}] has a negative coordinate"
            );
            assert!(
                (point.x as usize) < width && (point.y as usize) < height,
                "point [{point}] is outside the {width}x{height} region"
            );
            assert!(covered.insert(*point), "point [{point}] covered twice");
        }
    }
}
