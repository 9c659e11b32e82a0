#![no_main]

use libfuzzer_sys::fuzz_target;
use shape_packing::{
    BacktrackingFitter, Coordinate, FitOutcome, FittingStrategy, SearchBudget, Shape, VariantSet,
};
use std::{collections::HashSet, sync::Arc};

#[derive(Debug)]
struct SmallRegionInput {
    width: usize,
    height: usize,
    shapes: Vec<Shape>,
}

impl<'a> arbitrary::Arbitrary<'a> for SmallRegionInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let width = usize::from(u.arbitrary::<u8>()? % 5);
        let height = usize::from(u.arbitrary::<u8>()? % 5);
        let shape_count = u.arbitrary::<u8>()? % 4;

        let mut shapes = Vec::new();
        for _ in 0..shape_count {
            // Each bit of the mask fills one cell of a 3x3 box.
            let mask = u.arbitrary::<u16>()? & 0b1_1111_1111;
            let points = (0..9)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| Coordinate::new(bit % 3, bit / 3));

            if let Some(shape) = Shape::try_from_points(points) {
                shapes.push(shape.normalize());
            }
        }

        Ok(SmallRegionInput {
            width,
            height,
            shapes,
        })
    }
}

fuzz_target!(|data: SmallRegionInput| {
    let required: Vec<Arc<VariantSet>> = data
        .shapes
        .iter()
        .map(|shape| Arc::new(shape.variants()))
        .collect();
    let fitter = BacktrackingFitter::with_budget(SearchBudget::nodes(50_000));

    let outcome = fitter.try_fit(data.width, data.height, &required);
    assert_eq!(outcome, fitter.try_fit(data.width, data.height, &required));

    let total_points: usize = data.shapes.iter().map(Shape::len).sum();
    if total_points > data.width * data.height {
        assert_ne!(outcome, FitOutcome::Fits);
    }

    if outcome == FitOutcome::Fits {
        let placements = fitter
            .find_placement(data.width, data.height, &required)
            .unwrap();
        let mut covered = HashSet::new();

        for (placement, variants) in placements.iter().zip(&required) {
            assert!(variants.contains(&placement.cells));
            for point in &placement.cells {
                assert!(point.x >= 0 && (point.x as usize) < data.width);
                assert!(point.y >= 0 && (point.y as usize) < data.height);
                assert!(covered.insert(*point));
            }
        }
    }
});
