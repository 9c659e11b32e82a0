mod common;

use common::{assert_valid_placement, init_logging, required, shape, SAMPLE_PUZZLE};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use shape_packing::{
    parse_puzzle, BacktrackingFitter, FittingStrategy, PackingConfig, PackingOrchestrator,
    RegionRequest, RegionVerdict, Shape, VariantCache,
};
use std::sync::Arc;

fn vertical_domino() -> Shape {
    shape(&[(0, 0), (0, 1)])
}

#[test]
fn two_dominoes_tile_a_square() {
    let required = required(&[(vertical_domino(), 2)]);
    let fitter = BacktrackingFitter::new();

    assert!(fitter.can_fit(2, 2, &required));
    let placements = fitter.find_placement(2, 2, &required).unwrap();
    assert_valid_placement(2, 2, &required, &placements);
}

#[test]
fn three_dominoes_rejected_by_area() {
    let orchestrator = PackingOrchestrator::default();
    let catalog = vec![vertical_domino()];

    assert_eq!(
        orchestrator.evaluate(&catalog, &RegionRequest::new(2, 2, vec![3])),
        RegionVerdict::AreaExceeded
    );
    assert_eq!(orchestrator.solve(&catalog, &[RegionRequest::new(2, 2, vec![3])]), 0);
}

#[test]
fn bar_and_domino_share_a_three_by_two() {
    let required = required(&[
        (shape(&[(0, 0), (1, 0), (2, 0)]), 1),
        (vertical_domino(), 1),
    ]);
    let fitter = BacktrackingFitter::new();

    let placements = fitter.find_placement(3, 2, &required).unwrap();
    assert_valid_placement(3, 2, &required, &placements);
    // The domino has to lie flat in the row the bar leaves free.
    assert_eq!(placements[1].cells.height(), 1);
}

#[test]
fn monomino_and_domino_need_backtracking() {
    let required = required(&[
        (shape(&[(0, 0)]), 1),
        (shape(&[(0, 0), (1, 0)]), 1),
    ]);
    let fitter = BacktrackingFitter::new();

    assert!(fitter.can_fit(2, 2, &required));
    let placements = fitter.find_placement(2, 2, &required).unwrap();
    assert_valid_placement(2, 2, &required, &placements);
}

#[test]
fn area_is_necessary() {
    let fitter = BacktrackingFitter::new();
    let l_tromino = shape(&[(0, 0), (0, 1), (1, 1)]);

    for (width, height) in [(1, 1), (2, 2), (3, 2), (2, 4), (5, 1)] {
        for count in 1..=4 {
            let required = required(&[(l_tromino.clone(), count)]);
            if 3 * count > width * height {
                assert!(!fitter.can_fit(width, height, &required));
            }
        }
    }
}

#[test]
fn repeated_searches_agree() {
    let required = required(&[
        (shape(&[(0, 0), (1, 0), (1, 1), (2, 1)]), 2),
        (shape(&[(0, 0), (0, 1), (0, 2), (1, 2)]), 1),
    ]);
    let fitter = BacktrackingFitter::new();

    let first = fitter.find_placement(4, 3, &required);
    for _ in 0..10 {
        assert_eq!(fitter.find_placement(4, 3, &required), first);
    }
}

#[test]
fn adding_instances_never_helps() {
    let fitter = BacktrackingFitter::new();
    let t_tetromino = shape(&[(0, 0), (1, 0), (2, 0), (1, 1)]);
    let monomino = shape(&[(0, 0)]);

    // Two T tetrominoes cannot share a 3x3 box.
    let mut shapes = vec![(t_tetromino, 2)];
    assert!(!fitter.can_fit(3, 3, &required(&shapes)));

    shapes.push((monomino, 1));
    assert!(!fitter.can_fit(3, 3, &required(&shapes)));
}

#[test]
fn sample_small_region() {
    init_logging();

    let puzzle = parse_puzzle(SAMPLE_PUZZLE).unwrap();
    assert_eq!(puzzle.shapes.len(), 6);
    assert_eq!(puzzle.regions.len(), 2);

    let orchestrator = PackingOrchestrator::default();
    assert_eq!(
        orchestrator.evaluate(&puzzle.shapes, &puzzle.regions[0]),
        RegionVerdict::Fits
    );
}

#[test]
#[ignore = "exhaustive search of the 12x5 region is slow outside release mode"]
fn sample_puzzle() {
    init_logging();

    let puzzle = parse_puzzle(SAMPLE_PUZZLE).unwrap();
    let orchestrator = PackingOrchestrator::default();

    assert_eq!(orchestrator.solve(&puzzle.shapes, &puzzle.regions), 2);
}

#[test]
fn budget_leaves_hard_region_undecided() {
    init_logging();

    let puzzle = parse_puzzle(SAMPLE_PUZZLE).unwrap();
    let regions = vec![
        puzzle.regions[0].clone(),
        // Seven heptominoes, known to have no packing.
        RegionRequest::new(12, 5, vec![1, 0, 1, 0, 3, 2]),
    ];

    let config = PackingConfig::default().with_node_budget(Some(10_000));
    let orchestrator = PackingOrchestrator::from_config(config);
    let report = orchestrator.solve_report(&puzzle.shapes, &regions);

    assert_eq!(
        report.verdicts(),
        &[RegionVerdict::Fits, RegionVerdict::Unknown]
    );
    assert_eq!(report.fitted(), 1);
}

#[test]
fn parallel_and_sequential_agree() {
    init_logging();

    let catalog = vec![
        shape(&[(0, 0)]),
        vertical_domino(),
        shape(&[(0, 0), (1, 0), (2, 0)]),
        shape(&[(0, 0), (0, 1), (1, 1)]),
        shape(&[(0, 0), (1, 0), (0, 1), (1, 1)]),
    ];
    let regions: Vec<_> = (1..=4)
        .flat_map(|width| (1..=4).map(move |height| (width, height)))
        .flat_map(|(width, height)| {
            [
                RegionRequest::new(width, height, vec![1, 1]),
                RegionRequest::new(width, height, vec![0, 0, 1, 1]),
                RegionRequest::new(width, height, vec![0, 2, 0, 0, 1]),
                RegionRequest::new(width, height, vec![2, 0, 0, 2]),
            ]
        })
        .collect();

    let parallel = PackingOrchestrator::from_config(PackingConfig::default().with_parallel(true))
        .solve_report(&catalog, &regions);
    let sequential =
        PackingOrchestrator::from_config(PackingConfig::default().with_parallel(false))
            .solve_report(&catalog, &regions);

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), regions.len());
}

#[test]
fn cache_shared_between_rayon_workers() {
    let cache = VariantCache::new();
    let shapes = [
        shape(&[(0, 0), (1, 0), (1, 1), (2, 1), (1, 2)]),
        shape(&[(0, 0), (0, 1), (0, 2), (0, 3), (1, 3)]),
        shape(&[(0, 0), (1, 0), (0, 1), (1, 1)]),
    ];

    let sizes: Vec<usize> = (0..300)
        .into_par_iter()
        .map(|i| cache.get_or_compute(&shapes[i % shapes.len()]).len())
        .collect();

    assert!(sizes.iter().all(|size| [1, 8].contains(size)));
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().misses, 3);
    assert_eq!(cache.stats().hits, 297);

    let shared = cache.get_or_compute(&shapes[0]);
    assert!(Arc::ptr_eq(&shared, &cache.get_or_compute(&shapes[0])));
}
