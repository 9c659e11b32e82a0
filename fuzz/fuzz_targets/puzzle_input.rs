#![no_main]

use libfuzzer_sys::fuzz_target;
use shape_packing::{parse_puzzle, PackingConfig, PackingOrchestrator};

fuzz_target!(|data: &str| {
    let Ok(puzzle) = parse_puzzle(data) else {
        return;
    };
    if puzzle.regions.iter().any(|region| region.area() > 10_000) {
        return;
    }

    for shape in &puzzle.shapes {
        assert!(shape.is_normalized());
    }

    // Keep each region cheap, the parser is what is under test.
    let config = PackingConfig::default()
        .with_parallel(false)
        .with_node_budget(Some(1_000));
    let orchestrator = PackingOrchestrator::from_config(config);
    let report = orchestrator.solve_report(&puzzle.shapes, &puzzle.regions);

    assert_eq!(report.len(), puzzle.regions.len());
});
