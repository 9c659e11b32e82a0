//! Count the regions of a puzzle file whose shapes can be packed.
//!
//! Usage:
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- input.txt --show
//! ```

use clap::Parser;
use shape_packing::{
    backtracking::render_placements, parse_puzzle, BacktrackingFitter, PackingConfig,
    PackingOrchestrator, RegionVerdict,
};
use std::{error::Error, fs, path::PathBuf};

#[derive(Debug, Parser)]
#[command(author, version, about = "Count regions that can hold their required shapes")]
struct Cli {
    /// Puzzle file with shape definitions followed by region requests
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Evaluate regions one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Give up on a region after this many placements
    #[arg(long, value_name = "NODES")]
    node_budget: Option<u64>,

    /// Print a layout for every region that fits
    #[arg(long)]
    show: bool,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    env_logger::init();

    let cli = Cli::parse();
    let input = fs::read_to_string(&cli.input)
        .map_err(|err| format!("unable to read [{}]: {err}", cli.input.display()))?;
    let puzzle = parse_puzzle(&input)?;

    let config = PackingConfig::default()
        .with_parallel(!cli.sequential)
        .with_node_budget(cli.node_budget);
    let orchestrator = PackingOrchestrator::from_config(config);
    let report = orchestrator.solve_report(&puzzle.shapes, &puzzle.regions);

    for (region, verdict) in puzzle.regions.iter().zip(report.verdicts()) {
        if *verdict == RegionVerdict::Unknown {
            log::warn!("Region [{region}] was not decided within the node budget.");
        }
    }

    if cli.show {
        let fitter = BacktrackingFitter::with_budget(config.search_budget());
        for (region, _) in puzzle
            .regions
            .iter()
            .zip(report.verdicts())
            .filter(|(_, verdict)| verdict.fits())
        {
            let required: Vec<_> = PackingOrchestrator::<BacktrackingFitter>::expand(
                &puzzle.shapes,
                region,
            )
            .unwrap_or_default()
            .into_iter()
            .map(|shape| orchestrator.cache().get_or_compute(shape))
            .collect();

            if let Some(placements) = fitter.find_placement(region.width, region.height, &required)
            {
                println!("{region}");
                println!("{}", render_placements(region.width, region.height, &placements));
                println!();
            }
        }
    }

    println!("{}", report.fitted());

    Ok(())
}
