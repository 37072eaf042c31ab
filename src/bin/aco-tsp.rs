//! Runs the colony on the bundled 5-city instance and prints the result.
//!
//! Log verbosity follows `RUST_LOG`, e.g. `RUST_LOG=u_antcolony=debug`.

use std::error::Error;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use u_antcolony::aco::{nearest_neighbor_route, tour_cost, AcoConfig, AcoRunner, DistanceMatrix};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let distances = DistanceMatrix::from_rows(vec![
        vec![0.0, 10.0, 12.0, 11.0, 14.0],
        vec![10.0, 0.0, 13.0, 15.0, 8.0],
        vec![12.0, 13.0, 0.0, 9.0, 14.0],
        vec![11.0, 15.0, 9.0, 0.0, 16.0],
        vec![14.0, 8.0, 14.0, 16.0, 0.0],
    ])?;

    let mut config = AcoConfig::default();
    if let Some(seed) = std::env::args().nth(1) {
        config = config.with_seed(seed.parse()?);
    }

    let result = AcoRunner::run(&distances, &config)?;
    println!("{result}");

    let greedy = nearest_neighbor_route(&distances, config.home_city)?;
    info!(
        seed = result.seed,
        nearest_neighbor = tour_cost(&greedy, &distances)?,
        final_iteration_best = result.final_best.cost,
        "done"
    );
    Ok(())
}
