//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! Provides an Ant System colony over a symmetric distance matrix:
//!
//! - **Input**: a validated [`DistanceMatrix`](aco::DistanceMatrix) and an
//!   [`AcoConfig`](aco::AcoConfig).
//! - **Search**: a fixed number of iterations in which every ant builds a
//!   tour by roulette-wheel sampling, followed by evaporation and
//!   quality-proportional pheromone deposit.
//! - **Output**: an [`AcoResult`](aco::AcoResult) with the final
//!   iteration's tours, its best tour and the best tour of the whole run.
//!
//! Runs are reproducible: with a fixed seed, every ant of every iteration
//! samples from its own deterministic ChaCha stream. With the `parallel`
//! feature the ants of one iteration can be built on the rayon pool
//! without changing the result.
//!
//! # Example
//!
//! ```
//! use u_antcolony::aco::{AcoConfig, AcoRunner, DistanceMatrix};
//!
//! let dm = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 10.0, 12.0, 11.0, 14.0],
//!     vec![10.0, 0.0, 13.0, 15.0, 8.0],
//!     vec![12.0, 13.0, 0.0, 9.0, 14.0],
//!     vec![11.0, 15.0, 9.0, 0.0, 16.0],
//!     vec![14.0, 8.0, 14.0, 16.0, 0.0],
//! ])?;
//! let result = AcoRunner::run(&dm, &AcoConfig::default().with_seed(42))?;
//! assert_eq!(result.tours.len(), 5);
//! assert!(result.best.cost <= result.final_best.cost);
//! # Ok::<(), u_antcolony::AcoError>(())
//! ```
//!
//! # Features
//!
//! - `parallel`: build ants concurrently with rayon (`AcoConfig::parallel`)
//! - `serde`: `Serialize`/`Deserialize` for configuration, inputs and results

pub mod aco;
mod error;
mod random;

pub use error::{AcoError, Result};
