//! Ant Colony Optimization (Ant System) for the symmetric TSP.
//!
//! A colony of ants repeatedly builds closed tours from a shared home city.
//! Each step is a roulette-wheel draw weighted by learned pheromone and by
//! visibility (inverse distance). After every iteration the trails
//! evaporate and each ant reinforces its legs in proportion to the quality
//! of its tour.
//!
//! # Key Types
//!
//! - [`DistanceMatrix`] / [`VisibilityMatrix`]: validated input and its
//!   reciprocal
//! - [`PheromoneMatrix`]: the only state carried between iterations
//! - [`RouteConstructor`]: builds one ant's [`Route`]
//! - [`AcoConfig`]: colony parameters
//! - [`AcoRunner`]: executes the iteration loop, returns an [`AcoResult`]
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod construct;
mod matrix;
mod pheromone;
mod runner;
mod types;

pub use config::AcoConfig;
pub use construct::{nearest_neighbor_route, roulette_select, RouteConstructor};
pub use matrix::{DistanceMatrix, VisibilityMatrix};
pub use pheromone::PheromoneMatrix;
pub use runner::{AcoResult, AcoRunner};
pub use types::{tour_cost, AntTour, Route};
