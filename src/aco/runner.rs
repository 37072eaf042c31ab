//! Colony execution loop.
//!
//! # Algorithm
//!
//! 1. Validate the configuration, derive visibility, set every trail to τ₀
//! 2. At each of the configured iterations:
//!    a. Every ant builds a closed tour from the home city
//!    b. Score all tours and pick the iteration's best
//!    c. Evaporate, then let every ant deposit `1 / cost` on its legs
//! 3. Report the final iteration's tours and the best tours found
//!
//! The pheromone matrix is only written in step 2c, after every ant of the
//! iteration has finished and before any ant of the next one starts.
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant System: Optimization
//! by a Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.

use std::fmt;

use tracing::{debug, info};

use super::config::AcoConfig;
use super::construct::RouteConstructor;
use super::matrix::{DistanceMatrix, VisibilityMatrix};
use super::pheromone::PheromoneMatrix;
use super::types::{AntTour, Route};
use crate::error::{AcoError, Result};
use crate::random::ant_rng;

/// Result of a colony run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Tours built by the ants of the final iteration, in ant order.
    pub tours: Vec<AntTour>,

    /// Cheapest tour of the final iteration.
    pub final_best: AntTour,

    /// Cheapest tour over all iterations.
    pub best: AntTour,

    /// Iteration (0-based) in which `best` was built.
    pub best_iteration: usize,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Best cost of each iteration, one entry per iteration.
    pub cost_history: Vec<f64>,

    /// Pheromone trails after the final update.
    pub pheromone: PheromoneMatrix,

    /// Seed the run used.
    pub seed: u64,
}

/// Executes the Ant System colony.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the colony on `distances`.
    ///
    /// # Errors
    ///
    /// [`AcoError::Validation`] for an invalid configuration or a home city
    /// outside the matrix, before any iteration runs. [`AcoError::Algorithm`]
    /// if an ant produces a malformed tour.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_antcolony::aco::{AcoConfig, AcoRunner, DistanceMatrix};
    ///
    /// let dm = DistanceMatrix::from_points(&[
    ///     (0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0),
    /// ]).unwrap();
    /// let config = AcoConfig::default().with_iterations(20).with_seed(42);
    ///
    /// let result = AcoRunner::run(&dm, &config).unwrap();
    /// assert_eq!(result.tours.len(), 5);
    /// assert!((result.best.cost - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_observer(distances, config, |_, _, _| {})
    }

    /// Runs the colony, calling `observer(iteration, iteration_best, best)`
    /// after each pheromone update.
    pub fn run_with_observer<F>(
        distances: &DistanceMatrix,
        config: &AcoConfig,
        mut observer: F,
    ) -> Result<AcoResult>
    where
        F: FnMut(usize, f64, f64),
    {
        config.validate()?;
        let n = distances.size();
        if config.home_city >= n {
            return Err(AcoError::validation(format!(
                "home_city {} out of range for {n} cities",
                config.home_city
            )));
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let visibility = VisibilityMatrix::from_distances(distances);
        let mut pheromone = PheromoneMatrix::new(n, config.initial_pheromone);

        info!(
            cities = n,
            ants = config.ant_count,
            iterations = config.iterations,
            seed,
            "starting ant colony"
        );
        #[cfg(not(feature = "parallel"))]
        {
            if config.parallel {
                debug!("parallel construction needs the `parallel` feature, running sequentially");
            }
        }

        let mut tours = Vec::new();
        let mut best: Option<(AntTour, usize)> = None;
        let mut cost_history = Vec::with_capacity(config.iterations);

        for iteration in 0..config.iterations {
            let constructor = RouteConstructor::new(
                distances,
                &visibility,
                &pheromone,
                config.alpha,
                config.beta,
            );
            tours = construct_tours(&constructor, distances, config, seed, iteration)?;

            let iteration_best = find_best(&tours)?.clone();
            if best
                .as_ref()
                .is_none_or(|(b, _)| iteration_best.cost < b.cost)
            {
                best = Some((iteration_best.clone(), iteration));
            }
            let best_cost = best.as_ref().map_or(iteration_best.cost, |(b, _)| b.cost);

            pheromone.update(&tours, config.evaporation_rate);
            cost_history.push(iteration_best.cost);

            debug!(
                iteration,
                iteration_best = iteration_best.cost,
                best = best_cost,
                "iteration finished"
            );
            observer(iteration, iteration_best.cost, best_cost);
        }

        let (best, best_iteration) =
            best.ok_or_else(|| AcoError::algorithm("colony finished without any tour"))?;
        let final_best = find_best(&tours)?.clone();

        info!(
            best = best.cost,
            best_iteration,
            final_best = final_best.cost,
            "ant colony finished"
        );

        Ok(AcoResult {
            tours,
            final_best,
            best,
            best_iteration,
            iterations: config.iterations,
            cost_history,
            pheromone,
            seed,
        })
    }
}

/// Builds and scores one tour per ant.
///
/// Ant `k` of iteration `i` always draws from the same random stream, so
/// the parallel and sequential paths return identical tours.
fn construct_tours(
    constructor: &RouteConstructor<'_>,
    distances: &DistanceMatrix,
    config: &AcoConfig,
    seed: u64,
    iteration: usize,
) -> Result<Vec<AntTour>> {
    let build = |ant: usize| -> Result<AntTour> {
        let mut rng = ant_rng(seed, iteration, ant, config.ant_count);
        let route = constructor.construct(config.home_city, &mut rng)?;
        AntTour::evaluate(route, distances)
    };

    #[cfg(feature = "parallel")]
    {
        if config.parallel {
            use rayon::prelude::*;
            return (0..config.ant_count).into_par_iter().map(&build).collect();
        }
    }

    (0..config.ant_count).map(&build).collect()
}

/// The cheapest tour, ties to the lowest ant index.
fn find_best(tours: &[AntTour]) -> Result<&AntTour> {
    tours
        .iter()
        .min_by(|a, b| {
            a.cost
                .partial_cmp(&b.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| AcoError::algorithm("iteration produced no tours"))
}

fn write_route(f: &mut fmt::Formatter<'_>, route: &Route) -> fmt::Result {
    let cities: Vec<String> = route.to_one_based().iter().map(|c| c.to_string()).collect();
    write!(f, "[{}]", cities.join(" "))
}

/// Prints cities 1-based and the best cost rounded to an integer.
impl fmt::Display for AcoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Routes of all the ants at the end:")?;
        for tour in &self.tours {
            write_route(f, &tour.route)?;
            writeln!(f)?;
        }
        writeln!(f)?;
        write!(f, "Best path: ")?;
        write_route(f, &self.best.route)?;
        writeln!(f, " (iteration {})", self.best_iteration + 1)?;
        write!(f, "Cost of the best path: {}", self.best.cost.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::construct::nearest_neighbor_route;
    use crate::aco::types::tour_cost;

    fn five_cities() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 12.0, 11.0, 14.0],
            vec![10.0, 0.0, 13.0, 15.0, 8.0],
            vec![12.0, 13.0, 0.0, 9.0, 14.0],
            vec![11.0, 15.0, 9.0, 0.0, 16.0],
            vec![14.0, 8.0, 14.0, 16.0, 0.0],
        ])
        .expect("valid")
    }

    fn reference_config() -> AcoConfig {
        AcoConfig::default()
            .with_ant_count(5)
            .with_iterations(100)
            .with_evaporation_rate(0.5)
            .with_alpha(1.0)
            .with_beta(2.0)
            .with_home_city(0)
            .with_seed(42)
    }

    #[test]
    fn test_reference_instance() {
        let dm = five_cities();
        let result = AcoRunner::run(&dm, &reference_config()).expect("run succeeds");

        assert_eq!(result.iterations, 100);
        assert_eq!(result.tours.len(), 5);
        for tour in &result.tours {
            assert!(tour.route.validate(5, 0).is_ok());
            assert_eq!(tour.cost, tour_cost(&tour.route, &dm).expect("ok"));
        }

        let greedy = nearest_neighbor_route(&dm, 0).expect("ok");
        let greedy_cost = tour_cost(&greedy, &dm).expect("ok");
        assert!(result.best.cost > 0.0);
        assert_eq!(result.best.cost.fract(), 0.0);
        assert!(
            result.best.cost <= greedy_cost,
            "best {} worse than nearest neighbour {}",
            result.best.cost,
            greedy_cost
        );
    }

    #[test]
    fn test_final_best_is_min_of_final_tours() {
        let result = AcoRunner::run(&five_cities(), &reference_config()).expect("ok");
        let min = result
            .tours
            .iter()
            .map(|t| t.cost)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.final_best.cost, min);
        assert!(result.best.cost <= result.final_best.cost);
        assert_eq!(result.cost_history.last().copied(), Some(min));
    }

    #[test]
    fn test_best_matches_history() {
        let result = AcoRunner::run(&five_cities(), &reference_config()).expect("ok");
        assert_eq!(result.cost_history.len(), 100);
        let min = result.cost_history.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(result.best.cost, min);
        assert_eq!(result.cost_history[result.best_iteration], min);
        assert!(result.cost_history[..result.best_iteration]
            .iter()
            .all(|&c| c > min));
    }

    #[test]
    fn test_deterministic_under_seed() {
        let dm = five_cities();
        let a = AcoRunner::run(&dm, &reference_config()).expect("ok");
        let b = AcoRunner::run(&dm, &reference_config()).expect("ok");
        assert_eq!(a.tours, b.tours);
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.pheromone, b.pheromone);
    }

    #[test]
    fn test_reported_seed_reproduces_run() {
        let dm = five_cities();
        let config = AcoConfig::default().with_iterations(10);
        let first = AcoRunner::run(&dm, &config).expect("ok");
        let again = AcoRunner::run(&dm, &config.clone().with_seed(first.seed)).expect("ok");
        assert_eq!(first.tours, again.tours);
    }

    #[test]
    fn test_pheromone_symmetric_after_run() {
        let result = AcoRunner::run(&five_cities(), &reference_config()).expect("ok");
        assert!(result.pheromone.is_symmetric());
    }

    #[test]
    fn test_single_city() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0]]).expect("valid");
        let config = AcoConfig::default().with_iterations(3).with_seed(1);
        let result = AcoRunner::run(&dm, &config).expect("ok");
        assert_eq!(result.tours.len(), 5);
        for tour in &result.tours {
            assert_eq!(tour.route.cities(), &[0, 0]);
            assert_eq!(tour.cost, 0.0);
        }
        assert_eq!(result.best.cost, 0.0);
        // No deposit, three rounds of evaporation.
        assert!((result.pheromone.get(0, 0) - 0.1 * 0.125).abs() < 1e-15);
    }

    #[test]
    fn test_home_city_out_of_range() {
        let config = reference_config().with_home_city(5);
        let err = AcoRunner::run(&five_cities(), &config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let mut calls = 0;
        let config = reference_config().with_evaporation_rate(1.0);
        let err = AcoRunner::run_with_observer(&five_cities(), &config, |_, _, _| calls += 1)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let mut seen = Vec::new();
        let config = reference_config().with_iterations(12);
        AcoRunner::run_with_observer(&five_cities(), &config, |i, iter_best, best| {
            assert!(best <= iter_best);
            seen.push(i);
        })
        .expect("ok");
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_other_home_city() {
        let config = reference_config().with_home_city(3).with_iterations(30);
        let result = AcoRunner::run(&five_cities(), &config).expect("ok");
        for tour in &result.tours {
            assert!(tour.route.validate(5, 3).is_ok());
        }
    }

    #[test]
    fn test_display() {
        let config = reference_config().with_iterations(5);
        let result = AcoRunner::run(&five_cities(), &config).expect("ok");
        let text = result.to_string();
        assert!(text.starts_with("Routes of all the ants at the end:\n[1 "));
        assert!(text.contains("Best path: [1 "));
        assert!(text.ends_with(&format!(
            "Cost of the best path: {}",
            result.best.cost.round() as i64
        )));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let dm = five_cities();
        let seq = AcoRunner::run(&dm, &reference_config()).expect("ok");
        let par = AcoRunner::run(&dm, &reference_config().with_parallel(true)).expect("ok");
        assert_eq!(seq.tours, par.tours);
        assert_eq!(seq.best, par.best);
        assert_eq!(seq.pheromone, par.pheromone);
    }
}
