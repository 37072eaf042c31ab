//! Tour construction: one ant, one closed route.
//!
//! From the current city `c`, every unvisited city `j` gets the weight
//! `tau[c][j]^alpha * eta[c][j]^beta` and the next city is drawn by
//! roulette-wheel sampling over the cities in ascending index order.
//! The last free city is appended without sampling, then the ant returns
//! home.

use rand::Rng;
use tracing::debug;

use super::matrix::{DistanceMatrix, VisibilityMatrix};
use super::pheromone::PheromoneMatrix;
use super::types::Route;
use crate::error::{AcoError, Result};

/// Builds ant tours from the shared matrices.
///
/// Holds only shared references, so any number of ants can construct
/// concurrently against the same constructor. Visited cities are masked
/// in a per-ant scratch buffer; the shared matrices are never written.
#[derive(Debug, Clone, Copy)]
pub struct RouteConstructor<'a> {
    distances: &'a DistanceMatrix,
    visibility: &'a VisibilityMatrix,
    pheromone: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
}

impl<'a> RouteConstructor<'a> {
    pub fn new(
        distances: &'a DistanceMatrix,
        visibility: &'a VisibilityMatrix,
        pheromone: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
    ) -> Self {
        Self {
            distances,
            visibility,
            pheromone,
            alpha,
            beta,
        }
    }

    /// Builds one closed tour starting and ending at `home`.
    ///
    /// Draws one uniform value per sampled step (`n - 2` at most) from `rng`.
    ///
    /// # Errors
    ///
    /// [`AcoError::Algorithm`] if `home` is out of range or the finished
    /// route is not a valid tour.
    pub fn construct<R: Rng>(&self, home: usize, rng: &mut R) -> Result<Route> {
        let n = self.distances.size();
        if home >= n {
            return Err(AcoError::algorithm(format!(
                "home city {home} out of range for {n} cities"
            )));
        }

        let mut visited = vec![false; n];
        visited[home] = true;
        let mut cities = Vec::with_capacity(n + 1);
        cities.push(home);

        if n > 1 {
            let mut weights = vec![0.0; n];
            for _ in 0..n - 2 {
                let current = cities[cities.len() - 1];
                let next = self.select_next(current, &visited, &mut weights, rng)?;
                visited[next] = true;
                cities.push(next);
            }

            let mut remaining = (0..n).filter(|&c| !visited[c]);
            if let Some(last) = remaining.next() {
                let left_over = remaining.count();
                if left_over > 0 {
                    debug!(home, left_over, "more than one city left at the final step");
                }
                cities.push(last);
            }
        }
        cities.push(home);

        let route = Route::new(cities);
        route.validate(n, home)?;
        Ok(route)
    }

    /// Picks the next city from `current`.
    fn select_next<R: Rng>(
        &self,
        current: usize,
        visited: &[bool],
        weights: &mut [f64],
        rng: &mut R,
    ) -> Result<usize> {
        let tau = self.pheromone.row(current);
        let eta = self.visibility.row(current);
        for (j, w) in weights.iter_mut().enumerate() {
            *w = if visited[j] {
                0.0
            } else {
                tau[j].powf(self.alpha) * eta[j].powf(self.beta)
            };
        }

        let total: f64 = weights.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            // Nothing can be sampled: fall back to the nearest free city.
            let free: Vec<usize> = (0..visited.len()).filter(|&c| !visited[c]).collect();
            let next = self.distances.nearest_neighbor(current, &free).ok_or_else(|| {
                AcoError::algorithm(format!("no unvisited city left after city {current}"))
            })?;
            debug!(current, next, total, "zero total desirability, taking nearest city");
            return Ok(next);
        }

        let r: f64 = rng.random();
        roulette_select(weights, total, r)
            .ok_or_else(|| AcoError::algorithm("roulette wheel selected no city"))
    }
}

/// Roulette-wheel selection over `weights` summing to `total`.
///
/// Returns the first index whose cumulative probability exceeds `r`.
/// When rounding leaves `r` past the last cumulative value, the last index
/// with a positive weight is chosen. `None` only if no weight is positive.
pub fn roulette_select(weights: &[f64], total: f64, r: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (j, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w / total;
        if cumulative > r {
            return Some(j);
        }
    }
    weights.iter().rposition(|&w| w > 0.0)
}

/// Greedy tour from `home`: always move to the nearest unvisited city,
/// ties to the lowest index.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::{nearest_neighbor_route, DistanceMatrix};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 0.0), (1.0, 0.0)]).unwrap();
/// let route = nearest_neighbor_route(&dm, 0).unwrap();
/// assert_eq!(route.cities(), &[0, 2, 1, 0]);
/// ```
pub fn nearest_neighbor_route(distances: &DistanceMatrix, home: usize) -> Result<Route> {
    let n = distances.size();
    if home >= n {
        return Err(AcoError::validation(format!(
            "home city {home} out of range for {n} cities"
        )));
    }
    let mut free: Vec<usize> = (0..n).filter(|&c| c != home).collect();
    let mut cities = Vec::with_capacity(n + 1);
    cities.push(home);
    let mut current = home;
    while let Some(next) = distances.nearest_neighbor(current, &free) {
        free.retain(|&c| c != next);
        cities.push(next);
        current = next;
    }
    cities.push(home);
    Ok(Route::new(cities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::types::tour_cost;
    use crate::random::create_rng;

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

    #[test]
    fn test_construct_valid_tour() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(5, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let mut rng = create_rng(42);
        for home in 0..5 {
            for _ in 0..50 {
                let route = ctor.construct(home, &mut rng).expect("valid tour");
                assert_eq!(route.len(), 6);
                assert!(route.validate(5, home).is_ok());
            }
        }
    }

    #[test]
    fn test_construct_deterministic_for_seed() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(5, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let a: Vec<Route> = {
            let mut rng = create_rng(7);
            (0..10).map(|_| ctor.construct(0, &mut rng).expect("ok")).collect()
        };
        let b: Vec<Route> = {
            let mut rng = create_rng(7);
            (0..10).map(|_| ctor.construct(0, &mut rng).expect("ok")).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_construct_does_not_touch_shared_state() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(5, 0.1);
        let (vis_before, tau_before) = (vis.clone(), tau.clone());
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let mut rng = create_rng(1);
        ctor.construct(2, &mut rng).expect("ok");
        assert_eq!(vis, vis_before);
        assert_eq!(tau, tau_before);
    }

    #[test]
    fn test_single_city() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0]]).expect("valid");
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(1, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let route = ctor.construct(0, &mut create_rng(0)).expect("ok");
        assert_eq!(route.cities(), &[0, 0]);
    }

    #[test]
    fn test_two_cities_without_sampling() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 3.0], vec![3.0, 0.0]]).expect("valid");
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(2, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        assert_eq!(ctor.construct(1, &mut create_rng(0)).expect("ok").cities(), &[1, 0, 1]);
    }

    #[test]
    fn test_home_out_of_range() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(5, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        assert!(ctor.construct(5, &mut create_rng(0)).is_err());
    }

    #[test]
    fn test_zero_total_falls_back_to_nearest() {
        // City 0 reaches 1, 2 and 3 only at infinite distance, so every
        // weight out of 0 is zero. The nearest by raw distance is then a
        // tie at infinity, broken towards the lowest index.
        let inf = f64::INFINITY;
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, inf, inf, inf],
            vec![inf, 0.0, 1.0, 2.0],
            vec![inf, 1.0, 0.0, 5.0],
            vec![inf, 2.0, 5.0, 0.0],
        ])
        .expect("valid");
        let vis = VisibilityMatrix::from_distances(&dm);
        let tau = PheromoneMatrix::new(4, 0.1);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let route = ctor.construct(0, &mut create_rng(3)).expect("ok");
        assert_eq!(route.cities()[1], 1);
        assert!(route.validate(4, 0).is_ok());
    }

    #[test]
    fn test_zero_pheromone_falls_back_to_nearest() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let mut tau = PheromoneMatrix::new(5, 0.1);
        // Evaporating to nothing leaves every weight at zero.
        for _ in 0..2000 {
            tau.evaporate(0.9);
        }
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 2.0);
        let route = ctor.construct(0, &mut create_rng(5)).expect("ok");
        let greedy = nearest_neighbor_route(&dm, 0).expect("ok");
        assert_eq!(route, greedy);
    }

    #[test]
    fn test_strong_trail_is_followed() {
        let dm = five_cities();
        let vis = VisibilityMatrix::from_distances(&dm);
        let mut tau = PheromoneMatrix::new(5, 1e-12);
        tau.deposit(&Route::new(vec![0, 2, 4, 3, 1, 0]), 1e-6);
        let ctor = RouteConstructor::new(&dm, &vis, &tau, 1.0, 0.0);
        let mut rng = create_rng(11);
        for _ in 0..20 {
            let route = ctor.construct(0, &mut rng).expect("ok");
            let cities = route.cities();
            assert!(
                cities == [0, 2, 4, 3, 1, 0] || cities == [0, 1, 3, 4, 2, 0],
                "unexpected route {cities:?}"
            );
        }
    }

    #[test]
    fn test_roulette_select() {
        let w = [0.0, 1.0, 0.0, 3.0];
        assert_eq!(roulette_select(&w, 4.0, 0.0), Some(1));
        assert_eq!(roulette_select(&w, 4.0, 0.2499), Some(1));
        assert_eq!(roulette_select(&w, 4.0, 0.25), Some(3));
        assert_eq!(roulette_select(&w, 4.0, 0.9999), Some(3));
    }

    #[test]
    fn test_roulette_rounding_shortfall() {
        // Cumulative sum never exceeds r: last positive weight wins.
        assert_eq!(roulette_select(&[1.0, 1.0, 0.0], 2.0, 1.0), Some(1));
        assert_eq!(roulette_select(&[0.0, 0.0], 1.0, 0.5), None);
    }

    #[test]
    fn test_nearest_neighbor_route() {
        let dm = five_cities();
        let route = nearest_neighbor_route(&dm, 0).expect("ok");
        assert_eq!(route.cities(), &[0, 1, 4, 2, 3, 0]);
        assert_eq!(tour_cost(&route, &dm).expect("ok"), 52.0);
        assert!(nearest_neighbor_route(&dm, 9).is_err());
    }
}
