//! Tour representation and cost evaluation.

use super::matrix::DistanceMatrix;
use crate::error::{AcoError, Result};

/// A closed tour: city indices starting and ending at the home city.
///
/// A complete route over `n` cities has `n + 1` entries and visits every
/// city exactly once among its first `n` positions.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::Route;
///
/// let route = Route::new(vec![0, 2, 1, 0]);
/// assert_eq!(route.home(), Some(0));
/// assert!(route.validate(3, 0).is_ok());
/// assert_eq!(route.to_one_based(), vec![1, 3, 2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    cities: Vec<usize>,
}

impl Route {
    /// Wraps a city sequence without checking it; see [`validate`](Self::validate).
    pub fn new(cities: Vec<usize>) -> Self {
        Self { cities }
    }

    /// The city sequence, home city at both ends.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    pub fn home(&self) -> Option<usize> {
        self.cities.first().copied()
    }

    /// Number of entries, including the closing return to home.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Consecutive `(from, to)` legs of the tour.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cities.windows(2).map(|w| (w[0], w[1]))
    }

    /// City numbers in the 1-based convention used for printing.
    pub fn to_one_based(&self) -> Vec<usize> {
        self.cities.iter().map(|&c| c + 1).collect()
    }

    /// Checks that this is a closed tour over cities `0..n` from `home`.
    ///
    /// Fails with [`AcoError::Algorithm`]: a route that breaks these rules
    /// can only come from a defect in route construction.
    pub fn validate(&self, n: usize, home: usize) -> Result<()> {
        if self.cities.len() != n + 1 {
            return Err(AcoError::algorithm(format!(
                "route has {} entries, expected {}",
                self.cities.len(),
                n + 1
            )));
        }
        if self.cities[0] != home || self.cities[n] != home {
            return Err(AcoError::algorithm(format!(
                "route must start and end at city {home}: {:?}",
                self.cities
            )));
        }
        let mut seen = vec![false; n];
        for &city in &self.cities[..n] {
            match seen.get_mut(city) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(AcoError::algorithm(format!(
                        "city {city} visited more than once: {:?}",
                        self.cities
                    )))
                }
                None => {
                    return Err(AcoError::algorithm(format!(
                        "city {city} out of range for {n} cities"
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Sums the leg distances of `route`.
///
/// Fails with [`AcoError::Algorithm`] if the route names a city outside
/// the matrix.
pub fn tour_cost(route: &Route, distances: &DistanceMatrix) -> Result<f64> {
    route.edges().try_fold(0.0, |total, (from, to)| {
        distances
            .try_get(from, to)
            .map(|d| total + d)
            .ok_or_else(|| {
                AcoError::algorithm(format!(
                    "leg ({from}, {to}) out of range for {} cities",
                    distances.size()
                ))
            })
    })
}

/// One ant's finished tour with its cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntTour {
    pub route: Route,
    pub cost: f64,
}

impl AntTour {
    /// Scores `route` against `distances`.
    pub fn evaluate(route: Route, distances: &DistanceMatrix) -> Result<Self> {
        let cost = tour_cost(&route, distances)?;
        Ok(Self { route, cost })
    }
}
