//! Pheromone trail matrix and its per-iteration update.

use super::types::{AntTour, Route};
#[cfg(feature = "serde")]
use crate::error::AcoError;

/// Learned desirability of every city pair.
///
/// Starts uniform at τ₀ and stays symmetric: evaporation scales every
/// entry alike and deposits are always written to both directions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "super::matrix::RawMatrix"))]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Creates an `size`×`size` matrix with every entry set to `initial`.
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            data: vec![initial; size * size],
            size,
        }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Row of trail levels out of `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplies every entry by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for tau in &mut self.data {
            *tau *= keep;
        }
    }

    /// Adds `1 / cost` to both directions of every leg of `route`.
    ///
    /// Returns the amount deposited per leg, or `None` when the cost is
    /// zero or not finite and nothing was deposited.
    pub fn deposit(&mut self, route: &Route, cost: f64) -> Option<f64> {
        if !(cost > 0.0 && cost.is_finite()) {
            return None;
        }
        let delta = 1.0 / cost;
        for (u, v) in route.edges() {
            self.data[u * self.size + v] += delta;
            self.data[v * self.size + u] += delta;
        }
        Some(delta)
    }

    /// Evaporates, then lets every tour deposit.
    ///
    /// Runs once per iteration, after all of that iteration's tours are
    /// scored.
    pub fn update(&mut self, tours: &[AntTour], evaporation_rate: f64) {
        self.evaporate(evaporation_rate);
        for tour in tours {
            self.deposit(&tour.route, tour.cost);
        }
    }

    /// Returns `true` if `tau[i][j] == tau[j][i]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<super::matrix::RawMatrix> for PheromoneMatrix {
    type Error = AcoError;

    fn try_from(raw: super::matrix::RawMatrix) -> Result<Self, AcoError> {
        if raw.data.len() != raw.size * raw.size {
            return Err(AcoError::validation(format!(
                "pheromone matrix has {} entries, expected {}",
                raw.data.len(),
                raw.size * raw.size
            )));
        }
        if let Some(tau) = raw.data.iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
            return Err(AcoError::validation(format!(
                "pheromone levels must be finite and non-negative, got {tau}"
            )));
        }
        let matrix = Self {
            data: raw.data,
            size: raw.size,
        };
        if !matrix.is_symmetric() {
            return Err(AcoError::validation("pheromone matrix is not symmetric"));
        }
        Ok(matrix)
    }
}
