//! ACO configuration.

use crate::error::{AcoError, Result};

/// Configuration for the Ant System colony.
///
/// # Defaults
///
/// The defaults reproduce the classic small-instance setup: 5 ants,
/// 100 iterations, evaporation 0.5, α = 1, β = 2, τ₀ = 0.1.
///
/// ```
/// use u_antcolony::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.ant_count, 5);
/// assert_eq!(config.iterations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_antcolony::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(20)
///     .with_iterations(250)
///     .with_evaporation_rate(0.1)
///     .with_beta(3.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcoConfig {
    /// Number of iterations. The colony never stops early.
    pub iterations: usize,

    /// Number of ants building a tour in every iteration.
    pub ant_count: usize,

    /// Fraction of pheromone removed per iteration, in (0, 1).
    pub evaporation_rate: f64,

    /// Exponent on pheromone in the selection weight.
    pub alpha: f64,

    /// Exponent on visibility (inverse distance) in the selection weight.
    pub beta: f64,

    /// Initial pheromone level τ₀ on every city pair.
    pub initial_pheromone: f64,

    /// City every ant starts from and returns to (0-based).
    pub home_city: usize,

    /// Random seed. `None` draws one; the result reports the seed used.
    pub seed: Option<u64>,

    /// Build the ants of an iteration on the rayon pool.
    ///
    /// Needs the `parallel` feature; ignored otherwise. Results are the
    /// same either way.
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            ant_count: 5,
            evaporation_rate: 0.5,
            alpha: 1.0,
            beta: 2.0,
            initial_pheromone: 0.1,
            home_city: 0,
            seed: None,
            parallel: false,
        }
    }
}

impl AcoConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_initial_pheromone(mut self, tau0: f64) -> Self {
        self.initial_pheromone = tau0;
        self
    }

    pub fn with_home_city(mut self, city: usize) -> Self {
        self.home_city = city;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// `home_city` is checked against the distance matrix by the runner.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(AcoError::validation("iterations must be positive"));
        }
        if self.ant_count == 0 {
            return Err(AcoError::validation("ant_count must be positive"));
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(AcoError::validation(format!(
                "evaporation_rate must be in (0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(AcoError::validation(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(AcoError::validation(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(self.initial_pheromone.is_finite() && self.initial_pheromone > 0.0) {
            return Err(AcoError::validation(format!(
                "initial_pheromone must be finite and positive, got {}",
                self.initial_pheromone
            )));
        }
        Ok(())
    }
}
