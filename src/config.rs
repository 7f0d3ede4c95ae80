//! Run parameters for a simulation, loadable from TOML.
//!
//! ```toml
//! arrival_rate = 0.5
//! service_rate = 0.7
//! horizon = 1000.0
//! # optional
//! capacity = 100000
//! seed = 42
//! ```

use crate::waiting_line::DEFAULT_CAPACITY;
use crate::Error;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a single-server queue simulation.
///
/// Rates are in customers per simulated time unit and the horizon is in simulated time units. A configuration is only
/// usable once [`validate()`] accepts it; [`Simulation::new()`] calls it, so an invalid configuration never starts a
/// run.
///
/// [`validate()`]: Config::validate
/// [`Simulation::new()`]: crate::Simulation::new
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Mean number of arrivals per time unit (lambda).
    pub arrival_rate: f64,
    /// Mean number of service completions per time unit while busy (mu).
    pub service_rate: f64,
    /// Simulated time at which the run stops.
    pub horizon: f64,
    /// Maximum number of customers allowed to wait at once.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Seed for the random generator. Absent means seed from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Config {
    /// A configuration with the default capacity and no fixed seed.
    pub fn new(arrival_rate: f64, service_rate: f64, horizon: f64) -> Self {
        Self {
            arrival_rate,
            service_rate,
            horizon,
            capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a configuration from TOML text. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the text is not valid TOML or is missing a required key.
    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::ConfigParse`] if it cannot be parsed.
    pub fn load<P>(path: P) -> crate::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("failed to read config file '{}': {}", path.display(), e);
            Error::Io(e)
        })?;
        Self::from_toml_str(&contents).map_err(|e| {
            tracing::error!("failed to parse config file '{}': {}", path.display(), e);
            e
        })
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the first rate or horizon that is not strictly positive and finite,
    /// or [`Error::InvalidCapacity`] if the capacity is zero.
    pub fn validate(&self) -> crate::Result {
        for (name, value) in [
            ("arrival_rate", self.arrival_rate),
            ("service_rate", self.service_rate),
            ("horizon", self.horizon),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter { name, value });
            }
        }

        if self.capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(())
    }

    /// Offered load, `arrival_rate / service_rate`.
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// Whether the queue has a bounded expected length over an infinite horizon.
    pub fn is_stable(&self) -> bool {
        self.arrival_rate < self.service_rate
    }
}
