//! Configuration system for PuzzleForge.
//!
//! Load search tuning from TOML or YAML to control the random seed, request
//! defaults and every strategy constant without code changes. Every field
//! defaults to the reference behavior, so an empty file is a valid config.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use puzzleforge_config::SolverConfig;
//! use puzzleforge_core::Algorithm;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!     default_algorithm = "simulated_annealing"
//!
//!     [annealing]
//!     starting_temperature = 50.0
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.default_algorithm, Algorithm::SimulatedAnnealing);
//! assert_eq!(config.annealing.starting_temperature, 50.0);
//! assert_eq!(config.annealing.cooling_rate, 0.995);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use puzzleforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("puzzleforge.toml").unwrap_or_default();
//! assert_eq!(config.default_max_iterations, 1000);
//! ```

use std::path::Path;

use puzzleforge_core::Algorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,

    /// Algorithm used when a request does not name one.
    pub default_algorithm: Algorithm,

    /// Iteration budget used when a request does not give one.
    pub default_max_iterations: u32,

    /// Arrangement construction ranges.
    pub arrangement: ArrangementConfig,

    /// Genetic algorithm parameters.
    pub genetic: GeneticConfig,

    /// Simulated annealing parameters.
    pub annealing: AnnealingConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            default_algorithm: Algorithm::Genetic,
            default_max_iterations: 1000,
            arrangement: ArrangementConfig::default(),
            genetic: GeneticConfig::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// [`SolverConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the default algorithm.
    pub fn with_default_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.default_algorithm = algorithm;
        self
    }

    /// Sets the default iteration budget.
    pub fn with_default_max_iterations(mut self, max_iterations: u32) -> Self {
        self.default_max_iterations = max_iterations;
        self
    }

    /// Checks every parameter range.
    ///
    /// # Examples
    ///
    /// ```
    /// use puzzleforge_config::SolverConfig;
    ///
    /// let mut config = SolverConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.annealing.cooling_rate = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_iterations == 0 {
            return Err(invalid("default_max_iterations must be positive"));
        }
        self.arrangement.validate()?;
        self.genetic.validate()?;
        self.annealing.validate()
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

/// Ranges used when constructing arrangements.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ArrangementConfig {
    /// Random positions are drawn from `[-extent, extent]` on every axis.
    pub random_position_extent: f64,

    /// Heuristic x/y extent before the centrality bias is applied.
    pub heuristic_xy_extent: f64,

    /// Heuristic z positions are drawn from `[-extent, extent]`.
    pub heuristic_z_extent: f64,
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            random_position_extent: 10.0,
            heuristic_xy_extent: 5.0,
            heuristic_z_extent: 2.0,
        }
    }
}

impl ArrangementConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("arrangement.random_position_extent", self.random_position_extent)?;
        check_positive("arrangement.heuristic_xy_extent", self.heuristic_xy_extent)?;
        check_positive("arrangement.heuristic_z_extent", self.heuristic_z_extent)
    }
}

/// Genetic algorithm configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneticConfig {
    /// Upper bound on population size; the actual size is
    /// `min(max_population_size, 2 * piece_count)`.
    pub max_population_size: usize,

    /// One elite individual is kept per `elite_divisor` population members.
    pub elite_divisor: usize,

    /// Individuals sampled per tournament.
    pub tournament_size: usize,

    /// Probability that a child is mutated at all.
    pub mutation_rate: f64,

    /// Probability that a placement inside a mutated child is perturbed.
    pub gene_mutation_rate: f64,

    /// Maximum position perturbation per component.
    pub position_jitter: f64,

    /// Maximum rotation perturbation per component, in degrees.
    pub rotation_jitter: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            max_population_size: 50,
            elite_divisor: 10,
            tournament_size: 3,
            mutation_rate: 0.1,
            gene_mutation_rate: 0.1,
            position_jitter: 1.0,
            rotation_jitter: 30.0,
        }
    }
}

impl GeneticConfig {
    /// Population size for a puzzle with `piece_count` pieces.
    pub fn population_size(&self, piece_count: usize) -> usize {
        self.max_population_size.min(piece_count.saturating_mul(2))
    }

    /// Number of elite individuals for a population of `population_size`.
    pub fn elite_count(&self, population_size: usize) -> usize {
        population_size / self.elite_divisor
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_population_size < 2 {
            return Err(invalid("genetic.max_population_size must be at least 2"));
        }
        if self.elite_divisor == 0 {
            return Err(invalid("genetic.elite_divisor must be positive"));
        }
        if self.tournament_size == 0 {
            return Err(invalid("genetic.tournament_size must be positive"));
        }
        check_probability("genetic.mutation_rate", self.mutation_rate)?;
        check_probability("genetic.gene_mutation_rate", self.gene_mutation_rate)?;
        check_positive("genetic.position_jitter", self.position_jitter)?;
        check_positive("genetic.rotation_jitter", self.rotation_jitter)
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnnealingConfig {
    /// Temperature at iteration zero.
    pub starting_temperature: f64,

    /// Multiplicative decay applied once per iteration.
    pub cooling_rate: f64,

    /// Maximum position perturbation per component for a neighbor.
    pub position_step: f64,

    /// Maximum rotation perturbation per component for a neighbor, in degrees.
    pub rotation_step: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            starting_temperature: 100.0,
            cooling_rate: 0.995,
            position_step: 2.0,
            rotation_step: 45.0,
        }
    }
}

impl AnnealingConfig {
    /// Temperature after `iteration` cooling steps.
    pub fn temperature_at(&self, iteration: u32) -> f64 {
        self.starting_temperature * self.cooling_rate.powf(f64::from(iteration))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("annealing.starting_temperature", self.starting_temperature)?;
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(invalid(format!(
                "annealing.cooling_rate must be within (0, 1), got {}",
                self.cooling_rate
            )));
        }
        check_positive("annealing.position_step", self.position_step)?;
        check_positive("annealing.rotation_step", self.rotation_step)
    }
}
