//! # Configuration Logic
//!
//! CLI argument parsing and validation using clap derive.

use clap::Parser;

use crate::error::{LinealError, Result};
use crate::pipelines::genealogy::GenerationLimit;

/// Lineal: forward-time patrilineal genealogy simulation
#[derive(Parser, Debug, Clone)]
#[command(name = "lineal")]
#[command(version = "0.1.0")]
#[command(about = "Forward-time patrilineal genealogy simulation and pedigree analysis", long_about = None)]
pub struct Config {
    // ============ Genealogy Parameters ============
    /// Number of male individuals per generation
    #[arg(long, default_value = "1000")]
    pub population_size: usize,

    /// Generations to simulate; -1 simulates until one founder remains
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    pub generations: i64,

    /// Gamma shape for paternal fitness weights (requires --gamma-scale)
    #[arg(long)]
    pub gamma_shape: Option<f64>,

    /// Gamma scale for paternal fitness weights (requires --gamma-shape)
    #[arg(long)]
    pub gamma_scale: Option<f64>,

    /// Youngest generations whose individuals are collected for return
    #[arg(long, default_value = "2")]
    pub keep_generations: u32,

    // ============ Haplotype Parameters ============
    /// Number of Y-STR loci to populate (0 skips haplotypes)
    #[arg(long, default_value = "0")]
    pub loci: usize,

    /// Per-locus mutation rate
    #[arg(long, default_value = "0.001")]
    pub mutation_rate: f64,

    // ============ General Parameters ============
    /// Random seed for reproducibility
    #[arg(long, default_value = "-99999", allow_hyphen_values = true)]
    pub seed: i64,

    /// Emit the verbose pid/father tables
    #[arg(long, default_value = "false")]
    pub verbose_tables: bool,
}

impl Config {
    /// Parse command line arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.population_size <= 1 {
            return Err(LinealError::invalid_argument(
                "population-size must be greater than 1",
            ));
        }

        if self.generations != -1 && self.generations <= 0 {
            return Err(LinealError::invalid_argument(
                "generations must be -1 (simulate to one founder) or positive",
            ));
        }

        match (self.gamma_shape, self.gamma_scale) {
            (None, None) => {}
            (Some(shape), Some(scale)) => {
                if !(shape > 0.0) || !(scale > 0.0) {
                    return Err(LinealError::invalid_argument(
                        "gamma-shape and gamma-scale must be positive",
                    ));
                }
            }
            _ => {
                return Err(LinealError::invalid_argument(
                    "gamma-shape and gamma-scale must be given together",
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(LinealError::invalid_argument(
                "mutation-rate must be between 0 and 1, both included",
            ));
        }

        Ok(())
    }

    /// The configured generation limit.
    pub fn generation_limit(&self) -> GenerationLimit {
        if self.generations == -1 {
            GenerationLimit::UntilOneFounder
        } else {
            GenerationLimit::Fixed(self.generations as usize)
        }
    }

    /// Whether the gamma-weighted variance sampler was requested.
    pub fn uses_variance_sampler(&self) -> bool {
        self.gamma_shape.is_some()
    }

    /// Seed for the injected random source.
    pub fn rng_seed(&self) -> u64 {
        self.seed as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::parse_from(["lineal"])
    }

    #[test]
    fn test_defaults_validate() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_population_size_bound() {
        let mut config = base_config();
        config.population_size = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generation_limit_mapping() {
        let mut config = base_config();
        assert_eq!(config.generation_limit(), GenerationLimit::UntilOneFounder);
        config.generations = 5;
        assert_eq!(config.generation_limit(), GenerationLimit::Fixed(5));
        config.generations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gamma_parameters_must_pair() {
        let mut config = base_config();
        config.gamma_shape = Some(2.0);
        assert!(config.validate().is_err());
        config.gamma_scale = Some(1.0);
        assert!(config.validate().is_ok());
        config.gamma_scale = Some(-1.0);
        assert!(config.validate().is_err());
    }
}
