//! # Y-STR Mutation Models
//!
//! Stepwise mutation of integer repeat counts: per locus, with probability
//! `rates[l]`, the allele steps by ±1. The ladder-bounded variant confines
//! alleles to a per-locus interval `[ladder_min[l], ladder_max[l]]`; a step
//! at a boundary is forced inward.

use rand::Rng;

use crate::error::{LinealError, Result};

fn validate_rates(rates: &[f64]) -> Result<()> {
    if rates.iter().any(|&r| !(0.0..=1.0).contains(&r)) {
        return Err(LinealError::invalid_argument(
            "mutation rates must be between 0 and 1, both included",
        ));
    }
    Ok(())
}

/// Unbounded stepwise (symmetric single-step) mutation model.
#[derive(Clone, Debug)]
pub struct StepwiseModel {
    rates: Vec<f64>,
}

impl StepwiseModel {
    pub fn new(rates: Vec<f64>) -> Result<Self> {
        validate_rates(&rates)?;
        Ok(Self { rates })
    }

    pub fn loci(&self) -> usize {
        self.rates.len()
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Mutate a haplotype in place, one ±1 step per triggered locus.
    pub fn mutate<R: Rng>(&self, haplotype: &mut [i32], rng: &mut R) -> Result<()> {
        if haplotype.len() != self.rates.len() {
            return Err(LinealError::invalid_argument(
                "number of loci in haplotype must equal number of mutation rates",
            ));
        }

        for (allele, &rate) in haplotype.iter_mut().zip(&self.rates) {
            if rng.random::<f64>() < rate {
                if rng.random::<f64>() < 0.5 {
                    *allele -= 1;
                } else {
                    *allele += 1;
                }
            }
        }
        Ok(())
    }
}

/// Stepwise mutation bounded by a per-locus allele ladder.
#[derive(Clone, Debug)]
pub struct LadderModel {
    rates: Vec<f64>,
    ladder_min: Vec<i32>,
    ladder_max: Vec<i32>,
}

impl LadderModel {
    /// Build a ladder model. Every locus needs `ladder_min < ladder_max`;
    /// a one-rung ladder would leave a triggered mutation with no legal
    /// step.
    pub fn new(rates: Vec<f64>, ladder_min: Vec<i32>, ladder_max: Vec<i32>) -> Result<Self> {
        validate_rates(&rates)?;
        if ladder_min.len() != rates.len() || ladder_max.len() != rates.len() {
            return Err(LinealError::invalid_argument(
                "ladder bounds must have one entry per mutation rate",
            ));
        }
        if ladder_min
            .iter()
            .zip(&ladder_max)
            .any(|(&lo, &hi)| lo >= hi)
        {
            return Err(LinealError::invalid_argument(
                "ladder_min must be strictly below ladder_max at every locus",
            ));
        }
        Ok(Self {
            rates,
            ladder_min,
            ladder_max,
        })
    }

    pub fn loci(&self) -> usize {
        self.rates.len()
    }

    pub fn ladder_min(&self) -> &[i32] {
        &self.ladder_min
    }

    pub fn ladder_max(&self) -> &[i32] {
        &self.ladder_max
    }

    /// Mutate a haplotype in place. An incoming allele strictly outside its
    /// ladder is a fatal `InvalidArgument`; an allele at a boundary steps
    /// inward deterministically.
    pub fn mutate<R: Rng>(&self, haplotype: &mut [i32], rng: &mut R) -> Result<()> {
        if haplotype.len() != self.rates.len() {
            return Err(LinealError::invalid_argument(
                "number of loci in haplotype must equal number of mutation rates",
            ));
        }

        for (loc, (allele, &rate)) in haplotype.iter_mut().zip(&self.rates).enumerate() {
            if rng.random::<f64>() >= rate {
                continue;
            }
            // A mutation must happen.
            let (lo, hi) = (self.ladder_min[loc], self.ladder_max[loc]);
            if *allele < lo {
                return Err(LinealError::invalid_argument(format!(
                    "allele {} at locus {} lies below ladder minimum {}",
                    allele, loc, lo
                )));
            }
            if *allele > hi {
                return Err(LinealError::invalid_argument(format!(
                    "allele {} at locus {} lies above ladder maximum {}",
                    allele, loc, hi
                )));
            }

            if *allele == lo {
                *allele = lo + 1;
            } else if *allele == hi {
                *allele = hi - 1;
            } else if rng.random::<f64>() < 0.5 {
                *allele -= 1;
            } else {
                *allele += 1;
            }
        }
        Ok(())
    }
}
