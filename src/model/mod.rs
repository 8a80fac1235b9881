//! # Model Module
//!
//! Statistical models for haplotype evolution and population structure.
//!
//! ## Core Algorithms
//! - `mutation`: stepwise and ladder-bounded Y-STR mutation
//! - `autosomal`: 2-locus autosomal genotype model with theta correction
//! - `theta`: theta / F-statistics estimators (Weir, GDA2)

pub mod autosomal;
pub mod mutation;
pub mod theta;

pub use mutation::{LadderModel, StepwiseModel};
pub use theta::{EstimationInfo, FStatEstimates, ThetaEstimate};
