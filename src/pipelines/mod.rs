//! # Pipelines Module (Orchestration)
//!
//! High-level workflow coordination. Connects the random source, the data
//! arena, and the models.
//!
//! ## Design Philosophy
//! - Pipelines **own** the execution flow: they allocate into the
//!   `Population`, walk pedigrees, and poll the cancellation probe between
//!   major steps.
//! - Randomness is injected as `&mut impl Rng`; a fixed seed yields
//!   bit-identical runs.
//!
//! ## Sub-modules
//! - `genealogy`: forward-time Wright-Fisher genealogy samplers
//! - `pedigrees`: partition of the genealogy into connected components
//! - `haplotypes`: haplotype propagation through pedigrees

pub mod genealogy;
pub mod haplotypes;
pub mod pedigrees;

pub use genealogy::{
    sample_genealogy, sample_genealogy_variance, GenerationLimit, Simulation, VerboseTables,
};
pub use haplotypes::{
    populate_autosomal, populate_haplotypes, populate_haplotypes_custom_founders,
    populate_haplotypes_ladder_bounded,
};
pub use pedigrees::build_pedigrees;
