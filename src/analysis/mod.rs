//! # Analysis Module
//!
//! Read-only queries over built pedigrees: tree distances, lowest common
//! ancestor paths, and generation-distance histograms.

pub mod distance;

pub use distance::{
    haplotype_l1_dist, meioses_generation_distribution, meiosis_dist, path_between,
};
