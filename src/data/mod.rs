//! # Data Module
//!
//! In-memory representations of the genealogy. This is the core "model" layer.
//!
//! ## Design Philosophy
//! - **Arena + indices:** the `Population` owns every `Individual` in a
//!   single vector; father and child links are stored as `IndividualId`
//!   indices, so there is no manual lifetime management and no cyclic
//!   ownership.
//! - **Zero-cost newtypes:** `IndividualId` and `PedigreeId` prevent index
//!   bugs at compile time with no runtime overhead.
//! - **Views, not owners:** a `Pedigree` holds only ids into the arena;
//!   dropping the `Population` invalidates nothing mid-air because the
//!   pedigree cannot outlive it in safe code.
//!
//! ## Sub-modules
//! - `individual`: genealogy node and its haplotype state
//! - `population`: the owning arena
//! - `pedigree`: connected-component views
//! - `table`: integer result tables with missing-value support

pub mod individual;
pub mod pedigree;
pub mod population;
pub mod table;

pub use individual::{Individual, IndividualId};
pub use pedigree::{Pedigree, PedigreeId};
pub use population::Population;
pub use table::{IntTable, MISSING};
