//! # Individual Nodes
//!
//! A single male in the genealogy: identity, generation, father/children
//! links (as arena indices), pedigree membership, and haplotype state.

use crate::data::pedigree::PedigreeId;
use crate::error::{LinealError, Result};

/// Zero-cost newtype for indices into the `Population` arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(pub u32);

impl IndividualId {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for IndividualId {
    fn from(idx: usize) -> Self {
        Self(idx as u32)
    }
}

impl From<IndividualId> for usize {
    fn from(idx: IndividualId) -> usize {
        idx.0 as usize
    }
}

/// A node in the genealogy graph.
///
/// Links are arena indices; the owning [`Population`](crate::data::Population)
/// resolves them. The haplotype follows a set-then-mutate-once discipline:
/// setting a haplotype clears the mutated flag, and mutation is only legal
/// on a set, not-yet-mutated haplotype.
#[derive(Clone, Debug)]
pub struct Individual {
    pid: i32,
    generation: u32,
    father: Option<IndividualId>,
    children: Vec<IndividualId>,
    pedigree: Option<PedigreeId>,
    haplotype: Option<Vec<i32>>,
    haplotype_mutated: bool,
}

impl Individual {
    pub(crate) fn new(pid: i32, generation: u32) -> Self {
        Self {
            pid,
            generation,
            father: None,
            children: Vec::new(),
            pedigree: None,
            haplotype: None,
            haplotype_mutated: false,
        }
    }

    /// Unique positive person id within the population.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// Generation index; 0 is the present, increasing into the past.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn father(&self) -> Option<IndividualId> {
        self.father
    }

    pub fn children(&self) -> &[IndividualId] {
        &self.children
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// A founder has no father within the simulation horizon.
    pub fn is_founder(&self) -> bool {
        self.father.is_none()
    }

    pub(crate) fn set_father(&mut self, father: IndividualId) {
        self.father = Some(father);
    }

    pub(crate) fn add_child(&mut self, child: IndividualId) {
        self.children.push(child);
    }

    // === Pedigree membership ===

    pub fn pedigree_id(&self) -> Option<PedigreeId> {
        self.pedigree
    }

    pub fn pedigree_is_set(&self) -> bool {
        self.pedigree.is_some()
    }

    pub(crate) fn set_pedigree(&mut self, id: PedigreeId) {
        self.pedigree = Some(id);
    }

    pub(crate) fn unset_pedigree(&mut self) {
        self.pedigree = None;
    }

    // === Haplotype state ===

    pub fn haplotype(&self) -> Option<&[i32]> {
        self.haplotype.as_deref()
    }

    pub fn is_haplotype_set(&self) -> bool {
        self.haplotype.is_some()
    }

    /// Store a haplotype. Re-setting replaces the vector and clears the
    /// mutated flag; the at-most-once discipline applies to mutation.
    pub fn set_haplotype(&mut self, haplotype: Vec<i32>) {
        self.haplotype = Some(haplotype);
        self.haplotype_mutated = false;
    }

    /// One-shot mutable access to the haplotype for mutation.
    ///
    /// Fails with `InvalidState` when the haplotype is unset or was already
    /// mutated since it was last set.
    pub(crate) fn haplotype_for_mutation(&mut self) -> Result<&mut [i32]> {
        if self.haplotype_mutated {
            return Err(LinealError::invalid_state(
                "haplotype already mutated since it was set",
            ));
        }
        let Some(haplotype) = self.haplotype.as_mut() else {
            return Err(LinealError::invalid_state(
                "haplotype not set yet, cannot mutate",
            ));
        };
        self.haplotype_mutated = true;
        Ok(haplotype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_individual_is_founder() {
        let indv = Individual::new(1, 0);
        assert_eq!(indv.pid(), 1);
        assert_eq!(indv.generation(), 0);
        assert!(indv.is_founder());
        assert!(indv.children().is_empty());
        assert!(!indv.pedigree_is_set());
        assert!(!indv.is_haplotype_set());
    }

    #[test]
    fn test_mutation_requires_set_haplotype() {
        let mut indv = Individual::new(1, 0);
        assert!(matches!(
            indv.haplotype_for_mutation(),
            Err(LinealError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_mutation_is_one_shot() {
        let mut indv = Individual::new(1, 0);
        indv.set_haplotype(vec![10, 11]);
        assert!(indv.haplotype_for_mutation().is_ok());
        assert!(matches!(
            indv.haplotype_for_mutation(),
            Err(LinealError::InvalidState { .. })
        ));

        // Re-setting re-arms mutation.
        indv.set_haplotype(vec![12, 13]);
        assert!(indv.haplotype_for_mutation().is_ok());
    }
}
