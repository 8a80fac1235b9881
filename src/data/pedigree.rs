//! # Pedigree Views
//!
//! A pedigree is one weakly connected component of the genealogy graph.
//! Under patrilineal construction the father→children edges within a
//! component form a tree, which the distance algorithms rely on.

use crate::data::individual::IndividualId;
use crate::data::population::Population;

/// Zero-cost newtype for pedigree ids (1-based; individuals without a
/// pedigree carry `None` rather than a zero sentinel)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PedigreeId(pub u32);

impl PedigreeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A connected component of the genealogy, as non-owning ids into the
/// population arena.
#[derive(Clone, Debug)]
pub struct Pedigree {
    id: PedigreeId,
    members: Vec<IndividualId>,
    relations: Vec<(IndividualId, IndividualId)>,
    root: IndividualId,
}

impl Pedigree {
    pub(crate) fn new(
        id: PedigreeId,
        members: Vec<IndividualId>,
        relations: Vec<(IndividualId, IndividualId)>,
        root: IndividualId,
    ) -> Self {
        Self {
            id,
            members,
            relations,
            root,
        }
    }

    pub fn id(&self) -> PedigreeId {
        self.id
    }

    pub fn members(&self) -> &[IndividualId] {
        &self.members
    }

    /// Parent→child pairs, one per tree edge.
    pub fn relations(&self) -> &[(IndividualId, IndividualId)] {
        &self.relations
    }

    /// The founder member with the smallest pid. Unique when the simulation
    /// ran to a single founder; for fixed-generation runs with several
    /// founders in the oldest generation this picks the first-allocated one.
    pub fn root(&self) -> IndividualId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members in generations `0..=cap` (all when `cap` is `None`).
    pub fn size_in_generations(&self, population: &Population, cap: Option<u32>) -> usize {
        match cap {
            None => self.members.len(),
            Some(bound) => self
                .members
                .iter()
                .filter(|&&id| population.get(id).generation() <= bound)
                .count(),
        }
    }
}
