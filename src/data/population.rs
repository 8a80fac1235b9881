//! # Population Arena
//!
//! The owning container for all individuals of a simulation. Individuals
//! are allocated exclusively by the genealogy samplers and addressed by
//! `IndividualId`; pids are assigned monotonically starting at 1, so
//! `pid == id.0 + 1` and iteration in id order is iteration in pid order.

use crate::data::individual::{Individual, IndividualId};

/// Owning arena of individuals.
///
/// Pedigrees and analysis routines hold only `IndividualId`s into this
/// arena. Dropping the population drops every individual.
#[derive(Clone, Debug, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a fresh individual in the given generation, assigning the
    /// next pid.
    pub(crate) fn alloc(&mut self, generation: u32) -> IndividualId {
        let id = IndividualId::new(self.individuals.len() as u32);
        let pid = id.0 as i32 + 1;
        self.individuals.push(Individual::new(pid, generation));
        id
    }

    pub fn get(&self, id: IndividualId) -> &Individual {
        &self.individuals[id.as_usize()]
    }

    pub fn get_mut(&mut self, id: IndividualId) -> &mut Individual {
        &mut self.individuals[id.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All ids in pid order.
    pub fn ids(&self) -> impl Iterator<Item = IndividualId> + '_ {
        (0..self.individuals.len()).map(IndividualId::from)
    }

    /// Look up an individual by pid.
    pub fn by_pid(&self, pid: i32) -> Option<IndividualId> {
        if pid >= 1 && (pid as usize) <= self.individuals.len() {
            Some(IndividualId::new(pid as u32 - 1))
        } else {
            None
        }
    }

    /// Register the father link on both ends.
    pub(crate) fn link_child_to_father(&mut self, child: IndividualId, father: IndividualId) {
        self.individuals[child.as_usize()].set_father(father);
        self.individuals[father.as_usize()].add_child(child);
    }

    /// Number of individuals in generations `0..=cap` (all when `cap` is
    /// `None`).
    pub fn size_in_generations(&self, cap: Option<u32>) -> usize {
        match cap {
            None => self.individuals.len(),
            Some(bound) => self
                .individuals
                .iter()
                .filter(|indv| indv.generation() <= bound)
                .count(),
        }
    }
}
