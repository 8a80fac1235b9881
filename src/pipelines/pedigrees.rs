//! # Pedigree Builder
//!
//! Partitions a population into pedigrees: the weakly connected components
//! of the father/children graph. Any previous assignment is cleared and
//! rebuilt in pid order, so repeated calls reproduce the identical
//! partition.

use tracing::debug;

use crate::data::{IndividualId, Pedigree, PedigreeId, Population};
use crate::error::{LinealError, Result};
use crate::utils::RunMonitor;

/// Flood-fill the population into disjoint pedigrees.
///
/// Every individual ends in exactly one pedigree; within a pedigree the
/// parent→child relations enumerate the tree edges, each exactly once.
/// Fails with `Cancelled` when the monitor trips between components.
pub fn build_pedigrees(
    population: &mut Population,
    monitor: &RunMonitor,
) -> Result<Vec<Pedigree>> {
    for id in 0..population.len() {
        population.get_mut(IndividualId::from(id)).unset_pedigree();
    }

    let mut pedigrees = Vec::new();
    let mut next_id = 1u32;

    for seed in 0..population.len() {
        let seed = IndividualId::from(seed);
        if population.get(seed).pedigree_is_set() {
            continue;
        }
        if monitor.is_cancelled() {
            return Err(LinealError::Cancelled);
        }

        let pedigree_id = PedigreeId::new(next_id);
        next_id += 1;

        let mut members = Vec::new();
        let mut relations = Vec::new();
        let mut stack = vec![seed];
        population.get_mut(seed).set_pedigree(pedigree_id);

        while let Some(current) = stack.pop() {
            members.push(current);

            if let Some(father) = population.get(current).father() {
                if !population.get(father).pedigree_is_set() {
                    population.get_mut(father).set_pedigree(pedigree_id);
                    stack.push(father);
                }
            }

            // Each edge is recorded when its parent is processed, which
            // happens exactly once.
            let children = population.get(current).children().to_vec();
            for child in children {
                relations.push((current, child));
                if !population.get(child).pedigree_is_set() {
                    population.get_mut(child).set_pedigree(pedigree_id);
                    stack.push(child);
                }
            }
        }

        let root = members
            .iter()
            .copied()
            .filter(|&id| population.get(id).is_founder())
            .min_by_key(|&id| population.get(id).pid())
            .ok_or_else(|| {
                LinealError::invalid_state("pedigree component has no founder member")
            })?;

        pedigrees.push(Pedigree::new(pedigree_id, members, relations, root));
        monitor.tick();
    }

    debug!(pedigrees = pedigrees.len(), "population partitioned");
    Ok(pedigrees)
}
