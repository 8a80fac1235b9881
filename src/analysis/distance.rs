//! # Tree Metrics
//!
//! Meiotic distance, lowest-common-ancestor paths and generation-distance
//! histograms over pedigrees. All algorithms rely on the pedigree
//! invariant that father/children edges form a tree, so there is exactly
//! one path between any two members.

use std::collections::{BTreeMap, HashSet};

use crate::data::{IndividualId, IntTable, Pedigree, PedigreeId, Population};
use crate::error::{LinealError, Result};

fn pedigree_of(population: &Population, id: IndividualId) -> Result<PedigreeId> {
    population.get(id).pedigree_id().ok_or_else(|| {
        LinealError::invalid_state(format!(
            "individual pid {} has no pedigree; run build_pedigrees first",
            population.get(id).pid()
        ))
    })
}

/// Number of parent-child edges on the unique path between `a` and `b`.
///
/// Returns `None` when the two individuals lie in different pedigrees.
/// Fails with `InvalidState` when either individual has no pedigree.
pub fn meiosis_dist(
    population: &Population,
    a: IndividualId,
    b: IndividualId,
) -> Result<Option<u32>> {
    let ped_a = pedigree_of(population, a)?;
    let ped_b = pedigree_of(population, b)?;
    if ped_a != ped_b {
        return Ok(None);
    }

    // Depth-first walk from `a`, carrying the edge count in visitor state
    // rather than scratch fields on the nodes.
    let mut visited: HashSet<IndividualId> = HashSet::new();
    let mut stack = vec![(a, 0u32)];
    visited.insert(a);

    while let Some((current, dist)) = stack.pop() {
        if current == b {
            return Ok(Some(dist));
        }
        let indv = population.get(current);
        if let Some(father) = indv.father() {
            if visited.insert(father) {
                stack.push((father, dist + 1));
            }
        }
        for &child in indv.children() {
            if visited.insert(child) {
                stack.push((child, dist + 1));
            }
        }
    }

    // Two members of one pedigree are connected by construction.
    Err(LinealError::invalid_state(
        "pedigree members are not connected",
    ))
}

/// The unique father-chain path from the pedigree root down to `target`,
/// or `None` when `target` descends from a different founder.
fn path_from_root(
    population: &Population,
    root: IndividualId,
    target: IndividualId,
) -> Option<Vec<IndividualId>> {
    let mut path = vec![target];
    let mut current = target;
    while current != root {
        current = population.get(current).father()?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Path between two pedigree members through their lowest common ancestor.
///
/// The result is `[LCA, ...down to a, ...down to b]`, matching the
/// root-path suffixes after the shared prefix. Fails with
/// `InvalidArgument` when the individuals lie in different pedigrees and
/// with `InvalidState` when a root path cannot be found.
pub fn path_between(
    population: &Population,
    pedigrees: &[Pedigree],
    a: IndividualId,
    b: IndividualId,
) -> Result<Vec<IndividualId>> {
    let ped_a = pedigree_of(population, a)?;
    let ped_b = pedigree_of(population, b)?;
    if ped_a != ped_b {
        return Err(LinealError::invalid_argument(
            "individuals lie in different pedigrees",
        ));
    }
    let pedigree = pedigrees
        .iter()
        .find(|p| p.id() == ped_a)
        .ok_or_else(|| LinealError::invalid_state("pedigree list does not contain the pedigree"))?;
    let root = pedigree.root();

    let path_a = path_from_root(population, root, a).ok_or_else(|| {
        LinealError::invalid_state("could not find path between root and first individual")
    })?;
    let path_b = path_from_root(population, root, b).ok_or_else(|| {
        LinealError::invalid_state("could not find path between root and second individual")
    })?;

    let mut lca_index = 0;
    while lca_index < path_a.len()
        && lca_index < path_b.len()
        && path_a[lca_index] == path_b[lca_index]
    {
        lca_index += 1;
    }
    if lca_index == 0 {
        return Err(LinealError::invalid_state(
            "root paths share no common prefix",
        ));
    }

    let mut path = Vec::with_capacity(1 + path_a.len() + path_b.len() - 2 * lca_index);
    path.push(path_a[lca_index - 1]);
    path.extend_from_slice(&path_a[lca_index..]);
    path.extend_from_slice(&path_b[lca_index..]);
    Ok(path)
}

/// Tabulate (generation, meiotic distance) counts over the members of the
/// focal individual's pedigree, optionally capped at a generation.
///
/// Returns a three-column table (generation, meioses, count) sorted by
/// generation then distance.
pub fn meioses_generation_distribution(
    population: &Population,
    pedigrees: &[Pedigree],
    individual: IndividualId,
    generation_cap: Option<u32>,
) -> Result<IntTable> {
    let ped_id = pedigree_of(population, individual)?;
    let pedigree = pedigrees
        .iter()
        .find(|p| p.id() == ped_id)
        .ok_or_else(|| LinealError::invalid_state("pedigree list does not contain the pedigree"))?;

    let mut counts: BTreeMap<(u32, u32), i32> = BTreeMap::new();
    for &member in pedigree.members() {
        let generation = population.get(member).generation();
        if let Some(cap) = generation_cap {
            if generation > cap {
                continue;
            }
        }
        let dist = meiosis_dist(population, individual, member)?.ok_or_else(|| {
            LinealError::invalid_state("pedigree member resolved to a different pedigree")
        })?;
        *counts.entry((generation, dist)).or_insert(0) += 1;
    }

    let mut table = IntTable::new(counts.len(), 3);
    for (row, (&(generation, dist), &count)) in counts.iter().enumerate() {
        table.set(row, 0, generation as i32);
        table.set(row, 1, dist as i32);
        table.set(row, 2, count);
    }
    Ok(table)
}

/// L1 distance between two individuals' haplotypes.
///
/// Fails with `InvalidState` when either haplotype is unset and with
/// `InvalidArgument` when the locus counts differ.
pub fn haplotype_l1_dist(
    population: &Population,
    a: IndividualId,
    b: IndividualId,
) -> Result<i64> {
    let hap_a = population
        .get(a)
        .haplotype()
        .ok_or_else(|| LinealError::invalid_state("haplotypes not yet set"))?;
    let hap_b = population
        .get(b)
        .haplotype()
        .ok_or_else(|| LinealError::invalid_state("haplotypes not yet set"))?;
    if hap_a.len() != hap_b.len() {
        return Err(LinealError::invalid_argument(
            "haplotypes have different locus counts",
        ));
    }
    Ok(hap_a
        .iter()
        .zip(hap_b)
        .map(|(&x, &y)| (x as i64 - y as i64).abs())
        .sum())
}
