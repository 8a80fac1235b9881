//! # Haplotype Propagation
//!
//! Draws founder haplotypes and pushes them down each pedigree: every
//! child copies its father's haplotype and mutates it exactly once. The
//! cancellation probe is polled between pedigrees.

use rand::Rng;
use tracing::debug;

use crate::data::{IndividualId, Pedigree, Population};
use crate::error::{LinealError, Result};
use crate::model::autosomal::{
    draw_genotype_from_cumdist, genotype_conditional_cumdist, genotype_probs, invert_cumdist,
    step_allele_index,
};
use crate::model::mutation::{LadderModel, StepwiseModel};
use crate::utils::RunMonitor;

/// Populate Y-STR haplotypes in every pedigree, founders starting from the
/// zero vector.
pub fn populate_haplotypes<R: Rng>(
    pedigrees: &[Pedigree],
    population: &mut Population,
    loci: usize,
    mutation_rates: &[f64],
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<()> {
    if mutation_rates.len() != loci {
        return Err(LinealError::invalid_argument(
            "number of mutation rates must equal number of loci",
        ));
    }
    populate_haplotypes_custom_founders(
        pedigrees,
        population,
        |_rng| vec![0; loci],
        mutation_rates,
        rng,
        monitor,
    )
}

/// Populate Y-STR haplotypes, drawing each pedigree's founder haplotype
/// from a caller-supplied generator.
pub fn populate_haplotypes_custom_founders<R, F>(
    pedigrees: &[Pedigree],
    population: &mut Population,
    mut founder_haplotype: F,
    mutation_rates: &[f64],
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<()>
where
    R: Rng,
    F: FnMut(&mut R) -> Vec<i32>,
{
    let model = StepwiseModel::new(mutation_rates.to_vec())?;

    for pedigree in pedigrees {
        if monitor.is_cancelled() {
            return Err(LinealError::Cancelled);
        }
        let founder = founder_haplotype(rng);
        if founder.len() != model.loci() {
            return Err(LinealError::invalid_argument(
                "founder haplotype must have one allele per mutation rate",
            ));
        }
        population.get_mut(pedigree.root()).set_haplotype(founder);
        propagate_from_root(population, pedigree.root(), |haplotype, rng| {
            model.mutate(haplotype, rng)
        }, rng)?;
        monitor.tick();
    }

    debug!(pedigrees = pedigrees.len(), "Y-STR haplotypes populated");
    Ok(())
}

/// Populate Y-STR haplotypes under ladder-bounded mutation.
pub fn populate_haplotypes_ladder_bounded<R, F>(
    pedigrees: &[Pedigree],
    population: &mut Population,
    mut founder_haplotype: F,
    model: &LadderModel,
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<()>
where
    R: Rng,
    F: FnMut(&mut R) -> Vec<i32>,
{
    for pedigree in pedigrees {
        if monitor.is_cancelled() {
            return Err(LinealError::Cancelled);
        }
        let founder = founder_haplotype(rng);
        if founder.len() != model.loci() {
            return Err(LinealError::invalid_argument(
                "founder haplotype must have one allele per mutation rate",
            ));
        }
        population.get_mut(pedigree.root()).set_haplotype(founder);
        propagate_from_root(population, pedigree.root(), |haplotype, rng| {
            model.mutate(haplotype, rng)
        }, rng)?;
        monitor.tick();
    }

    debug!(
        pedigrees = pedigrees.len(),
        "ladder-bounded haplotypes populated"
    );
    Ok(())
}

/// Copy-then-mutate propagation from the pedigree root down to the leaves.
fn propagate_from_root<R, M>(
    population: &mut Population,
    root: IndividualId,
    mut mutate: M,
    rng: &mut R,
) -> Result<()>
where
    R: Rng,
    M: FnMut(&mut [i32], &mut R) -> Result<()>,
{
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let haplotype = population
            .get(current)
            .haplotype()
            .ok_or_else(|| LinealError::invalid_state("propagation reached an unset haplotype"))?
            .to_vec();

        let children = population.get(current).children().to_vec();
        for child in children {
            let indv = population.get_mut(child);
            indv.set_haplotype(haplotype.clone());
            mutate(indv.haplotype_for_mutation()?, rng)?;
            stack.push(child);
        }
    }
    Ok(())
}

/// Populate 2-locus autosomal genotypes with theta correction.
///
/// Founders draw from the flattened genotype distribution; children take
/// one paternal allele uniformly, sample the partner allele from the
/// conditional cumulative matrix, mutate both indices on the implicit
/// `[0, K-1]` ladder, and store the pair sorted.
pub fn populate_autosomal<R: Rng>(
    pedigrees: &[Pedigree],
    population: &mut Population,
    allele_dist: &[f64],
    theta: f64,
    mutation_rate: f64,
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<()> {
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(LinealError::invalid_argument(
            "mutation rate must be between 0 and 1, both included",
        ));
    }
    let alleles_count = allele_dist.len();
    if alleles_count < 2 {
        return Err(LinealError::invalid_argument(
            "autosomal model needs at least two alleles",
        ));
    }

    // Founder cumulative distribution over the flattened lower triangle.
    let mut founder_cumdist = genotype_probs(allele_dist, theta)?;
    let mut acc = 0.0;
    for p in founder_cumdist.iter_mut() {
        acc += *p;
        *p = acc;
    }
    // Conditional cumulative distribution of the partner allele.
    let conditional_cumdists = genotype_conditional_cumdist(allele_dist, theta)?;
    let max_index = alleles_count as i32 - 1;

    for pedigree in pedigrees {
        if monitor.is_cancelled() {
            return Err(LinealError::Cancelled);
        }

        let genotype = draw_genotype_from_cumdist(&founder_cumdist, rng);
        population
            .get_mut(pedigree.root())
            .set_haplotype(genotype.to_vec());

        let mut stack = vec![pedigree.root()];
        while let Some(current) = stack.pop() {
            let Some(genotype) = population.get(current).haplotype() else {
                return Err(LinealError::invalid_state(
                    "propagation reached an unset genotype",
                ));
            };
            let (g0, g1) = (genotype[0], genotype[1]);

            let children = population.get(current).children().to_vec();
            for child in children {
                let father_allele = if rng.random::<f64>() < 0.5 { g0 } else { g1 };
                let cumdist = &conditional_cumdists[father_allele as usize];
                let mother_allele = invert_cumdist(cumdist, rng.random::<f64>()) as i32;

                let mut a = step_allele_index(father_allele, mutation_rate, max_index, rng)?;
                let mut b = step_allele_index(mother_allele, mutation_rate, max_index, rng)?;
                if b < a {
                    std::mem::swap(&mut a, &mut b);
                }

                population.get_mut(child).set_haplotype(vec![a, b]);
                stack.push(child);
            }
        }
        monitor.tick();
    }

    debug!(pedigrees = pedigrees.len(), "autosomal genotypes populated");
    Ok(())
}
