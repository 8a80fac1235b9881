//! # 2-Locus Autosomal Genotype Model
//!
//! Genotype probabilities for a single autosomal marker under Wright's
//! theta (F_ST) correction, plus the sampling primitives the haplotype
//! pipeline needs: founder genotype draws from the flattened
//! lower-triangular distribution and child draws from the per-allele
//! conditional cumulative matrix.
//!
//! Alleles are indices `0..K` into the supplied allele distribution, and a
//! stored genotype `(a, b)` always satisfies `a <= b`.

use rand::Rng;

use crate::error::{LinealError, Result};

fn normalized_dist(allele_dist: &[f64], theta: f64) -> Result<Vec<f64>> {
    if allele_dist.iter().any(|&p| !(0.0..=1.0).contains(&p)) {
        return Err(LinealError::invalid_argument(
            "allele distribution elements must be between 0 and 1, both included",
        ));
    }
    if !(0.0..=1.0).contains(&theta) {
        return Err(LinealError::invalid_argument(
            "theta must be between 0 and 1, both included",
        ));
    }
    let sum: f64 = allele_dist.iter().sum();
    if !(sum > 0.0) {
        return Err(LinealError::invalid_argument(
            "allele distribution must have positive mass",
        ));
    }
    Ok(allele_dist.iter().map(|&p| p / sum).collect())
}

/// Genotype probabilities with theta, flattened over the lower triangle in
/// row order: (0,0), (1,0), (1,1), (2,0), (2,1), (2,2), ...
///
/// For alleles `i <= j` (with `p` the normalized distribution):
/// homozygote `P(ii) = θ·p_i + (1−θ)·p_i²`, heterozygote
/// `P(ij) = (1−θ)·2·p_i·p_j`. Sums to 1 for any normalized `p` and
/// θ ∈ [0,1].
pub fn genotype_probs(allele_dist: &[f64], theta: f64) -> Result<Vec<f64>> {
    let ps = normalized_dist(allele_dist, theta)?;
    let k = ps.len();

    let mut probs = Vec::with_capacity(k * (k + 1) / 2);
    for i in 0..k {
        for j in 0..=i {
            if i == j {
                probs.push(theta * ps[i] + (1.0 - theta) * ps[i] * ps[i]);
            } else {
                probs.push((1.0 - theta) * 2.0 * ps[i] * ps[j]);
            }
        }
    }
    Ok(probs)
}

/// Conditional cumulative distributions with theta.
///
/// Row `i` is the cumulative distribution of the partner allele given one
/// parent contributed allele `i`: the raw joint masses are
/// `θ·p_i + (1−θ)·p_i²` on the diagonal and `(1−θ)·p_i·p_j` off it
/// (symmetric), each row normalized by `p_i` and cumulated.
pub fn genotype_conditional_cumdist(allele_dist: &[f64], theta: f64) -> Result<Vec<Vec<f64>>> {
    let ps = normalized_dist(allele_dist, theta)?;
    let k = ps.len();

    let mut rows = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..=i {
            if i == j {
                rows[i][i] = theta * ps[i] + (1.0 - theta) * ps[i] * ps[i];
            } else {
                let p = (1.0 - theta) * ps[i] * ps[j];
                rows[i][j] = p;
                rows[j][i] = p;
            }
        }
    }

    // Each row sums to ps[i] before normalization.
    for (row, &p_i) in rows.iter_mut().zip(&ps) {
        let mut acc = 0.0;
        for cell in row.iter_mut() {
            acc += *cell / p_i;
            *cell = acc;
        }
    }
    Ok(rows)
}

/// Invert a uniform draw over a cumulative distribution: the smallest index
/// whose cumulative mass reaches `u`.
#[inline]
pub(crate) fn invert_cumdist(cumdist: &[f64], u: f64) -> usize {
    cumdist.partition_point(|&c| c < u).min(cumdist.len() - 1)
}

/// Draw a genotype `(a, b)`, `a <= b`, from the flattened lower-triangular
/// cumulative distribution.
pub(crate) fn draw_genotype_from_cumdist<R: Rng>(cumdist: &[f64], rng: &mut R) -> [i32; 2] {
    let mut k = invert_cumdist(cumdist, rng.random::<f64>());
    // Decode the triangular index: row i holds entries (i,0)..(i,i).
    let mut i = 0usize;
    while k > i {
        k -= i + 1;
        i += 1;
    }
    [k as i32, i as i32]
}

/// Sample one founder genotype with theta.
pub fn sample_genotype<R: Rng>(allele_dist: &[f64], theta: f64, rng: &mut R) -> Result<[i32; 2]> {
    let probs = genotype_probs(allele_dist, theta)?;
    let mut cumdist = probs;
    let mut acc = 0.0;
    for p in cumdist.iter_mut() {
        acc += *p;
        *p = acc;
    }
    Ok(draw_genotype_from_cumdist(&cumdist, rng))
}

/// Step an allele index under the implicit ladder `[0, max]`: with
/// probability `mutation_rate` move ±1, forced inward at the boundaries.
pub(crate) fn step_allele_index<R: Rng>(
    index: i32,
    mutation_rate: f64,
    max: i32,
    rng: &mut R,
) -> Result<i32> {
    if max <= 0 {
        return Err(LinealError::invalid_argument(
            "allele index mutation needs at least two alleles",
        ));
    }

    if rng.random::<f64>() >= mutation_rate {
        return Ok(index);
    }

    // A mutation must happen.
    if index == 0 {
        return Ok(1);
    }
    if index == max {
        return Ok(max - 1);
    }
    if rng.random::<f64>() < 0.5 {
        Ok(index - 1)
    } else {
        Ok(index + 1)
    }
}
