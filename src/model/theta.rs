//! # Theta / F-Statistics Estimators
//!
//! Moment estimators for population substructure from 2-locus autosomal
//! genotypes, after Weir, Genetic Data Analysis 2 (1996), pp. 168-179.
//!
//! The single-subpopulation estimator regresses observed genotype
//! frequencies on the theta-model departures from Hardy-Weinberg and is
//! solved as a one-parameter least-squares problem. Diagnostic outcomes
//! (under-determined systems, degenerate decompositions, out-of-range
//! estimates) are encoded in the returned [`ThetaEstimate`] rather than
//! surfaced as errors.

use std::collections::BTreeMap;

use ndarray::Array1;

use crate::data::{IndividualId, Population};
use crate::error::{LinealError, Result};

/// Quantities used by the single-subpopulation estimate, for inspection.
#[derive(Clone, Debug)]
pub struct EstimationInfo {
    /// Design column of the least-squares system, one entry per unique
    /// genotype.
    pub design: Vec<f64>,
    /// Response vector of the least-squares system.
    pub response: Vec<f64>,
    /// Unique genotypes in equation order, each as `(a, b)` with `a <= b`.
    pub genotypes: Vec<(i32, i32)>,
    /// 1 for homozygotes, 2 for heterozygotes.
    pub zygosity: Vec<u8>,
    /// Observed frequency of each unique genotype.
    pub genotype_probs: Vec<f64>,
    /// Allele frequencies of each genotype's two alleles.
    pub genotype_allele_probs: Vec<(f64, f64)>,
    /// Observed allele frequency table.
    pub allele_probs: Vec<(i32, f64)>,
}

/// Outcome of a single-subpopulation theta estimate.
#[derive(Clone, Debug)]
pub struct ThetaEstimate {
    /// Point estimate; `None` when no estimate could be produced at all.
    pub estimate: Option<f64>,
    /// True when the estimate is absent or untrustworthy.
    pub error: bool,
    /// Human-readable outcome; `"OK"` on success.
    pub details: String,
    pub estimation_info: Option<EstimationInfo>,
}

/// Wright's F-statistics for a set of subpopulations.
#[derive(Clone, Copy, Debug)]
pub struct FStatEstimates {
    /// F_IT, overall inbreeding coefficient.
    pub f_it: f64,
    /// F_ST (theta), correlation of alleles between individuals within a
    /// subpopulation.
    pub theta: f64,
    /// F_IS, within-subpopulation inbreeding coefficient.
    pub f_is: f64,
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Accumulate one genotype into the allele and genotype frequency tables.
fn fill_frequency_tables(
    a: i32,
    b: i32,
    one_over_n: f64,
    one_over_2n: f64,
    allele_p: &mut BTreeMap<i32, f64>,
    genotype_p: &mut BTreeMap<(i32, i32), f64>,
) {
    let geno = ordered(a, b);
    *genotype_p.entry(geno).or_insert(0.0) += one_over_n;

    if geno.0 == geno.1 {
        *allele_p.entry(geno.0).or_insert(0.0) += one_over_n;
    } else {
        *allele_p.entry(geno.0).or_insert(0.0) += one_over_2n;
        *allele_p.entry(geno.1).or_insert(0.0) += one_over_2n;
    }
}

fn estimate_from_tables(
    allele_p: &BTreeMap<i32, f64>,
    genotype_p: &BTreeMap<(i32, i32), f64>,
    return_estimation_info: bool,
) -> ThetaEstimate {
    // One equation per unique genotype. BTreeMap order keeps the system
    // reproducible across runs; the solution does not depend on it.
    let k = genotype_p.len();
    let mut design = Vec::with_capacity(k);
    let mut response = Vec::with_capacity(k);

    for (&(a, b), &p_geno) in genotype_p {
        if a == b {
            let p_i = allele_p[&a];
            let p_i2 = p_i * p_i;
            design.push(p_i - p_i2);
            response.push(p_geno - p_i2);
        } else {
            let p_i = allele_p[&a];
            let p_j = allele_p[&b];
            let tmp = -2.0 * p_i * p_j;
            design.push(tmp);
            response.push(p_geno + tmp);
        }
    }

    let estimation_info = if return_estimation_info {
        let mut genotypes = Vec::with_capacity(k);
        let mut zygosity = Vec::with_capacity(k);
        let mut genotype_probs = Vec::with_capacity(k);
        let mut genotype_allele_probs = Vec::with_capacity(k);
        for (&(a, b), &p_geno) in genotype_p {
            genotypes.push((a, b));
            zygosity.push(if a == b { 1 } else { 2 });
            genotype_probs.push(p_geno);
            genotype_allele_probs.push((allele_p[&a], allele_p[&b]));
        }
        Some(EstimationInfo {
            design: design.clone(),
            response: response.clone(),
            genotypes,
            zygosity,
            genotype_probs,
            genotype_allele_probs,
            allele_probs: allele_p.iter().map(|(&a, &p)| (a, p)).collect(),
        })
    } else {
        None
    };

    if k == 1 {
        return ThetaEstimate {
            estimate: None,
            error: true,
            details: "Only one genotype observed".to_string(),
            estimation_info,
        };
    }

    // Economy QR of the single-column design: R = ||x||, Q = x / ||x||,
    // so the least-squares solution is (Qᵀy) / R = x·y / x·x.
    let x = Array1::from(design);
    let y = Array1::from(response);
    let xtx = x.dot(&x);
    let norm = xtx.sqrt();

    if !norm.is_finite() || norm <= 0.0 {
        return ThetaEstimate {
            estimate: None,
            error: true,
            details: "Could not make QR decomposition".to_string(),
            estimation_info,
        };
    }

    let coef = x.dot(&y) / xtx;

    if (0.0..=1.0).contains(&coef) {
        ThetaEstimate {
            estimate: Some(coef),
            error: false,
            details: "OK".to_string(),
            estimation_info,
        }
    } else {
        ThetaEstimate {
            estimate: Some(coef),
            error: true,
            details: "Estimate outside range of (0, 1)".to_string(),
            estimation_info,
        }
    }
}

/// Estimate theta for one subpopulation from a sample of genotypes.
pub fn estimate_theta_1subpop_genotypes(
    genotypes: &[(i32, i32)],
    return_estimation_info: bool,
) -> Result<ThetaEstimate> {
    let n = genotypes.len();
    if n == 0 {
        return Err(LinealError::invalid_argument("genotypes cannot be empty"));
    }

    let one_over_n = 1.0 / n as f64;
    let one_over_2n = 1.0 / (2.0 * n as f64);
    let mut allele_p = BTreeMap::new();
    let mut genotype_p = BTreeMap::new();

    for &(a, b) in genotypes {
        fill_frequency_tables(a, b, one_over_n, one_over_2n, &mut allele_p, &mut genotype_p);
    }

    Ok(estimate_from_tables(
        &allele_p,
        &genotype_p,
        return_estimation_info,
    ))
}

/// Estimate theta for one subpopulation from individuals carrying 2-locus
/// autosomal haplotypes.
pub fn estimate_theta_1subpop_individuals(
    population: &Population,
    individuals: &[IndividualId],
    return_estimation_info: bool,
) -> Result<ThetaEstimate> {
    if individuals.is_empty() {
        return Err(LinealError::invalid_argument("no individuals given"));
    }

    let mut genotypes = Vec::with_capacity(individuals.len());
    for &id in individuals {
        let indv = population.get(id);
        let hap = indv
            .haplotype()
            .ok_or_else(|| LinealError::invalid_state("haplotypes not yet set"))?;
        if hap.len() != 2 {
            return Err(LinealError::invalid_argument(
                "expected exactly 2 autosomal loci",
            ));
        }
        genotypes.push((hap[0], hap[1]));
    }

    estimate_theta_1subpop_genotypes(&genotypes, return_estimation_info)
}

/// Per-subpopulation frequency tables for the multi-subpopulation engine.
struct SubpopTables {
    /// Allele frequencies p_A[i].
    p_a: Vec<BTreeMap<i32, f64>>,
    /// Homozygote frequencies P_AA[i].
    p_aa: Vec<BTreeMap<i32, f64>>,
    /// Heterozygote frequencies H_A[i].
    h_a: Vec<BTreeMap<i32, f64>>,
    /// Weighting sizes n_i.
    n: Vec<f64>,
}

fn fill_subpop_tables(
    tables: &mut SubpopTables,
    subpop_index: usize,
    a: i32,
    b: i32,
    frac1: f64,
    frac2: f64,
) {
    if a == b {
        *tables.p_a[subpop_index].entry(a).or_insert(0.0) += frac2;
        *tables.p_aa[subpop_index].entry(a).or_insert(0.0) += frac2;
    } else {
        *tables.p_a[subpop_index].entry(a).or_insert(0.0) += frac1;
        *tables.p_a[subpop_index].entry(b).or_insert(0.0) += frac1;
        *tables.h_a[subpop_index].entry(a).or_insert(0.0) += frac2;
        *tables.h_a[subpop_index].entry(b).or_insert(0.0) += frac2;
    }
}

/// Weir's weighted moment estimator over per-subpopulation frequency
/// tables (GDA2, pp. 168-179).
fn estimate_subpops_weighted(tables: &SubpopTables) -> Result<FStatEstimates> {
    let r = tables.p_a.len();
    if r == 0 {
        return Err(LinealError::invalid_argument("no subpopulations given"));
    }
    let r_dbl = r as f64;

    // p_A = P_AA + H_A/2 must hold in every subpopulation.
    for i in 0..r {
        for (&allele, &p) in &tables.p_a[i] {
            let p_aa = tables.p_aa[i].get(&allele).copied().unwrap_or(0.0);
            let h_a = tables.h_a[i].get(&allele).copied().unwrap_or(0.0);
            if (p - (p_aa + 0.5 * h_a)).abs() > 1e-9 {
                return Err(LinealError::numeric(
                    "inconsistent allele and genotype frequency tables",
                ));
            }
        }
    }

    let mut n_mean = 0.0;
    let mut n_sum = 0.0;
    let mut n2_sum = 0.0;
    for &n_i in &tables.n {
        n_mean += n_i / r_dbl;
        n_sum += n_i;
        n2_sum += n_i * n_i;
    }

    // Weighted mean heterozygosity and allele frequency over subpops.
    let mut mean_h_a: BTreeMap<i32, f64> = BTreeMap::new();
    for (i, h_a_i) in tables.h_a.iter().enumerate() {
        for (&allele, &h) in h_a_i {
            *mean_h_a.entry(allele).or_insert(0.0) += tables.n[i] * h / n_sum;
        }
    }

    let mut alleles: Vec<i32> = Vec::new();
    let mut mean_p_a: BTreeMap<i32, f64> = BTreeMap::new();
    for (i, p_a_i) in tables.p_a.iter().enumerate() {
        for (&allele, &p) in p_a_i {
            if !mean_p_a.contains_key(&allele) {
                alleles.push(allele);
            }
            *mean_p_a.entry(allele).or_insert(0.0) += tables.n[i] * p / n_sum;
        }
    }
    alleles.sort_unstable();

    // Between-subpopulation variance s²_A; a subpopulation where the
    // allele was never seen contributes its full (0 - mean)² term.
    let mut s2_a: BTreeMap<i32, f64> = BTreeMap::new();
    for &allele in &alleles {
        let mean = mean_p_a[&allele];
        let mut s2 = 0.0;
        for (i, p_a_i) in tables.p_a.iter().enumerate() {
            let p = p_a_i.get(&allele).copied().unwrap_or(0.0);
            let d = p - mean;
            s2 += tables.n[i] * d * d / ((r_dbl - 1.0) * n_mean);
        }
        s2_a.insert(allele, s2);
    }

    let nc = (n_sum - n2_sum / n_sum) / (r_dbl - 1.0);

    let mut sum_s1 = 0.0;
    let mut sum_s2 = 0.0;
    let mut sum_s3 = 0.0;
    for &allele in &alleles {
        let s2 = s2_a[&allele];
        let p = mean_p_a[&allele];
        let h = mean_h_a.get(&allele).copied().unwrap_or(0.0);

        let s1 = s2
            - (1.0 / (n_mean - 1.0))
                * (p * (1.0 - p) - ((r_dbl - 1.0) / r_dbl) * s2 - 0.25 * h);

        let s2_p1 = (r_dbl * (n_mean - nc) / n_mean) * p * (1.0 - p);
        let s2_p2 = s2 * ((n_mean - 1.0) + (r_dbl - 1.0) * (n_mean - nc)) / n_mean;
        let s2_p3 = h * r_dbl * (n_mean - nc) / (4.0 * n_mean * nc);
        let s2_term =
            p * (1.0 - p) - (n_mean / (r_dbl * (n_mean - 1.0))) * (s2_p1 - s2_p2 - s2_p3);

        let s3 = (nc / (2.0 * n_mean)) * h;

        sum_s1 += s1;
        sum_s2 += s2_term;
        sum_s3 += s3;
    }

    let f_it = 1.0 - sum_s3 / sum_s2;
    let theta = sum_s1 / sum_s2;
    let f_is = (f_it - theta) / (1.0 - theta);

    Ok(FStatEstimates { f_it, theta, f_is })
}

fn validate_subpop_sizes(r: usize, sizes: &[usize]) -> Result<()> {
    if r == 0 {
        return Err(LinealError::invalid_argument("no subpopulations given"));
    }
    if sizes.len() != r {
        return Err(LinealError::invalid_argument(
            "need one subpopulation size per subpopulation",
        ));
    }
    if sizes.iter().any(|&n| n == 0) {
        return Err(LinealError::invalid_argument(
            "all subpopulation sizes must be positive",
        ));
    }
    Ok(())
}

/// Estimate F, theta and f from subpopulations of genotypes.
///
/// `sizes` are the subpopulation sizes used for weighting; they may differ
/// from the sample sizes.
pub fn estimate_theta_subpops_genotypes(
    subpops: &[Vec<(i32, i32)>],
    sizes: &[usize],
) -> Result<FStatEstimates> {
    let r = subpops.len();
    validate_subpop_sizes(r, sizes)?;

    let mut tables = SubpopTables {
        p_a: vec![BTreeMap::new(); r],
        p_aa: vec![BTreeMap::new(); r],
        h_a: vec![BTreeMap::new(); r],
        n: sizes.iter().map(|&n| n as f64).collect(),
    };

    for (i, subpop) in subpops.iter().enumerate() {
        if subpop.is_empty() {
            return Err(LinealError::invalid_argument("subpopulation sample is empty"));
        }
        let sample_size = subpop.len() as f64;
        let frac1 = 1.0 / (2.0 * sample_size);
        let frac2 = 1.0 / sample_size;
        for &(a, b) in subpop {
            fill_subpop_tables(&mut tables, i, a, b, frac1, frac2);
        }
    }

    estimate_subpops_weighted(&tables)
}

/// Estimate F, theta and f from subpopulations of individuals carrying
/// 2-locus autosomal haplotypes.
pub fn estimate_theta_subpops_individuals(
    population: &Population,
    subpops: &[Vec<IndividualId>],
    sizes: &[usize],
) -> Result<FStatEstimates> {
    let r = subpops.len();
    validate_subpop_sizes(r, sizes)?;

    let mut genotype_subpops = Vec::with_capacity(r);
    for subpop in subpops {
        if subpop.is_empty() {
            return Err(LinealError::invalid_argument("subpopulation sample is empty"));
        }
        let mut genotypes = Vec::with_capacity(subpop.len());
        for &id in subpop {
            let hap = population.get(id).haplotype().ok_or_else(|| {
                LinealError::invalid_argument("subpopulation individual has no haplotype")
            })?;
            if hap.len() != 2 {
                return Err(LinealError::invalid_argument(
                    "expected exactly 2 autosomal loci",
                ));
            }
            genotypes.push((hap[0], hap[1]));
        }
        genotype_subpops.push(genotypes);
    }

    estimate_theta_subpops_genotypes(&genotype_subpops, sizes)
}
