//! # Genealogy Samplers
//!
//! Forward-time Wright-Fisher sampling of patrilineal genealogies. Each
//! child in a generation picks its father among the slots of the next
//! (older) generation; a father individual is allocated lazily the first
//! time its slot is chosen, so childless slots never materialize.
//!
//! Two paternity regimes share one engine: uniform slot choice, and
//! gamma-distributed per-slot fitness weights that inflate the variance of
//! the number of children per father.

use rand::Rng;
use rand_distr::{Distribution, Gamma};
use tracing::debug;

use crate::data::table::MISSING;
use crate::data::{IndividualId, IntTable, Population};
use crate::error::{LinealError, Result};
use crate::utils::RunMonitor;

/// How many generations to simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationLimit {
    /// Simulate exactly this many generations (including generation 0).
    Fixed(usize),
    /// Simulate until a single distinct father was selected in the most
    /// recent step.
    UntilOneFounder,
}

/// Verbose per-slot tables, one column per generation. Unused slots carry
/// the missing sentinel.
#[derive(Clone, Debug)]
pub struct VerboseTables {
    /// Pid assigned to each (slot, generation).
    pub individual_pids: IntTable,
    /// Pid of each slot's father in the next generation.
    pub father_pids: IntTable,
    /// 1-based father slot index chosen for each child slot.
    pub father_indices: IntTable,
}

/// Result of a genealogy sampling run.
#[derive(Debug)]
pub struct Simulation {
    /// The owning arena of every individual created.
    pub population: Population,
    /// Number of generation layers simulated, including generation 0.
    pub generations: usize,
    /// Number of distinct fathers allocated in the final step (the full
    /// population size when only one generation was simulated).
    pub founders_left: usize,
    /// Generation-0 individuals in slot order.
    pub end_generation: Vec<IndividualId>,
    /// Individuals in the retained youngest generations (generation 0 for
    /// the uniform sampler).
    pub kept_individuals: Vec<IndividualId>,
    /// Verbose tables when requested.
    pub tables: Option<VerboseTables>,
}

enum Paternity {
    Uniform,
    GammaWeighted { shape: f64, scale: f64 },
}

/// Sample a genealogy with uniform father choice.
///
/// Fails with `InvalidArgument` for `population_size <= 1` or a fixed
/// limit of zero generations, and with `Cancelled` when the monitor trips
/// between generations.
pub fn sample_genealogy<R: Rng>(
    population_size: usize,
    limit: GenerationLimit,
    verbose_tables: bool,
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<Simulation> {
    run_sampler(
        population_size,
        limit,
        Paternity::Uniform,
        Some(0),
        verbose_tables,
        rng,
        monitor,
    )
}

/// Sample a genealogy with gamma-weighted paternal fitness.
///
/// Each step draws a weight per father slot from `Gamma(shape, scale)`,
/// normalizes to probabilities, and inverts each child's uniform draw over
/// the cumulative weights by binary search. `keep_generations` selects the
/// youngest generations whose individuals are collected into
/// [`Simulation::kept_individuals`] (`None` keeps nothing).
pub fn sample_genealogy_variance<R: Rng>(
    population_size: usize,
    limit: GenerationLimit,
    gamma_shape: f64,
    gamma_scale: f64,
    keep_generations: Option<u32>,
    verbose_tables: bool,
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<Simulation> {
    if !(gamma_shape > 0.0) || !(gamma_scale > 0.0) {
        return Err(LinealError::invalid_argument(
            "gamma shape and scale must be positive",
        ));
    }
    run_sampler(
        population_size,
        limit,
        Paternity::GammaWeighted {
            shape: gamma_shape,
            scale: gamma_scale,
        },
        keep_generations,
        verbose_tables,
        rng,
        monitor,
    )
}

/// Cumulative paternity probabilities for one step of the weighted regime.
fn draw_weight_cumdist<R: Rng>(gamma: &Gamma<f64>, size: usize, rng: &mut R) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..size).map(|_| gamma.sample(rng)).collect();

    let sum: f64 = weights.iter().sum();
    let mean = sum / size as f64;
    let var = weights.iter().map(|w| (w - mean) * (w - mean)).sum::<f64>() / (size as f64 - 1.0);
    debug!(mean, var, "paternal fitness weights drawn");

    let mut acc = 0.0;
    for w in weights.iter_mut() {
        acc += *w / sum;
        *w = acc;
    }
    weights
}

fn run_sampler<R: Rng>(
    population_size: usize,
    limit: GenerationLimit,
    paternity: Paternity,
    keep_generations: Option<u32>,
    verbose_tables: bool,
    rng: &mut R,
    monitor: &RunMonitor,
) -> Result<Simulation> {
    if population_size <= 1 {
        return Err(LinealError::invalid_argument(
            "population size must be greater than 1",
        ));
    }
    let fixed = match limit {
        GenerationLimit::Fixed(0) => {
            return Err(LinealError::invalid_argument(
                "number of generations must be positive",
            ));
        }
        GenerationLimit::Fixed(g) => Some(g),
        GenerationLimit::UntilOneFounder => None,
    };

    let gamma = match paternity {
        Paternity::Uniform => None,
        Paternity::GammaWeighted { shape, scale } => Some(
            Gamma::new(shape, scale)
                .map_err(|e| LinealError::invalid_argument(format!("bad gamma parameters: {e}")))?,
        ),
    };

    let m = population_size;
    let mut population = Population::with_capacity(2 * m);

    // Verbose collectors, one column per generation layer.
    let mut individual_cols: Vec<Vec<i32>> = Vec::new();
    let mut father_pid_cols: Vec<Vec<i32>> = Vec::new();
    let mut father_index_cols: Vec<Vec<i32>> = Vec::new();

    // Generation 0.
    let mut end_generation = Vec::with_capacity(m);
    let mut kept_individuals = Vec::new();
    let mut column = vec![MISSING; m];
    for cell in column.iter_mut() {
        let id = population.alloc(0);
        end_generation.push(id);
        *cell = population.get(id).pid();
        if keep_generations.is_some() {
            kept_individuals.push(id);
        }
    }
    if verbose_tables {
        individual_cols.push(column);
    }
    monitor.tick();

    let mut children: Vec<Option<IndividualId>> =
        end_generation.iter().copied().map(Some).collect();
    let mut founders_left = m;
    let mut generation: usize = 1;

    loop {
        let keep_going = match fixed {
            Some(g) => generation < g,
            None => founders_left > 1,
        };
        if !keep_going {
            break;
        }
        if monitor.is_cancelled() {
            return Err(LinealError::Cancelled);
        }

        let weight_cumdist = match &gamma {
            Some(gamma) => Some(draw_weight_cumdist(gamma, m, rng)),
            None => None,
        };

        let mut fathers: Vec<Option<IndividualId>> = vec![None; m];
        let mut individual_col = vec![MISSING; m];
        let mut father_pid_col = vec![MISSING; m];
        let mut father_index_col = vec![MISSING; m];
        let mut new_founders_left = 0usize;

        for child_slot in 0..m {
            // A slot that was never chosen as a father is vacant from here
            // on; its line of descent ends.
            let Some(child) = children[child_slot] else {
                continue;
            };

            let father_slot = match &weight_cumdist {
                None => rng.random_range(0..m),
                Some(cumdist) => {
                    let u = rng.random::<f64>();
                    cumdist.partition_point(|&c| c < u).min(m - 1)
                }
            };

            let father = match fathers[father_slot] {
                Some(father) => father,
                None => {
                    let father = population.alloc(generation as u32);
                    fathers[father_slot] = Some(father);
                    individual_col[father_slot] = population.get(father).pid();
                    new_founders_left += 1;
                    if let Some(keep) = keep_generations {
                        if generation as u32 <= keep {
                            kept_individuals.push(father);
                        }
                    }
                    father
                }
            };

            father_pid_col[child_slot] = population.get(father).pid();
            father_index_col[child_slot] = father_slot as i32 + 1;
            population.link_child_to_father(child, father);
        }

        if verbose_tables {
            individual_cols.push(individual_col);
            father_pid_cols.push(father_pid_col);
            father_index_cols.push(father_index_col);
        }

        children = fathers;
        founders_left = new_founders_left;
        generation += 1;
        monitor.tick();
    }

    debug!(
        generations = generation,
        founders_left,
        individuals = population.len(),
        "genealogy sampled"
    );

    let tables = if verbose_tables {
        // The father tables lag the pid table by one generation; pad them
        // with a trailing missing column so all three have equal width.
        father_pid_cols.push(vec![MISSING; m]);
        father_index_cols.push(vec![MISSING; m]);
        debug_assert_eq!(individual_cols.len(), generation);
        debug_assert_eq!(father_pid_cols.len(), generation);
        Some(VerboseTables {
            individual_pids: IntTable::from_columns(m, &individual_cols),
            father_pids: IntTable::from_columns(m, &father_pid_cols),
            father_indices: IntTable::from_columns(m, &father_index_cols),
        })
    } else {
        None
    };

    Ok(Simulation {
        population,
        generations: generation,
        founders_left,
        end_generation,
        kept_individuals,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_population_size_must_exceed_one() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(1);
        for m in [0, 1] {
            assert!(matches!(
                sample_genealogy(m, GenerationLimit::Fixed(2), false, &mut rng, &monitor),
                Err(LinealError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn test_zero_generations_rejected() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_genealogy(5, GenerationLimit::Fixed(0), false, &mut rng, &monitor),
            Err(LinealError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_single_generation_is_all_founders() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(1);
        let sim = sample_genealogy(10, GenerationLimit::Fixed(1), false, &mut rng, &monitor)
            .unwrap();
        assert_eq!(sim.generations, 1);
        assert_eq!(sim.founders_left, 10);
        assert_eq!(sim.population.len(), 10);
        for &id in &sim.end_generation {
            assert!(sim.population.get(id).is_founder());
        }
    }

    #[test]
    fn test_fixed_generations_link_invariants() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(42);
        let sim = sample_genealogy(4, GenerationLimit::Fixed(3), false, &mut rng, &monitor)
            .unwrap();
        assert_eq!(sim.generations, 3);
        assert!(sim.population.len() >= 5 && sim.population.len() <= 12);

        for id in sim.population.ids() {
            let indv = sim.population.get(id);
            assert!(indv.generation() <= 2);
            if let Some(father) = indv.father() {
                let father = sim.population.get(father);
                assert_eq!(father.generation(), indv.generation() + 1);
                assert!(father.children().contains(&id));
            }
        }
        // Every generation-0 individual has a father in generation 1.
        for &id in &sim.end_generation {
            let father = sim.population.get(id).father().unwrap();
            assert_eq!(sim.population.get(father).generation(), 1);
        }
    }

    #[test]
    fn test_until_one_founder_terminates() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(7);
        let sim = sample_genealogy(10, GenerationLimit::UntilOneFounder, false, &mut rng, &monitor)
            .unwrap();
        assert_eq!(sim.founders_left, 1);

        // Exactly one individual in the oldest generation, and it has no
        // father.
        let oldest = sim
            .population
            .ids()
            .map(|id| sim.population.get(id).generation())
            .max()
            .unwrap();
        let top: Vec<_> = sim
            .population
            .ids()
            .filter(|&id| sim.population.get(id).generation() == oldest)
            .collect();
        assert_eq!(top.len(), 1);
        assert!(sim.population.get(top[0]).is_founder());
    }

    #[test]
    fn test_fixed_seed_reproduces_pids_and_tables() {
        let monitor = RunMonitor::new();
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            sample_genealogy(6, GenerationLimit::Fixed(4), true, &mut rng, &monitor).unwrap()
        };
        let a = run(99);
        let b = run(99);
        assert_eq!(a.population.len(), b.population.len());
        assert_eq!(a.founders_left, b.founders_left);
        let ta = a.tables.unwrap();
        let tb = b.tables.unwrap();
        assert_eq!(ta.individual_pids, tb.individual_pids);
        assert_eq!(ta.father_pids, tb.father_pids);
        assert_eq!(ta.father_indices, tb.father_indices);
    }

    #[test]
    fn test_verbose_tables_shape_and_padding() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(3);
        let sim = sample_genealogy(5, GenerationLimit::Fixed(3), true, &mut rng, &monitor)
            .unwrap();
        let tables = sim.tables.unwrap();
        assert_eq!(tables.individual_pids.n_rows(), 5);
        assert_eq!(tables.individual_pids.n_cols(), 3);
        assert_eq!(tables.father_pids.n_cols(), 3);
        assert_eq!(tables.father_indices.n_cols(), 3);

        // Generation 0 fills every slot; the last father column is padding.
        for row in 0..5 {
            assert!(!tables.individual_pids.is_missing(row, 0));
            assert!(tables.father_pids.is_missing(row, 2));
            assert!(tables.father_indices.is_missing(row, 2));
            // Every generation-0 child chose a father.
            assert!(!tables.father_pids.is_missing(row, 0));
            let idx = tables.father_indices.get(row, 0);
            assert!((1..=5).contains(&idx));
        }
    }

    #[test]
    fn test_sentinel_tables_have_matching_width() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(13);
        let sim = sample_genealogy(8, GenerationLimit::UntilOneFounder, true, &mut rng, &monitor)
            .unwrap();
        let tables = sim.tables.unwrap();
        assert_eq!(tables.individual_pids.n_cols(), sim.generations);
        assert_eq!(tables.father_pids.n_cols(), sim.generations);
        assert_eq!(tables.father_indices.n_cols(), sim.generations);
    }

    #[test]
    fn test_variance_sampler_parameters_validated() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_genealogy_variance(
            10,
            GenerationLimit::Fixed(2),
            0.0,
            1.0,
            Some(2),
            false,
            &mut rng,
            &monitor
        )
        .is_err());
        assert!(sample_genealogy_variance(
            10,
            GenerationLimit::Fixed(2),
            1.0,
            -1.0,
            Some(2),
            false,
            &mut rng,
            &monitor
        )
        .is_err());
    }

    #[test]
    fn test_variance_sampler_keeps_requested_generations() {
        let monitor = RunMonitor::new();
        let mut rng = StdRng::seed_from_u64(21);
        let sim = sample_genealogy_variance(
            10,
            GenerationLimit::Fixed(5),
            5.0,
            1.0,
            Some(2),
            false,
            &mut rng,
            &monitor,
        )
        .unwrap();
        assert!(!sim.kept_individuals.is_empty());
        for &id in &sim.kept_individuals {
            assert!(sim.population.get(id).generation() <= 2);
        }
        // Everything at or below the cap was kept.
        let expected = sim.population.size_in_generations(Some(2));
        assert_eq!(sim.kept_individuals.len(), expected);
    }

    #[test]
    fn test_cancellation_between_generations() {
        let monitor = RunMonitor::new();
        monitor.cancel();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_genealogy(10, GenerationLimit::Fixed(5), false, &mut rng, &monitor),
            Err(LinealError::Cancelled)
        ));
    }
}
