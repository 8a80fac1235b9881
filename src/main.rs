//! # Application Entry Point
//!
//! Parses the CLI configuration, runs the configured genealogy sampler,
//! builds pedigrees and optionally populates Y-STR haplotypes, then prints
//! a run summary.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lineal::config::Config;
use lineal::pipelines::{
    build_pedigrees, populate_haplotypes, sample_genealogy, sample_genealogy_variance,
};
use lineal::utils::RunMonitor;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse_and_validate().context("invalid configuration")?;
    let mut rng = StdRng::seed_from_u64(config.rng_seed());
    let monitor = RunMonitor::new();

    info!(
        population_size = config.population_size,
        generations = config.generations,
        seed = config.seed,
        "starting simulation"
    );

    let mut sim = match (config.gamma_shape, config.gamma_scale) {
        (Some(shape), Some(scale)) => sample_genealogy_variance(
            config.population_size,
            config.generation_limit(),
            shape,
            scale,
            Some(config.keep_generations),
            config.verbose_tables,
            &mut rng,
            &monitor,
        )?,
        _ => sample_genealogy(
            config.population_size,
            config.generation_limit(),
            config.verbose_tables,
            &mut rng,
            &monitor,
        )?,
    };

    let pedigrees = build_pedigrees(&mut sim.population, &monitor)?;

    if config.loci > 0 {
        let rates = vec![config.mutation_rate; config.loci];
        populate_haplotypes(
            &pedigrees,
            &mut sim.population,
            config.loci,
            &rates,
            &mut rng,
            &monitor,
        )?;
    }

    let largest = pedigrees.iter().map(|p| p.len()).max().unwrap_or(0);
    println!("individuals:     {}", sim.population.len());
    println!("generations:     {}", sim.generations);
    println!("founders left:   {}", sim.founders_left);
    println!("pedigrees:       {}", pedigrees.len());
    println!("largest pedigree: {}", largest);

    if let Some(tables) = &sim.tables {
        println!("\nindividual pids (slot x generation):");
        print!("{}", tables.individual_pids);
        println!("\nfather pids (slot x generation):");
        print!("{}", tables.father_pids);
        println!("\nfather slot indices (slot x generation, 1-based):");
        print!("{}", tables.father_indices);
    }

    info!(elapsed_secs = monitor.elapsed_secs(), "done");
    Ok(())
}
