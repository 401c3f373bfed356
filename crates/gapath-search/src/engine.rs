//! Generational evolution loop.
//!
//! [`GeneticSearch`] owns the population and the random number generator and
//! borrows the world immutably for the whole run.
//!
//! # Generation Step
//!
//! 1. Roulette-select `parent_count` parents (with replacement)
//! 2. Shuffle them and cross over consecutive pairs; an odd leftover parent is
//!    carried over as a copy
//! 3. Append the children and keep the best `population_size`
//! 4. Mutate every chromosome below the elite with `mutation_probability`
//! 5. Re-rank and keep the best `population_size`
//! 6. Update the best chromosome found so far
//!
//! # Stop Conditions
//!
//! Checked before each generation, in this order:
//!
//! 1. The world has no obstacles and the best fitness equals the Manhattan
//!    distance between start and destination (no shorter path exists)
//! 2. The best fitness has not improved for [`SAME_FITTEST_MAX_GENERATIONS`]
//!    generations
//! 3. The whole population has shared a single fitness value for
//!    [`SAME_POPULATION_MAX_GENERATIONS`] generations
//!
//! There is no generation limit: the stagnation counters are what guarantee
//! that a run ends.

use gapath_world::{Cell, Direction, GridWorld};
use log::{debug, info};
use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{
    chromosome::Chromosome,
    config::{ConfigError, SearchConfig, SearchParams},
    population::Population,
    stats::FitnessHistory,
};

/// Generations without improvement of the best fitness before the search stops.
pub const SAME_FITTEST_MAX_GENERATIONS: usize = 150;
/// Generations with a single shared fitness value before the search stops.
pub const SAME_POPULATION_MAX_GENERATIONS: usize = 50;

/// Why a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
pub enum StopReason {
    #[display("optimal path found")]
    OptimalPathFound,
    #[display("best fitness unchanged for {} generations", SAME_FITTEST_MAX_GENERATIONS)]
    BestFitnessStagnated,
    #[display(
        "population fitness homogeneous for {} generations",
        SAME_POPULATION_MAX_GENERATIONS
    )]
    PopulationConverged,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub stop_reason: StopReason,
    /// Number of generations created
    pub generations: usize,
    /// Best chromosome found
    pub best: Chromosome,
}

impl SearchOutcome {
    /// Returns `true` if the best chromosome reaches the destination without
    /// crossing an obstacle.
    #[must_use]
    pub fn path_found(&self) -> bool {
        self.best.is_valid_path()
    }

    /// Moves of the best chromosome, truncated to the consumed prefix.
    #[must_use]
    pub fn moves(&self) -> &[Direction] {
        self.best.moves()
    }

    /// Cells visited by the best chromosome, starting with the start cell.
    #[must_use]
    pub fn history(&self) -> &[Cell] {
        self.best.history()
    }
}

/// Genetic search for a path between the start and the destination of a world.
///
/// # Example
///
/// ```
/// use gapath_search::{GeneticSearch, SearchConfig};
/// use gapath_world::{Cell, GridWorld};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let world = GridWorld::new(6, Cell::new(0, 0), Cell::new(3, 4), []).unwrap();
/// let config = SearchConfig::for_world_size(world.size());
/// let mut search = GeneticSearch::new(&world, &config, Pcg32::seed_from_u64(1)).unwrap();
/// let outcome = search.run();
/// assert!(outcome.best.fitness() >= world.manhattan_distance());
/// assert_eq!(search.statistics().len(), outcome.generations + 1);
/// ```
#[derive(Debug, Clone)]
pub struct GeneticSearch<'w, R> {
    world: &'w GridWorld,
    params: SearchParams,
    chromosome_len: usize,
    rng: R,
    population: Population,
    best: Chromosome,
    generation: usize,
    stagnant_generations: usize,
    homogeneous_generations: usize,
    statistics: FitnessHistory,
}

impl<'w, R> GeneticSearch<'w, R>
where
    R: Rng,
{
    /// Validates `config` and creates the initial random population.
    ///
    /// Chromosomes are `2 × world.size()` moves long.
    pub fn new(world: &'w GridWorld, config: &SearchConfig, mut rng: R) -> Result<Self, ConfigError> {
        let params = config.validate()?;
        let chromosome_len = world.size() * 2;
        let population = Population::random(world, params.population_size, chromosome_len, &mut rng);
        let best = population
            .best()
            .expect("population holds at least 2 chromosomes")
            .clone();
        let mut this = Self {
            world,
            params,
            chromosome_len,
            rng,
            population,
            best,
            generation: 0,
            stagnant_generations: 0,
            homogeneous_generations: 0,
            statistics: FitnessHistory::new(),
        };
        this.record_statistics();
        debug!(
            "initial population of {} (chromosome length {chromosome_len}), best: {}",
            params.population_size, this.best
        );
        Ok(this)
    }

    /// Evolves generations until a stop condition holds.
    pub fn run(&mut self) -> SearchOutcome {
        let stop_reason = loop {
            if let Some(reason) = self.check_stop() {
                break reason;
            }
            self.create_generation();
        };
        info!(
            "search stopped after {} generations: {stop_reason}; best: {}",
            self.generation, self.best
        );
        SearchOutcome {
            stop_reason,
            generations: self.generation,
            best: self.best.clone(),
        }
    }

    /// Returns the first stop condition that holds, if any.
    #[must_use]
    pub fn check_stop(&self) -> Option<StopReason> {
        if self.world.obstacle_count() == 0
            && self.best.fitness() == self.world.manhattan_distance()
        {
            return Some(StopReason::OptimalPathFound);
        }
        if self.stagnant_generations >= SAME_FITTEST_MAX_GENERATIONS {
            return Some(StopReason::BestFitnessStagnated);
        }
        if self.homogeneous_generations >= SAME_POPULATION_MAX_GENERATIONS {
            return Some(StopReason::PopulationConverged);
        }
        None
    }

    /// Derives the next generation from the current one.
    ///
    /// The homogeneity counter is updated from the population as it is before
    /// the step.
    pub fn create_generation(&mut self) {
        if self.population.is_homogeneous() {
            self.homogeneous_generations += 1;
        } else {
            self.homogeneous_generations = 0;
        }
        self.generation += 1;

        let parents = self.population.roulette_select(
            self.params.parent_count,
            self.world.manhattan_distance(),
            &mut self.rng,
        );
        let offspring = self.breed(parents);
        self.population
            .merge(offspring, self.params.population_size);

        let mutated = self.population.mutate_non_elite(
            self.params.elite_count,
            self.params.mutation_probability,
            self.world,
            &mut self.rng,
        );

        self.update_best();
        self.record_statistics();

        debug!(
            "generation #{}: {mutated} mutated, stagnant {}, homogeneous {}, best: {}",
            self.generation, self.stagnant_generations, self.homogeneous_generations, self.best
        );
    }

    fn breed(&mut self, mut parents: Vec<Chromosome>) -> Vec<Chromosome> {
        parents.shuffle(&mut self.rng);
        let mut offspring = Vec::with_capacity(parents.len());
        let mut pairs = parents.chunks_exact(2);
        for pair in &mut pairs {
            let (child1, child2) =
                Chromosome::crossover(&pair[0], &pair[1], self.world, &mut self.rng);
            offspring.push(child1);
            offspring.push(child2);
        }
        offspring.extend(pairs.remainder().iter().cloned());
        offspring
    }

    fn update_best(&mut self) {
        let candidate = self
            .population
            .best()
            .expect("population holds at least 2 chromosomes");
        // ties keep the chromosome found first
        if candidate.fitness() < self.best.fitness() {
            self.best = candidate.clone();
            self.stagnant_generations = 0;
        } else {
            self.stagnant_generations += 1;
        }
    }

    fn record_statistics(&mut self) {
        let stats = self
            .population
            .fitness_stats()
            .expect("population holds at least 2 chromosomes");
        self.statistics.insert(self.generation, stats);
    }

    #[must_use]
    pub fn world(&self) -> &GridWorld {
        self.world
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn chromosome_len(&self) -> usize {
        self.chromosome_len
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best chromosome found so far.
    #[must_use]
    pub fn best(&self) -> &Chromosome {
        &self.best
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn stagnant_generations(&self) -> usize {
        self.stagnant_generations
    }

    #[must_use]
    pub fn homogeneous_generations(&self) -> usize {
        self.homogeneous_generations
    }

    /// Fitness statistics of every generation so far, including generation 0.
    #[must_use]
    pub fn statistics(&self) -> &FitnessHistory {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn config(population_size: usize) -> SearchConfig {
        SearchConfig {
            population_size,
            mutation_probability: 0.4,
            elite_fraction: 0.1,
            parent_fraction: 1.0,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let world = GridWorld::new(4, Cell::new(0, 0), Cell::new(3, 3), []).unwrap();
        let err = GeneticSearch::new(&world, &config(1), Pcg32::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ConfigError::PopulationTooSmall { population_size: 1 });
    }

    #[test]
    fn test_initial_state() {
        let world = GridWorld::new(4, Cell::new(0, 0), Cell::new(3, 3), []).unwrap();
        let search = GeneticSearch::new(&world, &config(10), Pcg32::seed_from_u64(0)).unwrap();
        assert_eq!(search.generation(), 0);
        assert_eq!(search.chromosome_len(), 8);
        assert_eq!(search.population().len(), 10);
        assert_eq!(
            search.best().fitness(),
            search.population().best().unwrap().fitness()
        );
        assert_eq!(search.params().elite_count, 1);
        let stats = search.statistics().get(0).unwrap();
        assert_eq!(stats.min, search.best().fitness());
    }

    #[test]
    fn test_generation_keeps_population_ranked() {
        let world = GridWorld::new(
            8,
            Cell::new(1, 1),
            Cell::new(6, 5),
            [Cell::new(3, 3), Cell::new(4, 4), Cell::new(2, 5)],
        )
        .unwrap();
        let mut search = GeneticSearch::new(&world, &config(15), Pcg32::seed_from_u64(9)).unwrap();
        for generation in 1..=40 {
            let previous_best = search.best().fitness();
            let previous_stagnant = search.stagnant_generations();
            search.create_generation();

            assert_eq!(search.generation(), generation);
            assert_eq!(search.population().len(), 15);
            assert!(
                search
                    .population()
                    .chromosomes()
                    .is_sorted_by_key(Chromosome::fitness)
            );
            assert!(search.best().fitness() <= previous_best);
            if search.best().fitness() == previous_best {
                assert_eq!(search.stagnant_generations(), previous_stagnant + 1);
            } else {
                assert_eq!(search.stagnant_generations(), 0);
            }
            for chrom in search.population().chromosomes() {
                assert_eq!(chrom.path().len(), 16);
                assert!(chrom.history().iter().all(|c| world.contains(*c)));
            }
        }
        assert_eq!(search.statistics().len(), 41);
    }

    #[test]
    fn test_elite_survives_generations() {
        let world = GridWorld::new(6, Cell::new(0, 0), Cell::new(5, 5), [Cell::new(2, 2)]).unwrap();
        let mut search = GeneticSearch::new(&world, &config(20), Pcg32::seed_from_u64(4)).unwrap();
        for _ in 0..30 {
            let best = search.population().best().unwrap().fitness();
            search.create_generation();
            assert!(search.population().best().unwrap().fitness() <= best);
        }
    }

    #[test]
    fn test_check_stop_on_optimal_path() {
        let world = GridWorld::new(3, Cell::new(0, 0), Cell::new(0, 1), []).unwrap();
        let mut search = GeneticSearch::new(&world, &config(10), Pcg32::seed_from_u64(2)).unwrap();
        let outcome = search.run();
        assert_eq!(outcome.stop_reason, StopReason::OptimalPathFound);
        assert!(outcome.path_found());
        assert_eq!(outcome.moves(), &[Direction::Right]);
        assert_eq!(outcome.history(), &[Cell::new(0, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_obstacles_disable_optimal_stop() {
        let world = GridWorld::new(4, Cell::new(0, 0), Cell::new(0, 3), [Cell::new(3, 3)]).unwrap();
        let mut search = GeneticSearch::new(&world, &config(10), Pcg32::seed_from_u64(6)).unwrap();
        let outcome = search.run();
        assert_ne!(outcome.stop_reason, StopReason::OptimalPathFound);
        assert!(
            search.stagnant_generations() >= SAME_FITTEST_MAX_GENERATIONS
                || search.homogeneous_generations() >= SAME_POPULATION_MAX_GENERATIONS
        );
        assert_eq!(search.check_stop(), Some(outcome.stop_reason));
    }

    #[test]
    fn test_homogeneous_population_stops_search() {
        let world = GridWorld::new(2, Cell::new(0, 0), Cell::new(0, 1), [Cell::new(1, 1)]).unwrap();
        let config = SearchConfig {
            population_size: 8,
            mutation_probability: 0.0,
            elite_fraction: 0.0,
            parent_fraction: 1.0,
        };
        let mut search = GeneticSearch::new(&world, &config, Pcg32::seed_from_u64(1)).unwrap();
        let outcome = search.run();
        // without mutation the population collapses to a single fitness value
        assert_eq!(outcome.stop_reason, StopReason::PopulationConverged);
        assert_eq!(search.homogeneous_generations(), SAME_POPULATION_MAX_GENERATIONS);
    }
}
