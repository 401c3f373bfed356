//! Genetic search for a path between two cells of a grid world.
//!
//! Instead of a deterministic pathfinder, this crate evolves a population of
//! candidate paths. Each candidate is a fixed-length sequence of moves; the
//! better a sequence walks from the start to the destination, the lower its
//! fitness.
//!
//! # How the Search Works
//!
//! 1. **Population** - Create random chromosomes of `2 × grid size` moves
//! 2. **Repair** - Replace moves that would leave the grid
//! 3. **Evaluation** - Walk each chromosome and score it (lower is better)
//! 4. **Selection** - Draw parents by roulette selection weighted by
//!    `manhattan distance / fitness`
//! 5. **Reproduction** - Uniform crossover of parent pairs, then mutation of
//!    every non-elite chromosome with a fixed probability
//! 6. **Repeat** - Until the optimum is found or the population stagnates
//!
//! # Architecture
//!
//! ```text
//! GridWorld (gapath-world)
//!     ↓ walked by
//! Chromosome (moves + Evaluation)
//!     ↓ ranked in
//! Population
//!     ↓ evolved by
//! GeneticSearch
//!     ↓ produces
//! SearchOutcome + FitnessHistory
//! ```
//!
//! # Modules
//!
//! - [`walk`] - Boundary repair and fitness evaluation of move sequences
//! - [`chromosome`] - Candidate paths, mutation and uniform crossover
//! - [`population`] - Ranking, stable truncation and roulette selection
//! - [`engine`] - The generational loop and its stop conditions
//! - [`stats`] - Per-generation fitness statistics for plotting
//! - [`config`] - Search parameters and their validation
//!
//! # Example
//!
//! ```
//! use gapath_search::{GeneticSearch, SearchConfig, StopReason};
//! use gapath_world::{Cell, GridWorld};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let world = GridWorld::new(5, Cell::new(0, 0), Cell::new(0, 4), []).unwrap();
//! let config = SearchConfig {
//!     population_size: 15,
//!     mutation_probability: 0.4,
//!     elite_fraction: 0.1,
//!     parent_fraction: 1.0,
//! };
//! let mut search = GeneticSearch::new(&world, &config, Pcg32::seed_from_u64(7)).unwrap();
//! let outcome = search.run();
//!
//! if outcome.stop_reason == StopReason::OptimalPathFound {
//!     assert_eq!(outcome.moves().len(), 4);
//! }
//! for (generation, stats) in search.statistics().iter() {
//!     println!("{generation}: min={} max={} avg={:.2}", stats.min, stats.max, stats.avg);
//! }
//! ```
//!
//! # Randomness
//!
//! Every random draw (initial moves, repairs, parent selection, pairing,
//! crossover coin flips, mutations) comes from the generator passed to
//! [`GeneticSearch::new`]. A seeded generator reproduces a run exactly.
//!
//! # Current Limitations
//!
//! - **No optimality guarantee**: The search may stop on a path that crosses
//!   obstacles or does not reach the destination at all
//! - **No time bound**: A run ends only through its stop conditions
//! - **Static world**: Obstacles cannot change while a search is running
//! - **Fixed chromosome length**: Paths longer than `2 × grid size` moves cannot
//!   be represented

pub use self::{
    chromosome::Chromosome,
    config::{ConfigError, SearchConfig, SearchParams},
    engine::{
        GeneticSearch, SAME_FITTEST_MAX_GENERATIONS, SAME_POPULATION_MAX_GENERATIONS,
        SearchOutcome, StopReason,
    },
    population::Population,
    stats::{FitnessHistory, GenerationStats},
    walk::{Evaluation, WalkError},
};

pub mod chromosome;
pub mod config;
pub mod engine;
pub mod population;
pub mod stats;
pub mod walk;
