use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use gapath_search::{FitnessHistory, GeneticSearch, SearchConfig, SearchOutcome};
use gapath_world::GridWorld;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// World JSON file to search instead of random worlds
    #[arg(long, conflicts_with = "size")]
    world: Option<PathBuf>,
    /// World sizes, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "50")]
    size: Vec<usize>,
    /// Total obstacle counts, comma separated (each count grows the previous world)
    #[arg(short, long, value_delimiter = ',')]
    obstacles: Vec<usize>,
    /// Population sizes, comma separated [default: 1.5 × world size]
    #[arg(short, long, value_delimiter = ',')]
    population: Vec<usize>,
    /// Mutation probabilities, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = [SearchConfig::DEFAULT_MUTATION_PROBABILITY])]
    mutation: Vec<f64>,
    /// Elite fractions of the population, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = [SearchConfig::DEFAULT_ELITE_FRACTION])]
    elite: Vec<f64>,
    /// Parent fractions of the population, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [SearchConfig::DEFAULT_PARENT_FRACTION])]
    parents: Vec<f64>,
    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the fitness statistics of every configuration
    #[arg(long)]
    stats_output: Option<PathBuf>,
    /// Do not print the grid with the best path
    #[arg(long)]
    no_render: bool,
}

/// Which sweep parameters take more than one value.
///
/// Only those appear in banners and configuration names.
#[derive(Debug, Clone, Copy, Default)]
struct Varied {
    mutation: bool,
    elite: bool,
    parents: bool,
}

#[derive(Debug, Clone, Copy)]
struct RunConfig {
    world_size: usize,
    obstacle_count: usize,
    search: SearchConfig,
}

impl RunConfig {
    fn varied_params(&self, varied: Varied) -> Vec<(&'static str, &'static str, f64)> {
        let SearchConfig {
            mutation_probability,
            elite_fraction,
            parent_fraction,
            ..
        } = self.search;
        [
            (varied.mutation, "mutation_probability", "mutation", mutation_probability),
            (varied.elite, "elite_percentage", "elite", elite_fraction),
            (varied.parents, "parents_percentage", "parents", parent_fraction),
        ]
        .into_iter()
        .filter(|(is_varied, ..)| *is_varied)
        .map(|(_, long, short, value)| (long, short, value))
        .collect()
    }

    fn describe(&self, varied: Varied) -> String {
        let mut parts = vec![
            format!("world_size={}", self.world_size),
            format!("number_of_obstacles={}", self.obstacle_count),
            format!("population_size={}", self.search.population_size),
        ];
        for (long, _, value) in self.varied_params(varied) {
            parts.push(format!("{long}={value}"));
        }
        parts.join(", ")
    }

    fn name(&self, varied: Varied) -> String {
        let mut parts = vec![
            format!("size={}", self.world_size),
            format!("obstacles={}", self.obstacle_count),
            format!("pop={}", self.search.population_size),
        ];
        for (_, short, value) in self.varied_params(varied) {
            parts.push(format!("{short}={value}"));
        }
        parts.join("_")
    }
}

#[derive(Debug, Serialize)]
struct StatsDocument {
    generated_at: DateTime<Utc>,
    seed: u64,
    configurations: BTreeMap<String, FitnessHistory>,
}

pub(crate) fn run(arg: &SearchArg) -> anyhow::Result<()> {
    let SearchArg {
        world,
        size,
        obstacles,
        population,
        mutation,
        elite,
        parents,
        seed,
        stats_output,
        no_render,
    } = arg;

    let (seed, mut rng) = util::seeded_rng(*seed);
    eprintln!("Seed: {seed}");

    let base_worlds = match world {
        Some(path) => vec![util::read_world_file(path)?],
        None => size
            .iter()
            .map(|&size| {
                GridWorld::random(size, 0, &mut rng)
                    .with_context(|| format!("Failed to create world of size {size}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
    };

    let varied = Varied {
        mutation: mutation.len() > 1,
        elite: elite.len() > 1,
        parents: parents.len() > 1,
    };

    let mut configurations = BTreeMap::new();
    let mut index = 1;
    for mut world in base_worlds {
        let obstacle_counts = if obstacles.is_empty() {
            vec![world.obstacle_count()]
        } else {
            obstacles.clone()
        };
        let population_sizes = if population.is_empty() {
            vec![SearchConfig::for_world_size(world.size()).population_size]
        } else {
            population.clone()
        };

        for &obstacle_count in &obstacle_counts {
            world
                .add_random_obstacles(obstacle_count, &mut rng)
                .with_context(|| format!("Failed to place {obstacle_count} obstacles"))?;
            for &mutation_probability in mutation {
                for &elite_fraction in elite {
                    for &parent_fraction in parents {
                        for &population_size in &population_sizes {
                            let config = RunConfig {
                                world_size: world.size(),
                                obstacle_count,
                                search: SearchConfig {
                                    population_size,
                                    mutation_probability,
                                    elite_fraction,
                                    parent_fraction,
                                },
                            };
                            println!("Configuration #{index}: {}", config.describe(varied));
                            index += 1;

                            let mut search = GeneticSearch::new(&world, &config.search, &mut rng)
                                .with_context(|| {
                                    format!("Invalid configuration: {}", config.describe(varied))
                                })?;
                            let outcome = search.run();
                            println!("{}", describe_outcome(&world, &outcome));
                            if !no_render {
                                println!();
                                print!("{}", world.render(outcome.history()));
                            }
                            println!();
                            configurations.insert(config.name(varied), search.statistics().clone());
                        }
                    }
                }
            }
        }
    }

    if let Some(path) = stats_output {
        let document = StatsDocument {
            generated_at: Utc::now(),
            seed,
            configurations,
        };
        let mut output = Output::open(path.clone())?;
        output.write_json(&document)?;
        eprintln!("Fitness statistics written to {}", output.display_path());
    }

    Ok(())
}

fn describe_outcome(world: &GridWorld, outcome: &SearchOutcome) -> String {
    if !outcome.path_found() {
        return "Path not found".to_owned();
    }
    let moves = outcome
        .moves()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    format!(
        "Found best path from {} to {}\n(Manhattan Distance: {})\n{} moves: {}",
        world.start(),
        world.destination(),
        world.manhattan_distance(),
        moves.len(),
        moves.join(" , ")
    )
}

#[cfg(test)]
mod tests {
    use gapath_search::StopReason;
    use gapath_world::Cell;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn run_config() -> RunConfig {
        RunConfig {
            world_size: 10,
            obstacle_count: 5,
            search: SearchConfig {
                population_size: 15,
                mutation_probability: 0.2,
                elite_fraction: 0.05,
                parent_fraction: 1.0,
            },
        }
    }

    #[test]
    fn test_describe_lists_varied_parameters_only() {
        let config = run_config();
        assert_eq!(
            config.describe(Varied::default()),
            "world_size=10, number_of_obstacles=5, population_size=15"
        );
        let varied = Varied {
            mutation: true,
            elite: false,
            parents: true,
        };
        assert_eq!(
            config.describe(varied),
            "world_size=10, number_of_obstacles=5, population_size=15, \
             mutation_probability=0.2, parents_percentage=1"
        );
    }

    #[test]
    fn test_configuration_names() {
        let config = run_config();
        assert_eq!(config.name(Varied::default()), "size=10_obstacles=5_pop=15");
        let varied = Varied {
            mutation: false,
            elite: true,
            parents: false,
        };
        assert_eq!(config.name(varied), "size=10_obstacles=5_pop=15_elite=0.05");
    }

    #[test]
    fn test_describe_found_path() {
        let world = GridWorld::new(3, Cell::new(0, 0), Cell::new(0, 1), []).unwrap();
        let config = SearchConfig {
            population_size: 10,
            mutation_probability: 0.4,
            elite_fraction: 0.1,
            parent_fraction: 1.0,
        };
        let mut search = GeneticSearch::new(&world, &config, Pcg32::seed_from_u64(2)).unwrap();
        let outcome = search.run();
        assert_eq!(outcome.stop_reason, StopReason::OptimalPathFound);
        assert_eq!(
            describe_outcome(&world, &outcome),
            "Found best path from (0, 0) to (0, 1)\n(Manhattan Distance: 1)\n1 moves: Right"
        );
    }

    #[test]
    fn test_describe_missing_path() {
        // the destination is walled in, so every walk crosses an obstacle or falls short
        let world = GridWorld::new(
            3,
            Cell::new(0, 0),
            Cell::new(2, 2),
            [Cell::new(1, 2), Cell::new(2, 1)],
        )
        .unwrap();
        let config = SearchConfig::for_world_size(6);
        let mut search = GeneticSearch::new(&world, &config, Pcg32::seed_from_u64(0)).unwrap();
        let outcome = search.run();
        assert!(!outcome.path_found());
        assert_eq!(describe_outcome(&world, &outcome), "Path not found");
    }
}
