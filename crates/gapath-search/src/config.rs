use serde::{Deserialize, Serialize};

/// Invalid search configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 2, got {population_size}")]
    PopulationTooSmall { population_size: usize },
    #[display("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[display(
        "elite count {elite_count} leaves no chromosome to mutate in a population of {population_size}"
    )]
    EliteTooLarge {
        elite_count: usize,
        population_size: usize,
    },
    #[display("parent pool must hold at least 2 chromosomes, got {parent_count}")]
    TooFewParents { parent_count: usize },
}

/// User-facing parameters of a genetic search.
///
/// Elite and parent sizes are given as fractions of the population and turned
/// into counts by [`SearchConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of chromosomes kept in every generation
    pub population_size: usize,
    /// Probability of mutating each non-elite chromosome per generation
    pub mutation_probability: f64,
    /// Share of the population protected from mutation
    pub elite_fraction: f64,
    /// Share of the population drawn as parents per generation
    pub parent_fraction: f64,
}

impl SearchConfig {
    pub const DEFAULT_MUTATION_PROBABILITY: f64 = 0.4;
    pub const DEFAULT_ELITE_FRACTION: f64 = 0.05;
    pub const DEFAULT_PARENT_FRACTION: f64 = 1.0;
    /// Default population size relative to the grid size.
    pub const POPULATION_FACTOR: f64 = 1.5;

    /// Returns the default configuration for a grid of `size × size` cells.
    ///
    /// ```
    /// # use gapath_search::SearchConfig;
    /// let config = SearchConfig::for_world_size(50);
    /// assert_eq!(config.population_size, 75);
    /// assert_eq!(config.mutation_probability, 0.4);
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn for_world_size(size: usize) -> Self {
        Self {
            population_size: (size as f64 * Self::POPULATION_FACTOR) as usize,
            mutation_probability: Self::DEFAULT_MUTATION_PROBABILITY,
            elite_fraction: Self::DEFAULT_ELITE_FRACTION,
            parent_fraction: Self::DEFAULT_PARENT_FRACTION,
        }
    }

    /// Checks the configuration and derives the elite and parent counts.
    ///
    /// Counts are `floor(population_size × fraction)`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn validate(&self) -> Result<SearchParams, ConfigError> {
        let Self {
            population_size,
            mutation_probability,
            elite_fraction,
            parent_fraction,
        } = *self;
        if population_size < 2 {
            return Err(ConfigError::PopulationTooSmall { population_size });
        }
        for (name, value) in [
            ("mutation probability", mutation_probability),
            ("elite fraction", elite_fraction),
            ("parent fraction", parent_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        let elite_count = (population_size as f64 * elite_fraction).floor() as usize;
        if elite_count >= population_size {
            return Err(ConfigError::EliteTooLarge {
                elite_count,
                population_size,
            });
        }
        let parent_count = (population_size as f64 * parent_fraction).floor() as usize;
        if parent_count < 2 {
            return Err(ConfigError::TooFewParents { parent_count });
        }

        Ok(SearchParams {
            population_size,
            mutation_probability,
            elite_count,
            parent_count,
        })
    }
}

/// Validated search parameters with absolute counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub population_size: usize,
    pub mutation_probability: f64,
    /// Number of top-ranked chromosomes exempt from mutation (always below `population_size`)
    pub elite_count: usize,
    /// Number of parents drawn per generation (at least 2)
    pub parent_count: usize,
}
