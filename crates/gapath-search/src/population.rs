use gapath_world::GridWorld;
use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
};

use crate::{chromosome::Chromosome, stats::GenerationStats};

/// Chromosomes ranked by fitness, best (lowest) first.
///
/// The ordering is restored after every structural change, so index 0 is always
/// the best chromosome and the first `elite_count` entries are the elite.
#[derive(Debug, Clone)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
}

impl Population {
    /// Creates `size` random chromosomes of `len` moves each.
    #[must_use]
    pub fn random<R>(world: &GridWorld, size: usize, len: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let chromosomes = (0..size)
            .map(|_| Chromosome::random(world, len, rng))
            .collect();
        Self::from_chromosomes(chromosomes)
    }

    /// Creates a population from existing chromosomes and ranks them.
    #[must_use]
    pub fn from_chromosomes(mut chromosomes: Vec<Chromosome>) -> Self {
        let len = chromosomes.len();
        select_top_n(&mut chromosomes, len);
        Self { chromosomes }
    }

    #[must_use]
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    #[must_use]
    pub fn best(&self) -> Option<&Chromosome> {
        self.chromosomes.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Returns `true` if every chromosome has the same fitness.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        match (self.chromosomes.first(), self.chromosomes.last()) {
            (Some(first), Some(last)) => first.fitness() == last.fitness(),
            _ => false,
        }
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<GenerationStats> {
        GenerationStats::new(self.chromosomes.iter().map(Chromosome::fitness))
    }

    /// Draws `count` parents with replacement by fitness-proportionate selection.
    ///
    /// See [`roulette_weights`] for the weighting.
    pub fn roulette_select<R>(
        &self,
        count: usize,
        manhattan_distance: usize,
        rng: &mut R,
    ) -> Vec<Chromosome>
    where
        R: Rng + ?Sized,
    {
        if self.chromosomes.is_empty() {
            return vec![];
        }
        let fitness = self
            .chromosomes
            .iter()
            .map(Chromosome::fitness)
            .collect::<Vec<_>>();
        let weights = roulette_weights(&fitness, manhattan_distance);
        match WeightedIndex::new(&weights) {
            Ok(dist) => (0..count)
                .map(|_| self.chromosomes[dist.sample(rng)].clone())
                .collect(),
            // all weights are zero: every chromosome is equally likely
            Err(_) => (0..count)
                .map(|_| self.chromosomes[rng.random_range(0..self.chromosomes.len())].clone())
                .collect(),
        }
    }

    /// Adds `offspring` and keeps the best `size` chromosomes.
    pub(crate) fn merge(&mut self, offspring: Vec<Chromosome>, size: usize) {
        self.chromosomes.extend(offspring);
        select_top_n(&mut self.chromosomes, size);
    }

    /// Mutates each chromosome after the first `elite_count` with probability
    /// `probability`, then restores the ranking.
    pub(crate) fn mutate_non_elite<R>(
        &mut self,
        elite_count: usize,
        probability: f64,
        world: &GridWorld,
        rng: &mut R,
    ) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut mutated = 0;
        for chromosome in self.chromosomes.iter_mut().skip(elite_count) {
            if rng.random_bool(probability) {
                chromosome.mutate(world, rng);
                mutated += 1;
            }
        }
        let len = self.chromosomes.len();
        select_top_n(&mut self.chromosomes, len);
        mutated
    }
}

/// Sorts by ascending fitness and keeps the first `n` chromosomes.
///
/// The sort is stable: chromosomes with equal fitness keep their relative order,
/// so existing members rank ahead of newcomers with the same fitness.
pub fn select_top_n(chromosomes: &mut Vec<Chromosome>, n: usize) {
    chromosomes.sort_by_key(Chromosome::fitness);
    chromosomes.truncate(n);
}

/// Turns minimization fitness values into roulette selection weights.
///
/// The weight of a chromosome is `manhattan_distance / fitness`, so halving the
/// fitness doubles the chance of being picked. A fitness of 0 can only occur for
/// an empty walk that is already on the destination; if any such chromosome
/// exists it gets the maximal weight and all others get none.
///
/// When every fitness is equal all weights are equal and selection is uniform.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn roulette_weights(fitness: &[usize], manhattan_distance: usize) -> Vec<f64> {
    if fitness.contains(&0) {
        return fitness
            .iter()
            .map(|&f| if f == 0 { 1.0 } else { 0.0 })
            .collect();
    }
    fitness
        .iter()
        .map(|&f| manhattan_distance as f64 / f as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use gapath_world::Cell;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use gapath_world::Direction::{Right as R, Up as U};

    fn open_world() -> GridWorld {
        GridWorld::new(5, Cell::new(0, 0), Cell::new(0, 4), []).unwrap()
    }

    #[test]
    fn test_random_population_is_sorted() {
        let world = open_world();
        let mut rng = Pcg32::seed_from_u64(0);
        let population = Population::random(&world, 20, 10, &mut rng);
        assert_eq!(population.len(), 20);
        assert!(
            population
                .chromosomes()
                .is_sorted_by_key(Chromosome::fitness)
        );
        let stats = population.fitness_stats().unwrap();
        assert_eq!(stats.min, population.best().unwrap().fitness());
    }

    #[test]
    fn test_select_top_n_is_stable() {
        let world = open_world();
        let mut rng = Pcg32::seed_from_u64(1);
        // a, b and d reach the destination in four moves, c does not
        let a = Chromosome::from_path(&world, &[R, R, R, R, U], &mut rng);
        let b = Chromosome::from_path(&world, &[R, R, R, R, R], &mut rng);
        let c = Chromosome::from_path(&world, &[U, U, U, U, U], &mut rng);
        let d = Chromosome::from_path(&world, &[R, R, R, R, U, U], &mut rng);
        let mut chromosomes = vec![c, a, b, d];
        select_top_n(&mut chromosomes, 3);
        assert_eq!(chromosomes.len(), 3);
        assert_eq!(chromosomes[0].path(), &[R, R, R, R, U]);
        assert_eq!(chromosomes[1].path(), &[R, R, R, R, R]);
        assert_eq!(chromosomes[2].path(), &[R, R, R, R, U, U]);
    }

    #[test]
    fn test_homogeneous_population() {
        let world = open_world();
        let mut rng = Pcg32::seed_from_u64(2);
        let same = (0..4)
            .map(|_| Chromosome::from_path(&world, &[R, R, R, R], &mut rng))
            .collect();
        assert!(Population::from_chromosomes(same).is_homogeneous());

        let mixed = vec![
            Chromosome::from_path(&world, &[R, R, R, R], &mut rng),
            Chromosome::from_path(&world, &[U, R, R, R], &mut rng),
        ];
        assert!(!Population::from_chromosomes(mixed).is_homogeneous());
        assert!(!Population::from_chromosomes(vec![]).is_homogeneous());
    }

    #[test]
    fn test_roulette_weights() {
        assert_eq!(roulette_weights(&[4, 8, 2], 4), vec![1.0, 0.5, 2.0]);
        assert_eq!(roulette_weights(&[3, 0, 5, 0], 0), vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(roulette_weights(&[6, 6], 3), vec![0.5, 0.5]);
    }

    #[test]
    fn test_roulette_favors_lower_fitness() {
        let world = open_world();
        let mut rng = Pcg32::seed_from_u64(3);
        let good = Chromosome::from_path(&world, &[R, R, R, R], &mut rng);
        // (1,0): fitness 1 + 5
        let bad = Chromosome::from_path(&world, &[U], &mut rng);
        let population = Population::from_chromosomes(vec![bad, good]);
        let parents = population.roulette_select(3000, world.manhattan_distance(), &mut rng);
        assert_eq!(parents.len(), 3000);
        let good_count = parents.iter().filter(|c| c.fitness() == 4).count();
        // expected share is 6/10
        assert!((1600..2000).contains(&good_count), "{good_count}");
    }

    #[test]
    fn test_mutate_non_elite_spares_elite() {
        let world = open_world();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut population = Population::random(&world, 10, 10, &mut rng);
        let elite = population.chromosomes()[..3]
            .iter()
            .map(|c| c.path().to_vec())
            .collect::<Vec<_>>();
        let mutated = population.mutate_non_elite(3, 1.0, &world, &mut rng);
        assert_eq!(mutated, 7);
        assert_eq!(population.len(), 10);
        assert!(
            population
                .chromosomes()
                .is_sorted_by_key(Chromosome::fitness)
        );
        for path in &elite {
            assert!(population.chromosomes().iter().any(|c| c.path() == path.as_slice()));
        }
    }
}
