use std::fmt;

use gapath_world::{Cell, Direction, GridWorld};
use rand::Rng;

use crate::walk::{self, Evaluation};

/// A candidate path: a fixed-length sequence of moves and its evaluation.
///
/// The evaluation is always in sync with the path. Every operation that changes
/// the path (construction, [`Chromosome::mutate`]) repairs moves that would leave
/// the grid and re-evaluates before returning, so a stale fitness is never
/// observable.
#[derive(Debug, Clone)]
pub struct Chromosome {
    path: Vec<Direction>,
    evaluation: Evaluation,
}

impl Chromosome {
    /// Creates a chromosome with `len` uniformly random moves.
    pub fn random<R>(world: &GridWorld, len: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let path = (0..len).map(|_| rng.random()).collect::<Vec<Direction>>();
        Self::from_path(world, &path, rng)
    }

    /// Creates a chromosome from explicit moves.
    ///
    /// Moves that would leave the grid are replaced (see [`walk::repair`]), so
    /// [`Self::path`] may differ from `path`.
    pub fn from_path<R>(world: &GridWorld, path: &[Direction], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let path = walk::repair(path, world, rng);
        let evaluation = evaluate_repaired(&path, world);
        Self { path, evaluation }
    }

    /// Builds two children with uniform crossover.
    ///
    /// See [`uniform_crossover`] for how moves are inherited.
    pub fn crossover<R>(
        parent1: &Self,
        parent2: &Self,
        world: &GridWorld,
        rng: &mut R,
    ) -> (Self, Self)
    where
        R: Rng + ?Sized,
    {
        let (path1, path2) = uniform_crossover(&parent1.path, &parent2.path, rng);
        (
            Self::from_path(world, &path1, rng),
            Self::from_path(world, &path2, rng),
        )
    }

    /// Replaces the move at a uniformly chosen index with a fresh random move.
    ///
    /// The new move may coincide with the old one. The chromosome is re-evaluated
    /// before returning.
    pub fn mutate<R>(&mut self, world: &GridWorld, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.path.is_empty() {
            return;
        }
        let index = rng.random_range(0..self.path.len());
        self.path[index] = rng.random();
        self.path = walk::repair(&self.path, world, rng);
        self.evaluation = evaluate_repaired(&self.path, world);
    }

    /// Returns every move, including the ones after the walk ended.
    #[must_use]
    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the moves actually consumed by the walk.
    #[must_use]
    pub fn moves(&self) -> &[Direction] {
        &self.path[..self.evaluation.path_length]
    }

    #[must_use]
    pub fn fitness(&self) -> usize {
        self.evaluation.fitness
    }

    #[must_use]
    pub fn path_length(&self) -> usize {
        self.evaluation.path_length
    }

    #[must_use]
    pub fn dest_reached(&self) -> bool {
        self.evaluation.dest_reached
    }

    #[must_use]
    pub fn traversed_obstacle(&self) -> bool {
        self.evaluation.traversed_obstacle()
    }

    /// Returns `true` if the walk reaches the destination without crossing an obstacle.
    #[must_use]
    pub fn is_valid_path(&self) -> bool {
        self.dest_reached() && !self.traversed_obstacle()
    }

    /// Visited cells, starting with the start cell.
    #[must_use]
    pub fn history(&self) -> &[Cell] {
        &self.evaluation.history
    }

    #[must_use]
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fitness {}, {} moves:", self.fitness(), self.path_length())?;
        for (i, dir) in self.moves().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{dir}")?;
        }
        let verdict = match (self.dest_reached(), self.traversed_obstacle()) {
            (true, false) => "path found",
            (true, true) => "destination reached through obstacles",
            (false, _) => "destination not reached",
        };
        write!(f, " ({verdict})")
    }
}

/// Uniform crossover of two move sequences.
///
/// For each index a fair coin decides whether the children inherit the parents'
/// moves as-is or swapped, so `{child1[i], child2[i]} == {parent1[i], parent2[i]}`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn uniform_crossover<R>(
    parent1: &[Direction],
    parent2: &[Direction],
    rng: &mut R,
) -> (Vec<Direction>, Vec<Direction>)
where
    R: Rng + ?Sized,
{
    assert_eq!(parent1.len(), parent2.len());
    parent1
        .iter()
        .zip(parent2)
        .map(|(&d1, &d2)| if rng.random_bool(0.5) { (d1, d2) } else { (d2, d1) })
        .unzip()
}

fn evaluate_repaired(path: &[Direction], world: &GridWorld) -> Evaluation {
    walk::evaluate(path, world).expect("repaired path stays inside the grid")
}
