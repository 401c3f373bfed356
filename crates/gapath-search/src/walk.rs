//! Walk simulation and fitness evaluation.
//!
//! A path is evaluated in two phases:
//!
//! 1. [`repair`] rewrites every move that would leave the grid into one that
//!    stays inside. It consumes randomness and returns a corrected copy.
//! 2. [`evaluate`] walks the repaired path from the start cell and computes the
//!    fitness. It is a pure function of the path and the world.
//!
//! # Fitness
//!
//! Lower is better:
//!
//! ```text
//! fitness = path_length
//!         + revisit_count  * REVISIT_PENALTY
//!         + obstacle_count * OBSTACLE_PENALTY
//!         + opposite_pairs * OPPOSITE_DIRECTION_PENALTY
//!         + (destination not reached ? manhattan(final_cell, destination) : 0)
//! ```
//!
//! `opposite_pairs` is `min(#Up, #Down) + min(#Left, #Right)` over the moves that
//! were actually consumed, which penalizes back-and-forth redundancy.

use std::collections::HashSet;

use gapath_world::{Cell, Direction, GridWorld};
use log::trace;
use rand::{Rng, seq::IteratorRandom as _};

pub const REVISIT_PENALTY: usize = 1;
pub const OBSTACLE_PENALTY: usize = 10;
pub const OPPOSITE_DIRECTION_PENALTY: usize = 1;

/// Move that would leave the grid.
///
/// Only produced when evaluating a path that did not go through [`repair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("move #{index} ({direction}) leaves the grid at {from}")]
pub struct WalkError {
    pub index: usize,
    pub direction: Direction,
    pub from: Cell,
}

/// Result of walking a path through a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Fitness score (lower is better).
    pub fitness: usize,
    /// Number of moves consumed before reaching the destination or running out of moves.
    pub path_length: usize,
    pub dest_reached: bool,
    /// Number of steps that landed on an obstacle.
    pub obstacle_count: usize,
    /// Number of steps that landed on an already visited cell.
    pub revisit_count: usize,
    pub opposite_pairs: usize,
    /// Cell the walk ended on.
    pub final_cell: Cell,
    /// Visited cells, starting with the start cell.
    pub history: Vec<Cell>,
}

impl Evaluation {
    #[must_use]
    pub fn traversed_obstacle(&self) -> bool {
        self.obstacle_count > 0
    }
}

/// Returns a copy of `path` in which no move leaves the grid.
///
/// The walk is simulated from the start cell. When a move would exit the grid
/// the walker stays on the pre-step cell and the move is replaced by one drawn
/// uniformly from the directions not yet tried at that index. Every cell of a
/// grid of size 2 or more has at least two in-bound neighbours, so each index
/// needs at most three replacements.
///
/// Moves after the destination is reached are not consumed by the walk and are
/// left untouched; they are repaired again if a later change to the path makes
/// them reachable.
pub fn repair<R>(path: &[Direction], world: &GridWorld, rng: &mut R) -> Vec<Direction>
where
    R: Rng + ?Sized,
{
    let mut repaired = path.to_vec();
    let mut current = world.start();
    for (index, direction) in repaired.iter_mut().enumerate() {
        let mut tried = [false; Direction::LEN];
        current = loop {
            if let Some(next) = world.step(current, *direction) {
                break next;
            }
            tried[direction.index()] = true;
            let replacement = Direction::ALL
                .into_iter()
                .filter(|d| !tried[d.index()])
                .choose(rng)
                .expect("a grid of size 2 or more leaves a move inside the grid");
            trace!("move #{index} {direction} leaves the grid at {current}, replaced by {replacement}");
            *direction = replacement;
        };
        if current == world.destination() {
            break;
        }
    }
    repaired
}

/// Walks `path` from the start cell and computes its fitness.
///
/// Obstacles do not block movement, they only add [`OBSTACLE_PENALTY`]. The walk
/// stops as soon as the destination is reached.
pub fn evaluate(path: &[Direction], world: &GridWorld) -> Result<Evaluation, WalkError> {
    let mut current = world.start();
    let mut history = vec![current];
    let mut visited = HashSet::from([current]);
    let mut revisit_count = 0;
    let mut obstacle_count = 0;
    let mut dest_reached = false;

    for (index, &direction) in path.iter().enumerate() {
        current = world.step(current, direction).ok_or(WalkError {
            index,
            direction,
            from: current,
        })?;
        if !visited.insert(current) {
            revisit_count += 1;
        }
        history.push(current);
        if current == world.destination() {
            dest_reached = true;
            break;
        }
        if world.is_obstacle(current) {
            obstacle_count += 1;
        }
    }

    let path_length = history.len() - 1;
    let opposite_pairs = count_opposite_pairs(&path[..path_length]);
    let mut fitness = path_length
        + revisit_count * REVISIT_PENALTY
        + obstacle_count * OBSTACLE_PENALTY
        + opposite_pairs * OPPOSITE_DIRECTION_PENALTY;
    if !dest_reached {
        fitness += current.manhattan_distance(world.destination());
    }

    Ok(Evaluation {
        fitness,
        path_length,
        dest_reached,
        obstacle_count,
        revisit_count,
        opposite_pairs,
        final_cell: current,
        history,
    })
}

/// Returns `min(#Up, #Down) + min(#Left, #Right)`.
#[must_use]
pub fn count_opposite_pairs(moves: &[Direction]) -> usize {
    let mut counts = [0_usize; Direction::LEN];
    for dir in moves {
        counts[dir.index()] += 1;
    }
    let count = |dir: Direction| counts[dir.index()];
    usize::min(count(Direction::Up), count(Direction::Down))
        + usize::min(count(Direction::Left), count(Direction::Right))
}
