use std::collections::BTreeSet;

use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{Cell, Direction, WorldError};

/// A square grid with a start, a destination and obstacle cells.
///
/// The world answers the geometry queries the path search needs: bounds,
/// obstacle lookup and the Manhattan distance between start and destination,
/// which is precomputed on construction.
///
/// Serialized as `{"size", "start", "destination", "obstacles"}`; deserialization
/// runs the same validation as [`GridWorld::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorldData", into = "WorldData")]
pub struct GridWorld {
    size: usize,
    start: Cell,
    destination: Cell,
    obstacles: BTreeSet<Cell>,
    manhattan_distance: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorldData {
    size: usize,
    start: Cell,
    destination: Cell,
    #[serde(default)]
    obstacles: Vec<Cell>,
}

impl TryFrom<WorldData> for GridWorld {
    type Error = WorldError;

    fn try_from(data: WorldData) -> Result<Self, Self::Error> {
        GridWorld::new(data.size, data.start, data.destination, data.obstacles)
    }
}

impl From<GridWorld> for WorldData {
    fn from(world: GridWorld) -> Self {
        WorldData {
            size: world.size,
            start: world.start,
            destination: world.destination,
            obstacles: world.obstacles.into_iter().collect(),
        }
    }
}

impl GridWorld {
    /// Creates a world from explicit cells.
    ///
    /// Fails if the grid is smaller than 2x2, if any cell lies outside of the
    /// grid, if start and destination coincide, or if either of them is an
    /// obstacle. Duplicate obstacles are merged.
    pub fn new<I>(
        size: usize,
        start: Cell,
        destination: Cell,
        obstacles: I,
    ) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = Cell>,
    {
        if size < 2 {
            return Err(WorldError::TooSmall { size });
        }
        let obstacles = obstacles.into_iter().collect::<BTreeSet<_>>();
        for &cell in [start, destination].iter().chain(&obstacles) {
            if !contains(size, cell) {
                return Err(WorldError::OutOfBounds { cell, size });
            }
        }
        if start == destination {
            return Err(WorldError::StartIsDestination { cell: start });
        }
        for cell in [start, destination] {
            if obstacles.contains(&cell) {
                return Err(WorldError::BlockedEndpoint { cell });
            }
        }
        Ok(Self {
            size,
            start,
            destination,
            obstacles,
            manhattan_distance: start.manhattan_distance(destination),
        })
    }

    /// Creates a world with `obstacle_count` obstacles at random cells and a
    /// random start and destination among the remaining free cells.
    pub fn random<R>(size: usize, obstacle_count: usize, rng: &mut R) -> Result<Self, WorldError>
    where
        R: Rng + ?Sized,
    {
        if size < 2 {
            return Err(WorldError::TooSmall { size });
        }
        let cells = all_cells(size).collect::<Vec<_>>();
        // start and destination need two free cells
        let available = cells.len() - 2;
        if obstacle_count > available {
            return Err(WorldError::NotEnoughFreeCells {
                requested: obstacle_count,
                available,
            });
        }

        let obstacles = cells
            .choose_multiple(rng, obstacle_count)
            .copied()
            .collect::<BTreeSet<_>>();
        let free = cells
            .iter()
            .copied()
            .filter(|cell| !obstacles.contains(cell))
            .collect::<Vec<_>>();
        let mut endpoints = free.choose_multiple(rng, 2).copied();
        let start = endpoints.next().expect("at least two free cells");
        let destination = endpoints.next().expect("at least two free cells");

        Self::new(size, start, destination, obstacles)
    }

    /// Grows the obstacle set to `total` obstacles.
    ///
    /// New obstacles are sampled among free cells that are neither the start
    /// nor the destination. Existing obstacles stay where they are, so a sweep
    /// over increasing obstacle counts keeps the earlier layout as a subset.
    pub fn add_random_obstacles<R>(&mut self, total: usize, rng: &mut R) -> Result<(), WorldError>
    where
        R: Rng + ?Sized,
    {
        let current = self.obstacles.len();
        if total < current {
            return Err(WorldError::ObstacleCountDecrease {
                current,
                requested: total,
            });
        }
        let free = all_cells(self.size)
            .filter(|cell| {
                *cell != self.start && *cell != self.destination && !self.obstacles.contains(cell)
            })
            .collect::<Vec<_>>();
        let new = total - current;
        if new > free.len() {
            return Err(WorldError::NotEnoughFreeCells {
                requested: total,
                available: current + free.len(),
            });
        }
        self.obstacles
            .extend(free.choose_multiple(rng, new).copied());
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn destination(&self) -> Cell {
        self.destination
    }

    /// Returns the Manhattan distance between start and destination.
    ///
    /// This is the length of the shortest possible path when no obstacle is in
    /// the way.
    #[must_use]
    pub fn manhattan_distance(&self) -> usize {
        self.manhattan_distance
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        contains(self.size, cell)
    }

    #[must_use]
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles.iter().copied()
    }

    /// Moves one cell from `cell` in `direction`.
    ///
    /// Returns `None` if the move leaves the grid.
    #[must_use]
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let next = Cell::new(
            cell.row.checked_add_signed(dr)?,
            cell.col.checked_add_signed(dc)?,
        );
        self.contains(next).then_some(next)
    }
}

fn contains(size: usize, cell: Cell) -> bool {
    cell.row < size && cell.col < size
}

fn all_cells(size: usize) -> impl Iterator<Item = Cell> {
    (0..size).flat_map(move |row| (0..size).map(move |col| Cell::new(row, col)))
}
