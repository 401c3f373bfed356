//! Grid world model for the genetic path search.
//!
//! The world is a square grid with a start cell, a destination cell and a set of
//! obstacle cells. It is immutable while a search runs; obstacles can only be
//! added between runs with [`GridWorld::add_random_obstacles`].
//!
//! - [`Direction`] - One of the four unit moves
//! - [`Cell`] - A `(row, col)` coordinate on the grid
//! - [`GridWorld`] - Bounds, obstacles, start and destination
//!
//! # Coordinate System
//!
//! Rows grow upwards and columns grow to the right: [`Direction::Up`] adds one to
//! the row, [`Direction::Right`] adds one to the column. `(0, 0)` is the
//! bottom-left corner.
//!
//! # Example
//!
//! ```
//! use gapath_world::{Cell, Direction, GridWorld};
//!
//! let world = GridWorld::new(3, Cell::new(0, 0), Cell::new(2, 2), [Cell::new(1, 1)]).unwrap();
//! assert_eq!(world.manhattan_distance(), 4);
//! assert!(world.is_obstacle(Cell::new(1, 1)));
//! assert_eq!(world.step(Cell::new(0, 0), Direction::Down), None);
//! assert_eq!(world.step(Cell::new(0, 0), Direction::Up), Some(Cell::new(1, 0)));
//! ```

pub use self::{cell::*, direction::*, world::*};

mod cell;
mod direction;
mod render;
mod world;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WorldError {
    #[display("grid size must be at least 2, got {size}")]
    TooSmall { size: usize },
    #[display("cell {cell} is outside of the {size}x{size} grid")]
    OutOfBounds { cell: Cell, size: usize },
    #[display("start and destination must differ, both are {cell}")]
    StartIsDestination { cell: Cell },
    #[display("{cell} is both an obstacle and the start or destination")]
    BlockedEndpoint { cell: Cell },
    #[display("cannot place {requested} obstacles, only {available} free cells available")]
    NotEnoughFreeCells { requested: usize, available: usize },
    #[display("world already has {current} obstacles, cannot shrink to {requested}")]
    ObstacleCountDecrease { current: usize, requested: usize },
}
