use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// A single unit move on the grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, Serialize, Deserialize,
)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Number of directions (4).
    pub const LEN: usize = 4;

    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(row, col)` offset of this move.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (1, 0),
            Self::Down => (-1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::LEN)]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        for dir in Direction::ALL {
            let (r1, c1) = dir.delta();
            let (r2, c2) = dir.opposite().delta();
            assert_eq!((r1 + r2, c1 + c2), (0, 0));
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_sampling_covers_every_direction() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; Direction::LEN];
        for _ in 0..200 {
            let dir: Direction = rng.random();
            seen[dir.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
