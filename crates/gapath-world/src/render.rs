use std::collections::HashSet;

use crate::{Cell, GridWorld};

impl GridWorld {
    /// Draws the grid as text with `path` overlaid.
    ///
    /// | char | cell                     |
    /// |------|--------------------------|
    /// | `S`  | start                    |
    /// | `D`  | destination              |
    /// | `#`  | obstacle                 |
    /// | `X`  | obstacle crossed by path |
    /// | `*`  | path                     |
    /// | `.`  | free                     |
    ///
    /// The highest row is printed first so that [`Direction::Up`](crate::Direction::Up)
    /// points up on screen.
    #[must_use]
    pub fn render(&self, path: &[Cell]) -> String {
        let on_path = path.iter().copied().collect::<HashSet<_>>();
        let mut out = String::with_capacity((self.size() + 1) * self.size());
        for row in (0..self.size()).rev() {
            for col in 0..self.size() {
                let cell = Cell::new(row, col);
                let ch = if cell == self.start() {
                    'S'
                } else if cell == self.destination() {
                    'D'
                } else if self.is_obstacle(cell) {
                    if on_path.contains(&cell) { 'X' } else { '#' }
                } else if on_path.contains(&cell) {
                    '*'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_every_kind_of_cell() {
        let world = GridWorld::new(
            3,
            Cell::new(0, 0),
            Cell::new(2, 2),
            [Cell::new(1, 1), Cell::new(0, 2)],
        )
        .unwrap();
        let path = [
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(2, 1),
            Cell::new(2, 2),
        ];
        assert_eq!(world.render(&path), ".*D\n*X.\nS.#\n");
    }

    #[test]
    fn test_render_without_path() {
        let world = GridWorld::new(2, Cell::new(0, 0), Cell::new(1, 1), []).unwrap();
        assert_eq!(world.render(&[]), ".D\nS.\n");
    }
}
