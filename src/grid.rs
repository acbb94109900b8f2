//! Grid values exchanged on the wire and checked for wins.

use serde::{Deserialize, Serialize};

/// An N×N matrix of cells; `None` is a blank.
///
/// Transparent so a grid serializes as a bare JSON array of arrays — a
/// puzzle broadcast is the grid itself, with no envelope around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(Vec<Vec<Option<u8>>>);

impl Grid {
    pub fn new(rows: Vec<Vec<Option<u8>>>) -> Self {
        Self(rows)
    }

    /// An all-blank square grid of the given side length.
    pub fn empty(size: usize) -> Self {
        Self(vec![vec![None; size]; size])
    }

    /// Side length (number of rows).
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn rows(&self) -> &[Vec<Option<u8>>] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.0[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Option<u8>) {
        self.0[row][col] = value;
    }

    /// True when every cell holds a value.
    pub fn is_fully_filled(&self) -> bool {
        self.0.iter().all(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// True when the grid is a complete, rule-satisfying solution: square,
    /// fully filled, and every row and column holds each of 1..=N exactly
    /// once. Boxes are checked too when N is a perfect square.
    pub fn is_valid_solution(&self) -> bool {
        let n = self.0.len();
        if n == 0 || n > u8::MAX as usize || self.0.iter().any(|row| row.len() != n) {
            return false;
        }

        let group_ok = |cells: &mut dyn Iterator<Item = Option<u8>>| {
            let mut seen = vec![false; n];
            for cell in cells {
                match cell {
                    Some(v) if (1..=n as u8).contains(&v) && !seen[v as usize - 1] => {
                        seen[v as usize - 1] = true;
                    }
                    _ => return false,
                }
            }
            true
        };

        for i in 0..n {
            if !group_ok(&mut self.0[i].iter().copied()) {
                return false;
            }
            if !group_ok(&mut (0..n).map(|r| self.0[r][i])) {
                return false;
            }
        }

        let box_dim = (n as f64).sqrt() as usize;
        if box_dim * box_dim == n {
            for band in 0..box_dim {
                for stack in 0..box_dim {
                    let mut cells = (0..n)
                        .map(|k| self.0[band * box_dim + k / box_dim][stack * box_dim + k % box_dim]);
                    if !group_ok(&mut cells) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_4x4() -> Grid {
        Grid::new(vec![
            vec![Some(1), Some(2), Some(3), Some(4)],
            vec![Some(3), Some(4), Some(1), Some(2)],
            vec![Some(2), Some(1), Some(4), Some(3)],
            vec![Some(4), Some(3), Some(2), Some(1)],
        ])
    }

    #[test]
    fn valid_solution_passes() {
        assert!(solved_4x4().is_valid_solution());
    }

    #[test]
    fn blank_cell_fails_validity() {
        let mut grid = solved_4x4();
        grid.set(0, 0, None);
        assert!(!grid.is_valid_solution());
        assert!(!grid.is_fully_filled());
    }

    #[test]
    fn duplicate_in_row_fails_validity() {
        let mut grid = solved_4x4();
        grid.set(0, 1, Some(1));
        assert!(!grid.is_valid_solution());
    }

    #[test]
    fn duplicate_in_box_fails_validity() {
        // Cyclic Latin square: rows and columns check out, boxes do not.
        let grid = Grid::new(vec![
            vec![Some(1), Some(2), Some(3), Some(4)],
            vec![Some(2), Some(3), Some(4), Some(1)],
            vec![Some(3), Some(4), Some(1), Some(2)],
            vec![Some(4), Some(1), Some(2), Some(3)],
        ]);
        assert!(!grid.is_valid_solution());
    }

    #[test]
    fn ragged_grid_fails_validity() {
        let grid = Grid::new(vec![vec![Some(1), Some(2)], vec![Some(2)]]);
        assert!(!grid.is_valid_solution());
    }

    #[test]
    fn serializes_as_bare_array() {
        let grid = Grid::new(vec![vec![Some(1), None], vec![None, Some(2)]]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[1,null],[null,2]]");

        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn structural_equality_is_exact() {
        let a = solved_4x4();
        let mut b = solved_4x4();
        assert_eq!(a, b);
        b.set(3, 3, Some(2));
        assert_ne!(a, b);
    }
}
