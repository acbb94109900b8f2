//! Puzzle generation and solving.
//!
//! The coordinator only talks to the [`PuzzleEngine`] trait; swapping the
//! engine (or stubbing it in tests) never touches session logic. The default
//! implementation is a classic 9×9 backtracking generator.

use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while producing or solving a puzzle
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("puzzle generation failed: {0}")]
    Generation(String),

    #[error("grid has no solution")]
    Unsolvable,

    #[error("grid shape or values unsupported by this engine")]
    UnsupportedGrid,

    #[error("puzzle engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("puzzle engine task failed: {0}")]
    Task(String),
}

/// Source of puzzles and their canonical solutions.
pub trait PuzzleEngine: Send + Sync {
    /// Produce a partially filled grid with exactly one solution.
    fn generate(&self) -> EngineResult<Grid>;

    /// Return the canonical fully solved grid for `puzzle`.
    fn solve(&self, puzzle: &Grid) -> EngineResult<Grid>;
}

const SIZE: usize = 9;
const BOX: usize = 3;

type Board = [[u8; SIZE]; SIZE];

/// 9×9 backtracking engine: solve an empty board with randomized digit order
/// to get a full solution, then dig cells out while the puzzle keeps a
/// unique solution.
#[derive(Debug, Default)]
pub struct BacktrackingEngine;

impl PuzzleEngine for BacktrackingEngine {
    fn generate(&self) -> EngineResult<Grid> {
        let mut rng = rand::rng();
        let mut board: Board = [[0; SIZE]; SIZE];
        if !fill_randomized(&mut board, &mut rng) {
            return Err(EngineError::Generation(
                "backtracking could not produce a full board".into(),
            ));
        }

        let mut positions: Vec<(usize, usize)> = (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .collect();
        positions.shuffle(&mut rng);

        for (row, col) in positions {
            let dug = board[row][col];
            board[row][col] = 0;
            let mut scratch = board;
            if count_solutions(&mut scratch, 2) != 1 {
                board[row][col] = dug;
            }
        }

        Ok(to_grid(&board))
    }

    fn solve(&self, puzzle: &Grid) -> EngineResult<Grid> {
        let mut board = from_grid(puzzle)?;
        if !givens_consistent(&board) {
            return Err(EngineError::Unsolvable);
        }
        if solve_first(&mut board) {
            Ok(to_grid(&board))
        } else {
            Err(EngineError::Unsolvable)
        }
    }
}

fn first_empty(board: &Board) -> Option<(usize, usize)> {
    for row in 0..SIZE {
        for col in 0..SIZE {
            if board[row][col] == 0 {
                return Some((row, col));
            }
        }
    }
    None
}

fn placement_ok(board: &Board, row: usize, col: usize, value: u8) -> bool {
    for i in 0..SIZE {
        if board[row][i] == value || board[i][col] == value {
            return false;
        }
    }
    let (band, stack) = (row - row % BOX, col - col % BOX);
    for r in band..band + BOX {
        for c in stack..stack + BOX {
            if board[r][c] == value {
                return false;
            }
        }
    }
    true
}

fn fill_randomized(board: &mut Board, rng: &mut impl Rng) -> bool {
    let Some((row, col)) = first_empty(board) else {
        return true;
    };
    let mut digits: Vec<u8> = (1..=SIZE as u8).collect();
    digits.shuffle(rng);
    for value in digits {
        if placement_ok(board, row, col, value) {
            board[row][col] = value;
            if fill_randomized(board, rng) {
                return true;
            }
            board[row][col] = 0;
        }
    }
    false
}

fn solve_first(board: &mut Board) -> bool {
    let Some((row, col)) = first_empty(board) else {
        return true;
    };
    for value in 1..=SIZE as u8 {
        if placement_ok(board, row, col, value) {
            board[row][col] = value;
            if solve_first(board) {
                return true;
            }
            board[row][col] = 0;
        }
    }
    false
}

/// Count solutions, stopping once `cap` have been found.
fn count_solutions(board: &mut Board, cap: usize) -> usize {
    let Some((row, col)) = first_empty(board) else {
        return 1;
    };
    let mut found = 0;
    for value in 1..=SIZE as u8 {
        if placement_ok(board, row, col, value) {
            board[row][col] = value;
            found += count_solutions(board, cap - found);
            board[row][col] = 0;
            if found >= cap {
                break;
            }
        }
    }
    found
}

/// Givens must not already contradict each other; `placement_ok` only guards
/// cells the solver fills.
fn givens_consistent(board: &Board) -> bool {
    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = board[row][col];
            if value == 0 {
                continue;
            }
            let mut scratch = *board;
            scratch[row][col] = 0;
            if !placement_ok(&scratch, row, col, value) {
                return false;
            }
        }
    }
    true
}

fn to_grid(board: &Board) -> Grid {
    Grid::new(
        board
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v == 0 { None } else { Some(v) })
                    .collect()
            })
            .collect(),
    )
}

fn from_grid(grid: &Grid) -> EngineResult<Board> {
    if grid.size() != SIZE || grid.rows().iter().any(|row| row.len() != SIZE) {
        return Err(EngineError::UnsupportedGrid);
    }
    let mut board: Board = [[0; SIZE]; SIZE];
    for row in 0..SIZE {
        for col in 0..SIZE {
            match grid.get(row, col) {
                None => {}
                Some(v) if (1..=SIZE as u8).contains(&v) => board[row][col] = v,
                Some(_) => return Err(EngineError::UnsupportedGrid),
            }
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_puzzle_has_blanks_and_a_unique_solution() {
        let engine = BacktrackingEngine;
        let puzzle = engine.generate().unwrap();

        assert_eq!(puzzle.size(), SIZE);
        assert!(!puzzle.is_fully_filled(), "a puzzle should have blanks");

        let mut board = from_grid(&puzzle).unwrap();
        assert_eq!(count_solutions(&mut board, 2), 1);
    }

    #[test]
    fn solving_a_generated_puzzle_yields_a_valid_solution() {
        let engine = BacktrackingEngine;
        let puzzle = engine.generate().unwrap();
        let solution = engine.solve(&puzzle).unwrap();

        assert!(solution.is_fully_filled());
        assert!(solution.is_valid_solution());

        // Every given survives into the solution.
        for row in 0..SIZE {
            for col in 0..SIZE {
                if let Some(v) = puzzle.get(row, col) {
                    assert_eq!(solution.get(row, col), Some(v));
                }
            }
        }
    }

    #[test]
    fn unsolvable_grid_is_rejected() {
        // Row 0 needs a 1 in its first cell, but column 0 already has one.
        let mut rows = vec![vec![None; SIZE]; SIZE];
        for (i, v) in (2..=9u8).enumerate() {
            rows[0][i + 1] = Some(v);
        }
        rows[1][0] = Some(1);
        let grid = Grid::new(rows);

        let engine = BacktrackingEngine;
        assert!(matches!(engine.solve(&grid), Err(EngineError::Unsolvable)));
    }

    #[test]
    fn contradictory_givens_are_rejected() {
        let mut rows = vec![vec![None; SIZE]; SIZE];
        rows[0][0] = Some(5);
        rows[0][8] = Some(5);
        let grid = Grid::new(rows);

        let engine = BacktrackingEngine;
        assert!(matches!(engine.solve(&grid), Err(EngineError::Unsolvable)));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let engine = BacktrackingEngine;
        let grid = Grid::empty(4);
        assert!(matches!(
            engine.solve(&grid),
            Err(EngineError::UnsupportedGrid)
        ));
    }
}
